// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! The graphics backend this crate drives.
//!
//! Everything in this crate talks to the GPU through [`GraphicsBackend`].  The trait
//! is a thin, GL-shaped surface: object creation and deletion, shader compilation and
//! program linking, introspection of active variables, and vertex attribute state.
//!
//! All methods assume a single current context, used from one thread.  The trait
//! deliberately takes `&mut self` for anything that changes backend state so that the
//! borrow checker enforces that restriction for callers.

use std::fmt::Display;

use crate::variable_types::ScalarType;

/// Backend name of a linked (or linkable) program object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub u32);

/// Backend name of a shader object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(pub u32);

/// The pipeline stage a shader object is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    TessControl,
    TessEvaluation,
    Geometry,
    Fragment,
    Compute,
}

impl Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StageKind::Vertex => "vertex",
            StageKind::TessControl => "tessellation control",
            StageKind::TessEvaluation => "tessellation evaluation",
            StageKind::Geometry => "geometry",
            StageKind::Fragment => "fragment",
            StageKind::Compute => "compute",
        };
        f.write_str(name)
    }
}

/// One active attribute or uniform, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveVariable {
    pub name: String,
    /// Declared array size, in units of the type.  `1` for non-arrays.
    pub size: u32,
    /// Opaque type tag.  For GL backends this is the GL enum.
    pub type_tag: u32,
}

/// How a vertex attribute reads from the currently bound buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributePointer {
    pub location: u32,
    pub components: u32,
    pub scalar_type: ScalarType,
    pub normalize: bool,
    pub stride: u32,
    pub offset: u32,
}

pub trait GraphicsBackend {
    /// Creates a program object.  `None` means the context could not create one.
    fn create_program(&mut self) -> Option<ProgramId>;
    fn delete_program(&mut self, program: ProgramId);

    /// Creates a shader object.  `None` means the context could not create one.
    fn create_shader(&mut self, kind: StageKind) -> Option<ShaderId>;
    fn delete_shader(&mut self, shader: ShaderId);

    /// Replaces the source of the shader with the concatenation of `sources`.
    fn shader_source(&mut self, shader: ShaderId, sources: &[&str]);
    fn compile_shader(&mut self, shader: ShaderId);
    fn compile_status(&self, shader: ShaderId) -> bool;
    /// The compile diagnostic log.  May be empty.
    fn shader_info_log(&self, shader: ShaderId) -> String;

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId);
    fn detach_shader(&mut self, program: ProgramId, shader: ShaderId);
    fn link_program(&mut self, program: ProgramId);
    fn link_status(&self, program: ProgramId) -> bool;
    /// The link diagnostic log.  May be empty.
    fn program_info_log(&self, program: ProgramId) -> String;

    fn active_attribute_count(&self, program: ProgramId) -> u32;
    fn active_attribute(&self, program: ProgramId, index: u32) -> ActiveVariable;
    /// `None` for attributes that have no location, such as built-ins.
    fn attribute_location(&self, program: ProgramId, name: &str) -> Option<u32>;

    fn active_uniform_count(&self, program: ProgramId) -> u32;
    fn active_uniform(&self, program: ProgramId, index: u32) -> ActiveVariable;
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<u32>;

    fn enable_vertex_attribute(&mut self, location: u32);
    fn disable_vertex_attribute(&mut self, location: u32);
    /// Describes the layout of the attribute at `pointer.location` within the bound buffer.
    fn vertex_attribute_pointer(&mut self, pointer: AttributePointer);
}
