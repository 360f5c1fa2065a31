// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Compiles and links shader stages into a [`Program`].
//!
//! ```
//! use gl_shaders::program::{ProgramBuilder, ShaderSource};
//! use gl_shaders::backend::StageKind;
//! use gl_shaders::software::SoftwareBackend;
//!
//! let mut backend = SoftwareBackend::new();
//! let program = ProgramBuilder::new()
//!     .stage(ShaderSource::new(
//!         "#version 450
//!          layout(location = 0) in vec3 aPos;
//!          void main() { gl_Position = vec4(aPos, 1.0); }",
//!         StageKind::Vertex,
//!     ))
//!     .stage(ShaderSource::new(
//!         "#version 450
//!          layout(location = 0) out vec4 color;
//!          void main() { color = vec4(1.0); }",
//!         StageKind::Fragment,
//!     ))
//!     .build(&mut backend)
//!     .expect("shaders are valid");
//! assert_eq!(program.attributes()[0].name(), "aPos");
//! program.delete(&mut backend);
//! ```

use crate::backend::{GraphicsBackend, ProgramId, ShaderId, StageKind};
use crate::error::{Error, ObjectKind};
use crate::program::{AttributeOrder, Program};

/// Source text for one pipeline stage.
///
/// A stage may be made of several source strings; they are handed to the backend
/// together, in order, as if concatenated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub sources: Vec<String>,
    pub kind: StageKind,
}

impl ShaderSource {
    pub fn new(source: impl Into<String>, kind: StageKind) -> Self {
        Self {
            sources: vec![source.into()],
            kind,
        }
    }

    pub fn from_parts<I, S>(sources: I, kind: StageKind) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            kind,
        }
    }
}

/// Builds a [`Program`] from an ordered list of stages.
#[derive(Debug, Clone, Default)]
pub struct ProgramBuilder {
    stages: Vec<ShaderSource>,
    attribute_order: AttributeOrder,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: ShaderSource) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages<I: IntoIterator<Item = ShaderSource>>(mut self, stages: I) -> Self {
        self.stages.extend(stages);
        self
    }

    pub fn attribute_order(mut self, order: AttributeOrder) -> Self {
        self.attribute_order = order;
        self
    }

    /// Compiles every stage, links them, and introspects the result.
    ///
    /// Stages are compiled in order and the first failure stops the build.  Whatever
    /// the outcome, the intermediate shader objects are deleted before this returns;
    /// on failure the program object is deleted too.
    ///
    /// # Errors
    ///
    /// * [`Error::ContextInvalid`] if the backend cannot create an object.
    /// * [`Error::ShaderCompile`] with the index of the failing stage.
    /// * [`Error::ShaderLink`] if the compiled stages do not link.
    /// * [`Error::NameTooLong`] if an active variable name does not fit a descriptor.
    pub fn build<B: GraphicsBackend + ?Sized>(&self, backend: &mut B) -> Result<Program, Error> {
        let mut objects = StageObjects::new(backend)?;

        for (index, stage) in self.stages.iter().enumerate() {
            let shader = objects.create_shader(stage.kind)?;
            let sources: Vec<&str> = stage.sources.iter().map(String::as_str).collect();
            objects.backend.shader_source(shader, &sources);
            objects.backend.compile_shader(shader);
            if !objects.backend.compile_status(shader) {
                let log = diagnostic(objects.backend.shader_info_log(shader));
                if let Some(log) = &log {
                    logwise::error_sync!(
                        "Error compiling shader stage {index}: {log}",
                        index = index,
                        log = logwise::privacy::LogIt(log)
                    );
                }
                return Err(Error::ShaderCompile {
                    stage: index,
                    kind: stage.kind,
                    log,
                });
            }
        }

        objects.attach_all();
        let program = objects.program;
        objects.backend.link_program(program);
        if !objects.backend.link_status(program) {
            let log = diagnostic(objects.backend.program_info_log(program));
            if let Some(log) = &log {
                logwise::error_sync!(
                    "Error linking program: {log}",
                    log = logwise::privacy::LogIt(log)
                );
            }
            return Err(Error::ShaderLink { log });
        }

        let built = Program::from_linked(&*objects.backend, program, self.attribute_order)?;
        objects.release_program();
        logwise::info_sync!(
            "Built program with {stages} stages, {attributes} attributes, {uniforms} uniforms",
            stages = self.stages.len(),
            attributes = built.attributes().len(),
            uniforms = built.uniforms().len()
        );
        Ok(built)
    }
}

/// Trivial logs (a lone terminator or whitespace) are treated as absent.
fn diagnostic(log: String) -> Option<String> {
    let trimmed = log.trim_end_matches('\0').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Backend objects created during one build.
///
/// Dropping this deletes every shader object and, unless
/// [`release_program`](Self::release_program) was called, the program object.  Every
/// exit from [`ProgramBuilder::build`] therefore cleans up the same way.
struct StageObjects<'a, B: GraphicsBackend + ?Sized> {
    backend: &'a mut B,
    program: ProgramId,
    shaders: Vec<ShaderId>,
    attached: bool,
    keep_program: bool,
}

impl<'a, B: GraphicsBackend + ?Sized> StageObjects<'a, B> {
    fn new(backend: &'a mut B) -> Result<Self, Error> {
        let program = backend
            .create_program()
            .ok_or(Error::ContextInvalid(ObjectKind::Program))?;
        Ok(Self {
            backend,
            program,
            shaders: Vec::new(),
            attached: false,
            keep_program: false,
        })
    }

    fn create_shader(&mut self, kind: StageKind) -> Result<ShaderId, Error> {
        let shader = self
            .backend
            .create_shader(kind)
            .ok_or(Error::ContextInvalid(ObjectKind::Shader(kind)))?;
        self.shaders.push(shader);
        Ok(shader)
    }

    fn attach_all(&mut self) {
        for &shader in &self.shaders {
            self.backend.attach_shader(self.program, shader);
        }
        self.attached = true;
    }

    fn release_program(&mut self) {
        self.keep_program = true;
    }
}

impl<B: GraphicsBackend + ?Sized> Drop for StageObjects<'_, B> {
    fn drop(&mut self) {
        for &shader in &self.shaders {
            if self.attached {
                self.backend.detach_shader(self.program, shader);
            }
            self.backend.delete_shader(shader);
        }
        if !self.keep_program {
            self.backend.delete_program(self.program);
        }
    }
}
