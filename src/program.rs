// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! Linked shader programs and their introspected variables. */

pub mod builder;
pub mod introspect;

pub use builder::{ProgramBuilder, ShaderSource};
pub use introspect::{list_attributes, list_uniforms};

use crate::backend::{GraphicsBackend, ProgramId};
use crate::descriptors::{AttributeDescriptor, UniformDescriptor};

/// The order a [`Program`] keeps its attributes in.
///
/// Backends enumerate active attributes in an arbitrary order that may change
/// whenever the program is relinked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeOrder {
    /// Sorted by name once, when the program is built.
    #[default]
    Alphabetical,
    /// Whatever order the backend reported.
    Backend,
}

/// A linked program together with its active attributes and uniforms.
///
/// The program exclusively owns its backend object.  Nothing deletes it implicitly;
/// call [`Program::delete`] with the backend that created it.  Using the descriptors
/// after deletion is fine, since they hold no backend resources.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "the program object stays allocated until Program::delete is called"]
pub struct Program {
    id: ProgramId,
    attributes: Vec<AttributeDescriptor>,
    uniforms: Vec<UniformDescriptor>,
}

impl Program {
    /// Wraps an already-linked program object, introspecting it.
    pub fn from_linked<B: GraphicsBackend + ?Sized>(
        backend: &B,
        id: ProgramId,
        order: AttributeOrder,
    ) -> Result<Self, crate::Error> {
        let mut attributes = list_attributes(backend, id)?;
        if order == AttributeOrder::Alphabetical {
            crate::descriptors::sort_alphabetically(&mut attributes);
        }
        let uniforms = list_uniforms(backend, id)?;
        Ok(Program {
            id,
            attributes,
            uniforms,
        })
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    pub fn uniforms(&self) -> &[UniformDescriptor] {
        &self.uniforms
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformDescriptor> {
        self.uniforms.iter().find(|u| u.name() == name)
    }

    /// Deletes the backend program object.
    pub fn delete<B: GraphicsBackend + ?Sized>(self, backend: &mut B) {
        backend.delete_program(self.id);
    }
}
