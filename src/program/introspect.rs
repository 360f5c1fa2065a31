// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Enumerates the active variables of a linked program.

use crate::backend::{GraphicsBackend, ProgramId};
use crate::descriptors::{AttributeDescriptor, UniformDescriptor};
use crate::error::Error;
use crate::variable_types::VariableType;

/// Lists the active attributes of `program`, in backend order.
///
/// # Errors
///
/// [`Error::NameTooLong`] if an attribute name does not fit a descriptor.
///
/// # Panics
///
/// Panics if the backend reports a type tag the taxonomy does not know.
pub fn list_attributes<B: GraphicsBackend + ?Sized>(
    backend: &B,
    program: ProgramId,
) -> Result<Vec<AttributeDescriptor>, Error> {
    let count = backend.active_attribute_count(program);
    let mut attributes = Vec::with_capacity(count as usize);
    for index in 0..count {
        let active = backend.active_attribute(program, index);
        let ty = VariableType::from_backend_tag(active.type_tag);
        let location = backend.attribute_location(program, &active.name);
        let descriptor = AttributeDescriptor::new(&active.name, ty)?
            .arrayed(active.size.max(1))
            .located_at(location);
        attributes.push(descriptor);
    }
    Ok(attributes)
}

/// Lists the active uniforms of `program`, in backend order.
///
/// # Errors
///
/// [`Error::NameTooLong`] if a uniform name does not fit a descriptor.
pub fn list_uniforms<B: GraphicsBackend + ?Sized>(
    backend: &B,
    program: ProgramId,
) -> Result<Vec<UniformDescriptor>, Error> {
    let count = backend.active_uniform_count(program);
    let mut uniforms = Vec::with_capacity(count as usize);
    for index in 0..count {
        let active = backend.active_uniform(program, index);
        let ty = VariableType::from_backend_tag(active.type_tag);
        let location = backend.uniform_location(program, &active.name);
        uniforms.push(UniformDescriptor::new(
            &active.name,
            active.size.max(1),
            ty,
            location,
        )?);
    }
    Ok(uniforms)
}
