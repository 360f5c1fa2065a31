// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! Descriptions of named shader variables and vertex buffer fields. */

pub mod name;
pub mod attribute;
pub mod uniform;

pub use attribute::{AttributeDescriptor, AttributeName, sort_alphabetically};
pub use name::BoundedName;
pub use uniform::{UniformDescriptor, UniformName};

/// Attribute names must be shorter than this many bytes.
pub const MAX_ATTRIBUTE_NAME: usize = 24;

/// Uniform names must be shorter than this many bytes.
pub const MAX_UNIFORM_NAME: usize = 24;
