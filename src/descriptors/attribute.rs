// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::descriptors::MAX_ATTRIBUTE_NAME;
use crate::descriptors::name::BoundedName;
use crate::error::Error;
use crate::variable_types::{ScalarType, VariableType};

pub type AttributeName = BoundedName<MAX_ATTRIBUTE_NAME>;

/// One named vertex attribute.
///
/// The same type describes both sides of a binding: an active attribute introspected
/// from a linked program, and a field of a vertex buffer record written by a layout
/// author.  For introspected attributes `location` comes from the program; for buffer
/// fields it is usually [`None`].
///
/// `normalize` never comes from the backend.  It only matters when sending integer
/// data to a float attribute, and is set by whoever describes the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeDescriptor {
    name: AttributeName,
    array_size: u32,
    ty: VariableType,
    location: Option<u32>,
    normalize: bool,
}

impl AttributeDescriptor {
    /// Describes an attribute that is not bound to a location.
    ///
    /// # Errors
    ///
    /// [`Error::NameTooLong`] if `name` has [`MAX_ATTRIBUTE_NAME`] bytes or more.
    pub fn new(name: &str, ty: VariableType) -> Result<Self, Error> {
        Ok(Self {
            name: AttributeName::new(name)?,
            array_size: 1,
            ty,
            location: None,
            normalize: false,
        })
    }

    /// Describes an attribute bound at `location`.
    pub fn with_location(name: &str, ty: VariableType, location: u32) -> Result<Self, Error> {
        Ok(Self::new(name, ty)?.located_at(Some(location)))
    }

    pub(crate) fn located_at(mut self, location: Option<u32>) -> Self {
        self.location = location;
        self
    }

    /// Returns a copy with the given array size.
    ///
    /// # Panics
    ///
    /// Panics if `array_size` is zero.
    pub fn arrayed(mut self, array_size: u32) -> Self {
        assert!(array_size > 0, "Array size must be positive");
        self.array_size = array_size;
        self
    }

    /// Returns a copy that asks for integer data to be normalized.
    pub fn normalized(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn array_size(&self) -> u32 {
        self.array_size
    }

    pub fn variable_type(&self) -> VariableType {
        self.ty
    }

    pub fn location(&self) -> Option<u32> {
        self.location
    }

    pub fn normalize(&self) -> bool {
        self.normalize
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.ty.scalar_type()
    }

    pub fn component_count(&self) -> u32 {
        self.ty.component_count()
    }

    /// Bytes this attribute occupies in one vertex record.
    ///
    /// Record layouts are computed from the type alone; `array_size` is not part of it.
    pub fn byte_size(&self) -> u32 {
        self.ty.byte_size()
    }
}

/// Sorts attributes by name, byte-wise ascending.
pub fn sort_alphabetically(attributes: &mut [AttributeDescriptor]) {
    attributes.sort_by(|lhs, rhs| lhs.name.cmp(&rhs.name));
}
