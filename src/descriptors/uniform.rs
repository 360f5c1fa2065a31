// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::descriptors::MAX_UNIFORM_NAME;
use crate::descriptors::name::BoundedName;
use crate::error::Error;
use crate::variable_types::VariableType;

pub type UniformName = BoundedName<MAX_UNIFORM_NAME>;

/// One active uniform of a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformDescriptor {
    name: UniformName,
    array_size: u32,
    ty: VariableType,
    location: Option<u32>,
}

impl UniformDescriptor {
    /// # Errors
    ///
    /// [`Error::NameTooLong`] if `name` has [`MAX_UNIFORM_NAME`] bytes or more.
    pub fn new(
        name: &str,
        array_size: u32,
        ty: VariableType,
        location: Option<u32>,
    ) -> Result<Self, Error> {
        assert!(array_size > 0, "Array size must be positive");
        Ok(Self {
            name: UniformName::new(name)?,
            array_size,
            ty,
            location,
        })
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

    /// Bytes of uniform data for the whole array.
    pub fn byte_size(&self) -> u32 {
        self.ty.byte_size().saturating_mul(self.array_size)
    }
}
