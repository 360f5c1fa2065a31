// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Vertex buffer layout descriptions.
//!
//! A [`VertexLayout`] is the author's description of one vertex buffer record: which
//! named fields it holds, in which order, and of which types.  The order is the memory
//! order, so it defines every field's byte offset and the record stride.
//!
//! # Example
//!
//! ```
//! use gl_shaders::layout::VertexLayout;
//! use gl_shaders::variable_types::VariableType;
//!
//! // Position, then an integer color the shader reads as normalized floats
//! let mut layout = VertexLayout::new();
//! layout.add_field("aPos", VariableType::Vec3).unwrap();
//! layout.add_normalized_field("aColor", VariableType::UVec4).unwrap();
//! assert_eq!(layout.stride(), 28);
//! assert_eq!(layout.offset_of("aColor"), Some(12));
//! ```

use std::hash::{Hash, Hasher};

use crate::descriptors::AttributeDescriptor;
use crate::error::Error;
use crate::layout::matcher::{MatchOptions, build_plan, locate, record_stride};
use crate::layout::plan::BindingPlan;
use crate::program::Program;
use crate::variable_types::VariableType;

/// Describes the layout of a vertex buffer record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VertexLayout {
    fields: Vec<AttributeDescriptor>,
}

impl VertexLayout {
    /// Creates a new, empty vertex layout.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field after every field added so far.
    ///
    /// # Errors
    ///
    /// [`Error::NameTooLong`] if the name does not fit an attribute descriptor.
    ///
    /// # Panics
    ///
    /// Panics if a field with this name already exists.  Names identify fields.
    pub fn add_field(&mut self, name: &str, ty: VariableType) -> Result<&mut Self, Error> {
        self.push(AttributeDescriptor::new(name, ty)?)
    }

    /// Appends a field whose integer data the shader reads as normalized floats.
    pub fn add_normalized_field(&mut self, name: &str, ty: VariableType) -> Result<&mut Self, Error> {
        self.push(AttributeDescriptor::new(name, ty)?.normalized(true))
    }

    fn push(&mut self, field: AttributeDescriptor) -> Result<&mut Self, Error> {
        assert!(
            self.fields.iter().all(|f| f.name() != field.name()),
            "Field {} already exists in this layout",
            field.name()
        );
        self.fields.push(field);
        Ok(self)
    }

    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.fields
    }

    /// Byte size of one record.
    pub fn stride(&self) -> u32 {
        record_stride(&self.fields)
    }

    /// Byte offset of the named field within a record.
    pub fn offset_of(&self, name: &str) -> Option<u32> {
        locate(&self.fields, name).map(|(_, offset)| offset)
    }

    /// Plans how `program` reads its attributes out of this layout.
    ///
    /// Introspected attributes never ask for normalization, so a shader attribute is
    /// normalized exactly when the field of the same name was added with
    /// [`add_normalized_field`](Self::add_normalized_field).
    pub fn plan_for(&self, program: &Program, options: &MatchOptions) -> Result<BindingPlan, Error> {
        if self.fields.iter().any(AttributeDescriptor::normalize) {
            let wanted: Vec<AttributeDescriptor> = program
                .attributes()
                .iter()
                .map(|a| {
                    let normalize = self.fields.iter().any(|f| f.name() == a.name() && f.normalize());
                    a.normalized(a.normalize() || normalize)
                })
                .collect();
            build_plan(&self.fields, &wanted, options)
        } else {
            build_plan(&self.fields, program.attributes(), options)
        }
    }

    /// A stable fingerprint of the layout, used to key cached plans.
    pub(crate) fn fingerprint(&self) -> u64 {
        let mut hasher = fnv::FnvHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Adopts `fields` in order.  Fails with [`Error::DuplicateField`] on a repeated name.
impl TryFrom<Vec<AttributeDescriptor>> for VertexLayout {
    type Error = Error;

    fn try_from(fields: Vec<AttributeDescriptor>) -> Result<Self, Error> {
        for (index, field) in fields.iter().enumerate() {
            if fields[..index].iter().any(|f| f.name() == field.name()) {
                return Err(Error::DuplicateField {
                    name: field.name().to_string(),
                });
            }
        }
        Ok(Self { fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    #[should_panic(expected = "already exists")]
    fn duplicate_names_panic() {
        let mut layout = VertexLayout::new();
        layout.add_field("aPos", VariableType::Vec3).unwrap();
        layout.add_field("aPos", VariableType::Vec2).unwrap();
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn fingerprint_tracks_changes() {
        let mut a = VertexLayout::new();
        a.add_field("aPos", VariableType::Vec3).unwrap();
        let b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());
        a.add_field("aUV", VariableType::Vec2).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn conversion_checks_names() {
        let fields = vec![
            AttributeDescriptor::new("aPos", VariableType::Vec3).unwrap(),
            AttributeDescriptor::new("aUV", VariableType::Vec2).unwrap(),
        ];
        let layout = VertexLayout::try_from(fields.clone()).unwrap();
        assert_eq!(layout.offset_of("aUV"), Some(12));

        let mut repeated = fields;
        repeated.push(AttributeDescriptor::new("aPos", VariableType::Vec4).unwrap());
        assert_eq!(
            VertexLayout::try_from(repeated),
            Err(Error::DuplicateField {
                name: "aPos".to_string()
            })
        );
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn chained_fields() {
        let mut layout = VertexLayout::default();
        layout
            .add_field("aPos", VariableType::Vec3)
            .unwrap()
            .add_field("aUV", VariableType::Vec2)
            .unwrap();
        assert_eq!(layout.attributes().len(), 2);
        assert_eq!(layout.stride(), 20);
        assert_eq!(layout.offset_of("aUV"), Some(12));
        assert_eq!(layout.offset_of("aNormal"), None);
    }
}
