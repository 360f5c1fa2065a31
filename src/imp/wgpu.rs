// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Export of binding plans to wgpu vertex buffer layouts.
//!
//! GL describes attributes at draw time; wgpu bakes them into the pipeline.  The plan
//! already knows every location, offset and stride, so it converts directly.

mod vertex_format;

use crate::error::Error;
use crate::layout::{BindingPlan, ResolvedBinding};

fn column_attributes(binding: &ResolvedBinding) -> Result<Vec<wgpu::VertexAttribute>, Error> {
    if binding.normalize {
        //wgpu only normalizes 8 and 16 bit integers
        return Err(Error::UnsupportedVertexFormat {
            location: binding.location,
        });
    }
    let rows = binding.components / binding.columns.max(1);
    let format = vertex_format::format_for(binding.scalar_type, rows).ok_or(
        Error::UnsupportedVertexFormat {
            location: binding.location,
        },
    )?;
    //the stride is carried by the buffer layout, not the attributes
    Ok(binding
        .pointers(0)
        .map(|pointer| wgpu::VertexAttribute {
            format,
            offset: u64::from(pointer.offset),
            shader_location: pointer.location,
        })
        .collect())
}

impl BindingPlan {
    /// The plan as wgpu vertex attributes, one per location.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedVertexFormat`] for normalized bindings.
    pub fn wgpu_attributes(&self) -> Result<Vec<wgpu::VertexAttribute>, Error> {
        let mut attributes = Vec::with_capacity(self.bindings.len());
        for binding in &self.bindings {
            attributes.extend(column_attributes(binding)?);
        }
        Ok(attributes)
    }

    /// A buffer layout reading `attributes` (usually from [`wgpu_attributes`](Self::wgpu_attributes))
    /// with this plan's stride.
    pub fn wgpu_vertex_buffer_layout<'a>(
        &self,
        attributes: &'a [wgpu::VertexAttribute],
        step_mode: wgpu::VertexStepMode,
    ) -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride as u64,
            step_mode,
            attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::descriptors::AttributeDescriptor;
    use crate::error::Error;
    use crate::layout::{MatchOptions, build_plan};
    use crate::variable_types::VariableType;

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn matrices_expand_per_column() {
        let superset = [
            AttributeDescriptor::new("aPos", VariableType::Vec3).unwrap(),
            AttributeDescriptor::new("aModel", VariableType::Mat4x3).unwrap(),
        ];
        let subset = [
            AttributeDescriptor::with_location("aModel", VariableType::Mat4x3, 2).unwrap(),
            AttributeDescriptor::with_location("aPos", VariableType::Vec3, 0).unwrap(),
        ];
        let plan = build_plan(&superset, &subset, &MatchOptions::default()).unwrap();
        let attributes = plan.wgpu_attributes().unwrap();
        let described: Vec<_> = attributes
            .iter()
            .map(|a| (a.shader_location, a.offset, a.format))
            .collect();
        assert_eq!(
            described,
            [
                (2, 12, wgpu::VertexFormat::Float32x3),
                (3, 24, wgpu::VertexFormat::Float32x3),
                (4, 36, wgpu::VertexFormat::Float32x3),
                (5, 48, wgpu::VertexFormat::Float32x3),
                (0, 0, wgpu::VertexFormat::Float32x3),
            ]
        );
        let layout = plan.wgpu_vertex_buffer_layout(&attributes, wgpu::VertexStepMode::Instance);
        assert_eq!(layout.array_stride, 60);
        assert_eq!(layout.attributes.len(), 5);
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn normalized_bindings_are_rejected() {
        let superset = [AttributeDescriptor::new("aColor", VariableType::UVec4).unwrap()];
        let subset = [AttributeDescriptor::with_location("aColor", VariableType::Vec4, 3)
            .unwrap()
            .normalized(true)];
        let plan = build_plan(&superset, &subset, &MatchOptions::default()).unwrap();
        assert_eq!(
            plan.wgpu_attributes(),
            Err(Error::UnsupportedVertexFormat { location: 3 })
        );
    }
}
