// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::variable_types::{ScalarType, VariableType};

/// The wgpu format of one `rows`-component column.
pub(super) fn format_for(scalar_type: ScalarType, rows: u32) -> Option<wgpu::VertexFormat> {
    use wgpu::VertexFormat::*;
    let format = match (scalar_type, rows) {
        (ScalarType::Float, 1) => Float32,
        (ScalarType::Float, 2) => Float32x2,
        (ScalarType::Float, 3) => Float32x3,
        (ScalarType::Float, 4) => Float32x4,
        (ScalarType::Int, 1) => Sint32,
        (ScalarType::Int, 2) => Sint32x2,
        (ScalarType::Int, 3) => Sint32x3,
        (ScalarType::Int, 4) => Sint32x4,
        //bools are stored as 32-bit words
        (ScalarType::UnsignedInt | ScalarType::Bool, 1) => Uint32,
        (ScalarType::UnsignedInt | ScalarType::Bool, 2) => Uint32x2,
        (ScalarType::UnsignedInt | ScalarType::Bool, 3) => Uint32x3,
        (ScalarType::UnsignedInt | ScalarType::Bool, 4) => Uint32x4,
        _ => return None,
    };
    Some(format)
}

impl VariableType {
    /// The wgpu vertex format of one column of this type.
    ///
    /// Matrices occupy [`location_count`](Self::location_count) consecutive locations of
    /// this format.  Samplers cannot be vertex inputs and return `None`.
    pub fn wgpu_vertex_format(self) -> Option<wgpu::VertexFormat> {
        if self.is_sampler() {
            return None;
        }
        format_for(self.scalar_type(), self.shape().1)
    }
}
