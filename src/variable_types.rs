// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! The taxonomy of shader variable types.
//!
//! Graphics backends report the type of an active attribute or uniform as an opaque
//! tag (a GL enum such as `GL_FLOAT_VEC3`).  This module maps each tag onto a
//! [`VariableType`], and each [`VariableType`] onto its [`ScalarType`] and component
//! count.  Byte sizes are always derived from those two values:
//!
//! ```
//! use gl_shaders::variable_types::{ScalarType, VariableType};
//!
//! let ty = VariableType::Mat3;
//! assert_eq!(ty.scalar_type(), ScalarType::Float);
//! assert_eq!(ty.component_count(), 9);
//! assert_eq!(ty.byte_size(), 36);
//! ```

use std::fmt::Display;

/// The scalar type a variable is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarType {
    /// 32-bit IEEE float.
    Float,
    /// 32-bit signed integer.
    Int,
    /// 32-bit unsigned integer.
    UnsignedInt,
    /// Boolean.  GL stores booleans in 32 bits.
    Bool,
}

impl ScalarType {
    /// Size of one scalar, in bytes.
    pub const fn byte_size(self) -> u32 {
        match self {
            ScalarType::Float | ScalarType::Int | ScalarType::UnsignedInt | ScalarType::Bool => 4,
        }
    }

    /// The GL enum backends use to describe vertex data of this scalar type.
    pub const fn gl_enum(self) -> u32 {
        match self {
            ScalarType::Float => gl_enum::FLOAT,
            ScalarType::Int => gl_enum::INT,
            ScalarType::UnsignedInt => gl_enum::UNSIGNED_INT,
            ScalarType::Bool => gl_enum::BOOL,
        }
    }
}

/// GL type tags, as reported by `glGetActiveAttrib` and `glGetActiveUniform`.
pub mod gl_enum {
    pub const INT: u32 = 0x1404;
    pub const UNSIGNED_INT: u32 = 0x1405;
    pub const FLOAT: u32 = 0x1406;
    pub const FLOAT_VEC2: u32 = 0x8B50;
    pub const FLOAT_VEC3: u32 = 0x8B51;
    pub const FLOAT_VEC4: u32 = 0x8B52;
    pub const INT_VEC2: u32 = 0x8B53;
    pub const INT_VEC3: u32 = 0x8B54;
    pub const INT_VEC4: u32 = 0x8B55;
    pub const BOOL: u32 = 0x8B56;
    pub const BOOL_VEC2: u32 = 0x8B57;
    pub const BOOL_VEC3: u32 = 0x8B58;
    pub const BOOL_VEC4: u32 = 0x8B59;
    pub const FLOAT_MAT2: u32 = 0x8B5A;
    pub const FLOAT_MAT3: u32 = 0x8B5B;
    pub const FLOAT_MAT4: u32 = 0x8B5C;
    pub const SAMPLER_2D: u32 = 0x8B5E;
    pub const SAMPLER_3D: u32 = 0x8B5F;
    pub const SAMPLER_CUBE: u32 = 0x8B60;
    pub const SAMPLER_2D_SHADOW: u32 = 0x8B62;
    pub const FLOAT_MAT2X3: u32 = 0x8B65;
    pub const FLOAT_MAT2X4: u32 = 0x8B66;
    pub const FLOAT_MAT3X2: u32 = 0x8B67;
    pub const FLOAT_MAT3X4: u32 = 0x8B68;
    pub const FLOAT_MAT4X2: u32 = 0x8B69;
    pub const FLOAT_MAT4X3: u32 = 0x8B6A;
    pub const SAMPLER_2D_ARRAY: u32 = 0x8DC1;
    pub const UNSIGNED_INT_VEC2: u32 = 0x8DC6;
    pub const UNSIGNED_INT_VEC3: u32 = 0x8DC7;
    pub const UNSIGNED_INT_VEC4: u32 = 0x8DC8;
}

/// A shader variable type.
///
/// Matrix names follow GLSL: `Mat2x3` has 2 columns and 3 rows.
/// Sampler uniforms are set as a single integer texture unit, so they are
/// described as one `Int` component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum VariableType {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Int,
    IVec2,
    IVec3,
    IVec4,
    UInt,
    UVec2,
    UVec3,
    UVec4,
    Bool,
    BVec2,
    BVec3,
    BVec4,
    Mat2,
    Mat3,
    Mat4,
    Mat2x3,
    Mat2x4,
    Mat3x2,
    Mat3x4,
    Mat4x2,
    Mat4x3,
    Sampler2D,
    Sampler3D,
    SamplerCube,
    Sampler2DShadow,
    Sampler2DArray,
}

/// Every variable type, in declaration order.
pub const ALL_VARIABLE_TYPES: [VariableType; 30] = [
    VariableType::Float,
    VariableType::Vec2,
    VariableType::Vec3,
    VariableType::Vec4,
    VariableType::Int,
    VariableType::IVec2,
    VariableType::IVec3,
    VariableType::IVec4,
    VariableType::UInt,
    VariableType::UVec2,
    VariableType::UVec3,
    VariableType::UVec4,
    VariableType::Bool,
    VariableType::BVec2,
    VariableType::BVec3,
    VariableType::BVec4,
    VariableType::Mat2,
    VariableType::Mat3,
    VariableType::Mat4,
    VariableType::Mat2x3,
    VariableType::Mat2x4,
    VariableType::Mat3x2,
    VariableType::Mat3x4,
    VariableType::Mat4x2,
    VariableType::Mat4x3,
    VariableType::Sampler2D,
    VariableType::Sampler3D,
    VariableType::SamplerCube,
    VariableType::Sampler2DShadow,
    VariableType::Sampler2DArray,
];

impl VariableType {
    /// `(columns, rows)` of the type.  Scalars are `(1, 1)`, vectors `(1, n)`.
    pub const fn shape(self) -> (u32, u32) {
        use VariableType::*;
        match self {
            Float | Int | UInt | Bool => (1, 1),
            Sampler2D | Sampler3D | SamplerCube | Sampler2DShadow | Sampler2DArray => (1, 1),
            Vec2 | IVec2 | UVec2 | BVec2 => (1, 2),
            Vec3 | IVec3 | UVec3 | BVec3 => (1, 3),
            Vec4 | IVec4 | UVec4 | BVec4 => (1, 4),
            Mat2 => (2, 2),
            Mat3 => (3, 3),
            Mat4 => (4, 4),
            Mat2x3 => (2, 3),
            Mat2x4 => (2, 4),
            Mat3x2 => (3, 2),
            Mat3x4 => (3, 4),
            Mat4x2 => (4, 2),
            Mat4x3 => (4, 3),
        }
    }

    pub const fn scalar_type(self) -> ScalarType {
        use VariableType::*;
        match self {
            Float | Vec2 | Vec3 | Vec4 => ScalarType::Float,
            Mat2 | Mat3 | Mat4 | Mat2x3 | Mat2x4 | Mat3x2 | Mat3x4 | Mat4x2 | Mat4x3 => {
                ScalarType::Float
            }
            Int | IVec2 | IVec3 | IVec4 => ScalarType::Int,
            Sampler2D | Sampler3D | SamplerCube | Sampler2DShadow | Sampler2DArray => {
                ScalarType::Int
            }
            UInt | UVec2 | UVec3 | UVec4 => ScalarType::UnsignedInt,
            Bool | BVec2 | BVec3 | BVec4 => ScalarType::Bool,
        }
    }

    /// Number of scalar components.  For matrices, `columns * rows`.
    pub const fn component_count(self) -> u32 {
        let (columns, rows) = self.shape();
        columns * rows
    }

    /// Size of one value of this type, in bytes.
    pub const fn byte_size(self) -> u32 {
        self.component_count() * self.scalar_type().byte_size()
    }

    /// Number of consecutive attribute locations a vertex input of this type occupies.
    pub const fn location_count(self) -> u32 {
        self.shape().0
    }

    pub const fn is_matrix(self) -> bool {
        self.shape().0 > 1
    }

    pub const fn is_sampler(self) -> bool {
        matches!(
            self,
            VariableType::Sampler2D
                | VariableType::Sampler3D
                | VariableType::SamplerCube
                | VariableType::Sampler2DShadow
                | VariableType::Sampler2DArray
        )
    }

    /// The GL enum for this type.
    pub const fn gl_enum(self) -> u32 {
        use VariableType::*;
        match self {
            Float => gl_enum::FLOAT,
            Vec2 => gl_enum::FLOAT_VEC2,
            Vec3 => gl_enum::FLOAT_VEC3,
            Vec4 => gl_enum::FLOAT_VEC4,
            Int => gl_enum::INT,
            IVec2 => gl_enum::INT_VEC2,
            IVec3 => gl_enum::INT_VEC3,
            IVec4 => gl_enum::INT_VEC4,
            UInt => gl_enum::UNSIGNED_INT,
            UVec2 => gl_enum::UNSIGNED_INT_VEC2,
            UVec3 => gl_enum::UNSIGNED_INT_VEC3,
            UVec4 => gl_enum::UNSIGNED_INT_VEC4,
            Bool => gl_enum::BOOL,
            BVec2 => gl_enum::BOOL_VEC2,
            BVec3 => gl_enum::BOOL_VEC3,
            BVec4 => gl_enum::BOOL_VEC4,
            Mat2 => gl_enum::FLOAT_MAT2,
            Mat3 => gl_enum::FLOAT_MAT3,
            Mat4 => gl_enum::FLOAT_MAT4,
            Mat2x3 => gl_enum::FLOAT_MAT2X3,
            Mat2x4 => gl_enum::FLOAT_MAT2X4,
            Mat3x2 => gl_enum::FLOAT_MAT3X2,
            Mat3x4 => gl_enum::FLOAT_MAT3X4,
            Mat4x2 => gl_enum::FLOAT_MAT4X2,
            Mat4x3 => gl_enum::FLOAT_MAT4X3,
            Sampler2D => gl_enum::SAMPLER_2D,
            Sampler3D => gl_enum::SAMPLER_3D,
            SamplerCube => gl_enum::SAMPLER_CUBE,
            Sampler2DShadow => gl_enum::SAMPLER_2D_SHADOW,
            Sampler2DArray => gl_enum::SAMPLER_2D_ARRAY,
        }
    }

    /// Looks up the type for a GL enum, if the taxonomy knows it.
    pub fn from_gl_enum(tag: u32) -> Option<Self> {
        ALL_VARIABLE_TYPES.iter().copied().find(|ty| ty.gl_enum() == tag)
    }

    /// Looks up the type for a backend-reported tag.
    ///
    /// # Panics
    ///
    /// Panics if the tag has no taxonomy entry.  Backends only report types the
    /// taxonomy covers, so an unknown tag is a programming error.
    pub fn from_backend_tag(tag: u32) -> Self {
        match Self::from_gl_enum(tag) {
            Some(ty) => ty,
            None => panic!("Backend reported variable type tag {tag:#06x}, which has no taxonomy entry"),
        }
    }

    /// The GLSL spelling of the type.
    pub const fn glsl_name(self) -> &'static str {
        use VariableType::*;
        match self {
            Float => "float",
            Vec2 => "vec2",
            Vec3 => "vec3",
            Vec4 => "vec4",
            Int => "int",
            IVec2 => "ivec2",
            IVec3 => "ivec3",
            IVec4 => "ivec4",
            UInt => "uint",
            UVec2 => "uvec2",
            UVec3 => "uvec3",
            UVec4 => "uvec4",
            Bool => "bool",
            BVec2 => "bvec2",
            BVec3 => "bvec3",
            BVec4 => "bvec4",
            Mat2 => "mat2",
            Mat3 => "mat3",
            Mat4 => "mat4",
            Mat2x3 => "mat2x3",
            Mat2x4 => "mat2x4",
            Mat3x2 => "mat3x2",
            Mat3x4 => "mat3x4",
            Mat4x2 => "mat4x2",
            Mat4x3 => "mat4x3",
            Sampler2D => "sampler2D",
            Sampler3D => "sampler3D",
            SamplerCube => "samplerCube",
            Sampler2DShadow => "sampler2DShadow",
            Sampler2DArray => "sampler2DArray",
        }
    }

    /// Parses a GLSL type name.  `matNxN` aliases are accepted.
    pub fn from_glsl_name(name: &str) -> Option<Self> {
        match name {
            "mat2x2" => Some(VariableType::Mat2),
            "mat3x3" => Some(VariableType::Mat3),
            "mat4x4" => Some(VariableType::Mat4),
            _ => ALL_VARIABLE_TYPES.iter().copied().find(|ty| ty.glsl_name() == name),
        }
    }
}

impl Display for VariableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glsl_name())
    }
}
