// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Stage reflection on top of naga's GLSL front end.
//!
//! naga parses the Vulkan dialect of GLSL (`#version 440` and later): vertex inputs
//! carry `layout(location = N)`, resources carry `layout(binding = N)`, and textures are
//! sampled through separate `textureXX` and `sampler` objects.  A parse error becomes
//! the shader's info log.  A successful parse is reduced to the [`Interface`] the
//! linker needs: the vertex inputs, the uniforms, and which of them any function
//! references.

use std::collections::HashSet;

use naga::front::glsl::{Frontend, Options, ParseErrors};
use naga::{
    AddressSpace, ArraySize, Binding, Expression, Handle, ImageClass, ImageDimension,
    Module, ScalarKind, ShaderStage, Type, TypeInner, VectorSize,
};

use crate::backend::StageKind;
use crate::variable_types::VariableType;

/// naga gives every element of an array input or output its own location while
/// parsing, so locations and array lengths are bounded before it runs.
const MAX_INTERFACE_LOCATIONS: u32 = 32;

/// Arrays of structs are reported element by element, up to this many elements.
const MAX_REPORTED_ELEMENTS: u32 = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Input {
    pub(crate) name: String,
    pub(crate) ty: VariableType,
    pub(crate) array_size: u32,
    pub(crate) location: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Uniform {
    pub(crate) name: String,
    pub(crate) ty: VariableType,
    pub(crate) array_size: u32,
    /// The binding of a loose uniform.  Members of blocks and structs have none.
    pub(crate) location: Option<u32>,
    pub(crate) active: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Interface {
    /// Vertex inputs read by some function.
    pub(crate) inputs: Vec<Input>,
    /// `gl_VertexIndex` and `gl_InstanceIndex`, when read.
    pub(crate) builtins: Vec<&'static str>,
    pub(crate) uniforms: Vec<Uniform>,
    pub(crate) has_main: bool,
}

fn error(line: u32, message: impl std::fmt::Display) -> String {
    format!("0:{line}: error: {message}")
}

fn log(errors: &ParseErrors, source: &str) -> String {
    errors
        .errors
        .iter()
        .map(|e| error(e.meta.location(source).line_number, &e.kind))
        .collect::<Vec<_>>()
        .join("\n")
}

fn naga_stage(kind: StageKind) -> Option<ShaderStage> {
    match kind {
        StageKind::Vertex => Some(ShaderStage::Vertex),
        StageKind::Fragment => Some(ShaderStage::Fragment),
        StageKind::Compute => Some(ShaderStage::Compute),
        _ => None,
    }
}

/// Rejects `in`/`out` declarations whose location or array length lies outside
/// [`MAX_INTERFACE_LOCATIONS`].
fn check_interface_bounds(source: &str) -> Result<(), String> {
    let mut line = 1;
    let mut statement = String::new();
    let mut statement_line = 1;
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => {
                while chars.peek().is_some_and(|&n| n != '\n') {
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut last = ' ';
                for n in chars.by_ref() {
                    if n == '\n' {
                        line += 1;
                    }
                    if last == '*' && n == '/' {
                        break;
                    }
                    last = n;
                }
                statement.push(' ');
            }
            '#' if statement.trim().is_empty() => {
                while chars.peek().is_some_and(|&n| n != '\n') {
                    chars.next();
                }
            }
            ';' | '{' | '}' => {
                check_declaration(&statement, statement_line)?;
                statement.clear();
            }
            _ => {
                if c == '\n' {
                    line += 1;
                }
                if statement.trim().is_empty() {
                    statement_line = line;
                }
                statement.push(c);
            }
        }
    }
    Ok(())
}

fn check_declaration(statement: &str, line: u32) -> Result<(), String> {
    let words: Vec<&str> = statement
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .collect();
    if !words.iter().any(|w| *w == "in" || *w == "out") {
        return Ok(());
    }
    let out_of_range = |literal: &str| {
        let trimmed = literal.trim_end_matches(['u', 'U']);
        trimmed
            .parse::<u64>()
            .is_ok_and(|n| n >= u64::from(MAX_INTERFACE_LOCATIONS))
    };
    if let Some(i) = words.iter().position(|w| *w == "location")
        && let Some(value) = words.get(i + 1)
        && value.starts_with(|c: char| c.is_ascii_digit())
        && out_of_range(value)
    {
        return Err(error(line, format!("'location' : {value} is out of range")));
    }
    if let Some((_, rest)) = statement.split_once('[') {
        let length = rest.split(']').next().unwrap_or_default().trim();
        if length.starts_with(|c: char| c.is_ascii_digit()) && out_of_range(length) {
            return Err(error(line, format!("'[' : {length} elements exceed the interface limit")));
        }
    }
    Ok(())
}

/// The GLSL name of a numeric type, for lookup in the taxonomy.
fn numeric_glsl_name(inner: &TypeInner) -> Option<String> {
    fn prefix(kind: ScalarKind) -> Option<&'static str> {
        match kind {
            ScalarKind::Float => Some(""),
            ScalarKind::Sint => Some("i"),
            ScalarKind::Uint => Some("u"),
            ScalarKind::Bool => Some("b"),
            _ => None,
        }
    }
    fn size(size: VectorSize) -> u8 {
        match size {
            VectorSize::Bi => 2,
            VectorSize::Tri => 3,
            VectorSize::Quad => 4,
        }
    }
    match *inner {
        TypeInner::Scalar(scalar) if scalar.width == 4 || scalar.kind == ScalarKind::Bool => {
            let name = match scalar.kind {
                ScalarKind::Float => "float",
                ScalarKind::Sint => "int",
                ScalarKind::Uint => "uint",
                ScalarKind::Bool => "bool",
                _ => return None,
            };
            Some(name.to_string())
        }
        TypeInner::Vector { size: n, scalar } if scalar.width == 4 || scalar.kind == ScalarKind::Bool => {
            Some(format!("{}vec{}", prefix(scalar.kind)?, size(n)))
        }
        TypeInner::Matrix {
            columns,
            rows,
            scalar,
        } if scalar.width == 4 => Some(format!("mat{}x{}", size(columns), size(rows))),
        _ => None,
    }
}

fn variable_type(inner: &TypeInner) -> Option<VariableType> {
    match *inner {
        TypeInner::Image {
            dim,
            arrayed,
            class,
        } => match (dim, arrayed, class) {
            (ImageDimension::D2, false, ImageClass::Depth { .. }) => Some(VariableType::Sampler2DShadow),
            (_, _, ImageClass::Depth { .. }) | (_, _, ImageClass::Storage { .. }) => None,
            (ImageDimension::D2, false, _) => Some(VariableType::Sampler2D),
            (ImageDimension::D2, true, _) => Some(VariableType::Sampler2DArray),
            (ImageDimension::D3, false, _) => Some(VariableType::Sampler3D),
            (ImageDimension::Cube, false, _) => Some(VariableType::SamplerCube),
            _ => None,
        },
        _ => numeric_glsl_name(inner).and_then(|name| VariableType::from_glsl_name(&name)),
    }
}

fn array_length(size: ArraySize, name: &str) -> Result<u32, String> {
    match size {
        ArraySize::Constant(n) => Ok(n.get()),
        _ => Err(error(0, format!("'{name}' : arrays in the interface need a constant size"))),
    }
}

struct Reflector<'a> {
    module: &'a Module,
    used: HashSet<Handle<naga::GlobalVariable>>,
}

impl Reflector<'_> {
    /// Globals referenced from the shader's own functions.  The entry point wrapper
    /// naga generates touches every input, so it does not count.
    fn new(module: &Module) -> Reflector<'_> {
        let mut used = HashSet::new();
        for (_, function) in module.functions.iter() {
            for (_, expression) in function.expressions.iter() {
                if let Expression::GlobalVariable(global) = *expression {
                    used.insert(global);
                }
            }
        }
        Reflector { module, used }
    }

    fn global_named(&self, name: &str) -> Option<Handle<naga::GlobalVariable>> {
        self.module
            .global_variables
            .iter()
            .find(|(_, g)| g.space == AddressSpace::Private && g.name.as_deref() == Some(name))
            .map(|(handle, _)| handle)
    }

    fn inputs(&self, interface: &mut Interface) -> Result<(), String> {
        let Some(entry) = self.module.entry_points.first() else {
            return Ok(());
        };
        for argument in &entry.function.arguments {
            let (Some(name), Some(Binding::Location { location, .. })) =
                (argument.name.as_deref(), argument.binding.as_ref())
            else {
                continue;
            };
            let global = self.global_named(name);
            //elements of an array input arrive as separate arguments
            if !global.is_some_and(|g| self.used.contains(&g)) || interface.inputs.iter().any(|i| i.name == name) {
                continue;
            }
            let declared = global.map_or(argument.ty, |g| self.module.global_variables[g].ty);
            let (element, array_size) = match self.module.types[declared].inner {
                TypeInner::Array { base, size, .. } => (base, array_length(size, name)?),
                _ => (declared, 1),
            };
            let ty = variable_type(&self.module.types[element].inner)
                .filter(|ty| !ty.is_sampler())
                .ok_or_else(|| error(0, format!("'{name}' : type is not a vertex input type")))?;
            interface.inputs.push(Input {
                name: name.to_string(),
                ty,
                array_size,
                location: *location,
            });
        }
        //built-ins are declared on first use
        for builtin in ["gl_VertexIndex", "gl_InstanceIndex"] {
            if self.global_named(builtin).is_some_and(|g| self.used.contains(&g)) {
                interface.builtins.push(builtin);
            }
        }
        Ok(())
    }

    fn uniforms(&self, interface: &mut Interface) -> Result<(), String> {
        for (handle, global) in self.module.global_variables.iter() {
            if !matches!(global.space, AddressSpace::Uniform | AddressSpace::Handle) {
                continue;
            }
            let active = self.used.contains(&handle);
            let binding = global.binding.as_ref().map(|b| b.binding);
            let inner = &self.module.types[global.ty].inner;
            match (global.name.as_deref(), inner) {
                //lone samplers have no GL counterpart; they complete a texture
                (_, TypeInner::Sampler { .. }) => {}
                //anonymous blocks put their members at global scope
                (None, _) => self.flatten("", global.ty, None, active, &mut interface.uniforms)?,
                (Some(name), TypeInner::Struct { .. }) => {
                    self.flatten(name, global.ty, None, active, &mut interface.uniforms)?
                }
                (Some(name), _) => self.flatten(name, global.ty, binding, active, &mut interface.uniforms)?,
            }
        }
        Ok(())
    }

    fn flatten(
        &self,
        name: &str,
        ty: Handle<Type>,
        location: Option<u32>,
        active: bool,
        out: &mut Vec<Uniform>,
    ) -> Result<(), String> {
        match self.module.types[ty].inner {
            TypeInner::Struct { ref members, .. } => {
                for member in members {
                    let member_name = member.name.as_deref().unwrap_or_default();
                    let qualified = if name.is_empty() {
                        member_name.to_string()
                    } else {
                        format!("{name}.{member_name}")
                    };
                    self.flatten(&qualified, member.ty, None, active, out)?;
                }
            }
            TypeInner::Array { base, size, .. } => {
                let length = array_length(size, name)?;
                if matches!(self.module.types[base].inner, TypeInner::Struct { .. }) {
                    if length > MAX_REPORTED_ELEMENTS {
                        return Err(error(0, format!("'{name}' : too many structure elements")));
                    }
                    for index in 0..length {
                        self.flatten(&format!("{name}[{index}]"), base, None, active, out)?;
                    }
                } else {
                    out.push(Uniform {
                        name: name.to_string(),
                        ty: self.uniform_type(name, base)?,
                        array_size: length,
                        location,
                        active,
                    });
                }
            }
            _ => out.push(Uniform {
                name: name.to_string(),
                ty: self.uniform_type(name, ty)?,
                array_size: 1,
                location,
                active,
            }),
        }
        Ok(())
    }

    fn uniform_type(&self, name: &str, ty: Handle<Type>) -> Result<VariableType, String> {
        variable_type(&self.module.types[ty].inner)
            .ok_or_else(|| error(0, format!("'{name}' : type has no GL equivalent")))
    }
}

/// Parses one stage's source.  Errors are formatted like a driver's info log.
pub(crate) fn scan(source: &str, kind: StageKind) -> Result<Interface, String> {
    let stage = naga_stage(kind).ok_or_else(|| error(0, format!("{kind} shaders are not supported")))?;
    check_interface_bounds(source)?;
    let module = Frontend::default()
        .parse(&Options::from(stage), source)
        .map_err(|errors| log(&errors, source))?;

    let reflector = Reflector::new(&module);
    let mut interface = Interface {
        has_main: !module.entry_points.is_empty(),
        ..Interface::default()
    };
    if kind == StageKind::Vertex {
        reflector.inputs(&mut interface)?;
    }
    reflector.uniforms(&mut interface)?;
    Ok(interface)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = "#version 450
// position and color
layout(location = 2) in vec4 aColor;
layout(location = 0) in vec3 aPos;
layout(location = 1) in vec2 aUnused;
layout(binding = 0) uniform Camera { mat4 uMVP; };
layout(binding = 1) uniform Weights { float uWeights[3]; } weights;
layout(location = 0) out vec4 vColor;
/* helpers */
float twice(float x) { return x * 2.0; }
void main() {
    vColor = aColor * twice(weights.uWeights[0]);
    gl_Position = uMVP * vec4(aPos, 1.0);
}
";

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn finds_interface() {
        let interface = scan(VERTEX, StageKind::Vertex).unwrap();
        assert!(interface.has_main);
        let mut inputs: Vec<_> = interface.inputs.iter().map(|i| (i.name.as_str(), i.location)).collect();
        inputs.sort();
        //aUnused is never read
        assert_eq!(inputs, [("aColor", 2), ("aPos", 0)]);
        let uniforms: Vec<_> = interface.uniforms.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(uniforms, ["uMVP", "weights.uWeights"]);
        assert_eq!(interface.uniforms[1].array_size, 3);
        assert_eq!(interface.uniforms[1].location, None);
        assert!(interface.uniforms.iter().all(|u| u.active));
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn parse_errors_become_the_log() {
        let err = scan("#version 450\nvoid main() {\n gl_Position = vec4(1.0);\n", StageKind::Vertex).unwrap_err();
        assert!(err.starts_with("0:"), "{err}");
        assert!(err.contains("error"), "{err}");
        let err = scan("#version 450\nvoid main() { float x = ; }", StageKind::Fragment).unwrap_err();
        assert!(err.starts_with("0:2: error"), "{err}");
        assert!(scan("this is not glsl;", StageKind::Fragment).is_err());
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn struct_uniforms_are_flattened() {
        let interface = scan(
            "#version 450
struct Light { vec3 pos; float range; };
layout(binding = 0) uniform Light uLight;
layout(location = 0) out vec4 color;
void main() { color = vec4(uLight.pos, uLight.range); }",
            StageKind::Fragment,
        )
        .unwrap();
        let names: Vec<_> = interface.uniforms.iter().map(|u| (u.name.as_str(), u.ty)).collect();
        assert_eq!(
            names,
            [("uLight.pos", VariableType::Vec3), ("uLight.range", VariableType::Float)]
        );
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn textures_report_as_samplers() {
        let interface = scan(
            "#version 450
layout(binding = 1) uniform texture2D uTex;
layout(binding = 2) uniform sampler uSampler;
layout(location = 0) in vec2 vUV;
layout(location = 0) out vec4 color;
void main() { color = texture(sampler2D(uTex, uSampler), vUV); }",
            StageKind::Fragment,
        )
        .unwrap();
        assert_eq!(interface.uniforms.len(), 1);
        assert_eq!(interface.uniforms[0].ty, VariableType::Sampler2D);
        assert_eq!(interface.uniforms[0].location, Some(1));
        //fragment inputs are not attributes
        assert!(interface.inputs.is_empty());
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn interface_bounds() {
        let err = scan(
            "#version 450\nlayout(location = 4294967295) in vec4 a;\nvoid main() { gl_Position = a; }",
            StageKind::Vertex,
        )
        .unwrap_err();
        assert_eq!(err, "0:2: error: 'location' : 4294967295 is out of range");
        let err = scan(
            "#version 450\nin mat4 a[1073741824];\nvoid main() { gl_Position = a[0][0]; }",
            StageKind::Vertex,
        )
        .unwrap_err();
        assert!(err.starts_with("0:2: error"), "{err}");
        //comments are not declarations
        assert!(check_interface_bounds("// in vec4 a[99999];\n").is_ok());
    }

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn unsupported_stages() {
        let err = scan("#version 450\nvoid main() {}", StageKind::Geometry).unwrap_err();
        assert!(err.contains("not supported"), "{err}");
    }
}
