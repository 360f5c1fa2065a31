// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Builds a program against the software backend, reconciles it with a wider vertex
//! buffer layout, and prints the attribute calls a draw would make.

use gl_shaders::backend::StageKind;
use gl_shaders::layout::{MatchOptions, PlanCache, VertexLayout};
use gl_shaders::program::{ProgramBuilder, ShaderSource};
use gl_shaders::software::SoftwareBackend;
use gl_shaders::variable_types::VariableType;

const VERTEX: &str = "#version 450
layout(binding = 0) uniform Camera { mat4 uViewProjection; };
layout(location = 0) in vec3 aPos;
layout(location = 1) in vec2 aUV;
layout(location = 2) in mat4 aModel;
layout(location = 0) out vec2 vUV;
void main() {
    vUV = aUV;
    gl_Position = uViewProjection * aModel * vec4(aPos, 1.0);
}
";

const FRAGMENT: &str = "#version 450
layout(binding = 1) uniform texture2D uAlbedo;
layout(binding = 2) uniform sampler uAlbedoSampler;
layout(location = 0) in vec2 vUV;
layout(location = 0) out vec4 color;
void main() { color = texture(sampler2D(uAlbedo, uAlbedoSampler), vUV); }
";

fn main() -> Result<(), gl_shaders::Error> {
    let mut backend = SoftwareBackend::new();
    let program = ProgramBuilder::new()
        .stage(ShaderSource::new(VERTEX, StageKind::Vertex))
        .stage(ShaderSource::new(FRAGMENT, StageKind::Fragment))
        .build(&mut backend)?;

    for attribute in program.attributes() {
        println!(
            "attribute {} : {} at {:?}",
            attribute.name(),
            attribute.variable_type(),
            attribute.location()
        );
    }
    for uniform in program.uniforms() {
        println!("uniform {} : {} at {:?}", uniform.name(), uniform.variable_type(), uniform.location());
    }

    let mut layout = VertexLayout::new();
    layout
        .add_field("aPos", VariableType::Vec3)?
        .add_field("aNormal", VariableType::Vec3)?
        .add_field("aUV", VariableType::Vec2)?
        .add_field("aModel", VariableType::Mat4)?;

    let mut cache = PlanCache::new(MatchOptions::default());
    let plan = cache.plan(&program, &layout)?;
    println!("stride {} bytes, {} bindings", plan.stride(), plan.len());
    {
        let _bound = plan.bind(&mut backend);
        // a draw call would go here
    }
    for call in backend.take_calls() {
        println!("{call:?}");
    }

    cache.invalidate_program(program.id());
    program.delete(&mut backend);
    Ok(())
}
