// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Building programs against the software backend: cleanup on every exit path,
//! introspection, and the errors each failure maps to.
use gl_shaders::Error;
use gl_shaders::backend::{GraphicsBackend, ProgramId, StageKind};
use gl_shaders::descriptors::MAX_ATTRIBUTE_NAME;
use gl_shaders::error::ObjectKind;
use gl_shaders::program::{AttributeOrder, ProgramBuilder, ShaderSource, list_attributes, list_uniforms};
use gl_shaders::software::SoftwareBackend;
use gl_shaders::variable_types::VariableType;

const VERTEX: &str = "#version 450
    layout(binding = 0) uniform Transform { mat4 uModel; };
    layout(location = 0) in vec4 aColor;
    layout(location = 1) in vec3 aPos;
    layout(location = 2) in vec2 aUV;
    layout(location = 0) out vec4 vColor;
    layout(location = 1) out vec2 vUV;
    void main() {
        vColor = aColor;
        vUV = aUV;
        gl_Position = uModel * vec4(aPos, 1.0);
    }
";

const FRAGMENT: &str = "#version 450
    layout(location = 0) in vec4 vColor;
    layout(location = 1) in vec2 vUV;
    layout(binding = 1) uniform texture2D uTexture;
    layout(binding = 2) uniform sampler uSampler;
    layout(location = 0) out vec4 color;
    void main() { color = vColor * texture(sampler2D(uTexture, uSampler), vUV); }
";

const PLAIN_FRAGMENT: &str = "#version 450
    layout(location = 0) out vec4 color;
    void main() { color = vec4(1.0); }";

fn builder(vertex: &str, fragment: &str) -> ProgramBuilder {
    ProgramBuilder::new()
        .stage(ShaderSource::new(vertex, StageKind::Vertex))
        .stage(ShaderSource::new(fragment, StageKind::Fragment))
}

fn assert_nothing_alive(backend: &SoftwareBackend) {
    assert_eq!(backend.live_programs(), 0);
    assert_eq!(backend.live_shaders(), 0);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn successful_build_keeps_only_the_program() {
    let mut backend = SoftwareBackend::new();
    let program = builder(VERTEX, FRAGMENT).build(&mut backend).unwrap();
    assert_eq!(backend.live_programs(), 1);
    assert_eq!(backend.live_shaders(), 0);
    assert!(backend.attached_shaders(program.id()).is_empty());
    assert!(backend.link_status(program.id()));

    program.delete(&mut backend);
    assert_eq!(backend.live_programs(), 0);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn attributes_are_sorted_by_name() {
    let mut backend = SoftwareBackend::new();
    let program = builder(VERTEX, FRAGMENT).build(&mut backend).unwrap();
    let names: Vec<&str> = program.attributes().iter().map(|a| a.name()).collect();
    assert_eq!(names, ["aColor", "aPos", "aUV"]);

    let pos = program.attribute("aPos").unwrap();
    assert_eq!(pos.variable_type(), VariableType::Vec3);
    assert_eq!(pos.location(), Some(1));

    let uniforms: Vec<&str> = program.uniforms().iter().map(|u| u.name()).collect();
    assert_eq!(uniforms, ["uModel", "uTexture"]);
    let texture = program.uniform("uTexture").unwrap();
    assert_eq!(texture.variable_type(), VariableType::Sampler2D);
    assert_eq!(texture.location(), Some(1));
    program.delete(&mut backend);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn backend_order_is_available() {
    let mut backend = SoftwareBackend::new();
    let program = builder(VERTEX, FRAGMENT)
        .attribute_order(AttributeOrder::Backend)
        .build(&mut backend)
        .unwrap();
    let names: Vec<&str> = program.attributes().iter().map(|a| a.name()).collect();
    //declaration order, which happens to be sorted here
    assert_eq!(names, ["aColor", "aPos", "aUV"]);
    let listed = list_attributes(&backend, program.id()).unwrap();
    assert_eq!(listed.as_slice(), program.attributes());
    program.delete(&mut backend);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn compile_failure_reports_stage_and_cleans_up() {
    let mut backend = SoftwareBackend::new();
    let broken = "#version 450\nlayout(location = 0) out vec4 color;\nvoid main() { color = vec4(1.0);";
    let result = builder(VERTEX, broken).build(&mut backend);
    match result {
        Err(Error::ShaderCompile { stage, kind, log }) => {
            assert_eq!(stage, 1);
            assert_eq!(kind, StageKind::Fragment);
            assert!(log.unwrap().contains("error"));
        }
        other => panic!("expected a compile error, got {other:?}"),
    }
    assert_nothing_alive(&backend);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn first_failing_stage_wins() {
    let mut backend = SoftwareBackend::new();
    let result = builder("#version 450\nlayout(location = 0) in vec3 aPos; void main() {", "garbage ;")
        .build(&mut backend);
    assert!(matches!(result, Err(Error::ShaderCompile { stage: 0, .. })));
    assert_eq!(backend.live_shaders(), 0);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn unterminated_comments_do_not_build() {
    let mut backend = SoftwareBackend::new();
    let vertex = "#version 450
        layout(location = 0) in vec3 aPos;
        /* never closed
        void main() { gl_Position = vec4(aPos, 1.0); }";
    let result = builder(vertex, PLAIN_FRAGMENT).build(&mut backend);
    //the comment swallows main, so either the parse or the link rejects it
    assert!(
        matches!(result, Err(Error::ShaderCompile { stage: 0, .. }) | Err(Error::ShaderLink { .. })),
        "{result:?}"
    );
    assert_nothing_alive(&backend);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn link_failure_cleans_up() {
    let mut backend = SoftwareBackend::new();
    let result = ProgramBuilder::new()
        .stage(ShaderSource::new(VERTEX, StageKind::Vertex))
        .build(&mut backend);
    match result {
        Err(Error::ShaderLink { log }) => {
            assert_eq!(log.as_deref(), Some("error: no fragment shader attached"));
        }
        other => panic!("expected a link error, got {other:?}"),
    }
    assert_nothing_alive(&backend);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn attribute_locations_out_of_range() {
    let mut backend = SoftwareBackend::new();

    //a mat4 takes four locations, and 14 + 4 runs past the last one
    let result = builder(
        "#version 450
         layout(location = 14) in mat4 aModel;
         void main() { gl_Position = aModel[3]; }",
        PLAIN_FRAGMENT,
    )
    .build(&mut backend);
    assert_eq!(
        result.unwrap_err(),
        Error::ShaderLink {
            log: Some("error: attribute aModel needs locations beyond the maximum of 16".to_string())
        }
    );
    assert_nothing_alive(&backend);

    for vertex in [
        "#version 450
         layout(location = 4294967295) in vec4 a;
         void main() { gl_Position = a; }",
        "#version 450
         in mat4 a[1073741824];
         void main() { gl_Position = a[0][0]; }",
    ] {
        let result = builder(vertex, PLAIN_FRAGMENT).build(&mut backend);
        assert!(
            matches!(result, Err(Error::ShaderCompile { stage: 0, .. })),
            "{result:?}"
        );
        assert_nothing_alive(&backend);
    }
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn largest_uniform_binding() {
    let mut backend = SoftwareBackend::new();
    let result = builder(
        "#version 450
         layout(location = 0) in vec3 aPos;
         layout(binding = 4294967295) uniform float u;
         void main() { gl_Position = vec4(aPos, u); }",
        PLAIN_FRAGMENT,
    )
    .build(&mut backend);
    match result {
        Ok(program) => {
            assert_eq!(program.uniform("u").unwrap().location(), Some(u32::MAX));
            program.delete(&mut backend);
        }
        //a front end may refuse the literal outright
        Err(Error::ShaderCompile { stage: 0, .. }) => {}
        Err(other) => panic!("unexpected {other:?}"),
    }
    assert_nothing_alive(&backend);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn invalid_context() {
    let mut backend = SoftwareBackend::new();
    backend.set_context_lost(true);
    assert_eq!(
        builder(VERTEX, FRAGMENT).build(&mut backend).unwrap_err(),
        Error::ContextInvalid(ObjectKind::Program)
    );

    //room for the program and one shader only
    backend.set_context_lost(false);
    backend.limit_objects(Some(2));
    assert_eq!(
        builder(VERTEX, FRAGMENT).build(&mut backend).unwrap_err(),
        Error::ContextInvalid(ObjectKind::Shader(StageKind::Fragment))
    );
    assert_nothing_alive(&backend);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn sources_in_parts() {
    let mut backend = SoftwareBackend::new();
    let program = ProgramBuilder::new()
        .stages([
            ShaderSource::from_parts(
                [
                    "#version 450\n",
                    "layout(location = 0) in vec3 aPos;\n",
                    "void main() { gl_Position = vec4(aPos, 1.0); }",
                ],
                StageKind::Vertex,
            ),
            ShaderSource::new(PLAIN_FRAGMENT, StageKind::Fragment),
        ])
        .build(&mut backend)
        .unwrap();
    assert_eq!(program.attributes().len(), 1);
    program.delete(&mut backend);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn builtins_have_no_location() {
    let mut backend = SoftwareBackend::new();
    let program = builder(
        "#version 450
         layout(location = 0) in vec3 aPos;
         void main() { gl_Position = vec4(aPos, float(gl_VertexIndex)); }",
        PLAIN_FRAGMENT,
    )
    .build(&mut backend)
    .unwrap();
    let builtin = program.attribute("gl_VertexIndex").unwrap();
    assert_eq!(builtin.location(), None);
    assert_eq!(builtin.variable_type(), VariableType::Int);
    program.delete(&mut backend);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn long_names_fail_the_build() {
    let long = "a".repeat(MAX_ATTRIBUTE_NAME);
    let vertex = format!(
        "#version 450\nlayout(location = 0) in vec3 {long};\nvoid main() {{ gl_Position = vec4({long}, 1.0); }}"
    );
    let mut backend = SoftwareBackend::new();
    let result = builder(&vertex, PLAIN_FRAGMENT).build(&mut backend);
    assert_eq!(
        result.unwrap_err(),
        Error::NameTooLong {
            name: long,
            max: MAX_ATTRIBUTE_NAME
        }
    );
    assert_nothing_alive(&backend);
    //the program was the first object created
    assert!(backend.attached_shaders(ProgramId(1)).is_empty());

    let fits = "a".repeat(MAX_ATTRIBUTE_NAME - 1);
    let vertex = format!(
        "#version 450\nlayout(location = 0) in vec3 {fits};\nvoid main() {{ gl_Position = vec4({fits}, 1.0); }}"
    );
    let program = builder(&vertex, PLAIN_FRAGMENT).build(&mut backend).unwrap();
    assert_eq!(program.attributes()[0].name(), fits);
    program.delete(&mut backend);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn uniform_arrays() {
    let mut backend = SoftwareBackend::new();
    let program = builder(
        "#version 450
         layout(location = 0) in vec3 aPos;
         layout(binding = 0) uniform float uWeights[3];
         void main() { gl_Position = vec4(aPos, uWeights[0] + uWeights[2]); }",
        PLAIN_FRAGMENT,
    )
    .build(&mut backend)
    .unwrap();
    let uniforms = list_uniforms(&backend, program.id()).unwrap();
    assert_eq!(uniforms.len(), 1);
    assert_eq!(uniforms[0].name(), "uWeights[0]");
    assert_eq!(uniforms[0].array_size(), 3);
    assert_eq!(uniforms[0].byte_size(), 12);
    assert_eq!(uniforms[0].location(), Some(0));
    program.delete(&mut backend);
}

#[test]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn struct_uniforms() {
    let mut backend = SoftwareBackend::new();
    let program = builder(
        "#version 450
         layout(location = 0) in vec3 aPos;
         void main() { gl_Position = vec4(aPos, 1.0); }",
        "#version 450
         struct Light { vec3 pos; };
         layout(binding = 0) uniform Light uLight;
         layout(location = 0) out vec4 color;
         void main() { color = vec4(uLight.pos, 1.0); }",
    )
    .build(&mut backend)
    .unwrap();
    let light = program.uniform("uLight.pos").unwrap();
    assert_eq!(light.variable_type(), VariableType::Vec3);
    assert_eq!(light.location(), None);
    program.delete(&mut backend);
}
