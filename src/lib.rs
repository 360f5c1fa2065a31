// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*! gl_shaders builds GLSL shader programs and connects them to vertex buffers.

A shader declares the attributes it consumes.  A vertex buffer provides records whose
fields are laid out one after another.  The two are written by different people, in
different orders, and usually disagree: the buffer carries fields this shader ignores,
and its fields are in memory order while the shader's attributes are in whatever order
the driver reports them.  This crate reconciles the two once, ahead of time, and turns
every later draw into a straight run of attribute calls.

# Overview

| Step        | Entry point                                   | Produces                       |
|-------------|-----------------------------------------------|--------------------------------|
| Build       | [`program::ProgramBuilder`]                   | [`program::Program`]           |
| Introspect  | [`program::list_attributes`], [`program::list_uniforms`] | descriptors          |
| Describe    | [`layout::VertexLayout`]                      | the buffer's fields            |
| Match       | [`layout::build_plan`], [`layout::PlanCache`] | [`layout::BindingPlan`]        |
| Draw        | [`layout::BindingPlan::bind`]                 | attribute state, undone on drop |

```
use gl_shaders::layout::{MatchOptions, VertexLayout};
use gl_shaders::program::{ProgramBuilder, ShaderSource};
use gl_shaders::software::SoftwareBackend;
use gl_shaders::variable_types::VariableType;
use gl_shaders::backend::StageKind;

let mut backend = SoftwareBackend::new();
let program = ProgramBuilder::new()
    .stage(ShaderSource::new(
        "#version 450
         layout(location = 0) in vec3 aPos;
         layout(location = 1) in vec2 aUV;
         layout(location = 0) out vec2 vUV;
         void main() { vUV = aUV; gl_Position = vec4(aPos, 1.0); }",
        StageKind::Vertex,
    ))
    .stage(ShaderSource::new(
        "#version 450
         layout(location = 0) in vec2 vUV;
         layout(location = 0) out vec4 color;
         void main() { color = vec4(vUV, 0.0, 1.0); }",
        StageKind::Fragment,
    ))
    .build(&mut backend)?;

let mut layout = VertexLayout::new();
layout.add_field("aPos", VariableType::Vec3)?;
layout.add_field("aNormal", VariableType::Vec3)?;
layout.add_field("aUV", VariableType::Vec2)?;

let plan = layout.plan_for(&program, &MatchOptions::default())?;
assert_eq!(plan.len(), 2);
assert_eq!(plan.stride(), 32);
{
    let _bound = plan.bind(&mut backend);
    // draw here
}
program.delete(&mut backend);
# Ok::<(), gl_shaders::Error>(())
```

# Backends

All GPU access goes through the [`backend::GraphicsBackend`] trait, which mirrors the
GL object model.  [`software::SoftwareBackend`] implements it in memory.  With the
`backend_wgpu` feature (on by default), a [`layout::BindingPlan`] also converts to wgpu
vertex buffer layouts for pipelines that describe attributes up front.

# Logging

Diagnostics such as compiler logs, skipped attributes and link failures are reported
through `logwise`.
*/

pub mod backend;
pub mod descriptors;
pub mod error;
mod imp;
pub mod layout;
pub mod program;
pub mod variable_types;

pub use error::Error;
pub use imp::software;
