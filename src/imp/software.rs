// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! An in-memory [`GraphicsBackend`].
//!
//! `SoftwareBackend` keeps a GL-like object table and vertex attribute state without a
//! GPU.  Shader "compilation" parses the GLSL with naga's front end, so sources are
//! really checked and programs built here report realistic active attributes and
//! uniforms: only variables a function references are active, attributes sit at their
//! `layout(location = N)` and loose uniforms at their `layout(binding = N)`.
//!
//! Sources use the GLSL dialect naga reads: `#version 450`, explicit locations on
//! vertex inputs (a missing one means location 0), explicit bindings on uniforms, and
//! `texture2D` plus `sampler` in place of `sampler2D`.  The vertex built-ins are
//! `gl_VertexIndex` and `gl_InstanceIndex`.
//!
//! It is useful for headless tooling and for tests, which can inspect exactly which
//! objects are alive and which attribute calls were made.

mod glsl;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::backend::{
    ActiveVariable, AttributePointer, GraphicsBackend, ProgramId, ShaderId, StageKind,
};
use crate::variable_types::VariableType;
use glsl::{Input, Interface};

/// GL_MAX_VERTEX_ATTRIBS on the most constrained implementations.
pub const MAX_VERTEX_ATTRIBUTES: u32 = 16;

/// A vertex attribute call made against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeCall {
    Enable(u32),
    Disable(u32),
    Pointer(AttributePointer),
}

#[derive(Debug)]
struct ShaderObject {
    kind: StageKind,
    source: String,
    compiled: Option<Interface>,
    info_log: String,
}

#[derive(Debug, Clone)]
struct LinkedVariable {
    name: String,
    size: u32,
    ty: VariableType,
    location: Option<u32>,
}

#[derive(Debug, Default)]
struct ProgramObject {
    attached: Vec<ShaderId>,
    linked: bool,
    info_log: String,
    attributes: Vec<LinkedVariable>,
    uniforms: Vec<LinkedVariable>,
}

#[derive(Debug, Default)]
pub struct SoftwareBackend {
    next_name: u32,
    programs: HashMap<u32, ProgramObject>,
    shaders: HashMap<u32, ShaderObject>,
    context_lost: bool,
    object_limit: Option<usize>,
    enabled: BTreeSet<u32>,
    pointers: BTreeMap<u32, AttributePointer>,
    calls: Vec<AttributeCall>,
}

impl SoftwareBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// While lost, object creation fails as it does without a current context.
    pub fn set_context_lost(&mut self, lost: bool) {
        self.context_lost = lost;
    }

    /// Caps the number of live program and shader objects.  Creation beyond the cap
    /// fails as it does when the driver runs out of memory.
    pub fn limit_objects(&mut self, limit: Option<usize>) {
        self.object_limit = limit;
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.len()
    }

    /// Shaders currently attached to `program`.
    pub fn attached_shaders(&self, program: ProgramId) -> &[ShaderId] {
        self.programs
            .get(&program.0)
            .map_or(&[][..], |p| p.attached.as_slice())
    }

    pub fn enabled_attributes(&self) -> impl Iterator<Item = u32> + '_ {
        self.enabled.iter().copied()
    }

    /// The last layout described for `location`.
    pub fn attribute_pointer(&self, location: u32) -> Option<AttributePointer> {
        self.pointers.get(&location).copied()
    }

    /// Returns and forgets every attribute call made so far.
    pub fn take_calls(&mut self) -> Vec<AttributeCall> {
        std::mem::take(&mut self.calls)
    }

    fn can_create(&self) -> bool {
        let live = self.programs.len() + self.shaders.len();
        !self.context_lost && self.object_limit.is_none_or(|limit| live < limit)
    }

    fn name(&mut self) -> u32 {
        self.next_name += 1;
        self.next_name
    }

    fn program(&self, program: ProgramId) -> &ProgramObject {
        match self.programs.get(&program.0) {
            Some(p) => p,
            None => panic!("{program:?} is not a live program object"),
        }
    }

    fn shader_mut(&mut self, shader: ShaderId) -> &mut ShaderObject {
        match self.shaders.get_mut(&shader.0) {
            Some(s) => s,
            None => panic!("{shader:?} is not a live shader object"),
        }
    }

    fn link(&self, attached: &[ShaderId]) -> Result<(Vec<LinkedVariable>, Vec<LinkedVariable>), String> {
        let mut stages: Vec<(StageKind, &Interface)> = Vec::new();
        for id in attached {
            let shader = self
                .shaders
                .get(&id.0)
                .ok_or_else(|| format!("error: attached shader {} was deleted", id.0))?;
            let interface = shader
                .compiled
                .as_ref()
                .ok_or_else(|| format!("error: {} shader {} is not compiled", shader.kind, id.0))?;
            if stages.iter().any(|(kind, _)| *kind == shader.kind) {
                return Err(format!("error: more than one {} shader attached", shader.kind));
            }
            if !interface.has_main {
                return Err(format!("error: {} shader has no main function", shader.kind));
            }
            stages.push((shader.kind, interface));
        }
        let has = |kind| stages.iter().any(|(k, _)| *k == kind);
        if !has(StageKind::Compute) {
            if !has(StageKind::Vertex) {
                return Err("error: no vertex shader attached".to_string());
            }
            if !has(StageKind::Fragment) {
                return Err("error: no fragment shader attached".to_string());
            }
        }

        let mut attributes = Vec::new();
        if let Some((_, vertex)) = stages.iter().find(|(k, _)| *k == StageKind::Vertex) {
            attributes = link_attributes(vertex)?;
        }
        let uniforms = link_uniforms(&stages)?;
        Ok((attributes, uniforms))
    }
}

/// Marks the locations `input` occupies, failing when they run past the last
/// attribute or overlap an earlier input.
fn claim(taken: &mut [bool; MAX_VERTEX_ATTRIBUTES as usize], input: &Input) -> Result<(), String> {
    let end = input
        .ty
        .location_count()
        .checked_mul(input.array_size)
        .and_then(|count| input.location.checked_add(count))
        .filter(|&end| end <= MAX_VERTEX_ATTRIBUTES)
        .ok_or_else(|| {
            format!(
                "error: attribute {} needs locations beyond the maximum of {MAX_VERTEX_ATTRIBUTES}",
                input.name
            )
        })?;
    for slot in &mut taken[input.location as usize..end as usize] {
        if *slot {
            return Err(format!(
                "error: attribute {} overlaps another attribute's location",
                input.name
            ));
        }
        *slot = true;
    }
    Ok(())
}

fn link_attributes(vertex: &Interface) -> Result<Vec<LinkedVariable>, String> {
    let mut taken = [false; MAX_VERTEX_ATTRIBUTES as usize];
    let mut linked = Vec::with_capacity(vertex.inputs.len() + vertex.builtins.len());
    for input in &vertex.inputs {
        claim(&mut taken, input)?;
        linked.push(LinkedVariable {
            name: input.name.clone(),
            size: input.array_size,
            ty: input.ty,
            location: Some(input.location),
        });
    }
    linked.extend(vertex.builtins.iter().map(|builtin| LinkedVariable {
        name: builtin.to_string(),
        size: 1,
        ty: VariableType::Int,
        location: None,
    }));
    Ok(linked)
}

/// Merges the uniforms of every stage.  A name declared in several stages must agree
/// on type, size and binding, and two different names may not share a binding.
fn link_uniforms(stages: &[(StageKind, &Interface)]) -> Result<Vec<LinkedVariable>, String> {
    let mut declared: Vec<(LinkedVariable, bool)> = Vec::new();
    for (kind, interface) in stages {
        for uniform in &interface.uniforms {
            if let Some((existing, active)) = declared.iter_mut().find(|(u, _)| u.name == uniform.name) {
                if existing.ty != uniform.ty
                    || existing.size != uniform.array_size
                    || existing.location != uniform.location
                {
                    return Err(format!(
                        "error: uniform {} is declared differently in the {kind} shader",
                        uniform.name
                    ));
                }
                *active |= uniform.active;
                continue;
            }
            if let Some((other, _)) = declared
                .iter()
                .find(|(u, _)| u.location.is_some() && u.location == uniform.location)
            {
                return Err(format!(
                    "error: uniforms {} and {} share binding {}",
                    other.name,
                    uniform.name,
                    uniform.location.unwrap_or_default()
                ));
            }
            declared.push((
                LinkedVariable {
                    name: uniform.name.clone(),
                    size: uniform.array_size,
                    ty: uniform.ty,
                    location: uniform.location,
                },
                uniform.active,
            ));
        }
    }
    Ok(declared
        .into_iter()
        .filter_map(|(uniform, active)| active.then_some(uniform))
        .collect())
}

/// GL reports arrays by the name of their first element.
fn reported_name(variable: &LinkedVariable) -> String {
    if variable.size > 1 {
        format!("{}[0]", variable.name)
    } else {
        variable.name.clone()
    }
}

fn lookup(variables: &[LinkedVariable], name: &str) -> Option<u32> {
    let base = name.strip_suffix("[0]").unwrap_or(name);
    variables
        .iter()
        .find(|v| v.name == base)
        .and_then(|v| v.location)
}

fn active(variables: &[LinkedVariable], index: u32) -> ActiveVariable {
    let variable = match variables.get(index as usize) {
        Some(v) => v,
        None => panic!("Active variable index {index} out of range"),
    };
    ActiveVariable {
        name: reported_name(variable),
        size: variable.size,
        type_tag: variable.ty.gl_enum(),
    }
}

impl GraphicsBackend for SoftwareBackend {
    fn create_program(&mut self) -> Option<ProgramId> {
        if !self.can_create() {
            return None;
        }
        let name = self.name();
        self.programs.insert(name, ProgramObject::default());
        Some(ProgramId(name))
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.programs.remove(&program.0);
    }

    fn create_shader(&mut self, kind: StageKind) -> Option<ShaderId> {
        if !self.can_create() {
            return None;
        }
        let name = self.name();
        self.shaders.insert(
            name,
            ShaderObject {
                kind,
                source: String::new(),
                compiled: None,
                info_log: String::new(),
            },
        );
        Some(ShaderId(name))
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        self.shaders.remove(&shader.0);
    }

    fn shader_source(&mut self, shader: ShaderId, sources: &[&str]) {
        self.shader_mut(shader).source = sources.concat();
    }

    fn compile_shader(&mut self, shader: ShaderId) {
        let object = self.shader_mut(shader);
        match glsl::scan(&object.source, object.kind) {
            Ok(interface) => {
                object.compiled = Some(interface);
                object.info_log.clear();
            }
            Err(log) => {
                object.compiled = None;
                object.info_log = log;
            }
        }
    }

    fn compile_status(&self, shader: ShaderId) -> bool {
        self.shaders
            .get(&shader.0)
            .is_some_and(|s| s.compiled.is_some())
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        self.shaders
            .get(&shader.0)
            .map(|s| s.info_log.clone())
            .unwrap_or_default()
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        let attached = match self.programs.get_mut(&program.0) {
            Some(p) => &mut p.attached,
            None => panic!("{program:?} is not a live program object"),
        };
        if !attached.contains(&shader) {
            attached.push(shader);
        }
    }

    fn detach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        if let Some(p) = self.programs.get_mut(&program.0) {
            p.attached.retain(|s| *s != shader);
        }
    }

    fn link_program(&mut self, program: ProgramId) {
        let result = self.link(&self.program(program).attached);
        let object = match self.programs.get_mut(&program.0) {
            Some(p) => p,
            None => panic!("{program:?} is not a live program object"),
        };
        match result {
            Ok((attributes, uniforms)) => {
                object.linked = true;
                object.info_log.clear();
                object.attributes = attributes;
                object.uniforms = uniforms;
            }
            Err(log) => {
                object.linked = false;
                object.info_log = log;
                object.attributes.clear();
                object.uniforms.clear();
            }
        }
    }

    fn link_status(&self, program: ProgramId) -> bool {
        self.programs.get(&program.0).is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        self.programs
            .get(&program.0)
            .map(|p| p.info_log.clone())
            .unwrap_or_default()
    }

    fn active_attribute_count(&self, program: ProgramId) -> u32 {
        self.program(program).attributes.len() as u32
    }

    fn active_attribute(&self, program: ProgramId, index: u32) -> ActiveVariable {
        active(&self.program(program).attributes, index)
    }

    fn attribute_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        lookup(&self.program(program).attributes, name)
    }

    fn active_uniform_count(&self, program: ProgramId) -> u32 {
        self.program(program).uniforms.len() as u32
    }

    fn active_uniform(&self, program: ProgramId, index: u32) -> ActiveVariable {
        active(&self.program(program).uniforms, index)
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        lookup(&self.program(program).uniforms, name)
    }

    fn enable_vertex_attribute(&mut self, location: u32) {
        self.enabled.insert(location);
        self.calls.push(AttributeCall::Enable(location));
    }

    fn disable_vertex_attribute(&mut self, location: u32) {
        self.enabled.remove(&location);
        self.calls.push(AttributeCall::Disable(location));
    }

    fn vertex_attribute_pointer(&mut self, pointer: AttributePointer) {
        self.pointers.insert(pointer.location, pointer);
        self.calls.push(AttributeCall::Pointer(pointer));
    }
}
