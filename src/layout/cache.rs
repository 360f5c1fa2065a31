// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use fnv::FnvHashMap;

use crate::backend::ProgramId;
use crate::error::Error;
use crate::layout::matcher::MatchOptions;
use crate::layout::plan::BindingPlan;
use crate::layout::vertex_layout::VertexLayout;
use crate::program::Program;

/// Binding plans for every (program, layout) pair drawn so far.
///
/// Plans are keyed by program id and a fingerprint of the layout, so a changed layout
/// simply misses.  Each plan is stored with the layout it was built from, and a hit
/// compares layouts, so two layouts with the same fingerprint never share a plan.
/// Call [`invalidate_program`](Self::invalidate_program) when a program is rebuilt or
/// deleted, since the backend may reuse its id.
#[derive(Debug, Default)]
pub struct PlanCache {
    options: MatchOptions,
    plans: FnvHashMap<(ProgramId, u64), Vec<(VertexLayout, BindingPlan)>>,
}

impl PlanCache {
    pub fn new(options: MatchOptions) -> Self {
        Self {
            options,
            plans: FnvHashMap::default(),
        }
    }

    /// Returns the plan for this pair, building it on first use.
    pub fn plan(&mut self, program: &Program, layout: &VertexLayout) -> Result<&BindingPlan, Error> {
        self.plan_keyed(program, layout, layout.fingerprint())
    }

    fn plan_keyed(&mut self, program: &Program, layout: &VertexLayout, fingerprint: u64) -> Result<&BindingPlan, Error> {
        let key = (program.id(), fingerprint);
        let cached = self
            .plans
            .get(&key)
            .and_then(|entries| entries.iter().position(|(cached, _)| cached == layout));
        let index = match cached {
            Some(index) => index,
            None => {
                let plan = layout.plan_for(program, &self.options)?;
                let entries = self.plans.entry(key).or_default();
                entries.push((layout.clone(), plan));
                entries.len() - 1
            }
        };
        Ok(&self.plans[&key][index].1)
    }

    pub fn invalidate_program(&mut self, program: ProgramId) {
        self.plans.retain(|(id, _), _| *id != program);
    }

    pub fn clear(&mut self) {
        self.plans.clear();
    }

    pub fn len(&self) -> usize {
        self.plans.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StageKind;
    use crate::program::{ProgramBuilder, ShaderSource};
    use crate::software::SoftwareBackend;
    use crate::variable_types::VariableType;

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn colliding_fingerprints_keep_separate_plans() {
        let mut backend = SoftwareBackend::new();
        let program = ProgramBuilder::new()
            .stage(ShaderSource::new(
                "#version 450
                 layout(location = 0) in vec3 aPos;
                 void main() { gl_Position = vec4(aPos, 1.0); }",
                StageKind::Vertex,
            ))
            .stage(ShaderSource::new(
                "#version 450
                 layout(location = 0) out vec4 color;
                 void main() { color = vec4(1.0); }",
                StageKind::Fragment,
            ))
            .build(&mut backend)
            .unwrap();

        let mut narrow = VertexLayout::new();
        narrow.add_field("aPos", VariableType::Vec3).unwrap();
        let mut wide = VertexLayout::new();
        wide.add_field("aNormal", VariableType::Vec3)
            .unwrap()
            .add_field("aPos", VariableType::Vec3)
            .unwrap();

        let mut cache = PlanCache::default();
        let first = cache.plan_keyed(&program, &narrow, 7).unwrap().clone();
        let second = cache.plan_keyed(&program, &wide, 7).unwrap().clone();
        assert_eq!(first.bindings()[0].offset, 0);
        assert_eq!(second.bindings()[0].offset, 12);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.plan_keyed(&program, &narrow, 7).unwrap(), &first);
        assert_eq!(cache.len(), 2);
        program.delete(&mut backend);
    }
}
