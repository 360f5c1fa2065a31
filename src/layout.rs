// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Reconciles the attributes a shader consumes with the fields a vertex buffer provides.

Matching runs once per (program, buffer layout) pair and produces a [`BindingPlan`].
The plan is then applied before every draw that uses that pairing, which costs one
backend call per matched attribute and no lookups.
*/

pub mod vertex_layout;
pub mod matcher;
pub mod plan;
pub mod cache;

pub use cache::PlanCache;
pub use matcher::{MatchOptions, MissingAttribute, bind_all, build_plan, build_plan_into, unbind_all};
pub use plan::{AppliedPlan, BindingPlan, ResolvedBinding};
pub use vertex_layout::VertexLayout;
