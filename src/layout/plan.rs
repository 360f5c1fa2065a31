// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Precomputed binding plans and the per-draw applier.

use crate::backend::{AttributePointer, GraphicsBackend};
use crate::variable_types::ScalarType;

/// One shader attribute matched to one buffer field.
///
/// `location` and `normalize` come from the shader side; `scalar_type`,
/// `components` and `offset` from the buffer side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedBinding {
    pub location: u32,
    pub scalar_type: ScalarType,
    pub components: u32,
    /// Consecutive locations the field spans: its column count for matrices, else 1.
    pub columns: u32,
    pub normalize: bool,
    /// Byte offset of the field within one buffer record.
    pub offset: u32,
}

impl ResolvedBinding {
    /// One pointer per location the field spans.  Each matrix column is read as its
    /// own vector, `components / columns` wide and following the previous column.
    pub(crate) fn pointers(&self, stride: u32) -> impl Iterator<Item = AttributePointer> + '_ {
        let columns = self.columns.max(1);
        let rows = self.components / columns;
        let column_bytes = rows.saturating_mul(self.scalar_type.byte_size());
        (0..columns).map_while(move |column| {
            Some(AttributePointer {
                location: self.location.checked_add(column)?,
                components: rows,
                scalar_type: self.scalar_type,
                normalize: self.normalize,
                stride,
                offset: self.offset.checked_add(column.checked_mul(column_bytes)?)?,
            })
        })
    }

    /// The locations [`pointers`](Self::pointers) describes.
    pub(crate) fn locations(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.columns.max(1)).map_while(move |column| self.location.checked_add(column))
    }
}

/// A reusable set of attribute bindings for one (program, buffer layout) pair.
///
/// `stride` is the size of a whole buffer record, including fields no binding uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BindingPlan {
    pub(crate) bindings: Vec<ResolvedBinding>,
    pub(crate) stride: u32,
}

impl BindingPlan {
    pub fn new(bindings: Vec<ResolvedBinding>, stride: u32) -> Self {
        Self { bindings, stride }
    }

    pub fn bindings(&self) -> &[ResolvedBinding] {
        &self.bindings
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Enables and describes every attribute in the plan, in plan order.
    ///
    /// A matrix binding is described column by column at consecutive locations, since
    /// an attribute pointer carries at most four components.
    ///
    /// Pair every call with [`unapply`](Self::unapply) before the bound buffer changes,
    /// or use [`bind`](Self::bind), which does that on drop.
    pub fn apply<B: GraphicsBackend + ?Sized>(&self, backend: &mut B) {
        for pointer in self.bindings.iter().flat_map(|b| b.pointers(self.stride)) {
            backend.enable_vertex_attribute(pointer.location);
            backend.vertex_attribute_pointer(pointer);
        }
    }

    /// Disables every attribute location [`apply`](Self::apply) enabled.
    pub fn unapply<B: GraphicsBackend + ?Sized>(&self, backend: &mut B) {
        for location in self.bindings.iter().flat_map(|b| b.locations()) {
            backend.disable_vertex_attribute(location);
        }
    }

    /// Applies the plan until the returned guard is dropped.
    pub fn bind<'a, B: GraphicsBackend + ?Sized>(&'a self, backend: &'a mut B) -> AppliedPlan<'a, B> {
        self.apply(backend);
        AppliedPlan {
            plan: self,
            backend,
        }
    }
}

/// An applied [`BindingPlan`].  Unapplies the plan when dropped.
#[must_use = "dropping the guard immediately unapplies the plan"]
pub struct AppliedPlan<'a, B: GraphicsBackend + ?Sized> {
    plan: &'a BindingPlan,
    backend: &'a mut B,
}

impl<B: GraphicsBackend + ?Sized> AppliedPlan<'_, B> {
    /// The backend, for issuing draws while the plan is applied.
    pub fn backend(&mut self) -> &mut B {
        &mut *self.backend
    }

    pub fn plan(&self) -> &BindingPlan {
        self.plan
    }
}

impl<B: GraphicsBackend + ?Sized> Drop for AppliedPlan<'_, B> {
    fn drop(&mut self) {
        self.plan.unapply(&mut *self.backend);
    }
}

impl<B: GraphicsBackend + ?Sized> std::fmt::Debug for AppliedPlan<'_, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppliedPlan").field("plan", &self.plan).finish()
    }
}
