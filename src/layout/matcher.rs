// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Name-based matching of shader attributes against a buffer record layout.
//!
//! The two lists play different roles:
//!
//! * the **superset** is the physical buffer record.  Its order and field types define
//!   every byte offset and the record stride.
//! * the **subset** is what the shader consumes.  Its locations and normalize flags are
//!   what gets bound.
//!
//! ```
//! use gl_shaders::descriptors::AttributeDescriptor;
//! use gl_shaders::layout::{MatchOptions, build_plan};
//! use gl_shaders::variable_types::VariableType;
//!
//! let buffer = [
//!     AttributeDescriptor::new("aColorFloat", VariableType::Vec4).unwrap(),
//!     AttributeDescriptor::new("aPos", VariableType::Vec3).unwrap(),
//! ];
//! let shader = [
//!     AttributeDescriptor::with_location("aPos", VariableType::Vec3, 1).unwrap(),
//!     AttributeDescriptor::with_location("aColorFloat", VariableType::Vec4, 0).unwrap(),
//! ];
//! let plan = build_plan(&buffer, &shader, &MatchOptions::default()).unwrap();
//! assert_eq!(plan.stride(), 28);
//! assert_eq!(plan.bindings()[0].offset, 16);
//! ```

use crate::backend::GraphicsBackend;
use crate::descriptors::AttributeDescriptor;
use crate::error::Error;
use crate::layout::plan::{BindingPlan, ResolvedBinding};

/// What to do when the shader needs an attribute the buffer does not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingAttribute {
    /// Fail with [`Error::UnsatisfiedAttribute`].
    #[default]
    Fail,
    /// Log a warning and leave the attribute unbound.
    Skip,
}

/// Strictness knobs for [`build_plan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOptions {
    pub missing: MissingAttribute,
    /// Warn when both lists have the same length.
    ///
    /// Equal lengths often mean the buffer was written for exactly this shader, in
    /// which case [`bind_all`] would do.  It can also hide two unrelated lists that
    /// happen to be the same size.
    pub warn_on_equal_length: bool,
}

impl MatchOptions {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn tolerant() -> Self {
        Self {
            missing: MissingAttribute::Skip,
            warn_on_equal_length: false,
        }
    }
}

/// Total byte size of one record laid out as `fields`.
pub fn record_stride(fields: &[AttributeDescriptor]) -> u32 {
    fields.iter().map(AttributeDescriptor::byte_size).sum()
}

/// Finds `name` in the superset, returning the field and its byte offset.
pub(crate) fn locate<'a>(superset: &'a [AttributeDescriptor], name: &str) -> Option<(&'a AttributeDescriptor, u32)> {
    let mut offset = 0;
    for field in superset {
        if field.name() == name {
            return Some((field, offset));
        }
        offset += field.byte_size();
    }
    None
}

enum Resolution {
    Bound(ResolvedBinding),
    /// No location, such as a built-in.  Never fed from a buffer.
    Unlocated,
    Missing,
}

fn resolve(superset: &[AttributeDescriptor], wanted: &AttributeDescriptor) -> Resolution {
    let Some(location) = wanted.location() else {
        return Resolution::Unlocated;
    };
    match locate(superset, wanted.name()) {
        Some((field, offset)) => Resolution::Bound(ResolvedBinding {
            location,
            scalar_type: field.scalar_type(),
            components: field.component_count(),
            columns: field.variable_type().location_count(),
            normalize: wanted.normalize(),
            offset,
        }),
        None => Resolution::Missing,
    }
}

/// Applies `options` to a resolution.  `Ok(None)` means nothing gets bound.
fn admit(
    wanted: &AttributeDescriptor,
    resolution: Resolution,
    options: &MatchOptions,
) -> Result<Option<ResolvedBinding>, Error> {
    match resolution {
        Resolution::Bound(binding) => Ok(Some(binding)),
        Resolution::Unlocated => {
            logwise::warn_sync!(
                "Attribute {name} has no location; not binding it from the buffer",
                name = logwise::privacy::LogIt(wanted.name())
            );
            Ok(None)
        }
        Resolution::Missing => match options.missing {
            MissingAttribute::Fail => Err(Error::UnsatisfiedAttribute {
                name: wanted.name().to_string(),
            }),
            MissingAttribute::Skip => {
                logwise::warn_sync!(
                    "Vertex layout has no field for shader attribute {name}; leaving it unbound",
                    name = logwise::privacy::LogIt(wanted.name())
                );
                Ok(None)
            }
        },
    }
}

/// Names identify superset fields, so each may appear once.
fn check_unique(superset: &[AttributeDescriptor]) -> Result<(), Error> {
    for (index, field) in superset.iter().enumerate() {
        if superset[..index].iter().any(|f| f.name() == field.name()) {
            return Err(Error::DuplicateField {
                name: field.name().to_string(),
            });
        }
    }
    Ok(())
}

fn check_lengths(superset: &[AttributeDescriptor], subset: &[AttributeDescriptor], options: &MatchOptions) {
    if options.warn_on_equal_length && superset.len() == subset.len() {
        logwise::warn_sync!(
            "Superset and subset both have {len} attributes; consider binding the layout directly",
            len = superset.len()
        );
    }
}

/// Builds a [`BindingPlan`] that feeds the `subset` attributes from records laid out
/// as `superset`.
///
/// Bindings come out in subset order.  Matching is by exact name.
///
/// # Errors
///
/// * [`Error::DuplicateField`] if two superset fields share a name.
/// * [`Error::UnsatisfiedAttribute`] if a located subset attribute has no superset
///   field and `options.missing` is [`MissingAttribute::Fail`].
pub fn build_plan(
    superset: &[AttributeDescriptor],
    subset: &[AttributeDescriptor],
    options: &MatchOptions,
) -> Result<BindingPlan, Error> {
    check_unique(superset)?;
    check_lengths(superset, subset, options);
    let mut bindings = Vec::with_capacity(subset.len());
    for wanted in subset {
        if let Some(binding) = admit(wanted, resolve(superset, wanted), options)? {
            bindings.push(binding);
        }
    }
    let stride = record_stride(superset);
    logwise::trace_sync!(
        "Built binding plan: {matched} of {wanted} attributes, stride {stride}",
        matched = bindings.len(),
        wanted = subset.len(),
        stride = stride
    );
    Ok(BindingPlan { bindings, stride })
}

/// Like [`build_plan`], but writes the bindings into caller-provided storage.
///
/// Returns `(matched, stride)`; the first `matched` entries of `out` hold the bindings.
/// All attributes are resolved before anything is written, so on any error `out` is
/// left untouched.  This path does not allocate.
///
/// # Errors
///
/// * [`Error::DuplicateField`] and [`Error::UnsatisfiedAttribute`] as for [`build_plan`].
/// * [`Error::CapacityExceeded`] if more bindings match than `out` can hold.
pub fn build_plan_into(
    superset: &[AttributeDescriptor],
    subset: &[AttributeDescriptor],
    options: &MatchOptions,
    out: &mut [ResolvedBinding],
) -> Result<(usize, u32), Error> {
    check_unique(superset)?;
    check_lengths(superset, subset, options);
    let mut matched = 0;
    for wanted in subset {
        if admit(wanted, resolve(superset, wanted), options)?.is_some() {
            matched += 1;
        }
    }
    if matched > out.len() {
        return Err(Error::CapacityExceeded {
            required: matched,
            capacity: out.len(),
        });
    }
    let mut slots = out.iter_mut();
    for wanted in subset {
        if let Resolution::Bound(binding) = resolve(superset, wanted) {
            if let Some(slot) = slots.next() {
                *slot = binding;
            }
        }
    }
    Ok((matched, record_stride(superset)))
}

/// Binds `attributes` as if they were the buffer record layout, in list order.
///
/// This is the direct path for a buffer written to match the shader exactly; no
/// matching happens.  Attributes without a location are built-ins, which take no room
/// in the record and are skipped.
pub fn bind_all<B: GraphicsBackend + ?Sized>(backend: &mut B, attributes: &[AttributeDescriptor]) {
    let stride = attributes
        .iter()
        .filter(|a| a.location().is_some())
        .map(AttributeDescriptor::byte_size)
        .sum();
    let mut offset = 0;
    for attribute in attributes {
        let Some(location) = attribute.location() else {
            logwise::warn_sync!(
                "Attribute {name} has no location; not binding it from the buffer",
                name = logwise::privacy::LogIt(attribute.name())
            );
            continue;
        };
        let binding = ResolvedBinding {
            location,
            scalar_type: attribute.scalar_type(),
            components: attribute.component_count(),
            columns: attribute.variable_type().location_count(),
            normalize: attribute.normalize(),
            offset,
        };
        for pointer in binding.pointers(stride) {
            backend.enable_vertex_attribute(pointer.location);
            backend.vertex_attribute_pointer(pointer);
        }
        offset += attribute.byte_size();
    }
}

/// Disables every location [`bind_all`] enabled for `attributes`.
pub fn unbind_all<B: GraphicsBackend + ?Sized>(backend: &mut B, attributes: &[AttributeDescriptor]) {
    for attribute in attributes {
        let Some(first) = attribute.location() else {
            continue;
        };
        for column in 0..attribute.variable_type().location_count() {
            if let Some(location) = first.checked_add(column) {
                backend.disable_vertex_attribute(location);
            }
        }
    }
}
