// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Backend implementations.

pub mod software;

#[cfg(feature = "backend_wgpu")]
mod wgpu;
