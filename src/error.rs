// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::backend::StageKind;

/// The kind of backend object that could not be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Program,
    Shader(StageKind),
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::Program => write!(f, "program"),
            ObjectKind::Shader(kind) => write!(f, "{kind} shader"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The backend refused to create an object, which usually means there is no valid context.
    #[error("Unable to create a {0} object; the graphics context is likely invalid")]
    ContextInvalid(ObjectKind),
    #[error("Failed to compile {kind} shader at stage index {stage}{}", diagnostic(.log))]
    ShaderCompile {
        stage: usize,
        kind: StageKind,
        log: Option<String>,
    },
    #[error("Failed to link program{}", diagnostic(.log))]
    ShaderLink { log: Option<String> },
    #[error("Name {name:?} is {} bytes; names must be shorter than {max} bytes", .name.len())]
    NameTooLong { name: String, max: usize },
    #[error("The vertex layout has more than one field named {name:?}")]
    DuplicateField { name: String },
    #[error("Shader attribute {name:?} has no matching field in the vertex layout")]
    UnsatisfiedAttribute { name: String },
    #[error("{required} bindings matched but the output only holds {capacity}")]
    CapacityExceeded { required: usize, capacity: usize },
    #[error("The attribute at location {location} has no equivalent wgpu vertex format")]
    UnsupportedVertexFormat { location: u32 },
}

fn diagnostic(log: &Option<String>) -> String {
    match log {
        Some(log) => format!(":\n{log}"),
        None => String::new(),
    }
}
