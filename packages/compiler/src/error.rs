//! Compile Errors
//!
//! Every error aborts the compile call for the current file. Offsets are byte
//! offsets into the host source when known, so callers can report a position.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A position asked for semantics positional binding cannot express.
    #[error("Unsupported construct: {message}")]
    Unsupported { message: String, offset: Option<u32> },

    /// The observable marker appeared twice along one destructuring path.
    #[error("Observable marker used twice for '{name}'")]
    DuplicateObservableMarker { name: String, offset: Option<u32> },

    #[error("Malformed markup: {message}")]
    Markup { message: String, offset: Option<u32> },

    /// Code generation reached a binding shape it has no lowering for.
    #[error("Unsupported binder type: {message}")]
    UnsupportedBinderType { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String, offset: Option<u32> },
}

pub type Result<T> = std::result::Result<T, CompileError>;

impl CompileError {
    pub fn unsupported(message: impl Into<String>) -> Self {
        CompileError::Unsupported {
            message: message.into(),
            offset: None,
        }
    }

    pub fn markup(message: impl Into<String>) -> Self {
        CompileError::Markup {
            message: message.into(),
            offset: None,
        }
    }

    pub fn offset(&self) -> Option<u32> {
        match self {
            CompileError::Unsupported { offset, .. }
            | CompileError::DuplicateObservableMarker { offset, .. }
            | CompileError::Markup { offset, .. }
            | CompileError::Parse { offset, .. } => *offset,
            CompileError::UnsupportedBinderType { .. } => None,
        }
    }

    /// Attach a source offset unless one is already recorded.
    pub fn with_offset(mut self, at: u32) -> Self {
        match &mut self {
            CompileError::Unsupported { offset, .. }
            | CompileError::DuplicateObservableMarker { offset, .. }
            | CompileError::Markup { offset, .. }
            | CompileError::Parse { offset, .. } => {
                if offset.is_none() {
                    *offset = Some(at);
                }
            }
            CompileError::UnsupportedBinderType { .. } => {}
        }
        self
    }
}

/// Format a byte offset as a 1-based `line:col` pair.
pub fn format_position(source: &str, offset: u32) -> String {
    let offset = (offset as usize).min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let col = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    format!("{}:{}", line, col)
}
