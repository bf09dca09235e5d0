use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{message}")]
    Lex { message: String, line: usize },

    #[error("expected {expected}")]
    Syntax { expected: &'static str, line: usize },

    #[error("variable '{name}' is undefined")]
    UndefinedVariable { name: String },

    #[error("stack underflow")]
    StackUnderflow,

    #[error("expected {expected} value, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Source line the error was raised on, if it was raised while scanning.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Lex { line, .. } | Self::Syntax { line, .. } => Some(*line),
            _ => None,
        }
    }
}
