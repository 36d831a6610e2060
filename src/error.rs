use std::fmt;

/// Everything that can go wrong while lexing, parsing or running a program.
///
/// All variants are fatal: the interpreter does not attempt partial
/// recovery from any of them.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpError {
    Lex { message: String, line: usize },
    Parse { message: String, line: usize },
    Name { message: String },
    Type { message: String },
    Arity { message: String },
}

impl InterpError {
    pub fn lex(message: impl Into<String>, line: usize) -> Self {
        Self::Lex {
            message: message.into(),
            line,
        }
    }

    pub fn parse(message: impl Into<String>, line: usize) -> Self {
        Self::Parse {
            message: message.into(),
            line,
        }
    }

    pub fn name(message: impl Into<String>) -> Self {
        Self::Name {
            message: message.into(),
        }
    }

    pub fn ty(message: impl Into<String>) -> Self {
        Self::Type {
            message: message.into(),
        }
    }

    pub fn arity(message: impl Into<String>) -> Self {
        Self::Arity {
            message: message.into(),
        }
    }
}

impl fmt::Display for InterpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex { message, line } => write!(f, "lex error at line {line}: {message}"),
            Self::Parse { message, line } => write!(f, "parse error at line {line}: {message}"),
            Self::Name { message } => write!(f, "name error: {message}"),
            Self::Type { message } => write!(f, "type error: {message}"),
            Self::Arity { message } => write!(f, "arity error: {message}"),
        }
    }
}

impl std::error::Error for InterpError {}

pub type Result<T> = std::result::Result<T, InterpError>;
