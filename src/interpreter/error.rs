use crate::diagnostic::{Diagnostic, Label, Span};
use std::fmt;

/// Raised by the scanner when no token pattern matches at the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub symbol: char,
    pub line: usize,
    pub column: usize,
    pub span: Span,
}

impl SyntaxError {
    pub fn new(symbol: char, line: usize, column: usize, span: Span) -> Self {
        Self {
            symbol,
            line,
            column,
            span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error("E0001", self.to_string())
            .with_label(Label::new(self.span, "no token starts with this character"))
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unexpected symbol '{}' at line {}, column {}",
            self.symbol, self.line, self.column
        )
    }
}

impl std::error::Error for SyntaxError {}

/// Raised by the parser. `line` is `None` when the tokens ran out.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub line: Option<usize>,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: Option<usize>, span: Span) -> Self {
        Self {
            message: message.into(),
            line,
            span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = match self.line {
            Some(_) => "",
            None => "input ends here",
        };
        Diagnostic::error("E0101", self.to_string()).with_label(Label::new(self.span, label))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} at line {}", self.message, line),
            None => write!(f, "{} at end of input", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Raised by the evaluator. Carries no source position.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    UndeclaredVariable { name: String },
    FieldNotFound { record: String, field: String },
    NotAnArray { name: String },
    NotAScalar { name: String, shape: &'static str },
    IndexOutOfBounds { name: String, index: f64, lower: i64, upper: i64 },
    InvalidIndex { name: String, index: String },
    InvalidBounds { name: String, message: String },
    ConstantReassignment { name: String },
    AlreadyDeclared { name: String },
    UnknownFunction { name: String },
    UnknownProcedure { name: String },
    ProcedureInExpression { name: String },
    InvalidStep { var: String },
    CallDepthExceeded { name: String, limit: usize },
    InputUnavailable { prompt: String },
}

impl RuntimeError {
    pub fn undeclared(name: impl Into<String>) -> Self {
        Self::UndeclaredVariable { name: name.into() }
    }

    pub fn field_not_found(record: impl Into<String>, field: impl Into<String>) -> Self {
        Self::FieldNotFound {
            record: record.into(),
            field: field.into(),
        }
    }

    pub fn not_an_array(name: impl Into<String>) -> Self {
        Self::NotAnArray { name: name.into() }
    }

    pub fn not_a_scalar(name: impl Into<String>, shape: &'static str) -> Self {
        Self::NotAScalar {
            name: name.into(),
            shape,
        }
    }

    pub fn constant_reassignment(name: impl Into<String>) -> Self {
        Self::ConstantReassignment { name: name.into() }
    }

    pub fn already_declared(name: impl Into<String>) -> Self {
        Self::AlreadyDeclared { name: name.into() }
    }

    pub fn unknown_function(name: impl Into<String>) -> Self {
        Self::UnknownFunction { name: name.into() }
    }

    pub fn unknown_procedure(name: impl Into<String>) -> Self {
        Self::UnknownProcedure { name: name.into() }
    }

    pub fn procedure_in_expression(name: impl Into<String>) -> Self {
        Self::ProcedureInExpression { name: name.into() }
    }

    pub fn input_unavailable(prompt: impl Into<String>) -> Self {
        Self::InputUnavailable {
            prompt: prompt.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::UndeclaredVariable { .. } => "E0201",
            Self::FieldNotFound { .. } => "E0202",
            Self::NotAnArray { .. } => "E0203",
            Self::NotAScalar { .. } => "E0204",
            Self::IndexOutOfBounds { .. } => "E0205",
            Self::InvalidIndex { .. } => "E0206",
            Self::InvalidBounds { .. } => "E0207",
            Self::ConstantReassignment { .. } => "E0208",
            Self::AlreadyDeclared { .. } => "E0209",
            Self::UnknownFunction { .. } => "E0210",
            Self::UnknownProcedure { .. } => "E0211",
            Self::ProcedureInExpression { .. } => "E0212",
            Self::InvalidStep { .. } => "E0213",
            Self::CallDepthExceeded { .. } => "E0214",
            Self::InputUnavailable { .. } => "E0215",
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.code(), self.to_string());
        match self {
            Self::IndexOutOfBounds { lower, upper, .. } => {
                diagnostic.with_note(format!("valid indices are {} to {}", lower, upper))
            }
            Self::ProcedureInExpression { name } => {
                diagnostic.with_help(format!("use `CALL {}` as a statement instead", name))
            }
            _ => diagnostic,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndeclaredVariable { name } => write!(f, "Variable '{}' not declared", name),
            Self::FieldNotFound { record, field } => {
                write!(f, "Field '{}' not found in record '{}'", field, record)
            }
            Self::NotAnArray { name } => write!(f, "'{}' is not an array", name),
            Self::NotAScalar { name, shape } => {
                write!(f, "'{}' is {} and cannot be used as a single value", name, shape)
            }
            Self::IndexOutOfBounds { name, index, .. } => {
                write!(
                    f,
                    "Array index {} out of bounds for '{}'",
                    crate::value::format_number(*index),
                    name
                )
            }
            Self::InvalidIndex { name, index } => {
                write!(f, "Array index '{}' for '{}' is not an integer", index, name)
            }
            Self::InvalidBounds { name, message } => {
                write!(f, "Invalid bounds for array '{}': {}", name, message)
            }
            Self::ConstantReassignment { name } => {
                write!(f, "Cannot reassign CONSTANT '{}'", name)
            }
            Self::AlreadyDeclared { name } => {
                write!(f, "'{}' is already declared as a variable", name)
            }
            Self::UnknownFunction { name } => write!(f, "Function '{}' not found", name),
            Self::UnknownProcedure { name } => write!(f, "Procedure '{}' not found", name),
            Self::ProcedureInExpression { name } => {
                write!(f, "'{}' is a procedure and does not return a value", name)
            }
            Self::InvalidStep { var } => {
                write!(f, "FOR loop over '{}' needs a non-zero numeric STEP", var)
            }
            Self::CallDepthExceeded { name, limit } => {
                write!(f, "Call to '{}' exceeds the maximum call depth of {}", name, limit)
            }
            Self::InputUnavailable { prompt } => {
                write!(f, "No input available for '{}'", prompt)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Any failure of a scan → parse → run attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Syntax(SyntaxError),
    Parse(ParseError),
    Runtime(RuntimeError),
}

impl Error {
    /// Source line implicated by the failure. Runtime errors have none.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Syntax(e) => Some(e.line),
            Error::Parse(e) => e.line,
            Error::Runtime(_) => None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Syntax(e) => e.to_diagnostic(),
            Error::Parse(e) => e.to_diagnostic(),
            Error::Runtime(e) => e.to_diagnostic(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax(e) => write!(f, "Syntax error: {}", e),
            Error::Parse(e) => write!(f, "Parse error: {}", e),
            Error::Runtime(e) => write!(f, "Runtime error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Syntax(e) => Some(e),
            Error::Parse(e) => Some(e),
            Error::Runtime(e) => Some(e),
        }
    }
}

impl From<SyntaxError> for Error {
    fn from(e: SyntaxError) -> Self {
        Error::Syntax(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<RuntimeError> for Error {
    fn from(e: RuntimeError) -> Self {
        Error::Runtime(e)
    }
}
