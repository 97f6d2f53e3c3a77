//! Error types for tree construction and access.

use std::fmt;

use sse_parse::{Location, SyntaxError};

/// Error during tree building or tree access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeError {
    /// What went wrong.
    pub kind: TreeErrorKind,
    /// Position of the offending token, when known.
    pub location: Location,
}

impl TreeError {
    /// Create a new error at a source position.
    pub fn new(kind: TreeErrorKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Create an error with no source position (programmatic access).
    pub fn unlocated(kind: TreeErrorKind) -> Self {
        Self {
            kind,
            location: Location::UNKNOWN,
        }
    }
}

/// Tree error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeErrorKind {
    /// `car`/`cdr` on an empty list.
    EmptyList,
    /// A `base`/`prefix` form whose declaration has the wrong shape.
    MalformedForm(String),
    /// A `base`/`prefix` form closed without a payload term.
    MissingResult,
    /// A term kind that is not allowed inside a `prefix` declaration.
    FormDeclaration(String),
    /// A prefixed name with no usable mapping, or no colon at all.
    UnresolvablePrefix(String),
    /// Numeric accessor on an item that is not a numeric term.
    NotANumber,
    /// An IRI reference that could not be resolved.
    UnresolvedIri(String),
    /// List nesting did not return to zero at end of parse. Indicates a
    /// misbehaving upstream event source, not bad user input.
    Desync,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TreeErrorKind::EmptyList => write!(f, "car/cdr of an empty list")?,
            TreeErrorKind::MalformedForm(detail) => {
                write!(f, "malformed form: {}", detail)?
            }
            TreeErrorKind::MissingResult => {
                write!(f, "form closed without a result term")?
            }
            TreeErrorKind::FormDeclaration(detail) => {
                write!(f, "not allowed in a prefix declaration: {}", detail)?
            }
            TreeErrorKind::UnresolvablePrefix(pname) => {
                write!(f, "cannot resolve prefixed name '{}'", pname)?
            }
            TreeErrorKind::NotANumber => write!(f, "not a number")?,
            TreeErrorKind::UnresolvedIri(reference) => {
                write!(f, "cannot resolve IRI <{}>", reference)?
            }
            TreeErrorKind::Desync => {
                write!(f, "internal error: unbalanced list nesting at end of parse")?
            }
        }
        if self.location.is_known() {
            write!(f, " at {}", self.location)?;
        }
        Ok(())
    }
}

impl std::error::Error for TreeError {}

/// Any error a string-level parse can produce: bad surface syntax, or a
/// tree-layer failure while handling events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The surface syntax was malformed.
    Syntax(SyntaxError),
    /// The tree layer rejected the input.
    Build(TreeError),
}

impl ParseError {
    /// The source position of the failure.
    pub fn location(&self) -> Location {
        match self {
            ParseError::Syntax(err) => err.location,
            ParseError::Build(err) => err.location,
        }
    }
}

impl From<SyntaxError> for ParseError {
    fn from(err: SyntaxError) -> Self {
        ParseError::Syntax(err)
    }
}

impl From<TreeError> for ParseError {
    fn from(err: TreeError) -> Self {
        ParseError::Build(err)
    }
}

impl From<sse_parse::ParseError<TreeError>> for ParseError {
    fn from(err: sse_parse::ParseError<TreeError>) -> Self {
        match err {
            sse_parse::ParseError::Syntax(err) => ParseError::Syntax(err),
            sse_parse::ParseError::Sink(err) => ParseError::Build(err),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Syntax(err) => write!(f, "{}", err),
            ParseError::Build(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ParseError {}
