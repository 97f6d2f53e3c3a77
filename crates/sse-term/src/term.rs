//! RDF term types: IRI, blank node, variable, and literal.
//!
//! Terms are the atoms the tree layer wraps. A term can be:
//! - An IRI (always expanded, never prefixed)
//! - A blank node (with an identifier stable within one parse run)
//! - A query variable
//! - A literal (lexical form + optional language tag or datatype)

use std::fmt;
use std::sync::Arc;

use crate::xsd;

/// Blank node identifier.
///
/// Blank node IDs are stable within one parse run but have no global
/// meaning. The label does NOT include the `_:` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankId(Arc<str>);

impl BlankId {
    /// Create a blank node ID from a label (without the `_:` prefix).
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    /// Get the label (without `_:` prefix).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// A literal: lexical form plus at most one of language tag or datatype.
///
/// A literal with neither language nor datatype is a plain literal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    /// The lexical form, exactly as written (after escape processing).
    pub lexical: Arc<str>,
    /// Language tag, without the `@` sigil.
    pub lang: Option<Arc<str>>,
    /// Datatype IRI, always expanded.
    pub datatype: Option<Arc<str>>,
}

impl Literal {
    /// Whether this literal carries a numeric XSD datatype.
    pub fn is_numeric(&self) -> bool {
        self.datatype.as_deref().is_some_and(xsd::is_numeric)
    }
}

/// An RDF term, or a query variable standing in for one.
///
/// `Term::Iri` always contains an expanded IRI; prefixed names are
/// expanded before a term is built.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    /// Full expanded IRI (e.g. `http://example.org/Person`).
    Iri(Arc<str>),
    /// Blank node with stable identifier.
    BlankNode(BlankId),
    /// Query variable, name without the `?` sigil.
    Variable(Arc<str>),
    /// Literal value.
    Literal(Literal),
}

impl Term {
    /// Create an IRI term from an expanded IRI string.
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri(Arc::from(iri.as_ref()))
    }

    /// Create a blank node term.
    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::BlankNode(BlankId::new(label))
    }

    /// Create a variable term. The name excludes the `?` sigil.
    pub fn variable(name: impl AsRef<str>) -> Self {
        Term::Variable(Arc::from(name.as_ref()))
    }

    /// Create a plain literal.
    pub fn literal(lexical: impl AsRef<str>) -> Self {
        Term::Literal(Literal {
            lexical: Arc::from(lexical.as_ref()),
            lang: None,
            datatype: None,
        })
    }

    /// Create a language-tagged literal.
    pub fn lang_literal(lexical: impl AsRef<str>, lang: impl AsRef<str>) -> Self {
        Term::Literal(Literal {
            lexical: Arc::from(lexical.as_ref()),
            lang: Some(Arc::from(lang.as_ref())),
            datatype: None,
        })
    }

    /// Create a datatyped literal. The datatype must be an expanded IRI.
    pub fn typed_literal(lexical: impl AsRef<str>, datatype: impl AsRef<str>) -> Self {
        Term::Literal(Literal {
            lexical: Arc::from(lexical.as_ref()),
            lang: None,
            datatype: Some(Arc::from(datatype.as_ref())),
        })
    }

    /// Create an `xsd:integer` literal.
    pub fn integer(value: i64) -> Self {
        Term::typed_literal(value.to_string(), xsd::INTEGER)
    }

    /// Create an `xsd:double` literal.
    pub fn double(value: f64) -> Self {
        Term::typed_literal(value.to_string(), xsd::DOUBLE)
    }

    /// Create an `xsd:decimal` literal from its lexical form.
    pub fn decimal(lexical: impl AsRef<str>) -> Self {
        Term::typed_literal(lexical, xsd::DECIMAL)
    }

    /// Create an `xsd:boolean` literal.
    pub fn boolean(value: bool) -> Self {
        Term::typed_literal(value.to_string(), xsd::BOOLEAN)
    }

    /// Check if this is an IRI term.
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Check if this is a blank node.
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    /// Check if this is a variable.
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Check if this is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// Try to get as IRI string.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Try to get as blank node ID.
    pub fn as_blank(&self) -> Option<&BlankId> {
        match self {
            Term::BlankNode(id) => Some(id),
            _ => None,
        }
    }

    /// Try to get as variable name (without `?`).
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Term::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// Try to get the literal.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::BlankNode(id) => write!(f, "{}", id),
            Term::Variable(name) => write!(f, "?{}", name),
            Term::Literal(lit) => {
                write!(f, "\"{}\"", escape_lexical(&lit.lexical))?;
                if let Some(lang) = &lit.lang {
                    write!(f, "@{}", lang)
                } else if let Some(dt) = &lit.datatype {
                    write!(f, "^^<{}>", dt)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Escape a lexical form for output inside double quotes.
pub fn escape_lexical(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_id() {
        let id = BlankId::new("b0");
        assert_eq!(id.as_str(), "b0");
        assert_eq!(format!("{}", id), "_:b0");
    }

    #[test]
    fn test_term_constructors() {
        let iri = Term::iri("http://example.org/foo");
        assert!(iri.is_iri());
        assert_eq!(iri.as_iri(), Some("http://example.org/foo"));

        let blank = Term::blank("b0");
        assert!(blank.is_blank());

        let var = Term::variable("x");
        assert_eq!(var.as_variable(), Some("x"));

        let lang = Term::lang_literal("bonjour", "fr");
        let lit = lang.as_literal().unwrap();
        assert_eq!(lit.lang.as_deref(), Some("fr"));
        assert!(lit.datatype.is_none());
    }

    #[test]
    fn test_term_display() {
        assert_eq!(
            format!("{}", Term::iri("http://example.org")),
            "<http://example.org>"
        );
        assert_eq!(format!("{}", Term::blank("b0")), "_:b0");
        assert_eq!(format!("{}", Term::variable("x")), "?x");
        assert_eq!(format!("{}", Term::literal("hello")), "\"hello\"");
        assert_eq!(
            format!("{}", Term::lang_literal("bonjour", "fr")),
            "\"bonjour\"@fr"
        );
        assert_eq!(
            format!("{}", Term::integer(42)),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn test_display_escapes_lexical() {
        assert_eq!(
            format!("{}", Term::literal("a \"b\"\nc")),
            "\"a \\\"b\\\"\\nc\""
        );
    }

    #[test]
    fn test_literal_is_numeric() {
        assert!(Term::integer(1).as_literal().unwrap().is_numeric());
        assert!(!Term::literal("1").as_literal().unwrap().is_numeric());
    }
}
