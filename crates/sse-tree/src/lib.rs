//! Item tree representation for the SSE notation.
//!
//! This crate provides the in-memory tree the SSE syntax parses into
//! (`Item`/`ItemList`), the parse-event handlers that build it (with
//! and without `base`/`prefix` scoping), and string-level entry points.
//!
//! ```
//! let item = sse_tree::parse("(bgp (?s ?p ?o))").unwrap();
//! assert!(item.as_list().unwrap().is_tagged("bgp"));
//! ```

mod builder;
mod diagnostic;
mod error;
mod item;
mod resolver;
mod walk;

pub use builder::TreeBuilder;
pub use error::{ParseError, TreeError, TreeErrorKind};
pub use item::{Item, ItemKind, ItemList};
pub use resolver::ResolvingBuilder;
pub use sse_parse::{Event, Location, ParseSink, SyntaxError, SyntaxErrorKind};
pub use sse_term::{BlankId, IriResolver, Literal, PrefixMap, Term};
pub use walk::ItemVisitor;

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
const FN_NS: &str = "http://www.w3.org/2005/xpath-functions#";

/// The prefix map assumed when parsing without an explicit one.
///
/// Covers the usual RDF vocabularies plus the example namespaces the
/// notation's test materials lean on.
pub fn default_read_prefixes() -> PrefixMap {
    PrefixMap::from_pairs([
        ("rdf", RDF_NS),
        ("rdfs", RDFS_NS),
        ("xsd", sse_term::xsd::NS),
        ("owl", OWL_NS),
        ("fn", FN_NS),
        ("ex", "http://example.org/"),
        ("ns", "http://example.org/ns#"),
        ("", "http://example/"),
    ])
}

/// The compact prefix map suitable for seeding output contexts.
pub fn default_write_prefixes() -> PrefixMap {
    PrefixMap::from_pairs([
        ("rdf", RDF_NS),
        ("rdfs", RDFS_NS),
        ("xsd", sse_term::xsd::NS),
    ])
}

/// Parse SSE text into an item tree.
///
/// Runs the resolving pipeline seeded with [`default_read_prefixes`]:
/// `base`/`prefix` forms are collapsed and every IRI and prefixed name
/// in the result is fully resolved.
pub fn parse(source: &str) -> Result<Item, ParseError> {
    parse_with(source, default_read_prefixes(), None)
}

/// Parse SSE text with no initial prefix mappings.
pub fn parse_raw(source: &str) -> Result<Item, ParseError> {
    parse_with(source, PrefixMap::new(), None)
}

/// Parse SSE text with an explicit initial scope.
pub fn parse_with(
    source: &str,
    prefixes: PrefixMap,
    base: Option<&str>,
) -> Result<Item, ParseError> {
    let resolver = match base {
        Some(base) => IriResolver::with_base(base),
        None => IriResolver::new(),
    };
    let mut builder = ResolvingBuilder::with_scope(prefixes, resolver);
    sse_parse::Parser::new(source).parse(&mut builder)?;
    require_root(builder.finish()?)
}

/// Parse SSE text without the scoped-form layer.
///
/// `base`/`prefix` lists stay ordinary lists and prefixed names are
/// carried verbatim. Mostly useful for tooling that wants to see the
/// source structure as written.
pub fn parse_plain(source: &str) -> Result<Item, ParseError> {
    let mut builder = TreeBuilder::new();
    sse_parse::Parser::new(source).parse(&mut builder)?;
    require_root(builder.finish()?)
}

fn require_root(root: Option<Item>) -> Result<Item, ParseError> {
    // The parser errors on empty input, so a completed run always has a
    // root; a missing one means the event stream and handler diverged.
    root.ok_or_else(|| TreeError::unlocated(TreeErrorKind::Desync).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sse_term::Term;

    #[test]
    fn test_parse_simple() {
        let item = parse("(bgp (?s ?p ?o))").unwrap();
        assert!(item.as_list().unwrap().is_tagged("bgp"));
    }

    #[test]
    fn test_default_prefixes_are_available() {
        let item = parse("(rdf:type)").unwrap();
        assert_eq!(
            item.as_list().unwrap().get(0).unwrap().as_term().unwrap().as_iri(),
            Some("http://www.w3.org/1999/02/22-rdf-syntax-ns#type")
        );
        let item = parse("(:a)").unwrap();
        assert_eq!(
            item.as_list().unwrap().get(0).unwrap().as_term().unwrap().as_iri(),
            Some("http://example/a")
        );
    }

    #[test]
    fn test_parse_raw_has_no_prefixes() {
        let err = parse_raw("(rdf:type)").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Build(TreeError {
                kind: TreeErrorKind::UnresolvablePrefix(_),
                ..
            })
        ));
    }

    #[test]
    fn test_parse_with_base() {
        let item = parse_with("(<x>)", PrefixMap::new(), Some("http://example/")).unwrap();
        assert_eq!(
            item.as_list().unwrap().get(0).unwrap().as_term().unwrap().as_iri(),
            Some("http://example/x")
        );
    }

    #[test]
    fn test_parse_plain_keeps_forms() {
        let item = parse_plain("(prefix ((x: <http://example/>)) (x:a))").unwrap();
        let list = item.as_list().unwrap();
        assert!(list.is_tagged("prefix"));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_syntax_error_location() {
        let err = parse("(bgp\n  (?s ?p")
            .unwrap_err();
        assert_eq!(err.location().line, 2);
    }

    #[test]
    fn test_parsed_equals_hand_built() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let parsed = parse("(bgp (?s <http://example/p> \"o\"))").unwrap();
        let built = Item::list(ItemList::from_vec(vec![
            Item::symbol("bgp"),
            Item::list(ItemList::from_vec(vec![
                Item::term(Term::variable("s")),
                Item::term(Term::iri("http://example/p")),
                Item::term(Term::literal("o")),
            ])),
        ]));
        assert_eq!(parsed, built);

        let hash = |item: &Item| {
            let mut hasher = DefaultHasher::new();
            item.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(&parsed), hash(&built));
    }
}
