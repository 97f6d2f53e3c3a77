//! Serialization context: optional base IRI and ordered prefix mapping.

use sse_term::PrefixMap;

/// Context for one serialization: which prefixes may abbreviate IRIs,
/// and an optional base IRI.
///
/// A non-empty context makes the writer emit a synthetic
/// `(prefix (...) ...)` preamble (and, when enabled, `(base <iri> ...)`)
/// around the whole output, mirroring what the resolving parser strips
/// on input.
#[derive(Debug, Clone, Default)]
pub struct SerializationContext {
    base: Option<String>,
    prefixes: Vec<(String, String)>,
    emit_base: bool,
}

impl SerializationContext {
    /// An empty context: no abbreviation, no preamble.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from `(label, namespace)` pairs, in order.
    pub fn with_prefixes<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        SerializationContext {
            prefixes: pairs
                .into_iter()
                .map(|(label, ns)| (label.into(), ns.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// Build a context from a [`PrefixMap`], innermost declarations
    /// first, dropping shadowed duplicates.
    pub fn with_prefix_map(map: &PrefixMap) -> Self {
        let mut prefixes: Vec<(String, String)> = Vec::new();
        for (label, ns) in map.iter() {
            if !prefixes.iter().any(|(l, _)| l == label) {
                prefixes.push((label.to_string(), ns.to_string()));
            }
        }
        SerializationContext {
            prefixes,
            ..Self::default()
        }
    }

    /// Set the base IRI.
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Emit a `(base <iri> ...)` wrapper around the output. Off by
    /// default even when a base is set.
    pub fn emit_base(mut self, emit: bool) -> Self {
        self.emit_base = emit;
        self
    }

    /// The base IRI, if set.
    pub fn base_iri(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Whether a `base` wrapper should be written.
    pub(crate) fn writes_base(&self) -> bool {
        self.emit_base && self.base.is_some()
    }

    /// The prefix declarations, in enumeration order.
    pub fn prefixes(&self) -> &[(String, String)] {
        &self.prefixes
    }

    /// Abbreviate an IRI to `(label, local)` using the longest matching
    /// namespace, if the local part would read back as itself.
    pub fn abbreviate<'a>(&'a self, iri: &'a str) -> Option<(&'a str, &'a str)> {
        let mut best: Option<(&str, &str)> = None;
        for (label, ns) in &self.prefixes {
            if let Some(local) = iri.strip_prefix(ns.as_str()) {
                if safe_local(local) && best.is_none_or(|(_, l)| local.len() < l.len()) {
                    best = Some((label, local));
                }
            }
        }
        best
    }
}

/// Whether a local part survives being written bare in a prefixed name.
fn safe_local(local: &str) -> bool {
    local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}
