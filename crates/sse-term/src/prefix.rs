//! Prefix mappings with functional (non-destructive) composition.
//!
//! Entering a `prefix` form produces a new map that consults its own
//! declarations first and falls back to the enclosing map. The enclosing
//! map is never mutated, only wrapped, so restoring a scope is restoring
//! a saved handle.

use std::sync::Arc;

/// An immutable mapping from prefix label to namespace IRI.
///
/// Cloning is cheap: clones share the underlying scope chain.
#[derive(Clone, Debug, Default)]
pub struct PrefixMap {
    node: Option<Arc<Scope>>,
}

#[derive(Debug)]
struct Scope {
    /// Declarations of this scope, in insertion order.
    entries: Vec<(String, String)>,
    parent: PrefixMap,
}

impl PrefixMap {
    /// The empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a flat mapping from `(label, namespace)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self::new().with(pairs)
    }

    /// Return a NEW map that checks `pairs` first and falls back to `self`.
    ///
    /// `self` is unchanged; the returned map wraps it.
    pub fn with<I, S>(&self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let entries: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(label, ns)| (label.into(), ns.into()))
            .collect();
        PrefixMap {
            node: Some(Arc::new(Scope {
                entries,
                parent: self.clone(),
            })),
        }
    }

    /// Look up the namespace IRI for `label`, innermost scope first.
    pub fn get(&self, label: &str) -> Option<&str> {
        let mut current = self;
        while let Some(scope) = &current.node {
            for (l, ns) in &scope.entries {
                if l == label {
                    return Some(ns);
                }
            }
            current = &scope.parent;
        }
        None
    }

    /// Expand a prefixed name of the form `label:local`.
    ///
    /// Splits at the FIRST colon. Returns `None` when there is no colon
    /// or the label has no mapping.
    pub fn expand(&self, pname: &str) -> Option<String> {
        let (label, local) = pname.split_once(':')?;
        let ns = self.get(label)?;
        Some(format!("{}{}", ns, local))
    }

    /// Whether no scope declares any entry.
    pub fn is_empty(&self) -> bool {
        let mut current = self;
        while let Some(scope) = &current.node {
            if !scope.entries.is_empty() {
                return false;
            }
            current = &scope.parent;
        }
        true
    }

    /// Iterate all declarations, innermost scope first, insertion order
    /// within a scope. Shadowed outer declarations are still yielded.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut scopes = Vec::new();
        let mut current = self;
        while let Some(scope) = &current.node {
            scopes.push(scope.as_ref());
            current = &scope.parent;
        }
        scopes
            .into_iter()
            .flat_map(|s| s.entries.iter().map(|(l, ns)| (l.as_str(), ns.as_str())))
    }
}
