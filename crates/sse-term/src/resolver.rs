//! IRI reference resolution against a base IRI (RFC 3986 section 5.2).

use std::fmt;
use std::sync::Arc;

/// Error resolving an IRI reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A relative reference was given and no base IRI is in effect.
    NoBase(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NoBase(reference) => {
                write!(f, "relative IRI '{}' without a base", reference)
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Resolves possibly-relative IRI references against an optional base.
///
/// Cloning is cheap. A resolver with no base passes absolute IRIs
/// through and rejects relative references.
#[derive(Clone, Debug, Default)]
pub struct IriResolver {
    base: Option<Arc<str>>,
}

impl IriResolver {
    /// A resolver with no base IRI.
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver using `base` as its base IRI.
    pub fn with_base(base: impl AsRef<str>) -> Self {
        Self {
            base: Some(Arc::from(base.as_ref())),
        }
    }

    /// The base IRI in effect, if any.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Derive a resolver whose base is `reference` resolved against `self`.
    ///
    /// This is what makes nested relative `base` declarations compose: the
    /// new base is itself interpreted in the enclosing scope.
    pub fn child(&self, reference: &str) -> Result<IriResolver, ResolveError> {
        let base = self.resolve(reference)?;
        Ok(IriResolver::with_base(base))
    }

    /// Resolve an IRI reference to an absolute IRI.
    ///
    /// Absolute references pass through untouched. Relative references are
    /// combined with the base per RFC 3986 section 5.2.2.
    pub fn resolve(&self, reference: &str) -> Result<String, ResolveError> {
        if reference.is_empty() {
            return match &self.base {
                Some(base) => Ok(base.to_string()),
                None => Err(ResolveError::NoBase(reference.to_string())),
            };
        }

        if has_scheme(reference) {
            return Ok(reference.to_string());
        }

        let base = match &self.base {
            Some(b) => b,
            None => return Err(ResolveError::NoBase(reference.to_string())),
        };

        let (base_scheme, base_authority, base_path, _base_query) = parse_components(base);

        // RFC 3986 section 5.2.2, transform references.
        let (scheme, authority, path, query) = if let Some(rest) = reference.strip_prefix("//") {
            let (ref_authority, ref_path, ref_query) = parse_hier_part(rest);
            (
                base_scheme.to_string(),
                Some(ref_authority),
                remove_dot_segments(&ref_path),
                ref_query,
            )
        } else if reference.starts_with('/') {
            let (ref_path, ref_query) = split_path_query(reference);
            (
                base_scheme.to_string(),
                base_authority.map(str::to_string),
                remove_dot_segments(ref_path),
                ref_query.map(str::to_string),
            )
        } else if let Some(query) = reference.strip_prefix('?') {
            (
                base_scheme.to_string(),
                base_authority.map(str::to_string),
                base_path.to_string(),
                Some(query.to_string()),
            )
        } else if reference.starts_with('#') {
            (
                base_scheme.to_string(),
                base_authority.map(str::to_string),
                base_path.to_string(),
                None,
            )
        } else {
            // Relative path reference, merge with the base path.
            let (ref_path, ref_query) = split_path_query(reference);
            let merged = if base_authority.is_some() && base_path.is_empty() {
                format!("/{}", ref_path)
            } else {
                // Everything up to and including the last '/' of the base path.
                let base_dir = match base_path.rfind('/') {
                    Some(pos) => &base_path[..=pos],
                    None => "",
                };
                format!("{}{}", base_dir, ref_path)
            };
            (
                base_scheme.to_string(),
                base_authority.map(str::to_string),
                remove_dot_segments(&merged),
                ref_query.map(str::to_string),
            )
        };

        let mut result = scheme;
        result.push(':');
        if let Some(auth) = authority {
            result.push_str("//");
            result.push_str(&auth);
        }
        result.push_str(&path);
        if let Some(q) = query {
            result.push('?');
            result.push_str(&q);
        }
        Ok(result)
    }
}

/// Whether `reference` begins with a valid scheme followed by `:`.
fn has_scheme(reference: &str) -> bool {
    let Some(colon) = reference.find(':') else {
        return false;
    };
    let scheme = &reference[..colon];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
}

/// Parse an IRI into (scheme, authority, path, query) components.
fn parse_components(iri: &str) -> (&str, Option<&str>, &str, Option<&str>) {
    let (scheme, rest) = match iri.find(':') {
        Some(pos) => (&iri[..pos], &iri[pos + 1..]),
        None => return ("", None, iri, None),
    };

    let (authority, path_query) = if let Some(after) = rest.strip_prefix("//") {
        let auth_end = after
            .find(['/', '?', '#'])
            .unwrap_or(after.len());
        (Some(&after[..auth_end]), &after[auth_end..])
    } else {
        (None, rest)
    };

    let (path, query) = split_path_query(path_query);
    (scheme, authority, path, query)
}

/// Parse a hierarchical part after `//`: (authority, path, query).
fn parse_hier_part(s: &str) -> (String, String, Option<String>) {
    let auth_end = s.find(['/', '?', '#']).unwrap_or(s.len());
    let authority = s[..auth_end].to_string();
    let (path, query) = split_path_query(&s[auth_end..]);
    (authority, path.to_string(), query.map(str::to_string))
}

/// Split a path from its query, dropping any fragment.
fn split_path_query(s: &str) -> (&str, Option<&str>) {
    let s = match s.find('#') {
        Some(pos) => &s[..pos],
        None => s,
    };
    match s.find('?') {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    }
}

/// Remove `.` and `..` segments from a path (RFC 3986 section 5.2.4).
fn remove_dot_segments(path: &str) -> String {
    let mut output: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "." => {}
            ".." => {
                output.pop();
            }
            s => output.push(s),
        }
    }
    let result = output.join("/");
    if path.starts_with('/') && !result.starts_with('/') {
        format!("/{}", result)
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_passes_through() {
        let r = IriResolver::new();
        assert_eq!(
            r.resolve("http://example.org/a").unwrap(),
            "http://example.org/a"
        );
    }

    #[test]
    fn test_relative_without_base_fails() {
        let r = IriResolver::new();
        assert!(matches!(r.resolve("x"), Err(ResolveError::NoBase(_))));
    }

    #[test]
    fn test_relative_against_base() {
        let r = IriResolver::with_base("http://example/");
        assert_eq!(r.resolve("x").unwrap(), "http://example/x");
    }

    #[test]
    fn test_relative_replaces_last_segment() {
        let r = IriResolver::with_base("http://example/dir/doc");
        assert_eq!(r.resolve("x").unwrap(), "http://example/dir/x");
    }

    #[test]
    fn test_absolute_path_reference() {
        let r = IriResolver::with_base("http://example.org/a/b");
        assert_eq!(r.resolve("/c").unwrap(), "http://example.org/c");
    }

    #[test]
    fn test_dot_segments() {
        let r = IriResolver::with_base("http://example.org/a/b/c");
        assert_eq!(r.resolve("../d").unwrap(), "http://example.org/a/d");
        assert_eq!(r.resolve("./e").unwrap(), "http://example.org/a/b/e");
    }

    #[test]
    fn test_empty_reference_is_base() {
        let r = IriResolver::with_base("http://example.org/a");
        assert_eq!(r.resolve("").unwrap(), "http://example.org/a");
    }

    #[test]
    fn test_child_composes_relative_bases() {
        let outer = IriResolver::with_base("http://example/");
        let inner = outer.child("x").unwrap();
        assert_eq!(inner.base(), Some("http://example/x"));
        assert_eq!(inner.resolve("y").unwrap(), "http://example/y");

        let deeper = inner.child("sub/").unwrap();
        assert_eq!(deeper.resolve("z").unwrap(), "http://example/sub/z");
    }
}
