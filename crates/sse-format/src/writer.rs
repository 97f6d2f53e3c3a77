//! The SSE output writer.

use sse_parse::{classify_number, TokenKind};
use sse_term::{escape_lexical, xsd, Term};
use sse_tree::{Item, ItemKind, ItemList};

use crate::context::SerializationContext;
use crate::options::WriteOptions;

/// Render an item with no context and default options.
pub fn write_item(item: &Item) -> String {
    write_item_with(item, &SerializationContext::new(), &WriteOptions::default())
}

/// Render an item against a serialization context.
///
/// A context carrying prefixes (and, when enabled, a base IRI) wraps
/// the whole output once in the matching `(prefix ...)`/`(base ...)`
/// preamble; nested lists are never re-wrapped.
pub fn write_item_with(
    item: &Item,
    cxt: &SerializationContext,
    options: &WriteOptions,
) -> String {
    let mut writer = ItemWriter {
        out: String::new(),
        cxt,
        options,
    };
    writer.write_preamble_and_item(item);
    writer.out
}

struct ItemWriter<'a> {
    out: String,
    cxt: &'a SerializationContext,
    options: &'a WriteOptions,
}

impl ItemWriter<'_> {
    /// Write the context preamble, the item inside it, and the closing
    /// brackets.
    ///
    /// The preamble is emitted directly rather than through
    /// [`ItemWriter::write`]: a declaration's namespace IRI must come
    /// out verbatim, never abbreviated by the prefix it declares.
    fn write_preamble_and_item(&mut self, item: &Item) {
        let mut depth = 0;

        if self.cxt.writes_base() {
            self.out.push('(');
            self.newline_indent(depth + 1);
            self.out.push_str("base");
            self.newline_indent(depth + 1);
            self.out.push('<');
            self.out.push_str(self.cxt.base_iri().unwrap_or_default());
            self.out.push('>');
            self.newline_indent(depth + 1);
            depth += 1;
        }

        if !self.cxt.prefixes().is_empty() {
            self.out.push('(');
            self.newline_indent(depth + 1);
            self.out.push_str("prefix");
            self.newline_indent(depth + 1);
            self.out.push('(');
            for (label, ns) in self.cxt.prefixes() {
                self.newline_indent(depth + 2);
                self.out.push('(');
                self.out.push_str(label);
                self.out.push_str(": <");
                self.out.push_str(ns);
                self.out.push_str(">)");
            }
            self.newline_indent(depth + 1);
            self.out.push(')');
            self.newline_indent(depth + 1);
            depth += 1;
        }

        self.write(item, depth);

        while depth > 0 {
            depth -= 1;
            self.newline_indent(depth);
            self.out.push(')');
        }
    }

    fn write(&mut self, item: &Item, depth: usize) {
        match &item.kind {
            ItemKind::Nil => self.out.push_str("nil"),
            ItemKind::Symbol(text) => self.out.push_str(text),
            ItemKind::Term(term) => self.write_term(term),
            ItemKind::List(list) => self.write_list(list, depth),
        }
    }

    /// Lists with only leaf children go on one line; a list child makes
    /// every child take its own line, one unit deeper, with the closing
    /// bracket on the line after the last child.
    fn write_list(&mut self, list: &ItemList, depth: usize) {
        let nested = list.iter().any(Item::is_list);

        self.out.push('(');
        if !nested {
            for (i, child) in list.iter().enumerate() {
                if i > 0 {
                    self.out.push(' ');
                }
                self.write(child, depth + 1);
            }
            self.out.push(')');
            return;
        }

        for child in list.iter() {
            self.newline_indent(depth + 1);
            self.write(child, depth + 1);
        }
        self.newline_indent(depth);
        self.out.push(')');
    }

    fn newline_indent(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth {
            self.out.push_str(self.options.indent);
        }
    }

    fn write_term(&mut self, term: &Term) {
        match term {
            Term::Iri(iri) => self.write_iri(iri),
            Term::BlankNode(id) => {
                self.out.push('_');
                self.out.push(':');
                self.out.push_str(id.as_str());
            }
            Term::Variable(name) => {
                self.out.push('?');
                self.out.push_str(name);
            }
            Term::Literal(lit) => {
                if let Some(bare) = bare_number(lit) {
                    self.out.push_str(bare);
                    return;
                }
                self.out.push('"');
                self.out.push_str(&escape_lexical(&lit.lexical));
                self.out.push('"');
                if let Some(lang) = &lit.lang {
                    self.out.push('@');
                    self.out.push_str(lang);
                } else if let Some(datatype) = &lit.datatype {
                    self.out.push_str("^^");
                    self.write_iri(datatype);
                }
            }
        }
    }

    fn write_iri(&mut self, iri: &str) {
        if let Some((label, local)) = self.cxt.abbreviate(iri) {
            self.out.push_str(label);
            self.out.push(':');
            self.out.push_str(local);
        } else {
            self.out.push('<');
            self.out.push_str(iri);
            self.out.push('>');
        }
    }
}

/// The bare lexical form of a numeric literal, when writing it bare
/// reads back as the same literal.
fn bare_number(lit: &sse_term::Literal) -> Option<&str> {
    let expected = match lit.datatype.as_deref()? {
        xsd::INTEGER => TokenKind::Integer,
        xsd::DECIMAL => TokenKind::Decimal,
        xsd::DOUBLE => TokenKind::Double,
        _ => return None,
    };
    (classify_number(&lit.lexical) == Some(expected)).then_some(&*lit.lexical)
}
