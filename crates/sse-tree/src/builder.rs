//! Base tree builder: parse events in, item tree out.
//!
//! `TreeBuilder` owns the open-list stack, the blank-node label table,
//! and the anonymous-variable allocator for one parse run. It performs
//! no prefix or base resolution; see `ResolvingBuilder` for the layer
//! that does.

use std::collections::HashMap;

use tracing::error;

use sse_parse::{DatatypeRef, Event, Location, ParseSink};
use sse_term::{BlankId, Term};

use crate::error::{TreeError, TreeErrorKind};
use crate::item::{Item, ItemList};

/// Identity of one open list within a parse run.
///
/// Assigned at list start from a monotonically increasing counter; used
/// instead of reference identity to match a scoped form to its list.
pub(crate) type ListId = u64;

struct OpenList {
    id: ListId,
    items: Vec<Item>,
    location: Location,
}

/// Builds an [`Item`] tree from parse events, without name resolution.
///
/// Prefixed names are kept verbatim (wrapped as IRI terms) and
/// `base`/`prefix` lists stay ordinary lists.
pub struct TreeBuilder {
    stack: Vec<OpenList>,
    result: Option<Item>,
    blank_labels: HashMap<String, BlankId>,
    var_counter: u32,
    next_list_id: ListId,
}

impl TreeBuilder {
    /// Create a builder for one parse run.
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            result: None,
            blank_labels: HashMap::new(),
            var_counter: 0,
            next_list_id: 0,
        }
    }

    /// Finish the run and return the root item, `None` for no input.
    ///
    /// Nonzero nesting depth here means the upstream event source and
    /// this handler disagreed about list structure; that is reported as
    /// an internal error, not user input.
    pub fn finish(self) -> Result<Option<Item>, TreeError> {
        if let Some(open) = self.stack.first() {
            error!(
                "parse ended with {} list(s) still open (outermost at {})",
                self.stack.len(),
                open.location
            );
            return Err(TreeError::new(TreeErrorKind::Desync, open.location));
        }
        Ok(self.result)
    }

    /// Open a new list and make it current.
    pub(crate) fn list_start(&mut self, location: Location) {
        let id = self.next_list_id;
        self.next_list_id += 1;
        self.stack.push(OpenList {
            id,
            items: Vec::new(),
            location,
        });
    }

    /// Close the current list and return it as an item, without
    /// appending it anywhere.
    pub(crate) fn pop_list(&mut self) -> Option<Item> {
        let open = self.stack.pop()?;
        Some(Item::list_at(ItemList::from_vec(open.items), open.location))
    }

    /// Append an item to the current list, or make it the result when no
    /// list is open.
    pub(crate) fn append(&mut self, item: Item) {
        match self.stack.last_mut() {
            Some(open) => open.items.push(item),
            None => self.result = Some(item),
        }
    }

    /// Identity of the list currently being built.
    pub(crate) fn current_list_id(&self) -> Option<ListId> {
        self.stack.last().map(|open| open.id)
    }

    /// Element count of the list currently being built.
    pub(crate) fn current_list_len(&self) -> Option<usize> {
        self.stack.last().map(|open| open.items.len())
    }

    /// A symbol item, with `nil` mapped to the nil variant.
    pub(crate) fn symbol_item(text: &str, location: Location) -> Item {
        if text == "nil" {
            Item::nil_at(location)
        } else {
            Item::symbol_at(text, location)
        }
    }

    /// A variable term; an empty name allocates a fresh anonymous
    /// variable from the per-run counter.
    pub(crate) fn build_variable(&mut self, name: &str) -> Term {
        if name.is_empty() {
            let name = format!("?{}", self.var_counter);
            self.var_counter += 1;
            Term::variable(name)
        } else {
            Term::variable(name)
        }
    }

    /// A blank node term. The same label always maps to the same
    /// identity within this run.
    pub(crate) fn build_blank(&mut self, label: &str) -> Term {
        let next_id = self.blank_labels.len();
        let id = self
            .blank_labels
            .entry(label.to_string())
            .or_insert_with(|| BlankId::new(format!("b{}", next_id)));
        Term::BlankNode(id.clone())
    }

    fn unbalanced_close(&self, location: Location) -> TreeError {
        error!("list close with no list open (at {})", location);
        TreeError::new(TreeErrorKind::Desync, location)
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseSink for TreeBuilder {
    type Error = TreeError;

    fn event(&mut self, event: Event<'_>) -> Result<(), TreeError> {
        match event {
            Event::ListStart { location } => self.list_start(location),
            Event::ListEnd { location } => match self.pop_list() {
                Some(item) => self.append(item),
                None => return Err(self.unbalanced_close(location)),
            },
            Event::Symbol { text, location } => {
                self.append(Self::symbol_item(text, location));
            }
            Event::Variable { name, location } => {
                let term = self.build_variable(name);
                self.append(Item::term_at(term, location));
            }
            Event::Literal {
                lexical,
                lang,
                datatype,
                location,
            } => {
                let term = match (lang, datatype) {
                    (Some(lang), _) => Term::lang_literal(lexical, lang),
                    (None, Some(DatatypeRef::Iri(iri))) => Term::typed_literal(lexical, iri),
                    // Without a resolution layer the prefixed name is
                    // carried verbatim as the datatype.
                    (None, Some(DatatypeRef::PrefixedName(pname))) => {
                        Term::typed_literal(lexical, pname)
                    }
                    (None, None) => Term::literal(lexical),
                };
                self.append(Item::term_at(term, location));
            }
            Event::BlankNode { label, location } => {
                let term = self.build_blank(label);
                self.append(Item::term_at(term, location));
            }
            Event::Iri { text, location } => {
                self.append(Item::term_at(Term::iri(text), location));
            }
            // Without a resolution layer the prefixed name is carried
            // verbatim as an IRI term.
            Event::PrefixedName { text, location } => {
                self.append(Item::term_at(Term::iri(text), location));
            }
        }
        Ok(())
    }
}
