//! Scoped `base`/`prefix` form handling over the base builder.
//!
//! `(base <iri> term)` and `(prefix ((label <iri>) ...) term)` rewrite
//! how their body is interpreted, then collapse to the body's parsed
//! form: the finished tree never contains the wrapper list. Scopes nest
//! lexically; closing a form restores the enclosing prefix map and
//! resolver exactly.

use tracing::error;

use sse_parse::{DatatypeRef, Event, Location, ParseSink};
use sse_term::{IriResolver, PrefixMap, Term};

use crate::builder::{ListId, TreeBuilder};
use crate::error::{TreeError, TreeErrorKind};
use crate::item::{Item, ItemKind};

const BASE_TAG: &str = "base";
const PREFIX_TAG: &str = "prefix";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormKind {
    Base,
    Prefix,
}

/// Bookkeeping for one open form: which list it owns, what scope to
/// restore when that list closes, and the payload seen so far.
struct Frame {
    list_id: ListId,
    kind: FormKind,
    saved_prefixes: PrefixMap,
    saved_resolver: IriResolver,
    decl_done: bool,
    payload: Option<Item>,
}

/// Tree builder with `base`/`prefix` scoping and name resolution.
///
/// Wraps [`TreeBuilder`]: every append is inspected for form structure
/// before being delegated, and every IRI or prefixed name is resolved
/// in the scope in effect at its position.
pub struct ResolvingBuilder {
    inner: TreeBuilder,
    frames: Vec<Frame>,
    prefixes: PrefixMap,
    resolver: IriResolver,
}

impl ResolvingBuilder {
    /// A builder with no initial prefixes and no base IRI.
    pub fn new() -> Self {
        Self::with_scope(PrefixMap::new(), IriResolver::new())
    }

    /// A builder seeded with an outermost scope.
    pub fn with_scope(prefixes: PrefixMap, resolver: IriResolver) -> Self {
        Self {
            inner: TreeBuilder::new(),
            frames: Vec::new(),
            prefixes,
            resolver,
        }
    }

    /// Finish the run and return the root item, `None` for no input.
    pub fn finish(self) -> Result<Option<Item>, TreeError> {
        self.inner.finish()
    }

    /// Whether the innermost open form is still reading its declaration.
    fn in_decl(&self) -> bool {
        self.frames.last().is_some_and(|f| !f.decl_done)
    }

    /// Whether the innermost open form is a `prefix` still reading its
    /// declaration.
    fn in_prefix_decl(&self) -> bool {
        self.frames
            .last()
            .is_some_and(|f| !f.decl_done && f.kind == FormKind::Prefix)
    }

    fn reject_in_prefix_decl(&self, what: &str, location: Location) -> Result<(), TreeError> {
        if self.in_prefix_decl() {
            return Err(TreeError::new(
                TreeErrorKind::FormDeclaration(what.to_string()),
                location,
            ));
        }
        Ok(())
    }

    fn resolve_iri(&self, reference: &str, location: Location) -> Result<String, TreeError> {
        self.resolver.resolve(reference).map_err(|_| {
            TreeError::new(
                TreeErrorKind::UnresolvedIri(reference.to_string()),
                location,
            )
        })
    }

    fn expand_pname(&self, pname: &str, location: Location) -> Result<String, TreeError> {
        let iri = self.prefixes.expand(pname).ok_or_else(|| {
            TreeError::new(
                TreeErrorKind::UnresolvablePrefix(pname.to_string()),
                location,
            )
        })?;
        self.resolve_iri(&iri, location)
    }

    /// Append an item, accounting for the form whose list it lands in.
    ///
    /// Appends into a form's own list are the declaration, then the
    /// payload; anything further is an error. Every other append may be
    /// the tag symbol that opens a new form.
    fn append_item(&mut self, item: Item, location: Location) -> Result<(), TreeError> {
        let target = self.inner.current_list_id();

        if let Some(frame) = self.frames.last_mut() {
            if target == Some(frame.list_id) {
                if !frame.decl_done {
                    match frame.kind {
                        FormKind::Prefix => {
                            let declared = prefix_declarations(&item, location)?;
                            self.prefixes = self.prefixes.with(declared);
                        }
                        FormKind::Base => {
                            // The IRI was already resolved against the
                            // enclosing scope when the term was built, so
                            // relative base declarations compose.
                            let iri = item.as_term().and_then(Term::as_iri).ok_or_else(|| {
                                TreeError::new(
                                    TreeErrorKind::MalformedForm(
                                        "base expects an IRI".to_string(),
                                    ),
                                    item_location(&item, location),
                                )
                            })?;
                            self.resolver = IriResolver::with_base(iri);
                        }
                    }
                    frame.decl_done = true;
                    self.inner.append(item);
                    return Ok(());
                }
                if frame.payload.is_none() {
                    frame.payload = Some(item.clone());
                    self.inner.append(item);
                    return Ok(());
                }
                return Err(TreeError::new(
                    TreeErrorKind::MalformedForm("more than one term after the declaration".to_string()),
                    location,
                ));
            }
        }

        let form_kind = match &item.kind {
            ItemKind::Symbol(text) => match &**text {
                BASE_TAG => Some(FormKind::Base),
                PREFIX_TAG => Some(FormKind::Prefix),
                _ => None,
            },
            _ => None,
        };

        self.inner.append(item);

        // A list whose first and only element is a form tag becomes a
        // form. Placeholder labels inside a declaration never do.
        if let Some(kind) = form_kind {
            if !self.in_decl() && self.inner.current_list_len() == Some(1) {
                if let Some(list_id) = self.inner.current_list_id() {
                    self.frames.push(Frame {
                        list_id,
                        kind,
                        saved_prefixes: self.prefixes.clone(),
                        saved_resolver: self.resolver.clone(),
                        decl_done: false,
                        payload: None,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for ResolvingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseSink for ResolvingBuilder {
    type Error = TreeError;

    fn event(&mut self, event: Event<'_>) -> Result<(), TreeError> {
        match event {
            Event::ListStart { location } => {
                self.inner.list_start(location);
                Ok(())
            }
            Event::ListEnd { location } => {
                let closes_form = self
                    .frames
                    .last()
                    .is_some_and(|f| self.inner.current_list_id() == Some(f.list_id));
                if closes_form {
                    let frame = self.frames.pop().expect("frame just observed");
                    self.prefixes = frame.saved_prefixes;
                    self.resolver = frame.saved_resolver;
                    let payload = frame.payload.ok_or_else(|| {
                        TreeError::new(TreeErrorKind::MissingResult, location)
                    })?;
                    // The wrapper list vanishes; its payload takes its place.
                    let _ = self.inner.pop_list();
                    return self.append_item(payload, location);
                }
                match self.inner.pop_list() {
                    Some(item) => self.append_item(item, location),
                    None => {
                        error!("list close with no list open (at {})", location);
                        Err(TreeError::new(TreeErrorKind::Desync, location))
                    }
                }
            }
            Event::Symbol { text, location } => {
                self.append_item(TreeBuilder::symbol_item(text, location), location)
            }
            Event::PrefixedName { text, location } => {
                if self.in_prefix_decl() {
                    // Declaration labels look like prefixed names but are
                    // plain placeholders.
                    return self.append_item(Item::symbol_at(text, location), location);
                }
                let iri = self.expand_pname(text, location)?;
                self.append_item(Item::term_at(Term::iri(iri), location), location)
            }
            Event::Iri { text, location } => {
                let iri = self.resolve_iri(text, location)?;
                self.append_item(Item::term_at(Term::iri(iri), location), location)
            }
            Event::Variable { name, location } => {
                self.reject_in_prefix_decl("variable", location)?;
                let term = self.inner.build_variable(name);
                self.append_item(Item::term_at(term, location), location)
            }
            Event::BlankNode { label, location } => {
                self.reject_in_prefix_decl("blank node", location)?;
                let term = self.inner.build_blank(label);
                self.append_item(Item::term_at(term, location), location)
            }
            Event::Literal {
                lexical,
                lang,
                datatype,
                location,
            } => {
                self.reject_in_prefix_decl("literal", location)?;
                let term = match (lang, datatype) {
                    (Some(lang), _) => Term::lang_literal(lexical, lang),
                    (None, Some(DatatypeRef::Iri(iri))) => {
                        let datatype = self.resolve_iri(&iri, location)?;
                        Term::typed_literal(lexical, datatype)
                    }
                    (None, Some(DatatypeRef::PrefixedName(pname))) => {
                        let datatype = self.expand_pname(pname, location)?;
                        Term::typed_literal(lexical, datatype)
                    }
                    (None, None) => Term::literal(lexical),
                };
                self.append_item(Item::term_at(term, location), location)
            }
        }
    }
}

/// Validate a `prefix` declaration list and collect its `(label, IRI)`
/// pairs. A written label may end with `:`; the stored key does not.
fn prefix_declarations(
    item: &Item,
    location: Location,
) -> Result<Vec<(String, String)>, TreeError> {
    let malformed = |detail: &str, at: Location| {
        TreeError::new(TreeErrorKind::MalformedForm(detail.to_string()), at)
    };

    let list = item
        .as_list()
        .ok_or_else(|| malformed("prefix expects a list of declarations", item_location(item, location)))?;

    let mut declared = Vec::with_capacity(list.len());
    for pair_item in list.iter() {
        let at = item_location(pair_item, location);
        let pair = pair_item
            .as_list()
            .ok_or_else(|| malformed("prefix declaration must be a (label IRI) pair", at))?;
        if pair.len() != 2 {
            return Err(malformed("prefix declaration must be a (label IRI) pair", at));
        }
        let label = pair
            .get(0)
            .and_then(Item::as_symbol)
            .ok_or_else(|| malformed("prefix declaration label must be a symbol", at))?;
        let label = label.strip_suffix(':').unwrap_or(label);
        let iri = pair
            .get(1)
            .and_then(Item::as_term)
            .and_then(Term::as_iri)
            .ok_or_else(|| malformed("prefix declaration value must be an IRI", at))?;
        declared.push((label.to_string(), iri.to_string()));
    }
    Ok(declared)
}

/// The item's own location when known, else the fallback.
fn item_location(item: &Item, fallback: Location) -> Location {
    if item.location.is_known() {
        item.location
    } else {
        fallback
    }
}
