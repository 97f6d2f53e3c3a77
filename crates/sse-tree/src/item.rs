//! The Item tree: a tagged node plus an offset-view list.
//!
//! An `ItemList` is a shared backing vector plus a start offset, so that
//! `cdr` is an O(1) view into the same storage rather than a copy. Lists
//! are append-only while being built and never structurally mutated once
//! a view of them has been handed out.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use sse_parse::Location;
use sse_term::{xsd, Term};

use crate::error::{TreeError, TreeErrorKind};

/// A node of the tree: exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// An ordered sequence of child items.
    List(ItemList),
    /// An RDF term (IRI, blank node, variable, or literal).
    Term(Term),
    /// A bareword: operator name, keyword, tag.
    Symbol(Box<str>),
    /// The distinguished empty/absent value. The source text `nil`
    /// parses to this variant, never to `Symbol("nil")`.
    Nil,
}

/// A tree node with its source location.
///
/// Equality and hashing ignore the location: two items are equal iff
/// their active variants are equal.
#[derive(Debug, Clone)]
pub struct Item {
    /// The active variant.
    pub kind: ItemKind,
    /// Source position, `Location::UNKNOWN` for synthesized items.
    pub location: Location,
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl Item {
    /// Create a list item with no source location.
    pub fn list(list: ItemList) -> Self {
        Self::list_at(list, Location::UNKNOWN)
    }

    /// Create a list item at a source location.
    pub fn list_at(list: ItemList, location: Location) -> Self {
        Item {
            kind: ItemKind::List(list),
            location,
        }
    }

    /// Create a term item with no source location.
    pub fn term(term: Term) -> Self {
        Self::term_at(term, Location::UNKNOWN)
    }

    /// Create a term item at a source location.
    pub fn term_at(term: Term, location: Location) -> Self {
        Item {
            kind: ItemKind::Term(term),
            location,
        }
    }

    /// Create a symbol item with no source location.
    pub fn symbol(text: impl AsRef<str>) -> Self {
        Self::symbol_at(text, Location::UNKNOWN)
    }

    /// Create a symbol item at a source location.
    pub fn symbol_at(text: impl AsRef<str>, location: Location) -> Self {
        Item {
            kind: ItemKind::Symbol(text.as_ref().into()),
            location,
        }
    }

    /// The nil item.
    pub fn nil() -> Self {
        Self::nil_at(Location::UNKNOWN)
    }

    /// The nil item at a source location.
    pub fn nil_at(location: Location) -> Self {
        Item {
            kind: ItemKind::Nil,
            location,
        }
    }

    /// Check if this is a list.
    pub fn is_list(&self) -> bool {
        matches!(self.kind, ItemKind::List(_))
    }

    /// Check if this is a term.
    pub fn is_term(&self) -> bool {
        matches!(self.kind, ItemKind::Term(_))
    }

    /// Check if this is a symbol.
    pub fn is_symbol(&self) -> bool {
        matches!(self.kind, ItemKind::Symbol(_))
    }

    /// Check if this is nil.
    pub fn is_nil(&self) -> bool {
        matches!(self.kind, ItemKind::Nil)
    }

    /// Get the list, if this is a list item.
    pub fn as_list(&self) -> Option<&ItemList> {
        match &self.kind {
            ItemKind::List(list) => Some(list),
            _ => None,
        }
    }

    /// Get the term, if this is a term item.
    pub fn as_term(&self) -> Option<&Term> {
        match &self.kind {
            ItemKind::Term(term) => Some(term),
            _ => None,
        }
    }

    /// Get the symbol text, if this is a symbol item.
    pub fn as_symbol(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Symbol(text) => Some(text),
            _ => None,
        }
    }

    /// Whether this is the symbol `name`.
    pub fn is_symbol_named(&self, name: &str) -> bool {
        self.as_symbol() == Some(name)
    }

    /// Whether this is a list whose first element is the symbol `name`.
    pub fn is_tagged(&self, name: &str) -> bool {
        self.as_list().is_some_and(|l| l.is_tagged(name))
    }

    /// Read this item as a double.
    ///
    /// Fails with `NotANumber` unless the item is a literal term with a
    /// numeric datatype and a parseable lexical form.
    pub fn as_double(&self) -> Result<f64, TreeError> {
        let lit = self.numeric_literal()?;
        lit.lexical
            .parse()
            .map_err(|_| self.not_a_number())
    }

    /// Read this item as an i64.
    ///
    /// Fails with `NotANumber` unless the item is a literal term with an
    /// integer datatype.
    pub fn as_long(&self) -> Result<i64, TreeError> {
        let lit = self.numeric_literal()?;
        if !lit.datatype.as_deref().is_some_and(xsd::is_integer) {
            return Err(self.not_a_number());
        }
        lit.lexical.parse().map_err(|_| self.not_a_number())
    }

    /// Read this item as an i32.
    pub fn as_int(&self) -> Result<i32, TreeError> {
        let lit = self.numeric_literal()?;
        if !lit.datatype.as_deref().is_some_and(xsd::is_integer) {
            return Err(self.not_a_number());
        }
        lit.lexical.parse().map_err(|_| self.not_a_number())
    }

    /// Read this item as an integer, ignoring the datatype: any literal
    /// whose lexical form is an integer qualifies, as does a symbol of
    /// digits.
    pub fn as_integer_lenient(&self) -> Result<i64, TreeError> {
        let lexical: &str = match &self.kind {
            ItemKind::Term(Term::Literal(lit)) => &lit.lexical,
            ItemKind::Symbol(text) => text,
            _ => return Err(self.not_a_number()),
        };
        lexical.parse().map_err(|_| self.not_a_number())
    }

    fn numeric_literal(&self) -> Result<&sse_term::Literal, TreeError> {
        match &self.kind {
            ItemKind::Term(Term::Literal(lit)) if lit.is_numeric() => Ok(lit),
            _ => Err(self.not_a_number()),
        }
    }

    fn not_a_number(&self) -> TreeError {
        TreeError::new(TreeErrorKind::NotANumber, self.location)
    }
}

/// An ordered sequence of items, backed by shared storage plus an offset.
///
/// Cloning and `cdr` are O(1); both share the backing vector. An
/// independent copy is only made by `sublist_range`.
#[derive(Debug, Clone, Default)]
pub struct ItemList {
    backing: Arc<Vec<Item>>,
    offset: usize,
}

impl ItemList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from a vector of items.
    pub fn from_vec(items: Vec<Item>) -> Self {
        ItemList {
            backing: Arc::new(items),
            offset: 0,
        }
    }

    /// The logical elements, from the offset onward.
    pub fn as_slice(&self) -> &[Item] {
        &self.backing[self.offset..]
    }

    /// Number of logical elements.
    pub fn len(&self) -> usize {
        self.backing.len() - self.offset
    }

    /// Whether there are no logical elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Indexed access.
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.as_slice().get(index)
    }

    /// The first element.
    pub fn first(&self) -> Option<&Item> {
        self.as_slice().first()
    }

    /// The last element.
    pub fn last(&self) -> Option<&Item> {
        self.as_slice().last()
    }

    /// Iterate the logical elements.
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.as_slice().iter()
    }

    /// Append an item.
    ///
    /// Only meaningful while the list is being constructed. If the
    /// backing is shared with views, the storage is copied first so the
    /// views are unaffected.
    pub fn push(&mut self, item: Item) {
        Arc::make_mut(&mut self.backing).push(item);
    }

    /// The first element; fails on an empty list.
    pub fn car(&self) -> Result<&Item, TreeError> {
        self.first()
            .ok_or_else(|| TreeError::unlocated(TreeErrorKind::EmptyList))
    }

    /// Everything after the first element, as an O(1) view sharing this
    /// list's storage; fails on an empty list.
    pub fn cdr(&self) -> Result<ItemList, TreeError> {
        self.cdr_opt()
            .ok_or_else(|| TreeError::unlocated(TreeErrorKind::EmptyList))
    }

    /// Non-failing `cdr`: `None` on an empty list.
    pub fn cdr_opt(&self) -> Option<ItemList> {
        if self.is_empty() {
            return None;
        }
        Some(ItemList {
            backing: Arc::clone(&self.backing),
            offset: self.offset + 1,
        })
    }

    /// Tail view from `start`: `None` when `start` exceeds the length.
    pub fn sublist(&self, start: usize) -> Option<ItemList> {
        if start > self.len() {
            return None;
        }
        Some(ItemList {
            backing: Arc::clone(&self.backing),
            offset: self.offset + start,
        })
    }

    /// Independent copy of the half-open range `start..end`; `None` on
    /// invalid bounds.
    pub fn sublist_range(&self, start: usize, end: usize) -> Option<ItemList> {
        if start > end || end > self.len() {
            return None;
        }
        Some(ItemList::from_vec(self.as_slice()[start..end].to_vec()))
    }

    /// Whether the list can carry a tag: nonempty with a leading symbol.
    pub fn is_taggable(&self) -> bool {
        self.first().is_some_and(Item::is_symbol)
    }

    /// Whether the first element is the symbol `name`.
    pub fn is_tagged(&self, name: &str) -> bool {
        self.first().is_some_and(|item| item.is_symbol_named(name))
    }

    /// Case-insensitive [`ItemList::is_tagged`].
    pub fn is_tagged_ignore_case(&self, name: &str) -> bool {
        self.first()
            .and_then(Item::as_symbol)
            .is_some_and(|s| s.eq_ignore_ascii_case(name))
    }

    /// Scan sibling items for the first list tagged with `key`.
    ///
    /// Used to locate an optional clause among unordered siblings.
    pub fn find_tagged(&self, key: &str) -> Option<&Item> {
        self.iter().find(|item| item.is_tagged(key))
    }
}

impl PartialEq for ItemList {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for ItemList {}

impl Hash for ItemList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl FromIterator<Item> for ItemList {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        ItemList::from_vec(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ItemList {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn sample() -> ItemList {
        ItemList::from_vec(vec![
            Item::symbol("a"),
            Item::symbol("b"),
            Item::symbol("c"),
        ])
    }

    #[test]
    fn test_basic_access() {
        let list = sample();
        assert_eq!(list.len(), 3);
        assert!(!list.is_empty());
        assert_eq!(list.get(1).and_then(Item::as_symbol), Some("b"));
        assert_eq!(list.first().and_then(Item::as_symbol), Some("a"));
        assert_eq!(list.last().and_then(Item::as_symbol), Some("c"));
    }

    #[test]
    fn test_cdr_chain_reaches_last_element() {
        let list = sample();
        let mut rest = list.clone();
        for _ in 0..2 {
            rest = rest.cdr().unwrap();
        }
        assert_eq!(rest.len(), 1);
        assert_eq!(rest.first(), list.last());
        // One more cdr gives the empty view; another fails.
        let empty = rest.cdr().unwrap();
        assert!(empty.is_empty());
        let err = empty.cdr().unwrap_err();
        assert_eq!(err.kind, TreeErrorKind::EmptyList);
    }

    #[test]
    fn test_cdr_shares_backing() {
        let list = sample();
        let rest = list.cdr().unwrap();
        assert!(Arc::ptr_eq(&list.backing, &rest.backing));
        assert_eq!(rest.as_slice(), &list.as_slice()[1..]);
    }

    #[test]
    fn test_car_of_empty() {
        let empty = ItemList::new();
        assert_eq!(empty.car().unwrap_err().kind, TreeErrorKind::EmptyList);
        assert!(empty.cdr_opt().is_none());
    }

    #[test]
    fn test_sublist_views_and_copies() {
        let list = sample();
        let tail = list.sublist(1).unwrap();
        assert_eq!(tail.len(), 2);
        assert!(list.sublist(3).unwrap().is_empty());
        assert!(list.sublist(4).is_none());

        let copy = list.sublist_range(0, 2).unwrap();
        assert_eq!(copy.len(), 2);
        assert!(!Arc::ptr_eq(&list.backing, &copy.backing));
        assert!(list.sublist_range(2, 1).is_none());
        assert!(list.sublist_range(0, 4).is_none());
    }

    #[test]
    fn test_tag_sniffing() {
        let list = ItemList::from_vec(vec![Item::symbol("bgp"), Item::nil()]);
        assert!(list.is_taggable());
        assert!(list.is_tagged("bgp"));
        assert!(!list.is_tagged("filter"));
        assert!(list.is_tagged_ignore_case("BGP"));

        let untagged = ItemList::from_vec(vec![Item::nil()]);
        assert!(!untagged.is_taggable());
    }

    #[test]
    fn test_find_tagged() {
        let clause = |tag: &str| {
            Item::list(ItemList::from_vec(vec![
                Item::symbol(tag),
                Item::symbol("x"),
            ]))
        };
        let list = ItemList::from_vec(vec![clause("order"), clause("limit")]);
        let found = list.find_tagged("limit").unwrap();
        assert!(found.is_tagged("limit"));
        assert!(list.find_tagged("offset").is_none());
    }

    #[test]
    fn test_equality_ignores_location_and_backing() {
        let a = Item::symbol_at("x", Location::new(3, 4));
        let b = Item::symbol("x");
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        // A cdr view equals an independently built list with the same
        // logical elements.
        let view = sample().cdr().unwrap();
        let built = ItemList::from_vec(vec![Item::symbol("b"), Item::symbol("c")]);
        assert_eq!(view, built);
        assert_eq!(hash_of(&view), hash_of(&built));
    }

    #[test]
    fn test_nil_is_not_the_nil_symbol() {
        assert_ne!(Item::nil(), Item::symbol("nil"));
    }

    #[test]
    fn test_numeric_accessors() {
        let int = Item::term(Term::integer(42));
        assert_eq!(int.as_long().unwrap(), 42);
        assert_eq!(int.as_int().unwrap(), 42);
        assert_eq!(int.as_double().unwrap(), 42.0);

        let dbl = Item::term(Term::double(2.5));
        assert_eq!(dbl.as_double().unwrap(), 2.5);
        assert_eq!(dbl.as_long().unwrap_err().kind, TreeErrorKind::NotANumber);

        let plain = Item::term(Term::literal("42"));
        assert_eq!(plain.as_long().unwrap_err().kind, TreeErrorKind::NotANumber);

        let sym = Item::symbol("17");
        assert_eq!(sym.as_integer_lenient().unwrap(), 17);
        assert_eq!(sym.as_long().unwrap_err().kind, TreeErrorKind::NotANumber);

        let word = Item::symbol("bgp");
        assert_eq!(
            word.as_integer_lenient().unwrap_err().kind,
            TreeErrorKind::NotANumber
        );
    }
}
