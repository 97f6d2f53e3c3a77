//! Traversal and structure-preserving substitution over item trees.

use sse_parse::Location;
use sse_term::Term;

use crate::item::{Item, ItemKind, ItemList};

/// One method per item variant; [`Item::accept`] dispatches to exactly
/// one of them.
pub trait ItemVisitor {
    /// Called for a list item.
    fn visit_list(&mut self, list: &ItemList, location: Location);
    /// Called for a term item.
    fn visit_term(&mut self, term: &Term, location: Location);
    /// Called for a symbol item.
    fn visit_symbol(&mut self, text: &str, location: Location);
    /// Called for nil.
    fn visit_nil(&mut self, location: Location);
}

impl Item {
    /// Dispatch to the visitor method for the active variant.
    pub fn accept(&self, visitor: &mut dyn ItemVisitor) {
        match &self.kind {
            ItemKind::List(list) => visitor.visit_list(list, self.location),
            ItemKind::Term(term) => visitor.visit_term(term, self.location),
            ItemKind::Symbol(text) => visitor.visit_symbol(text, self.location),
            ItemKind::Nil => visitor.visit_nil(self.location),
        }
    }

    /// Rebuild the tree, substituting `Term`/`Symbol` leaves.
    ///
    /// `f` is consulted for term and symbol items only; returning `None`
    /// keeps the original. Lists are reconstructed from their transformed
    /// children and never handed to `f`, so the result always has the
    /// shape of the input. `Nil` passes through unchanged.
    pub fn transform<F>(&self, f: &mut F) -> Item
    where
        F: FnMut(&Item) -> Option<Item>,
    {
        match &self.kind {
            ItemKind::List(list) => {
                let children: ItemList = list.iter().map(|child| child.transform(f)).collect();
                Item::list_at(children, self.location)
            }
            ItemKind::Term(_) | ItemKind::Symbol(_) => {
                f(self).unwrap_or_else(|| self.clone())
            }
            ItemKind::Nil => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_dispatches_once() {
        #[derive(Default)]
        struct Counter {
            lists: usize,
            terms: usize,
            symbols: usize,
            nils: usize,
        }

        impl ItemVisitor for Counter {
            fn visit_list(&mut self, _: &ItemList, _: Location) {
                self.lists += 1;
            }
            fn visit_term(&mut self, _: &Term, _: Location) {
                self.terms += 1;
            }
            fn visit_symbol(&mut self, _: &str, _: Location) {
                self.symbols += 1;
            }
            fn visit_nil(&mut self, _: Location) {
                self.nils += 1;
            }
        }

        let mut counter = Counter::default();
        Item::symbol("x").accept(&mut counter);
        Item::nil().accept(&mut counter);
        Item::term(Term::iri("http://example/")).accept(&mut counter);
        Item::list(ItemList::new()).accept(&mut counter);
        assert_eq!(
            (counter.lists, counter.terms, counter.symbols, counter.nils),
            (1, 1, 1, 1)
        );
    }

    #[test]
    fn test_transform_replaces_leaves_preserving_shape() {
        let tree = Item::list(ItemList::from_vec(vec![
            Item::symbol("bgp"),
            Item::list(ItemList::from_vec(vec![
                Item::term(Term::variable("x")),
                Item::symbol("keep"),
            ])),
            Item::nil(),
        ]));

        let replaced = tree.transform(&mut |item| {
            item.as_term()
                .and_then(Term::as_variable)
                .map(|_| Item::term(Term::iri("http://example/bound")))
        });

        let expected = Item::list(ItemList::from_vec(vec![
            Item::symbol("bgp"),
            Item::list(ItemList::from_vec(vec![
                Item::term(Term::iri("http://example/bound")),
                Item::symbol("keep"),
            ])),
            Item::nil(),
        ]));
        assert_eq!(replaced, expected);
    }

    #[test]
    fn test_transform_never_sees_lists() {
        let tree = Item::list(ItemList::from_vec(vec![Item::list(ItemList::from_vec(
            vec![Item::symbol("a")],
        ))]));
        tree.transform(&mut |item| {
            assert!(!item.is_list());
            None
        });
    }
}
