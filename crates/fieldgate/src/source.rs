//! The backend seam.
//!
//! A [`DataSource`] answers the two questions the search pipeline asks:
//! how many records match a predicate, and which records fall in a page
//! window once sorted. The in-memory implementation for slices evaluates
//! the compiled predicate directly; other backends may translate it
//! through [`Predicate::clauses`].

use crate::ordering::SortOrder;
use crate::predicate::Predicate;
use crate::request::PageWindow;

/// A queryable collection of `T` records.
///
/// `count` and `fetch` are called once each per search, on the same
/// `&self`. Backends that need both answers to reflect one consistent
/// state should implement this trait on a snapshot or transaction handle.
pub trait DataSource<T> {
    /// What a page is made of, e.g. `&T` for borrowed records.
    type Item;

    /// Counts the records matching `predicate`.
    fn count(&self, predicate: &Predicate<'_, T>) -> usize;

    /// Returns the matching records, ordered by `order`, restricted to
    /// `window`.
    fn fetch(
        &self,
        predicate: &Predicate<'_, T>,
        order: &SortOrder<'_, T>,
        window: PageWindow,
    ) -> Vec<Self::Item>;
}

impl<'s, T> DataSource<T> for &'s [T] {
    type Item = &'s T;

    fn count(&self, predicate: &Predicate<'_, T>) -> usize {
        self.iter().filter(|record| predicate.matches(record)).count()
    }

    fn fetch(
        &self,
        predicate: &Predicate<'_, T>,
        order: &SortOrder<'_, T>,
        window: PageWindow,
    ) -> Vec<&'s T> {
        let records: &'s [T] = *self;
        let matching = records.iter().filter(|record| predicate.matches(record));
        if order.is_empty() {
            return window.apply(matching).collect();
        }

        let mut matching: Vec<&'s T> = matching.collect();
        order.sort(&mut matching);
        window.apply(matching.into_iter()).collect()
    }
}

impl<'s, T> DataSource<T> for &'s Vec<T> {
    type Item = &'s T;

    fn count(&self, predicate: &Predicate<'_, T>) -> usize {
        self.as_slice().count(predicate)
    }

    fn fetch(
        &self,
        predicate: &Predicate<'_, T>,
        order: &SortOrder<'_, T>,
        window: PageWindow,
    ) -> Vec<&'s T> {
        let records: &'s Vec<T> = *self;
        records.as_slice().fetch(predicate, order, window)
    }
}
