//! In-memory source
//!
//! Keeps its items sorted by parameter and answers fetches by filtering and
//! truncating that sorted list. Useful for tests, fixtures and for paging
//! through data that is already loaded.

use super::types::{AsyncSource, Source};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;

/// Direction a source walks its parameter space in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Highest parameter first; a fetch returns items `<= parameter`
    #[default]
    Descending,
    /// Lowest parameter first; a fetch returns items `>= parameter`
    Ascending,
}

/// Sorted in-memory source keyed by a function of the item
pub struct MemorySource<T, F> {
    items: Vec<T>,
    key: F,
    direction: SortDirection,
}

impl<T, P, F> MemorySource<T, F>
where
    P: Ord,
    F: Fn(&T) -> P,
{
    /// Create an empty descending source
    pub fn new(key: F) -> Self {
        Self::with_direction(key, SortDirection::Descending)
    }

    /// Create an empty ascending source
    pub fn ascending(key: F) -> Self {
        Self::with_direction(key, SortDirection::Ascending)
    }

    /// Create an empty source walking in `direction`
    pub fn with_direction(key: F, direction: SortDirection) -> Self {
        Self {
            items: Vec::new(),
            key,
            direction,
        }
    }

    /// Create a descending source holding `items`
    pub fn from_items(key: F, items: impl IntoIterator<Item = T>) -> Self {
        let mut source = Self::new(key);
        source.extend(items);
        source
    }

    /// Add an item, keeping the list sorted
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.sort();
    }

    /// Add several items, keeping the list sorted
    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.extend(items);
        self.sort();
    }

    /// Number of items held
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the source holds nothing
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Walk direction
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Items in walk order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    // Stable, so equal parameters keep insertion order.
    fn sort(&mut self) {
        let key = &self.key;
        match self.direction {
            SortDirection::Descending => self.items.sort_by(|a, b| key(b).cmp(&key(a))),
            SortDirection::Ascending => self.items.sort_by(|a, b| key(a).cmp(&key(b))),
        }
    }

    fn matching<'a>(&'a self, parameter: Option<&'a P>) -> impl Iterator<Item = &'a T> + 'a {
        self.items.iter().filter(move |item| {
            let Some(parameter) = parameter else {
                return true;
            };
            let key = (self.key)(item);
            match self.direction {
                SortDirection::Descending => key <= *parameter,
                SortDirection::Ascending => key >= *parameter,
            }
        })
    }
}

impl<T: fmt::Debug, F> fmt::Debug for MemorySource<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("items", &self.items)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

impl<T, P, F> Source for MemorySource<T, F>
where
    T: Clone,
    P: Ord,
    F: Fn(&T) -> P,
{
    type Item = T;
    type Param = P;
    type Error = Infallible;

    fn fetch(&self, parameter: Option<&P>, limit: usize) -> Result<Vec<T>, Infallible> {
        Ok(self.matching(parameter).take(limit).cloned().collect())
    }

    fn parameter_of(&self, item: &T) -> P {
        (self.key)(item)
    }

    fn fetch_skipping(
        &self,
        parameter: Option<&P>,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<T>, Infallible> {
        Ok(self
            .matching(parameter)
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl<T, P, F> AsyncSource for MemorySource<T, F>
where
    T: Clone + Send + Sync,
    P: Ord + Send + Sync,
    F: Fn(&T) -> P + Send + Sync,
{
    type Item = T;
    type Param = P;
    type Error = Infallible;

    async fn fetch(&self, parameter: Option<&P>, limit: usize) -> Result<Vec<T>, Infallible> {
        Source::fetch(self, parameter, limit)
    }

    fn parameter_of(&self, item: &T) -> P {
        (self.key)(item)
    }

    async fn fetch_skipping(
        &self,
        parameter: Option<&P>,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<T>, Infallible> {
        Source::fetch_skipping(self, parameter, skip, limit)
    }
}
