//! Blocking paginator
//!
//! Drives a [`FetchWindow`] against a [`Source`] on demand. Nothing is
//! fetched until the caller pulls.

use super::types::{PaginatorState, PaginatorStats, ParameterOrder, Progress};
use super::window::FetchWindow;
use crate::config::PaginatorConfig;
use crate::error::{PageError, Result};
use crate::source::Source;
use std::fmt;
use std::iter::FusedIterator;

/// Lazy sequence of items over a chunked, sorted source
///
/// # Example
///
/// ```rust
/// use adaptive_pager::pagination::Paginator;
/// use adaptive_pager::source::MemorySource;
///
/// let source = MemorySource::from_items(|item: &(u32, char)| item.0, [(1, 'A'), (2, 'B'), (3, 'C')]);
/// let mut paginator = Paginator::new(source, 2).unwrap();
///
/// let labels: Vec<char> = paginator.by_ref().map(|item| item.unwrap().1).collect();
/// assert_eq!(labels, vec!['C', 'B', 'A']);
/// ```
pub struct Paginator<S: Source> {
    source: S,
    window: FetchWindow<S::Item, S::Param>,
}

impl<S> fmt::Debug for Paginator<S>
where
    S: Source + fmt::Debug,
    S::Item: fmt::Debug,
    S::Param: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("source", &self.source)
            .field("window", &self.window)
            .finish()
    }
}

impl<S> Paginator<S>
where
    S: Source,
    S::Item: Clone + PartialEq,
    S::Param: Clone,
{
    /// Create a paginator with no ceiling on batch growth
    pub fn new(source: S, base_limit: usize) -> Result<Self> {
        Ok(Self {
            source,
            window: FetchWindow::new(base_limit, None)?,
        })
    }

    /// Create a paginator whose batch size never grows past `max_limit`
    pub fn with_max_limit(source: S, base_limit: usize, max_limit: usize) -> Result<Self> {
        Ok(Self {
            source,
            window: FetchWindow::new(base_limit, Some(max_limit))?,
        })
    }

    /// Create a paginator from a limits config
    pub fn from_config(source: S, config: &PaginatorConfig) -> Result<Self> {
        Ok(Self {
            source,
            window: FetchWindow::from_config(config)?,
        })
    }

    /// Check if another item is available, fetching if the buffer is empty
    ///
    /// Once this returns `Ok(false)` it always will.
    pub fn has_next(&mut self) -> std::result::Result<bool, PageError<S::Error>> {
        self.fill()?;
        Ok(self.window.buffered() > 0)
    }

    /// Take the next item
    ///
    /// Returns [`PageError::Exhausted`] when called after the end was reached.
    pub fn next_item(&mut self) -> std::result::Result<S::Item, PageError<S::Error>> {
        self.fill()?;
        self.window.pop().ok_or(PageError::Exhausted)
    }

    fn fill(&mut self) -> std::result::Result<(), PageError<S::Error>> {
        if !self.window.needs_fetch() {
            return Ok(());
        }
        loop {
            let request = self.window.request();
            let parameter = request.cursor.as_ref();
            let result = if request.is_skipping() {
                self.source
                    .fetch_skipping(parameter, request.skip, request.limit)
            } else {
                self.source.fetch(parameter, request.limit)
            };

            let batch = match result {
                Ok(batch) => batch,
                Err(e) => {
                    self.window.abort();
                    return Err(PageError::Fetch(e));
                }
            };

            let source = &self.source;
            match self.window.absorb(batch, |item| source.parameter_of(item)) {
                Progress::Retry => {}
                Progress::Advanced | Progress::Exhausted => return Ok(()),
            }
        }
    }

    /// Raise or lower the growth ceiling
    ///
    /// Fails if `max_limit` is below the base limit.
    pub fn set_max_limit(&mut self, max_limit: usize) -> Result<()> {
        self.window.set_max_limit(max_limit)
    }

    /// Let the batch size grow without bound
    pub fn clear_max_limit(&mut self) {
        self.window.clear_max_limit();
    }

    pub fn base_limit(&self) -> usize {
        self.window.base_limit()
    }

    /// Batch size the next fetch will ask for
    pub fn current_limit(&self) -> usize {
        self.window.current_limit()
    }

    pub fn max_limit(&self) -> Option<usize> {
        self.window.max_limit()
    }

    /// Parameter the next fetch is bounded by
    pub fn cursor(&self) -> Option<&S::Param> {
        self.window.cursor()
    }

    pub fn order(&self) -> ParameterOrder {
        self.window.order()
    }

    pub fn state(&self) -> PaginatorState {
        self.window.state()
    }

    pub fn stats(&self) -> &PaginatorStats {
        self.window.stats()
    }

    /// Items fetched but not yet returned
    pub fn buffered(&self) -> usize {
        self.window.buffered()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Give the source back, dropping anything still buffered
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S> Iterator for Paginator<S>
where
    S: Source,
    S::Item: Clone + PartialEq,
    S::Param: Clone,
{
    type Item = std::result::Result<S::Item, PageError<S::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.has_next() {
            Ok(true) => self.window.pop().map(Ok),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<S> FusedIterator for Paginator<S>
where
    S: Source,
    S::Item: Clone + PartialEq,
    S::Param: Clone,
{
}
