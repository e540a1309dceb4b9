//! Async paginator
//!
//! Same algorithm as [`super::Paginator`], driven against an
//! [`AsyncSource`]. The only suspension point is the source call.

use super::types::{PaginatorState, PaginatorStats, ParameterOrder, Progress};
use super::window::FetchWindow;
use crate::config::PaginatorConfig;
use crate::error::{PageError, Result};
use crate::source::AsyncSource;
use futures::stream::{self, Stream};

/// Async lazy sequence of items over a chunked, sorted source
pub struct AsyncPaginator<S: AsyncSource> {
    source: S,
    window: FetchWindow<S::Item, S::Param>,
}

impl<S> AsyncPaginator<S>
where
    S: AsyncSource,
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
    pub async fn has_next(&mut self) -> std::result::Result<bool, PageError<S::Error>> {
        self.fill().await?;
        Ok(self.window.buffered() > 0)
    }

    /// Take the next item; [`PageError::Exhausted`] after the end
    pub async fn next_item(&mut self) -> std::result::Result<S::Item, PageError<S::Error>> {
        self.fill().await?;
        self.window.pop().ok_or(PageError::Exhausted)
    }

    async fn fill(&mut self) -> std::result::Result<(), PageError<S::Error>> {
        if !self.window.needs_fetch() {
            return Ok(());
        }
        loop {
            let request = self.window.request();
            let parameter = request.cursor.as_ref();
            let result = if request.is_skipping() {
                self.source
                    .fetch_skipping(parameter, request.skip, request.limit)
                    .await
            } else {
                self.source.fetch(parameter, request.limit).await
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

    /// Turn the paginator into a stream of items
    ///
    /// The stream ends after exhaustion or after the first fetch error.
    pub fn into_stream(
        self,
    ) -> impl Stream<Item = std::result::Result<S::Item, PageError<S::Error>>> {
        stream::try_unfold(self, |mut pager| async move {
            pager.fill().await?;
            let next = pager.window.pop().map(|item| (item, pager));
            Ok::<_, PageError<S::Error>>(next)
        })
    }

    /// See [`super::Paginator::set_max_limit`]
    pub fn set_max_limit(&mut self, max_limit: usize) -> Result<()> {
        self.window.set_max_limit(max_limit)
    }

    pub fn clear_max_limit(&mut self) {
        self.window.clear_max_limit();
    }

    pub fn base_limit(&self) -> usize {
        self.window.base_limit()
    }

    pub fn current_limit(&self) -> usize {
        self.window.current_limit()
    }

    pub fn max_limit(&self) -> Option<usize> {
        self.window.max_limit()
    }

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

    pub fn buffered(&self) -> usize {
        self.window.buffered()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
