//! Fetch window
//!
//! The adaptive part of pagination, kept free of I/O. A driver asks the
//! window for a [`FetchRequest`], performs it against its source, and hands
//! the raw batch back through [`FetchWindow::absorb`]. The window decides
//! whether the round made progress, should retry with a bigger batch, or has
//! run dry.
//!
//! The window owns:
//! - the cursor (last parameter the walk reached)
//! - the batch size (`base_limit`, grown by doubling, capped by `max_limit`)
//! - the inferred parameter order
//! - the seen set used to drop duplicates
//! - the buffer of fetched items not yet handed out

use super::types::{FetchRequest, PaginatorState, PaginatorStats, ParameterOrder, Progress};
use crate::config::{validate_limits, PaginatorConfig};
use crate::error::Result;
use std::cmp::Ordering;
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Sans-IO pagination state for one session
#[derive(Debug, Clone)]
pub struct FetchWindow<T, P> {
    base_limit: usize,
    current_limit: usize,
    max_limit: Option<usize>,
    cursor: Option<P>,
    order: ParameterOrder,
    state: PaginatorState,
    /// Items fetched at or ahead of the cursor, with their parameters
    seen: Vec<(P, T)>,
    buffer: VecDeque<T>,
    stats: PaginatorStats,
    /// `current_limit` when the round began; restored if a fetch fails
    round_start: Option<usize>,
    pending_skip: usize,
    /// (limit, skip) of the request awaiting `absorb`
    in_flight: Option<(usize, usize)>,
}

impl<T, P> FetchWindow<T, P>
where
    T: Clone + PartialEq,
    P: Ord + Clone,
{
    /// Create a window; `base_limit` must be positive and `max_limit`, if
    /// given, at least `base_limit`
    pub fn new(base_limit: usize, max_limit: Option<usize>) -> Result<Self> {
        validate_limits(base_limit, max_limit)?;
        Ok(Self {
            base_limit,
            current_limit: base_limit,
            max_limit,
            cursor: None,
            order: ParameterOrder::Unknown,
            state: PaginatorState::Active,
            seen: Vec::new(),
            buffer: VecDeque::new(),
            stats: PaginatorStats::default(),
            round_start: None,
            pending_skip: 0,
            in_flight: None,
        })
    }

    /// Create a window from a limits config
    pub fn from_config(config: &PaginatorConfig) -> Result<Self> {
        Self::new(config.base_limit, config.max_limit)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn base_limit(&self) -> usize {
        self.base_limit
    }

    pub fn current_limit(&self) -> usize {
        self.current_limit
    }

    pub fn max_limit(&self) -> Option<usize> {
        self.max_limit
    }

    pub fn cursor(&self) -> Option<&P> {
        self.cursor.as_ref()
    }

    pub fn order(&self) -> ParameterOrder {
        self.order
    }

    pub fn state(&self) -> PaginatorState {
        self.state
    }

    pub fn stats(&self) -> &PaginatorStats {
        &self.stats
    }

    /// Items fetched but not yet handed out
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Size of the dedup window
    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == PaginatorState::Exhausted
    }

    /// Check if the driver has to call the source before it can hand out an item
    pub fn needs_fetch(&self) -> bool {
        self.buffer.is_empty() && !self.is_exhausted()
    }

    // ========================================================================
    // Limits
    // ========================================================================

    /// Set the growth ceiling
    ///
    /// A ceiling below the current batch size applies at the next growth
    /// decision; the batch in progress is not shrunk.
    pub fn set_max_limit(&mut self, max_limit: usize) -> Result<()> {
        validate_limits(self.base_limit, Some(max_limit))?;
        debug!("Max limit set to {}", max_limit);
        self.max_limit = Some(max_limit);
        Ok(())
    }

    /// Remove the growth ceiling
    pub fn clear_max_limit(&mut self) {
        self.max_limit = None;
    }

    // ========================================================================
    // Fetch Rounds
    // ========================================================================

    /// Next source call to make
    pub fn request(&mut self) -> FetchRequest<P> {
        if self.round_start.is_none() {
            self.round_start = Some(self.current_limit);
        }

        let request = FetchRequest {
            cursor: self.cursor.clone(),
            limit: self.current_limit,
            skip: self.pending_skip,
        };
        self.in_flight = Some((request.limit, request.skip));

        self.stats.fetches += 1;
        if request.is_skipping() {
            self.stats.skip_fetches += 1;
        }
        self.stats.largest_request = self.stats.largest_request.max(request.limit);

        trace!("Requesting {} items (skip {})", request.limit, request.skip);
        request
    }

    /// Undo the round after a failed source call
    ///
    /// Cursor, seen set and buffer were never touched; the batch size goes
    /// back to what it was when the round began.
    pub fn abort(&mut self) {
        if let Some(limit) = self.round_start.take() {
            self.current_limit = limit;
        }
        self.pending_skip = 0;
        self.in_flight = None;
    }

    /// Feed back the raw batch answering the last [`FetchWindow::request`]
    pub fn absorb<F>(&mut self, batch: Vec<T>, parameter_of: F) -> Progress
    where
        F: Fn(&T) -> P,
    {
        let (requested, skipped) = self
            .in_flight
            .take()
            .unwrap_or((self.current_limit, self.pending_skip));
        self.pending_skip = 0;

        let fetched = batch.len();
        self.stats.items_fetched += fetched as u64;

        let mut novel: Vec<(P, T)> = Vec::with_capacity(fetched);
        for item in batch {
            if self.is_seen(&item) || novel.iter().any(|(_, other)| *other == item) {
                continue;
            }
            novel.push((parameter_of(&item), item));
        }

        if !novel.is_empty() {
            self.advance(novel);
            return Progress::Advanced;
        }

        if fetched < requested {
            debug!(
                "Source returned {} of {} items, none new; exhausted",
                fetched, requested
            );
            return self.exhaust();
        }

        if skipped > 0 {
            warn!(
                "No new items after skipping {} at limit {}; giving up on this run",
                skipped, requested
            );
            return self.exhaust();
        }

        self.grow()
    }

    /// Take the next buffered item
    pub fn pop(&mut self) -> Option<T> {
        let item = self.buffer.pop_front()?;
        self.stats.items_yielded += 1;
        Some(item)
    }

    fn is_seen(&self, item: &T) -> bool {
        self.seen.iter().any(|(_, seen)| seen == item)
    }

    fn grow(&mut self) -> Progress {
        let grown = match self.max_limit {
            // Ceiling was lowered below the running limit
            Some(max_limit) if self.current_limit > max_limit => {
                debug!(
                    "Limit {} is above the ceiling, clamping to {}",
                    self.current_limit, max_limit
                );
                self.current_limit = max_limit;
                return Progress::Retry;
            }
            Some(max_limit) if self.current_limit == max_limit => return self.skip_seen_run(),
            Some(max_limit) => self.current_limit.saturating_mul(2).min(max_limit),
            None => self.current_limit.saturating_mul(2),
        };

        if grown == self.current_limit {
            return self.exhaust();
        }

        debug!(
            "Batch held only duplicates, growing limit {} -> {}",
            self.current_limit, grown
        );
        self.current_limit = grown;
        self.stats.growths += 1;
        Progress::Retry
    }

    // At the ceiling every item at the cursor parameter we already hold is a
    // prefix of the source's answer; step over it instead of growing.
    fn skip_seen_run(&mut self) -> Progress {
        let skip = match &self.cursor {
            Some(cursor) => self.seen.iter().filter(|(p, _)| p == cursor).count(),
            None => 0,
        };
        if skip == 0 {
            return self.exhaust();
        }

        debug!(
            "Limit {} is at the ceiling, skipping {} items already seen at the cursor",
            self.current_limit, skip
        );
        self.pending_skip = skip;
        Progress::Retry
    }

    fn advance(&mut self, batch: Vec<(P, T)>) {
        if self.current_limit != self.base_limit {
            debug!(
                "Fetched {} new items, resetting limit {} -> {}",
                batch.len(),
                self.current_limit,
                self.base_limit
            );
        }
        self.current_limit = self.base_limit;
        self.round_start = None;

        if let Some(cursor) = self.next_cursor(&batch) {
            self.cursor = Some(cursor);
        }

        for (parameter, item) in batch {
            self.buffer.push_back(item.clone());
            self.seen.push((parameter, item));
        }
        self.evict_behind_cursor();
    }

    fn next_cursor(&mut self, batch: &[(P, T)]) -> Option<P> {
        let (first, _) = batch.first()?;
        let (last, _) = batch.last()?;
        if batch.len() == 1 {
            return Some(first.clone());
        }

        let next = match self.order {
            ParameterOrder::Ascending => first,
            ParameterOrder::Descending => last,
            ParameterOrder::Unknown => match first.cmp(last) {
                Ordering::Less => {
                    debug!("Inferred ascending parameter order");
                    self.order = ParameterOrder::Ascending;
                    first
                }
                Ordering::Greater => {
                    debug!("Inferred descending parameter order");
                    self.order = ParameterOrder::Descending;
                    last
                }
                // All equal: nothing to infer from yet
                Ordering::Equal => first,
            },
        };
        Some(next.clone())
    }

    // A source honouring the contract never returns items behind the cursor
    // again, so they can leave the dedup window.
    fn evict_behind_cursor(&mut self) {
        let Some(cursor) = &self.cursor else {
            return;
        };
        let before = self.seen.len();
        match self.order {
            ParameterOrder::Descending => self.seen.retain(|(p, _)| p <= cursor),
            ParameterOrder::Ascending => self.seen.retain(|(p, _)| p >= cursor),
            ParameterOrder::Unknown => {}
        }
        let evicted = before - self.seen.len();
        if evicted > 0 {
            trace!("Evicted {} items behind the cursor", evicted);
        }
    }

    fn exhaust(&mut self) -> Progress {
        debug!(
            "Pagination exhausted after {} fetches, {} items yielded",
            self.stats.fetches, self.stats.items_yielded
        );
        self.state = PaginatorState::Exhausted;
        self.round_start = None;
        self.pending_skip = 0;
        Progress::Exhausted
    }
}
