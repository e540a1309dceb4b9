//! Pagination types
//!
//! Plain data shared by the fetch window and the paginator drivers.

use serde::{Deserialize, Serialize};

/// Walk direction inferred from the first batch with distinct parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterOrder {
    /// Not inferred yet
    #[default]
    Unknown,
    /// Batches run from low to high parameters
    Ascending,
    /// Batches run from high to low parameters
    Descending,
}

impl ParameterOrder {
    /// Check if the order has been inferred
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Lifecycle of a pagination session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginatorState {
    /// More items may be fetched
    #[default]
    Active,
    /// The source has nothing new to offer; terminal
    Exhausted,
}

/// One source call the window wants made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest<P> {
    /// Boundary parameter (`None` = extremal end)
    pub cursor: Option<P>,
    /// Number of items to ask for
    pub limit: usize,
    /// Matching items to drop first; non-zero only when the ceiling stalls
    /// on a run of equal parameters
    pub skip: usize,
}

impl<P> FetchRequest<P> {
    /// Check if this request needs `fetch_skipping`
    pub fn is_skipping(&self) -> bool {
        self.skip > 0
    }
}

/// What the window decided after absorbing a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// New items were buffered; the round is over
    Advanced,
    /// Nothing new; ask again with the next request
    Retry,
    /// Nothing new and nothing more to try; terminal
    Exhausted,
}

/// Counters for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaginatorStats {
    /// Source calls issued (including failed ones)
    pub fetches: u64,
    /// Times the batch size was doubled
    pub growths: u64,
    /// Source calls issued with a skip
    pub skip_fetches: u64,
    /// Items returned by the source, duplicates included
    pub items_fetched: u64,
    /// Items handed to the caller
    pub items_yielded: u64,
    /// Largest `limit` ever requested
    pub largest_request: usize,
}
