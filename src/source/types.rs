//! Source traits
//!
//! A source answers one kind of question: "give me up to `limit` items at or
//! before this parameter, sorted by parameter". The paginator drives it.

use async_trait::async_trait;
use std::sync::Arc;

/// Blocking data source queried in bounded, sorted chunks
pub trait Source {
    /// Payload type
    type Item;
    /// Key the items are sorted and filtered by
    type Param: Ord;
    /// Failure of a single fetch (I/O, decoding, ...)
    type Error;

    /// Return up to `limit` items sorted by parameter, filtered to those at or
    /// before `parameter` (unfiltered when `None`).
    ///
    /// Returning fewer than `limit` items while more exist confuses
    /// exhaustion detection.
    fn fetch(
        &self,
        parameter: Option<&Self::Param>,
        limit: usize,
    ) -> Result<Vec<Self::Item>, Self::Error>;

    /// Parameter of an item. Must be deterministic and side-effect free.
    fn parameter_of(&self, item: &Self::Item) -> Self::Param;

    /// Like [`Source::fetch`], but drop the first `skip` matching items before
    /// applying `limit`.
    ///
    /// The default over-fetches `skip + limit` items and discards the prefix.
    /// Override it when the backend supports offsets natively.
    fn fetch_skipping(
        &self,
        parameter: Option<&Self::Param>,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Self::Item>, Self::Error> {
        let items = self.fetch(parameter, skip.saturating_add(limit))?;
        Ok(items.into_iter().skip(skip).take(limit).collect())
    }
}

macro_rules! forward_source {
    ($($ty:ty),*) => {$(
        impl<S: Source + ?Sized> Source for $ty {
            type Item = S::Item;
            type Param = S::Param;
            type Error = S::Error;

            fn fetch(
                &self,
                parameter: Option<&Self::Param>,
                limit: usize,
            ) -> Result<Vec<Self::Item>, Self::Error> {
                (**self).fetch(parameter, limit)
            }

            fn parameter_of(&self, item: &Self::Item) -> Self::Param {
                (**self).parameter_of(item)
            }

            fn fetch_skipping(
                &self,
                parameter: Option<&Self::Param>,
                skip: usize,
                limit: usize,
            ) -> Result<Vec<Self::Item>, Self::Error> {
                (**self).fetch_skipping(parameter, skip, limit)
            }
        }
    )*};
}

forward_source!(&S, Box<S>, Arc<S>);

/// Async counterpart of [`Source`] for network or database backends
#[async_trait]
pub trait AsyncSource: Send + Sync {
    /// Payload type
    type Item: Send;
    /// Key the items are sorted and filtered by
    type Param: Ord + Send + Sync;
    /// Failure of a single fetch
    type Error: Send;

    /// See [`Source::fetch`]
    async fn fetch(
        &self,
        parameter: Option<&Self::Param>,
        limit: usize,
    ) -> Result<Vec<Self::Item>, Self::Error>;

    /// See [`Source::parameter_of`]
    fn parameter_of(&self, item: &Self::Item) -> Self::Param;

    /// See [`Source::fetch_skipping`]
    async fn fetch_skipping(
        &self,
        parameter: Option<&Self::Param>,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Self::Item>, Self::Error> {
        let items = self.fetch(parameter, skip.saturating_add(limit)).await?;
        Ok(items.into_iter().skip(skip).take(limit).collect())
    }
}

#[async_trait]
impl<S: AsyncSource + ?Sized> AsyncSource for Arc<S> {
    type Item = S::Item;
    type Param = S::Param;
    type Error = S::Error;

    async fn fetch(
        &self,
        parameter: Option<&Self::Param>,
        limit: usize,
    ) -> Result<Vec<Self::Item>, Self::Error> {
        (**self).fetch(parameter, limit).await
    }

    fn parameter_of(&self, item: &Self::Item) -> Self::Param {
        (**self).parameter_of(item)
    }

    async fn fetch_skipping(
        &self,
        parameter: Option<&Self::Param>,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Self::Item>, Self::Error> {
        (**self).fetch_skipping(parameter, skip, limit).await
    }
}

#[async_trait]
impl<'a, S: AsyncSource + ?Sized> AsyncSource for &'a S {
    type Item = S::Item;
    type Param = S::Param;
    type Error = S::Error;

    async fn fetch(
        &self,
        parameter: Option<&Self::Param>,
        limit: usize,
    ) -> Result<Vec<Self::Item>, Self::Error> {
        (**self).fetch(parameter, limit).await
    }

    fn parameter_of(&self, item: &Self::Item) -> Self::Param {
        (**self).parameter_of(item)
    }

    async fn fetch_skipping(
        &self,
        parameter: Option<&Self::Param>,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Self::Item>, Self::Error> {
        (**self).fetch_skipping(parameter, skip, limit).await
    }
}
