//! Integration tests for the paginators
//!
//! Drives full sessions through the public API: blocking and async
//! paginators over in-memory, record and failing sources.

use adaptive_pager::source::{ParamKind, RecordSource, SortDirection};
use adaptive_pager::{
    AsyncPaginator, Error, MemorySource, PageError, Paginator, PaginatorConfig, PaginatorState,
    ParameterOrder, Source,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::cell::Cell;
use std::collections::HashSet;
use test_case::test_case;

type Item = (u32, &'static str);
type ItemSource = MemorySource<Item, fn(&Item) -> u32>;

fn items(entries: &[Item]) -> ItemSource {
    let key: fn(&Item) -> u32 = |item| item.0;
    MemorySource::from_items(key, entries.iter().copied())
}

fn drain_labels(paginator: Paginator<ItemSource>) -> Vec<&'static str> {
    paginator.map(|item| item.unwrap().1).collect()
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn test_distinct_parameters_come_back_in_source_order() {
    let source = items(&[(1, "A"), (2, "B"), (3, "C"), (4, "D")]);
    let paginator = Paginator::new(source, 3).unwrap();

    assert_eq!(drain_labels(paginator), vec!["D", "C", "B", "A"]);
}

#[test]
fn test_equal_parameters_are_yielded_once() {
    let source = items(&[(1, "A"), (2, "B"), (2, "C"), (3, "D"), (4, "E")]);
    let mut paginator = Paginator::new(source, 3).unwrap();

    assert_eq!(paginator.next_item().unwrap().1, "E");
    assert_eq!(paginator.next_item().unwrap().1, "D");

    let mut middle = vec![
        paginator.next_item().unwrap().1,
        paginator.next_item().unwrap().1,
    ];
    middle.sort_unstable();
    assert_eq!(middle, vec!["B", "C"]);

    assert_eq!(paginator.next_item().unwrap().1, "A");
    assert!(!paginator.has_next().unwrap());
}

#[test]
fn test_run_of_equal_parameters_longer_than_ceiling() {
    let source = items(&[
        (1, "A"),
        (2, "B"),
        (2, "C"),
        (2, "D"),
        (2, "E"),
        (2, "F"),
        (2, "G"),
        (3, "H"),
    ]);
    let mut paginator = Paginator::with_max_limit(source, 3, 4).unwrap();

    let mut labels: Vec<_> = paginator.by_ref().map(|item| item.unwrap().1).collect();
    assert_eq!(labels.first(), Some(&"H"));
    assert_eq!(labels.last(), Some(&"A"));

    labels.sort_unstable();
    assert_eq!(labels, vec!["A", "B", "C", "D", "E", "F", "G", "H"]);
    assert!(paginator.stats().largest_request <= 4);
    assert_eq!(paginator.state(), PaginatorState::Exhausted);
}

#[test]
fn test_empty_source() {
    let mut paginator = Paginator::new(items(&[]), 3).unwrap();

    assert!(!paginator.has_next().unwrap());
    assert!(matches!(paginator.next_item(), Err(PageError::Exhausted)));
    assert!(paginator.next().is_none());
    assert_eq!(paginator.stats().fetches, 1);
}

// ============================================================================
// Properties
// ============================================================================

/// Runs of equal parameters of every length up to 7
fn runs() -> Vec<(u32, usize)> {
    let mut entries = Vec::new();
    let mut label = 0;
    for parameter in 1..=7u32 {
        for _ in 0..parameter {
            entries.push((parameter * 10, label));
            label += 1;
        }
    }
    entries
}

fn run_source(direction: SortDirection) -> MemorySource<(u32, usize), fn(&(u32, usize)) -> u32> {
    let key: fn(&(u32, usize)) -> u32 = |item| item.0;
    let mut source = MemorySource::with_direction(key, direction);
    source.extend(runs());
    source
}

#[test_case(1, None ; "base 1 unbounded")]
#[test_case(1, Some(1) ; "base 1 capped at 1")]
#[test_case(2, Some(2) ; "base 2 capped at 2")]
#[test_case(2, Some(5) ; "base 2 capped at 5")]
#[test_case(3, Some(4) ; "base 3 capped at 4")]
#[test_case(5, None ; "base 5 unbounded")]
#[test_case(20, None ; "base larger than source")]
fn test_every_item_yielded_exactly_once(base_limit: usize, max_limit: Option<usize>) {
    let mut config = PaginatorConfig::new(base_limit);
    config.max_limit = max_limit;
    let mut paginator =
        Paginator::from_config(run_source(SortDirection::Descending), &config).unwrap();

    let yielded: Vec<_> = paginator.by_ref().map(Result::unwrap).collect();
    let distinct: HashSet<_> = yielded.iter().map(|item| item.1).collect();

    assert_eq!(yielded.len(), runs().len());
    assert_eq!(distinct.len(), runs().len());
    if let Some(max_limit) = max_limit {
        assert!(paginator.stats().largest_request <= max_limit);
    }
}

#[test_case(SortDirection::Descending, ParameterOrder::Descending ; "descending")]
#[test_case(SortDirection::Ascending, ParameterOrder::Ascending ; "ascending")]
fn test_parameters_never_go_backwards(direction: SortDirection, expected: ParameterOrder) {
    let mut paginator = Paginator::with_max_limit(run_source(direction), 2, 4).unwrap();

    let parameters: Vec<u32> = paginator.by_ref().map(|item| item.unwrap().0).collect();

    assert_eq!(parameters.len(), runs().len());
    assert!(parameters.windows(2).all(|pair| match direction {
        SortDirection::Descending => pair[0] >= pair[1],
        SortDirection::Ascending => pair[0] <= pair[1],
    }));
    assert_eq!(paginator.order(), expected);
}

#[test]
fn test_exhausted_session_stays_exhausted() {
    let mut paginator = Paginator::new(items(&[(1, "A")]), 3).unwrap();

    assert_eq!(paginator.next_item().unwrap().1, "A");
    for _ in 0..3 {
        assert!(!paginator.has_next().unwrap());
    }
    let fetches = paginator.stats().fetches;
    assert!(paginator.next().is_none());
    assert_eq!(paginator.stats().fetches, fetches);
}

#[test]
fn test_paginator_over_borrowed_source() {
    let source = items(&[(1, "A"), (2, "B")]);
    let first: Vec<_> = Paginator::new(&source, 1)
        .unwrap()
        .map(|item| item.unwrap().1)
        .collect();
    let second: Vec<_> = Paginator::new(&source, 5)
        .unwrap()
        .map(|item| item.unwrap().1)
        .collect();

    assert_eq!(first, vec!["B", "A"]);
    assert_eq!(first, second);
}

// ============================================================================
// Other parameter types
// ============================================================================

#[test]
fn test_timestamp_parameters() {
    type Event = (DateTime<Utc>, u32);

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let key: fn(&Event) -> DateTime<Utc> = |event| event.0;
    let source = MemorySource::from_items(
        key,
        (0..10u32).map(|id| (start + Duration::hours(i64::from(id / 3)), id)),
    );

    let mut paginator = Paginator::new(source, 2).unwrap();
    let mut ids: Vec<u32> = paginator.by_ref().map(|event| event.unwrap().1).collect();

    assert_eq!(ids[0], 9);
    ids.sort_unstable();
    assert_eq!(ids, (0..10).collect::<Vec<_>>());
    assert_eq!(paginator.cursor(), Some(&start));
}

#[test]
fn test_record_source_pages_json_records() {
    let values = vec![
        json!({"id": 1, "meta": {"at": "2024-03-01T00:00:00Z"}}),
        json!({"id": 2, "meta": {"at": "2024-03-02T00:00:00Z"}}),
        json!({"id": 3, "meta": {"at": "2024-03-02T00:00:00Z"}}),
        json!({"id": 4, "meta": {"at": "2024-03-03T00:00:00Z"}}),
    ];
    let source = RecordSource::from_values(
        values,
        "$.meta.at",
        ParamKind::Timestamp,
        SortDirection::Ascending,
    )
    .unwrap();

    let ids: Vec<_> = Paginator::new(source, 1)
        .unwrap()
        .map(|record| record.unwrap().value["id"].clone())
        .collect();

    assert_eq!(ids, vec![json!(1), json!(2), json!(3), json!(4)]);
}

// ============================================================================
// Failures
// ============================================================================

/// Fails the calls whose index is listed, succeeding otherwise
struct Flaky {
    inner: ItemSource,
    calls: Cell<usize>,
    fail_on: Vec<usize>,
}

#[derive(Debug, thiserror::Error)]
#[error("backend timed out on call {0}")]
struct Timeout(usize);

impl Source for Flaky {
    type Item = Item;
    type Param = u32;
    type Error = Timeout;

    fn fetch(&self, parameter: Option<&u32>, limit: usize) -> Result<Vec<Item>, Timeout> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        if self.fail_on.contains(&call) {
            return Err(Timeout(call));
        }
        Ok(Source::fetch(&self.inner, parameter, limit).unwrap())
    }

    fn parameter_of(&self, item: &Item) -> u32 {
        item.0
    }
}

#[test]
fn test_failed_fetch_can_be_retried() {
    let source = Flaky {
        inner: items(&[(1, "A"), (2, "B"), (2, "C"), (3, "D"), (4, "E")]),
        calls: Cell::new(0),
        fail_on: vec![1, 2],
    };
    let mut paginator = Paginator::new(source, 3).unwrap();

    let mut labels = Vec::new();
    let mut failures = 0;
    while let Some(item) = paginator.next() {
        match item {
            Ok(item) => labels.push(item.1),
            Err(PageError::Fetch(Timeout(_))) => failures += 1,
            Err(PageError::Exhausted) => unreachable!(),
        }
    }

    assert_eq!(failures, 2);
    assert_eq!(labels, vec!["E", "D", "B", "C", "A"]);
}

#[test]
fn test_fetch_error_converts_into_crate_error() {
    fn first_label(paginator: &mut Paginator<Flaky>) -> adaptive_pager::Result<&'static str> {
        Ok(paginator.next_item()?.1)
    }

    let source = Flaky {
        inner: items(&[(1, "A")]),
        calls: Cell::new(0),
        fail_on: vec![0],
    };
    let mut paginator = Paginator::new(source, 3).unwrap();

    let err = first_label(&mut paginator).unwrap_err();
    assert!(matches!(err, Error::Pagination { .. }));
    assert!(err.to_string().contains("backend timed out on call 0"));
    assert_eq!(first_label(&mut paginator).unwrap(), "A");
}

// ============================================================================
// Async
// ============================================================================

#[tokio::test]
async fn test_async_stream_matches_blocking_iterator() {
    let entries = [
        (1, "A"),
        (2, "B"),
        (2, "C"),
        (2, "D"),
        (2, "E"),
        (2, "F"),
        (2, "G"),
        (3, "H"),
    ];
    let blocking = drain_labels(Paginator::with_max_limit(items(&entries), 3, 4).unwrap());

    let streamed: Vec<Item> = AsyncPaginator::with_max_limit(items(&entries), 3, 4)
        .unwrap()
        .into_stream()
        .try_collect()
        .await
        .unwrap();
    let streamed: Vec<_> = streamed.into_iter().map(|item| item.1).collect();

    assert_eq!(streamed, blocking);
}

#[tokio::test]
async fn test_async_empty_source() {
    let mut paginator = AsyncPaginator::new(items(&[]), 3).unwrap();

    assert!(!paginator.has_next().await.unwrap());
    assert!(matches!(
        paginator.next_item().await,
        Err(PageError::Exhausted)
    ));
}
