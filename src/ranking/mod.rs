//! Partition-then-sort replacement for `ROW_NUMBER() OVER (PARTITION BY ..
//! ORDER BY ..)`: tie-break order is an explicit contract here, not a query
//! engine behavior.

use chrono::NaiveDate;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{AnalysisError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A value extracted for ordering. An extractor should return the same
/// variant for every row; mixed variants fall back to a fixed variant order
/// so the sort stays total and deterministic either way.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl SortValue {
    fn variant_rank(&self) -> u8 {
        match self {
            SortValue::Int(_) => 0,
            SortValue::Float(_) => 1,
            SortValue::Text(_) => 2,
            SortValue::Date(_) => 3,
        }
    }

    pub fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Int(a), SortValue::Int(b)) => a.cmp(b),
            (SortValue::Float(a), SortValue::Float(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            _ => self.variant_rank().cmp(&other.variant_rank()),
        }
    }
}

/// One component of a composite comparator: an extractor plus a direction.
pub struct SortKey<R> {
    extract: Box<dyn Fn(&R) -> SortValue + Send + Sync>,
    direction: Direction,
}

impl<R> SortKey<R> {
    pub fn asc(extract: impl Fn(&R) -> SortValue + Send + Sync + 'static) -> Self {
        Self {
            extract: Box::new(extract),
            direction: Direction::Ascending,
        }
    }

    pub fn desc(extract: impl Fn(&R) -> SortValue + Send + Sync + 'static) -> Self {
        Self {
            extract: Box::new(extract),
            direction: Direction::Descending,
        }
    }

    fn compare(&self, a: &R, b: &R) -> Ordering {
        let ord = (self.extract)(a).compare(&(self.extract)(b));
        match self.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

/// Lexicographic evaluation: the first key breaks as many ties as it can,
/// later keys break what remains.
fn compare_rows<R>(comparator: &[SortKey<R>], a: &R, b: &R) -> Ordering {
    for key in comparator {
        match key.compare(a, b) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}

/// Partition rows, sort each partition by the composite comparator, keep
/// the first `top_k` of each, and concatenate in partition-key order.
///
/// The sort is stable, so rows equal under every comparator key keep their
/// input order; that insertion order is the documented final tie-break. A
/// partition with fewer than `top_k` members returns all of them.
/// Partitions are independent and are sorted in parallel.
pub fn rank_within_partitions<R, K, F>(
    rows: Vec<R>,
    partition_key: F,
    comparator: &[SortKey<R>],
    top_k: usize,
) -> Result<Vec<R>>
where
    R: Send,
    K: Ord + Send,
    F: Fn(&R) -> K,
{
    if comparator.is_empty() {
        return Err(AnalysisError::Config(
            "ranking requires at least one sort key".to_string(),
        ));
    }
    if top_k == 0 {
        return Err(AnalysisError::Config(
            "top_k must be at least 1".to_string(),
        ));
    }

    let mut partitions: BTreeMap<K, Vec<R>> = BTreeMap::new();
    for row in rows {
        let key = partition_key(&row);
        partitions.entry(key).or_default().push(row);
    }

    let mut ordered: Vec<(K, Vec<R>)> = partitions.into_iter().collect();
    ordered
        .par_iter_mut()
        .for_each(|(_, members)| members.sort_by(|a, b| compare_rows(comparator, a, b)));

    Ok(ordered
        .into_iter()
        .flat_map(|(_, mut members)| {
            members.truncate(top_k);
            members
        })
        .collect())
}

/// Global top-N: a single partition over all rows.
pub fn rank_global<R: Send>(
    rows: Vec<R>,
    comparator: &[SortKey<R>],
    top_k: usize,
) -> Result<Vec<R>> {
    rank_within_partitions(rows, |_| 0u8, comparator, top_k)
}
