//! # Recency Selector
//!
//! Picks the "current" event from an event set.
//!
//! ## Ordering
//!
//! Events are ranked by normalized start instant, **most recent first**.
//! An event whose instant is undetermined ranks after every determined
//! event, so it is only selected when no event in the set has a usable
//! date. Among equal ranks the event that appears first in the supplied
//! order wins.
//!
//! ```text
//! [2024-01-01, 2024-03-01, ???, 2024-03-01]  →  index 1
//! [???, ???]                                  →  index 0
//! []                                          →  none
//! ```

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use peach_core::Timed;

use crate::normalize::normalize_event;

/// An event chosen from a set, with its position and normalized instant.
#[derive(Debug)]
pub struct Selected<'a, T> {
    /// Position in the supplied set.
    pub index: usize,
    /// The chosen event record.
    pub item: &'a T,
    /// Normalized start instant, `None` if undetermined.
    pub instant: Option<DateTime<Utc>>,
}

/// Compare two normalized instants in recency order.
///
/// Returns `Less` when `a` should come before `b`: later instants first,
/// undetermined instants last.
pub fn compare_recency(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Select the most recent event of `items`.
///
/// Returns `None` only for an empty slice.
pub fn select_most_recent<T: Timed>(items: &[T]) -> Option<Selected<'_, T>> {
    // `min_by` keeps the first of equal elements, which gives the stable tie-break.
    items
        .iter()
        .enumerate()
        .map(|(index, item)| Selected {
            index,
            item,
            instant: normalize_event(item.event()),
        })
        .min_by(|a, b| compare_recency(a.instant, b.instant))
}
