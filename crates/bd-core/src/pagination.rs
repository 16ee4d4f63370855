//! Canonical pagination model.
//! 统一的分页模型。

use serde::{Deserialize, Serialize};

/// Page metadata every list screen renders, whatever the backend sent.
///
/// Invariants:
/// - `last_page >= 1`
/// - `from == 0 && to == 0` when nothing is displayed
/// - otherwise `to - from + 1` equals the number of returned items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
    pub from: u64,
    pub to: u64,
}

/// Raw pagination facts gathered from a response, before derivation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationHints {
    pub total: Option<u64>,
    pub per_page: Option<u64>,
    pub current_page: Option<u64>,
    pub last_page: Option<u64>,
    pub from: Option<u64>,
    pub to: Option<u64>,
}

impl PaginationInfo {
    /// Fill in whatever `hints` leave out.
    ///
    /// `item_count` is the number of items actually returned for this page and
    /// always bounds the `from..=to` range.
    pub fn derive(hints: PaginationHints, item_count: usize) -> Self {
        let count = item_count as u64;
        let total = hints.total.unwrap_or(count);
        let per_page = hints.per_page.filter(|p| *p > 0).unwrap_or(count.max(1));
        let current_page = hints.current_page.filter(|p| *p > 0).unwrap_or(1);
        let last_page = hints
            .last_page
            .unwrap_or_else(|| total.div_ceil(per_page))
            .max(1);

        let (from, to) = if total == 0 || count == 0 {
            (0, 0)
        } else {
            // Page numbers come from the backend and may be arbitrarily large
            let span = count - 1;
            match (hints.from, hints.to) {
                (Some(from), Some(to)) if from > 0 && to >= from => {
                    (from, to.min(from.saturating_add(span)))
                }
                _ => {
                    let from = (current_page - 1)
                        .saturating_mul(per_page)
                        .saturating_add(1);
                    (from, total.min(from.saturating_add(span)).max(from))
                }
            }
        };

        Self {
            current_page,
            per_page,
            total,
            last_page,
            from,
            to,
        }
    }

    /// Pagination for a page holding exactly `items` with nothing else known.
    pub fn single_page(item_count: usize) -> Self {
        Self::derive(PaginationHints::default(), item_count)
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.last_page
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
