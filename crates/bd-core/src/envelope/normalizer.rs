use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::probe::Envelope;
use super::statistics::Statistics;
use crate::error::ListQueryError;
use crate::pagination::{PaginationHints, PaginationInfo};
use crate::params::ListParams;

/// Canonical list result: items, pagination and optional statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPage<T, S = Statistics> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
    pub stats: Option<S>,
}

impl<T, S> NormalizedPage<T, S> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            pagination: PaginationInfo::single_page(0),
            stats: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Page coordinates the caller asked for, used when the response omits them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestedPage {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl From<&ListParams> for RequestedPage {
    fn from(params: &ListParams) -> Self {
        Self {
            page: params.requested_page(),
            per_page: params.requested_per_page(),
        }
    }
}

/// Normalize a raw list response.
///
/// A response without any recognizable items array is an empty result, not
/// an error: several "no data yet" endpoints omit the array entirely. Callers
/// tell "no data" from "request failed" by the transport outcome.
///
/// # Errors
///
/// `Decode` when items or statistics do not deserialize into `T` / `S`.
pub fn normalize<T, S>(raw: &Value, requested: RequestedPage) -> Result<NormalizedPage<T, S>, ListQueryError>
where
    T: DeserializeOwned,
    S: DeserializeOwned,
{
    let envelope = Envelope::open(raw);
    let items_probe = envelope.locate_items();
    let pagination_probe = envelope.locate_pagination(items_probe.as_ref());

    #[cfg(feature = "tracing")]
    tracing::debug!(
        items = ?items_probe.map(|p| p.location),
        pagination = ?pagination_probe.map(|p| p.source),
        "Probed list response envelope"
    );

    let raw_items = items_probe.map(|p| p.items).unwrap_or_default();
    let items = raw_items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::deserialize(item).map_err(|e| ListQueryError::decode(format!("item #{index}"), e))
        })
        .collect::<Result<Vec<T>, _>>()?;

    let mut hints = pagination_probe
        .map(|p| p.hints())
        .unwrap_or_else(PaginationHints::default);
    if hints.total.is_none() {
        hints.total = envelope.top_level_total();
    }
    if hints.per_page.filter(|p| *p > 0).is_none() {
        hints.per_page = requested.per_page;
    }
    if hints.current_page.filter(|p| *p > 0).is_none() {
        hints.current_page = requested.page;
    }

    let pagination = PaginationInfo::derive(hints, items.len());

    let stats = envelope
        .locate_stats()
        .map(|value| S::deserialize(value).map_err(|e| ListQueryError::decode("stats", e)))
        .transpose()?;

    Ok(NormalizedPage {
        items,
        pagination,
        stats,
    })
}
