//! Probe steps over an untyped response body.
//!
//! Every step returns `Option`; the pipelines in the normalizer stop at the
//! first step that yields something.

use serde_json::{Map, Value};

use crate::pagination::PaginationHints;

/// Pagination fields whose presence marks an object as pagination-bearing.
const PAGINATION_FIELDS: [&str; 6] = ["current_page", "last_page", "total", "per_page", "from", "to"];

/// Fields that let the items container double as the pagination object.
const CONTAINER_PAGINATION_FIELDS: [&str; 3] = ["current_page", "last_page", "total"];

/// Where the items array was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsLocation {
    /// `body.records.data`
    RecordsData,
    /// `body.records`
    Records,
    /// `body.data`
    Data,
    /// `body.payload.data`
    PayloadData,
    /// `body` itself
    Body,
}

/// Where the pagination facts were read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationSource {
    /// The object holding the items array
    ItemsContainer,
    /// `body.pagination`
    Pagination,
    /// `body.meta`
    Meta,
    /// `body.data.pagination`
    DataPagination,
    /// `body.data.meta`
    DataMeta,
    /// `body.data`
    Data,
    /// `body` itself
    Body,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ItemsProbe<'a> {
    pub location: ItemsLocation,
    pub items: &'a [Value],
    pub container: Option<&'a Map<String, Value>>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PaginationProbe<'a> {
    pub source: PaginationSource,
    pub object: &'a Map<String, Value>,
}

/// The outer response and the unwrapped body.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Envelope<'a> {
    pub raw: &'a Value,
    pub body: &'a Value,
}

impl<'a> Envelope<'a> {
    /// `raw.data` is the body when it is an object; otherwise `raw` is.
    pub fn open(raw: &'a Value) -> Self {
        let body = match raw.get("data") {
            Some(inner @ Value::Object(_)) => inner,
            _ => raw,
        };
        Self { raw, body }
    }

    pub fn locate_items(&self) -> Option<ItemsProbe<'a>> {
        let body = self.body;
        let steps: [for<'b> fn(&'b Value) -> Option<ItemsProbe<'b>>; 5] = [
            records_data,
            records,
            data,
            payload_data,
            bare_array,
        ];
        steps.iter().find_map(|step| step(body))
    }

    pub fn locate_pagination(&self, items: Option<&ItemsProbe<'a>>) -> Option<PaginationProbe<'a>> {
        if let Some(container) = items.and_then(|probe| probe.container) {
            if has_any(container, &CONTAINER_PAGINATION_FIELDS) {
                return Some(PaginationProbe {
                    source: PaginationSource::ItemsContainer,
                    object: container,
                });
            }
        }

        let body = self.body;
        let data = body.get("data");
        let candidates = [
            (PaginationSource::Pagination, body.get("pagination")),
            (PaginationSource::Meta, body.get("meta")),
            (PaginationSource::DataPagination, data.and_then(|d| d.get("pagination"))),
            (PaginationSource::DataMeta, data.and_then(|d| d.get("meta"))),
            (PaginationSource::Data, data),
            (PaginationSource::Body, Some(body)),
        ];

        candidates.into_iter().find_map(|(source, candidate)| {
            candidate
                .and_then(Value::as_object)
                .filter(|object| has_any(object, &PAGINATION_FIELDS))
                .map(|object| PaginationProbe { source, object })
        })
    }

    /// `total` outside of any pagination object.
    pub fn top_level_total(&self) -> Option<u64> {
        self.body
            .get("total")
            .and_then(as_count)
            .or_else(|| self.raw.get("total").and_then(as_count))
    }

    pub fn locate_stats(&self) -> Option<&'a Value> {
        let candidates = [
            self.body.get("stats"),
            self.body.get("data").and_then(|d| d.get("stats")),
            self.raw.get("stats"),
        ];
        candidates
            .into_iter()
            .flatten()
            .find(|candidate| candidate.is_object())
    }
}

impl PaginationProbe<'_> {
    pub fn hints(&self) -> PaginationHints {
        let field = |name: &str| self.object.get(name).and_then(as_count);
        PaginationHints {
            total: field("total"),
            per_page: field("per_page"),
            current_page: field("current_page"),
            last_page: field("last_page"),
            from: field("from"),
            to: field("to"),
        }
    }
}

fn records_data(body: &Value) -> Option<ItemsProbe<'_>> {
    let records = body.get("records")?.as_object()?;
    let items = records.get("data")?.as_array()?;
    Some(ItemsProbe {
        location: ItemsLocation::RecordsData,
        items,
        container: Some(records),
    })
}

fn records(body: &Value) -> Option<ItemsProbe<'_>> {
    let items = body.get("records")?.as_array()?;
    Some(ItemsProbe {
        location: ItemsLocation::Records,
        items,
        container: body.as_object(),
    })
}

fn data(body: &Value) -> Option<ItemsProbe<'_>> {
    let items = body.get("data")?.as_array()?;
    Some(ItemsProbe {
        location: ItemsLocation::Data,
        items,
        container: body.as_object(),
    })
}

fn payload_data(body: &Value) -> Option<ItemsProbe<'_>> {
    let payload = body.get("payload")?.as_object()?;
    let items = payload.get("data")?.as_array()?;
    Some(ItemsProbe {
        location: ItemsLocation::PayloadData,
        items,
        container: Some(payload),
    })
}

fn bare_array(body: &Value) -> Option<ItemsProbe<'_>> {
    let items = body.as_array()?;
    Some(ItemsProbe {
        location: ItemsLocation::Body,
        items,
        container: None,
    })
}

fn has_any(object: &Map<String, Value>, fields: &[&str]) -> bool {
    fields
        .iter()
        .any(|field| object.get(*field).is_some_and(|v| !v.is_null()))
}

/// Non-negative integer from a JSON number or numeric string.
pub(crate) fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items_location(raw: &Value) -> Option<ItemsLocation> {
        Envelope::open(raw).locate_items().map(|p| p.location)
    }

    #[test]
    fn opens_object_data_as_body() {
        let raw = json!({ "success": true, "data": { "records": [] } });
        let envelope = Envelope::open(&raw);
        assert!(envelope.body.get("records").is_some());

        let raw = json!({ "data": [1, 2] });
        let envelope = Envelope::open(&raw);
        assert!(std::ptr::eq(envelope.body, &raw));
    }

    #[test]
    fn items_probe_priority() {
        assert_eq!(
            items_location(&json!({ "records": { "data": [] }, "data": [1] })),
            Some(ItemsLocation::RecordsData)
        );
        assert_eq!(
            items_location(&json!({ "records": [1], "data": [2] })),
            Some(ItemsLocation::Records)
        );
        assert_eq!(items_location(&json!({ "data": [1] })), Some(ItemsLocation::Data));
        assert_eq!(
            items_location(&json!({ "payload": { "data": [1] } })),
            Some(ItemsLocation::PayloadData)
        );
        assert_eq!(items_location(&json!([1, 2, 3])), Some(ItemsLocation::Body));
        assert_eq!(items_location(&json!({ "message": "ok" })), None);
    }

    #[test]
    fn records_object_without_data_array_falls_through() {
        // `records` is an object but not a paginator; `data` is a sibling array
        let raw = json!({ "records": { "count": 2 }, "data": [1, 2] });
        assert_eq!(items_location(&raw), Some(ItemsLocation::Data));
    }

    #[test]
    fn pagination_prefers_items_container() {
        let raw = json!({
            "records": { "data": [], "current_page": 2 },
            "meta": { "current_page": 9 }
        });
        let envelope = Envelope::open(&raw);
        let items = envelope.locate_items();
        let probe = envelope.locate_pagination(items.as_ref()).unwrap();
        assert_eq!(probe.source, PaginationSource::ItemsContainer);
        assert_eq!(probe.hints().current_page, Some(2));
    }

    #[test]
    fn pagination_falls_back_through_meta() {
        let raw = json!({ "data": [1], "links": {}, "meta": { "total": "30", "per_page": 10 } });
        let envelope = Envelope::open(&raw);
        let items = envelope.locate_items();
        let probe = envelope.locate_pagination(items.as_ref()).unwrap();
        assert_eq!(probe.source, PaginationSource::Meta);
        assert_eq!(probe.hints().total, Some(30));
    }

    #[test]
    fn pagination_ignores_objects_without_pagination_fields() {
        let raw = json!({ "records": [], "pagination": { "links": [] } });
        let envelope = Envelope::open(&raw);
        let items = envelope.locate_items();
        assert!(envelope.locate_pagination(items.as_ref()).is_none());
    }

    #[test]
    fn pagination_on_body_without_items() {
        let raw = json!({ "data": { "total": 12, "per_page": 5 } });
        let envelope = Envelope::open(&raw);
        let probe = envelope.locate_pagination(None).unwrap();
        assert_eq!(probe.source, PaginationSource::Body);
        assert_eq!(probe.hints().per_page, Some(5));
    }

    #[test]
    fn counts_accept_numeric_strings_and_integral_floats() {
        assert_eq!(as_count(&json!(5)), Some(5));
        assert_eq!(as_count(&json!("15")), Some(15));
        assert_eq!(as_count(&json!(3.0)), Some(3));
        assert_eq!(as_count(&json!(3.5)), None);
        assert_eq!(as_count(&json!(-1)), None);
        assert_eq!(as_count(&json!(null)), None);
    }

    #[test]
    fn stats_must_be_an_object() {
        let raw = json!({ "data": { "records": [], "stats": 4 }, "stats": { "total": 4 } });
        let envelope = Envelope::open(&raw);
        let stats = envelope.locate_stats().unwrap();
        assert_eq!(stats, &json!({ "total": 4 }));
    }
}
