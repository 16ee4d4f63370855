//! ListResource request shaping and decoding, checked with a mocked transport.

use std::sync::Arc;

use async_trait::async_trait;
use bd_app::ListResource;
use bd_core::entities::{Announcement, SalaryComponent, SalaryComponentKind, VoucherType};
use bd_core::ports::{HttpMethod, TransportPort, TransportRequest};
use bd_core::{ListParams, ListQueryError, RecordId, SortDirection, TransportError};
use mockall::mock;
use serde_json::{json, Value};

mock! {
    pub Transport {}

    #[async_trait]
    impl TransportPort for Transport {
        async fn execute(&self, request: TransportRequest) -> Result<Value, TransportError>;
    }
}

#[tokio::test]
async fn test_list_sends_sanitized_query() {
    let mut transport = MockTransport::new();
    transport
        .expect_execute()
        .withf(|request| {
            request.method == HttpMethod::Get
                && request.path == "voucher-types"
                && request.query.get("search").is_none()
                && request.query.get("status") == Some("active")
                && request.query.get("sort_by") == Some("name")
                && request.query.get("sort_direction") == Some("desc")
                && request.query.get("page").is_none()
        })
        .times(1)
        .returning(|_| {
            Ok(json!({
                "current_page": 1,
                "data": [{ "id": 1, "name": "Payment", "prefix": "PV", "is_active": true }],
                "per_page": 15,
                "total": 1,
                "last_page": 1,
                "from": 1,
                "to": 1
            }))
        });

    let resource = ListResource::<VoucherType>::new(Arc::new(transport));
    let params = ListParams::new()
        .search("")
        .status("active")
        .sort("name", SortDirection::Desc)
        .unset("page");

    let page = resource.list(&params).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].prefix.as_deref(), Some("PV"));
    assert_eq!(page.pagination.per_page, 15);
    assert!(page.stats.is_none());
}

#[tokio::test]
async fn test_list_surfaces_transport_errors() {
    let mut transport = MockTransport::new();
    transport.expect_execute().returning(|_| {
        Err(TransportError::Status {
            status: 403,
            message: None,
        })
    });

    let resource = ListResource::<Announcement>::new(Arc::new(transport));
    let err = resource.list(&ListParams::new()).await.unwrap_err();

    assert!(matches!(
        err,
        ListQueryError::Transport(TransportError::Status { status: 403, .. })
    ));
}

#[tokio::test]
async fn test_toggle_status_patches_and_unwraps_record() {
    let mut transport = MockTransport::new();
    transport
        .expect_execute()
        .withf(|request| {
            request.method == HttpMethod::Patch
                && request.path == "salary-components/11/toggle-status"
                && request.body.is_none()
        })
        .times(1)
        .returning(|_| {
            Ok(json!({
                "success": true,
                "message": "Status updated",
                "data": { "id": 11, "name": "Provident Fund", "type": "deduction", "is_active": false }
            }))
        });

    let resource = ListResource::<SalaryComponent>::new(Arc::new(transport));
    let component = resource.toggle_status(&RecordId::from(11u64)).await.unwrap();

    assert_eq!(component.kind, Some(SalaryComponentKind::Deduction));
    assert!(!component.is_active);
}

#[tokio::test]
async fn test_create_and_update_send_json_bodies() {
    let mut transport = MockTransport::new();
    transport
        .expect_execute()
        .withf(|request| {
            request.method == HttpMethod::Post
                && request.path == "announcements"
                && request.body == Some(json!({ "title": "Holiday", "priority": "high" }))
        })
        .times(1)
        .returning(|_| Ok(json!({ "data": { "id": "a1", "title": "Holiday", "priority": "high" } })));
    transport
        .expect_execute()
        .withf(|request| request.method == HttpMethod::Put && request.path == "announcements/a1")
        .times(1)
        .returning(|_| Ok(json!({ "id": "a1", "title": "Holiday (moved)" })));

    let resource = ListResource::<Announcement>::new(Arc::new(transport));

    let created = resource
        .create(&json!({ "title": "Holiday", "priority": "high" }))
        .await
        .unwrap();
    assert_eq!(created.id.as_str(), "a1");

    let updated = resource
        .update(&created.id, &json!({ "title": "Holiday (moved)" }))
        .await
        .unwrap();
    assert_eq!(updated.title, "Holiday (moved)");
}

#[tokio::test]
async fn test_show_reports_undecodable_record() {
    let mut transport = MockTransport::new();
    transport
        .expect_execute()
        .withf(|request| request.method == HttpMethod::Get && request.path == "voucher-types/5")
        .returning(|_| Ok(json!({ "data": { "id": 5 } })));

    let resource = ListResource::<VoucherType>::new(Arc::new(transport));
    let err = resource.show(&RecordId::from(5u64)).await.unwrap_err();

    assert!(matches!(err, ListQueryError::Decode { .. }));
}

#[test]
fn test_cache_keys_ignore_empty_filters() {
    let resource = ListResource::<VoucherType>::new(Arc::new(MockTransport::new()));
    let a = resource.cache_key(&ListParams::new().search("").page(1));
    let b = resource.cache_key(&ListParams::new().page(1));

    assert_eq!(a, b);
    assert!(a.starts_with(&resource.namespace_key()));
}
