use std::marker::PhantomData;
use std::sync::Arc;

use bd_core::ports::{HttpMethod, TransportPort, TransportRequest};
use bd_core::{
    extract_record, normalize, sanitize, CacheKey, ListEntity, ListParams, ListQueryError,
    NormalizedPage, RecordId, RequestedPage,
};
use serde::Serialize;
use tracing::debug;

/// One normalized page of `E`.
pub type ListPage<E> = NormalizedPage<E, <E as ListEntity>::Stats>;

/// Typed wrapper over one backend resource.
/// 单个后端资源的类型化封装。
///
/// Composes sanitizing, the transport call and response normalization. The
/// resource path comes from [`ListEntity::RESOURCE`].
pub struct ListResource<E: ListEntity> {
    transport: Arc<dyn TransportPort>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: ListEntity> ListResource<E> {
    pub fn new(transport: Arc<dyn TransportPort>) -> Self {
        Self {
            transport,
            _entity: PhantomData,
        }
    }

    pub fn namespace(&self) -> &'static str {
        E::RESOURCE
    }

    /// Cache key of `list(params)`.
    pub fn cache_key(&self, params: &ListParams) -> CacheKey {
        CacheKey::for_list(E::RESOURCE, &sanitize(params))
    }

    /// Prefix covering every cached page and record of this resource.
    pub fn namespace_key(&self) -> CacheKey {
        CacheKey::namespace(E::RESOURCE)
    }

    /// Fetch one page.
    ///
    /// # Errors
    ///
    /// Transport failures, or `Decode` when items/stats do not match `E`.
    pub async fn list(&self, params: &ListParams) -> Result<ListPage<E>, ListQueryError> {
        let query = sanitize(params);
        debug!(resource = E::RESOURCE, params = %query.cache_fragment(), "Listing records");
        let raw = self
            .transport
            .execute(TransportRequest::get(E::RESOURCE).with_query(query))
            .await?;
        normalize(&raw, RequestedPage::from(params))
    }

    pub async fn show(&self, id: &RecordId) -> Result<E, ListQueryError> {
        let raw = self
            .transport
            .execute(TransportRequest::get(record_path::<E>(id)))
            .await?;
        extract_record(&raw)
    }

    pub async fn create<B>(&self, body: &B) -> Result<E, ListQueryError>
    where
        B: Serialize + ?Sized,
    {
        let request = TransportRequest::new(HttpMethod::Post, E::RESOURCE).with_body(encode_body(body)?);
        let raw = self.transport.execute(request).await?;
        extract_record(&raw)
    }

    pub async fn update<B>(&self, id: &RecordId, body: &B) -> Result<E, ListQueryError>
    where
        B: Serialize + ?Sized,
    {
        let request =
            TransportRequest::new(HttpMethod::Put, record_path::<E>(id)).with_body(encode_body(body)?);
        let raw = self.transport.execute(request).await?;
        extract_record(&raw)
    }

    pub async fn delete(&self, id: &RecordId) -> Result<(), ListQueryError> {
        self.transport
            .execute(TransportRequest::new(HttpMethod::Delete, record_path::<E>(id)))
            .await?;
        Ok(())
    }

    /// Flip the active flag; the backend answers with the updated record.
    pub async fn toggle_status(&self, id: &RecordId) -> Result<E, ListQueryError> {
        let path = format!("{}/toggle-status", record_path::<E>(id));
        let raw = self
            .transport
            .execute(TransportRequest::new(HttpMethod::Patch, path))
            .await?;
        extract_record(&raw)
    }
}

fn record_path<E: ListEntity>(id: &RecordId) -> String {
    format!("{}/{}", E::RESOURCE, id)
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, ListQueryError> {
    serde_json::to_value(body).map_err(|e| ListQueryError::Decode {
        what: "request body".to_string(),
        reason: e.to_string(),
    })
}
