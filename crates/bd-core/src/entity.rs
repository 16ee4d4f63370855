//! Entity contract for list resources.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::ids::RecordId;

/// A record type served by a list endpoint.
///
/// The list-query layer treats records as opaque payloads; only the id is
/// read, to find an item when patching a displayed page.
pub trait ListEntity: DeserializeOwned + Serialize + Clone + Debug + Send + Sync + 'static {
    /// Resource path relative to the API base URL, also used as cache namespace.
    const RESOURCE: &'static str;

    /// Statistics block returned next to the list, if the endpoint sends one.
    type Stats: DeserializeOwned + Serialize + Clone + Debug + Send + Sync + 'static;

    fn record_id(&self) -> RecordId;
}
