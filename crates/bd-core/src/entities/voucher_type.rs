use serde::{Deserialize, Serialize};

use crate::entity::ListEntity;
use crate::ids::RecordId;

/// Voucher type (payment, receipt, journal, ...) with its numbering scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherType {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub next_number: Option<u64>,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoucherTypeStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub system: u64,
}

impl ListEntity for VoucherType {
    const RESOURCE: &'static str = "voucher-types";
    type Stats = VoucherTypeStats;

    fn record_id(&self) -> RecordId {
        self.id.clone()
    }
}
