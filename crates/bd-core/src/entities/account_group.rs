use serde::{Deserialize, Serialize};

use crate::entity::ListEntity;
use crate::ids::RecordId;

/// Accounting nature of a ledger group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountNature {
    Assets,
    Liabilities,
    Income,
    Expenses,
    Equity,
}

/// Chart-of-accounts group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountGroup {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub nature: Option<AccountNature>,
    #[serde(default)]
    pub parent_id: Option<RecordId>,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountGroupStats {
    pub total: u64,
    pub active: u64,
    pub system: u64,
    pub custom: u64,
}

impl ListEntity for AccountGroup {
    const RESOURCE: &'static str = "account-groups";
    type Stats = AccountGroupStats;

    fn record_id(&self) -> RecordId {
        self.id.clone()
    }
}
