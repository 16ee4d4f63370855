use serde::{Deserialize, Serialize};

use crate::entity::ListEntity;
use crate::ids::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalaryComponentKind {
    Earning,
    Deduction,
}

/// Payroll component (basic, allowance, tax, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryComponent {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<SalaryComponentKind>,
    #[serde(default)]
    pub is_taxable: bool,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryComponentStats {
    pub total: u64,
    pub earnings: u64,
    pub deductions: u64,
    pub active: u64,
}

impl ListEntity for SalaryComponent {
    const RESOURCE: &'static str = "salary-components";
    type Stats = SalaryComponentStats;

    fn record_id(&self) -> RecordId {
        self.id.clone()
    }
}
