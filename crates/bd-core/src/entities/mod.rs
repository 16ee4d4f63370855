//! Record DTOs for the shipped list resources
//! 内置列表资源的记录 DTO
//!
//! Fields mirror the backend payloads. Anything the backend may omit is
//! `Option` or `#[serde(default)]` so a partial record still decodes.

mod account_group;
mod announcement;
mod salary_component;
mod voucher_type;

pub use account_group::{AccountGroup, AccountGroupStats, AccountNature};
pub use announcement::{Announcement, AnnouncementPriority, AnnouncementStats};
pub use salary_component::{SalaryComponent, SalaryComponentKind, SalaryComponentStats};
pub use voucher_type::{VoucherType, VoucherTypeStats};
