//! Per-screen list orchestration

mod list_controller;
mod view;

pub use list_controller::ListController;
pub use view::ListView;
