//! Filter / sort / pagination parameters and their sanitizer.
//! 过滤、排序、分页参数及其清洗器。

mod list_params;
mod sanitizer;

pub use list_params::{keys, ListParams, ParamValue, SortDirection};
pub use sanitizer::{sanitize, sanitize_json, SanitizedParams};
