//! Response envelope normalization
//! 响应信封规范化
//!
//! Backends wrap list results in different envelopes (plain Laravel-style
//! paginators, hand-rolled `{ success, data: { records, stats } }` shapes,
//! bare arrays). This module presents one shape to the rest of the system
//! without fabricating statistics the server never computed.

mod normalizer;
mod probe;
mod record;
mod statistics;

pub use normalizer::{normalize, NormalizedPage, RequestedPage};
pub use probe::{ItemsLocation, PaginationSource};
pub use record::extract_record;
pub use statistics::Statistics;
