//! Pure decision logic: no I/O, no terminal.
//!
//! - `recommend` - service decision tree
//! - `endpoints` - example URL construction
//! - `conversion` - format-conversion advice

pub mod conversion;
pub mod endpoints;
pub mod recommend;

pub use conversion::ConversionAdvice;
pub use endpoints::EndpointExample;
pub use recommend::{recommend, recommend_from_report, Recommendation};
