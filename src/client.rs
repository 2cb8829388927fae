//! Request executor.
//!
//! Implementation details are split into submodules under `src/client/`.

pub mod core;
pub mod error_classification;
pub mod request;
pub mod signals;

pub use self::core::{HttpClient, HEADER_ACCESS_TOKEN, HEADER_FORWARDED_FOR, HEADER_REQUEST_ID};
pub use request::{HttpMethod, OutboundRequest, QueryParams};
pub use signals::{ConnectionSnapshot, SignalsSnapshot};
