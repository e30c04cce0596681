//! HTTP Response domain types

mod api;
mod spec;

pub use api::{ApiResponse, FailureKind};
pub use spec::ResponseSpec;
