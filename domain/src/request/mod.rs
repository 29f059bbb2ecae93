//! Request value objects sent to every provider in a profile.

pub mod batch;
pub mod call_request;
pub mod schema;

pub use call_request::CallRequest;
pub use schema::{FieldType, OutputSchema, SchemaField, SchemaViolation};
