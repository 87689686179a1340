//! Requester-side form state and access request assembly.

pub mod builder;

pub use builder::{classify_location, RequestBuilder};
