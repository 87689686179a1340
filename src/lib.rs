#![forbid(unsafe_code)]

//! Client console for a context-aware EHR access decision service.
//!
//! The requester perspective builds access requests and shows the policy
//! service's decision, failing closed on any communication problem. The
//! subject perspective shows the record's access history.

pub mod audit;
pub mod config;
pub mod console;
pub mod decision;
pub mod errors;
pub mod models;
pub mod render;
pub mod request;
pub mod service;
pub mod view;

pub use config::ConsoleConfig;
pub use errors::{AppError, Result};
