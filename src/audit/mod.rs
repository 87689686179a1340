//! Transparency-dashboard access history.
//!
//! [`AuditLogStore`] fetches the collaborator's access log and keeps the
//! latest snapshot; the log itself is owned and persisted remotely.

pub mod store;

pub use store::{AuditLogStore, AuditSnapshot};
