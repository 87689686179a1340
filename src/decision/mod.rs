//! Submission lifecycle for access decisions.

pub mod client;

pub use client::{DecisionClient, DisplayState, SubmissionResult};
