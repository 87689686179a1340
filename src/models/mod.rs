//! Domain model module declarations.

pub mod audit;
pub mod decision;
pub mod reference;
pub mod request;
