//! HTTP handlers, grouped by resource.

pub mod chain;
pub mod image;
pub mod organization;
pub mod share;
pub mod user;
