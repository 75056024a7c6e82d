//! Generation orchestration: source resolution, provider call, blob
//! persistence, and settling the pending response row.

pub mod generate;
