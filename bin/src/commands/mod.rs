//! CLI command implementations.

pub(crate) mod boards;
pub(crate) mod day;
pub(crate) mod history;
pub(crate) mod range;
