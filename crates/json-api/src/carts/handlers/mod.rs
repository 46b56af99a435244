//! Cart Handlers

pub(crate) mod clear;
pub(crate) mod get;
pub(crate) mod items;
pub(crate) mod totals;
