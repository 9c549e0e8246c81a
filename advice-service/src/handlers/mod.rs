//! HTTP handlers for the advice gateway.

pub mod app;
pub mod parse;
