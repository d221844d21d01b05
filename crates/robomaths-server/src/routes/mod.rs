//! HTTP route handlers

pub mod env;
pub mod github;
