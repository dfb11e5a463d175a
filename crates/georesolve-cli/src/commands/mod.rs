//! Command implementations

pub mod config;
pub mod datasets;
pub mod geocode;
pub mod indices;
pub mod recommend;
pub mod resolve;
pub mod workflow;
