//! Data models: the receipt record, the document value tree, configuration.

pub mod config;
pub mod receipt;
pub mod tree;
