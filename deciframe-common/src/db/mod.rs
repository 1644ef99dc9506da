//! Catalog database schema

pub mod init;

pub use init::*;
