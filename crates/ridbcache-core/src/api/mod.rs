//! RIDB catalog access.
//!
//! This module provides the `RemoteCatalog` trait the cache fetches
//! through, and `RidbClient`, its HTTP implementation against the
//! Recreation Information Database REST API.
//!
//! Every request is a GET that carries the `apikey` header taken from
//! configuration.

pub mod catalog;
pub mod client;
pub mod error;

pub use catalog::{CampsitePage, RemoteCatalog};
pub use client::RidbClient;
pub use error::ApiError;
