//! # plainwiki-server
//!
//! HTTP front end for plainwiki: page views, the edit form, change history and
//! static assets.

pub mod api;
pub mod server;
pub mod templates;

pub use server::WikiServer;
