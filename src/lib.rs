//! # plainwiki
//!
//! A minimal personal wiki: plain-text pages, a small line-oriented markup dialect,
//! and an append-only revision log per page.
//!
//! This crate re-exports the core library and the HTTP server.

pub use plainwiki_core::{
    render, Error, History, Page, PageRepository, Result, RevisionEntry, RevisionLog,
    RevisionRecord, Title, WikiConfig, WikiService,
};
pub use plainwiki_server::WikiServer;
