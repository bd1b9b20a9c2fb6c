//! # plainwiki-core
//!
//! Core library for plainwiki - markup rendering, page storage and the
//! append-only revision log.
//!
//! Pages are plain-text files named by title. Every save that changes a page
//! appends one structural diff to that page's log, so the full history can be
//! replayed later.

pub mod config;
pub mod diff;
pub mod error;
pub mod markup;
pub mod models;
pub mod paths;
pub mod repository;
pub mod revlog;
pub mod service;
pub mod title;

pub use config::WikiConfig;
pub use diff::{DiffLine, Hunk, LineTag, PageDiff};
pub use error::{Error, Result};
pub use markup::{escape_html, render};
pub use models::{LineClass, Page, RenderedLine, RevisionEntry, RevisionRecord};
pub use repository::PageRepository;
pub use revlog::{History, RevisionLog};
pub use service::WikiService;
pub use title::Title;
