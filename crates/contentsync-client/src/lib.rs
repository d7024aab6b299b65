//! Contentful Delivery API client for contentsync
//!
//! [`ContentfulClient`] implements [`contentsync_core::EntrySource`]: it
//! pages through the entries of a content type with every locale requested
//! and materializes linked entries and assets from the response includes.
//!
//! # Example
//!
//! ```rust,no_run
//! use contentsync_client::ContentfulClient;
//! use contentsync_core::{ContentfulSection, EntrySource, FetchQuery};
//!
//! let section = ContentfulSection {
//!     space: "sp4ce".into(),
//!     access_token: "token".into(),
//!     ..ContentfulSection::default()
//! };
//! let client = ContentfulClient::new(&section, "en-US")?;
//! let posts = client.fetch_entries(&FetchQuery::new("post", 2))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod client;
pub mod error;
pub mod parse;

pub use client::{ContentfulClient, DELIVERY_HOST, PREVIEW_HOST};
pub use error::{Error, Result};
pub use parse::{Decoder, EntryPage, LinkIndex};
