//! Utility functions and helpers.
//!
//! - [`domain_name`] - Monitored domain syntax validation
//! - [`retry`] - Retry policies and the retry combinator
//! - [`sitemap_xml`] - `<loc>` extraction and canonical sitemap documents

pub mod domain_name;
pub mod retry;
pub mod sitemap_xml;
