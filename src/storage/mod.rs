//! Storage layer - record pages.
//!
//! - [`page`] - Page, record layout and page image format

pub mod page;
