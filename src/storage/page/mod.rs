//! Record pages and their image format.
//!
//! This module contains:
//! - [`Page`] - Fixed-capacity array of fixed-width records
//! - [`Record`] / [`RecordLayout`] - Tuple shape and its word layout
//! - [`PageHeader`] - Metadata at the start of every page image
//! - [`PageType`] - Discriminator for page images

#[allow(clippy::module_inception)]
mod page;
mod page_header;
mod record;

pub use page::{Page, SharedPage};
pub use page_header::{PageHeader, PageType};
pub use record::{Record, RecordLayout};
