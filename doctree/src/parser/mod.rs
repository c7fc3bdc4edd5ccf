//! Document parsing: front matter, metadata values and markdown scanning.

pub mod frontmatter;
pub mod markdown;
pub mod metadata;

pub use frontmatter::{parse, serialize};
pub use markdown::{derive_title, extract_links, first_heading, title_from_filename, MarkdownLink};
pub use metadata::{DocStatus, MetaValue, Metadata};
