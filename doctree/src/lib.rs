pub mod config;
pub mod document;
pub mod error;
pub mod fs;
pub mod health;
pub mod logging;
pub mod navigation;
pub mod parser;
pub mod sandbox;
pub mod store;
pub mod structure;

pub use config::{CoreConfig, OrphanPolicy};
pub use document::{Document, DocumentSummary, Edit};
pub use error::{DocError, Result};
pub use health::{HealthIssue, HealthOptions, HealthReport, IssueType, Severity};
pub use navigation::{Navigation, NavigationItem, NavigationSection, NavigationSource};
pub use parser::{DocStatus, MetaValue, Metadata};
pub use sandbox::PathSandbox;
pub use store::DocStore;
pub use structure::TreeNode;
