//! Navigation: explicit override files first, then a fold of the tree.

mod resolver;
mod types;

pub use resolver::{
    derive, is_reachable, load_override, reachable_paths, NavigationResolver, OVERRIDE_FILES,
};
pub(crate) use resolver::is_external;
pub use types::{Navigation, NavigationItem, NavigationSection, NavigationSource};
