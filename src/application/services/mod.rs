//! Services for the application layer.

pub mod catalog_view;
pub mod default_path;

pub use catalog_view::{CatalogView, RootLoad, RootState, ToggleOutcome, ViewSnapshot};
pub use default_path::DefaultPath;
