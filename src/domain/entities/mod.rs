//! Catalog record types.
//!
//! Plain, read-only value objects for the four catalog levels. Each record
//! is identified by an opaque string id and, except for lessons, an
//! optional slug. Parent links are carried as ids (`domain_id`,
//! `technology_id`, `tutorial_id`).
//!
//! # Entity Types
//!
//! - [`Domain`] - Subject domain, root of the tree
//! - [`Technology`] - Technology within a domain
//! - [`Tutorial`] - Tutorial within a technology
//! - [`Lesson`] - Lesson within a tutorial (leaf)

pub mod domain;
pub mod lesson;
pub mod technology;
pub mod tutorial;

pub use domain::Domain;
pub use lesson::Lesson;
pub use technology::Technology;
pub use tutorial::Tutorial;
