//! Client SDK for the Quark course platform.
//!
//! The crate models a course's chapters, lessons, activities and their
//! sections, and edits that structure against the Quark REST backend:
//! optimistic metadata saves, drag-and-drop reordering with rollback, and
//! tolerant reading of activity rulesets.
//!
//! ```rust,no_run
//! use quark::api::{ApiClient, ApiConfig};
//! use quark::editor::CourseEditor;
//!
//! # fn example() -> anyhow::Result<()> {
//! let client = ApiClient::new(ApiConfig::from_env()?);
//! let mut editor = CourseEditor::load(client, 1)?;
//! editor.add_default_chapter()?;
//! editor.reorder_chapters(0, 1)?;
//! # Ok(())
//! # }
//! ```

pub mod activity;
pub mod api;
pub mod course;
pub mod editor;
pub mod grading;
pub mod outline;
pub mod ruleset;
pub mod selection;
pub mod session;
