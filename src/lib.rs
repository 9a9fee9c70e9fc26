//! ROMSHELF - Game-library browser core.
//!
//! The metadata-backed catalog model (schemas, records, entries over an
//! external store) plus the navigation state machine that owns per-system
//! views, the camera, and the transitions between screens. Rendering,
//! input devices, theme parsing and the store itself live in the host
//! behind narrow trait seams.

// Core engine (camera, timed animations)
pub mod core;

// App modules
pub mod config;
pub mod entities;
pub mod error;
pub mod help;
pub mod input;
pub mod paths;
pub mod prefs;
pub mod render;
pub mod store;
pub mod views;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types from core
pub use crate::core::animation::{Effect, TimedAnimation};
pub use crate::core::camera::{Camera, Viewport};

// Re-export entities and the navigation surface
pub use entities::{CatalogEntry, EntryKind, FieldDecl, FieldType, MetaRecord};
pub use error::CatalogError;
pub use prefs::{AppPrefs, SharedPrefs, TransitionStyle};
pub use store::{Catalog, ChildRow, SortSpec, SystemId, SystemInfo, SystemStore, Theme};
pub use views::{GameListKind, GameListView, NavEvent, SystemSelectView, ViewNavigator, Viewing};
