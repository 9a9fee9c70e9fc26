//! Catalog entities: schemas, records, entries.
//!
//! The metadata model is layered: static schemas declare what exists per
//! entry kind, records hold one entry's values, entries tie identity to
//! lazily cached records and tree queries against the store.

pub mod clean_name;
pub mod entry;
pub mod filter;
pub mod keys;
pub mod record;
pub mod schema;

pub use entry::CatalogEntry;
pub use filter::{to_filter_params, FilterParams};
pub use record::MetaRecord;
pub use schema::{declarations_for, EntryKind, FieldDecl, FieldType, MetaSchema};
