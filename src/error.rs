//! Typed failures for the catalog layer.
//!
//! `UnknownField` and `StoreUnavailable` are precondition violations: a
//! correct build never hits them at runtime, so callers propagate rather
//! than recover. `InvalidLaunchTarget` is the one deliberately non-fatal
//! variant (a UI/catalog race can produce it), logged and ignored by the
//! navigator.

use thiserror::Error;

use crate::entities::schema::EntryKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// Key is not declared in the schema for this entry kind.
    #[error("unknown metadata field `{key}` for {kind:?}")]
    UnknownField { key: String, kind: EntryKind },

    /// Entry was constructed without a resolved system store.
    #[error("entry `{file_id}` has no resolved system store")]
    StoreUnavailable { file_id: String },

    /// Read-time coercion of a raw field value failed.
    #[error("field `{key}`: cannot parse `{value}` as {target}")]
    FieldParse {
        key: String,
        value: String,
        target: &'static str,
    },

    /// Launch was requested for a folder or filter entry.
    #[error("`{file_id}` is not a launchable game")]
    InvalidLaunchTarget { file_id: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
