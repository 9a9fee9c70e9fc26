//! Filter-parameter overlay.
//!
//! Filter entries repurpose ordinary metadata columns as query parameters:
//! `genre` carries the match expression, `players` the result limit,
//! `developer` an ordering override. The columns share the store's physical
//! layout with game rows, which is what makes the overlay possible. This is
//! the single place that conversion happens; nothing else reads these keys
//! for their filter meaning.

use crate::entities::keys::{K_DEVELOPER, K_GENRE, K_PLAYERS};
use crate::entities::record::MetaRecord;
use crate::error::Result;
use crate::store::SortSpec;

/// Parameters for the store's filtered-children query.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterParams {
    /// Match expression evaluated by the store.
    pub match_expr: String,
    /// Maximum result count; `<= 0` means unlimited.
    pub limit: i32,
    /// Ordering override; takes precedence over any caller-supplied sort
    /// when present.
    pub ordering: Option<SortSpec>,
}

/// Extract filter parameters from a (filter-kind) record.
pub fn to_filter_params(record: &MetaRecord) -> Result<FilterParams> {
    let match_expr = record.get(K_GENRE)?.to_string();
    let limit = record.get_parsed::<i32>(K_PLAYERS)?;
    let order_by = record.get(K_DEVELOPER)?;
    let ordering = if order_by.is_empty() {
        None
    } else {
        Some(SortSpec::custom(order_by))
    };
    Ok(FilterParams {
        match_expr,
        limit,
        ordering,
    })
}
