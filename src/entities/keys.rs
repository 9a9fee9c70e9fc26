//! Metadata field key constants.
//!
//! Avoid string typos, enable IDE autocomplete.
//! Usage: `record.get(K_NAME)`
//!
//! The filter-parameter overlay in [`super::filter`] is the only place
//! keys are deliberately read for a purpose other than their name.

// === Mandatory subset (present on every kind) ===
pub const K_NAME: &str = "name";
pub const K_DESC: &str = "desc";
pub const K_IMAGE: &str = "image";
pub const K_THUMBNAIL: &str = "thumbnail";

// === Game fields ===
pub const K_RATING: &str = "rating";
pub const K_RELEASEDATE: &str = "releasedate";
pub const K_DEVELOPER: &str = "developer";
pub const K_PUBLISHER: &str = "publisher";
pub const K_GENRE: &str = "genre";
pub const K_PLAYERS: &str = "players";
pub const K_PLAYCOUNT: &str = "playcount";
pub const K_LASTPLAYED: &str = "lastplayed";

// === Filter fields ===
pub const K_QUERY: &str = "query";
pub const K_ORDERING: &str = "ordering";
pub const K_MAXCOUNT: &str = "maxcount";

/// Sentinel stored for unset date/datetime fields.
pub const NOT_A_DATE_TIME: &str = "not-a-date-time";
