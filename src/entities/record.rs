//! Per-entry metadata record.
//!
//! A record's key set is exactly its schema's key set: seeded with defaults
//! at construction, optionally re-hydrated from the store, mutated by
//! editors, written back through the owning entry. Values are stored raw
//! (strings) and coerced at read time, never at write time.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::keys::NOT_A_DATE_TIME;
use super::schema::{declarations_for, EntryKind};
use crate::error::{CatalogError, Result};

/// Date/datetime fields use the store's compact wire format.
const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetaRecord {
    kind: EntryKind,
    values: IndexMap<String, String>,
}

impl MetaRecord {
    /// Build a record seeded with schema defaults.
    ///
    /// The mandatory-superset (Game) defaults are seeded first for every
    /// kind: the store keeps those fields in the entry's identity row
    /// regardless of kind, so the in-memory record mirrors them before the
    /// kind-specific defaults overlay.
    pub fn new(kind: EntryKind) -> Self {
        let mut values = IndexMap::new();
        for decl in declarations_for(EntryKind::Game).decls() {
            values.insert(decl.key.to_string(), decl.default.to_string());
        }
        if kind != EntryKind::Game {
            for decl in declarations_for(kind).decls() {
                values.insert(decl.key.to_string(), decl.default.to_string());
            }
        }
        Self { kind, values }
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Raw (unparsed) value for `key`.
    pub fn get(&self, key: &str) -> Result<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| self.unknown(key))
    }

    /// Read-time coercion into any `FromStr` type.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Result<T> {
        let raw = self.get(key)?;
        raw.parse().map_err(|_| CatalogError::FieldParse {
            key: key.to_string(),
            value: raw.to_string(),
            target: std::any::type_name::<T>(),
        })
    }

    /// Rating in [0, 1]; values outside the range clamp at read time.
    pub fn get_rating(&self, key: &str) -> Result<f32> {
        Ok(self.get_parsed::<f32>(key)?.clamp(0.0, 1.0))
    }

    /// Parsed date/datetime; the `not-a-date-time` sentinel (or an empty
    /// value) reads as `None`.
    pub fn get_date(&self, key: &str) -> Result<Option<NaiveDateTime>> {
        let raw = self.get(key)?;
        if raw.is_empty() || raw == NOT_A_DATE_TIME {
            return Ok(None);
        }
        NaiveDateTime::parse_from_str(raw, DATE_TIME_FORMAT)
            .map(Some)
            .map_err(|_| CatalogError::FieldParse {
                key: key.to_string(),
                value: raw.to_string(),
                target: "NaiveDateTime",
            })
    }

    /// Store `value` verbatim. Coercion (clamping, date normalization) is
    /// the store's business on write-through, and read sites parse.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        if !self.values.contains_key(key) {
            return Err(self.unknown(key));
        }
        self.values.insert(key.to_string(), value.into());
        Ok(())
    }

    /// Whether `key` is a runtime-derived statistic (play count etc.).
    pub fn is_statistic(&self, key: &str) -> bool {
        declarations_for(self.kind)
            .decl(key)
            .or_else(|| declarations_for(EntryKind::Game).decl(key))
            .map(|d| d.statistic)
            .unwrap_or(false)
    }

    /// Overlay external values (store rows) onto the seeded defaults.
    /// Unknown keys are dropped: the store may carry columns newer or older
    /// than this build's schema.
    pub fn merge_from<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in values {
            if self.values.contains_key(key.as_ref()) {
                self.values.insert(key.as_ref().to_string(), value.into());
            }
        }
    }

    /// Key/value pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn unknown(&self, key: &str) -> CatalogError {
        CatalogError::UnknownField {
            key: key.to_string(),
            kind: self.kind,
        }
    }
}

impl fmt::Display for MetaRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MetaRecord({:?}, {} fields)", self.kind, self.values.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::keys::*;
    use crate::entities::schema::declarations_for;

    #[test]
    fn fresh_record_matches_schema_key_set_exactly() {
        for kind in [EntryKind::Game, EntryKind::Folder, EntryKind::Filter] {
            let record = MetaRecord::new(kind);
            // Every declared key is present with its declared default.
            let game = declarations_for(EntryKind::Game);
            for decl in game.decls() {
                // Kind-specific overlay wins where both declare the key.
                let expected = declarations_for(kind)
                    .decl(decl.key)
                    .map(|d| d.default)
                    .unwrap_or(decl.default);
                assert_eq!(record.get(decl.key).unwrap(), expected);
            }
            for decl in declarations_for(kind).decls() {
                assert_eq!(record.get(decl.key).unwrap(), decl.default);
            }
            // No keys beyond the mandatory superset plus the kind's own.
            let allowed = game.decls().len()
                + declarations_for(kind)
                    .decls()
                    .iter()
                    .filter(|d| !game.contains(d.key))
                    .count();
            assert_eq!(record.len(), allowed);
        }
    }

    #[test]
    fn filter_records_still_carry_game_columns() {
        // The mandatory-superset seeding is what makes the genre/players/
        // developer repurposing in filter entries possible at all.
        let record = MetaRecord::new(EntryKind::Filter);
        assert_eq!(record.get(K_GENRE).unwrap(), "unknown");
        assert_eq!(record.get(K_PLAYERS).unwrap(), "1");
        assert_eq!(record.get(K_QUERY).unwrap(), "rating > .6 AND playcount > 0");
    }

    #[test]
    fn unknown_keys_error_on_get_and_set() {
        let mut record = MetaRecord::new(EntryKind::Folder);
        assert!(matches!(
            record.get("bogus"),
            Err(CatalogError::UnknownField { .. })
        ));
        assert!(matches!(
            record.set("bogus", "x"),
            Err(CatalogError::UnknownField { .. })
        ));
    }

    #[test]
    fn values_are_stored_verbatim_and_parsed_on_read() {
        let mut record = MetaRecord::new(EntryKind::Game);
        record.set(K_RATING, "1.500000").unwrap();
        // Raw form is untouched...
        assert_eq!(record.get(K_RATING).unwrap(), "1.500000");
        // ...and the typed read clamps.
        assert_eq!(record.get_rating(K_RATING).unwrap(), 1.0);

        record.set(K_PLAYERS, "4").unwrap();
        assert_eq!(record.get_parsed::<i32>(K_PLAYERS).unwrap(), 4);

        record.set(K_PLAYERS, "four").unwrap();
        assert!(matches!(
            record.get_parsed::<i32>(K_PLAYERS),
            Err(CatalogError::FieldParse { .. })
        ));
    }

    #[test]
    fn date_sentinel_reads_as_none() {
        let mut record = MetaRecord::new(EntryKind::Game);
        assert_eq!(record.get_date(K_RELEASEDATE).unwrap(), None);

        record.set(K_RELEASEDATE, "19940602T000000").unwrap();
        let date = record.get_date(K_RELEASEDATE).unwrap().unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "1994-06-02");
    }

    #[test]
    fn merge_ignores_unknown_store_columns() {
        let mut record = MetaRecord::new(EntryKind::Game);
        record.merge_from([("name", "Super Game"), ("obsolete_column", "x")]);
        assert_eq!(record.get(K_NAME).unwrap(), "Super Game");
        assert!(record.get("obsolete_column").is_err());
    }

    #[test]
    fn statistics_flag_comes_from_the_schema() {
        let record = MetaRecord::new(EntryKind::Game);
        assert!(record.is_statistic(K_PLAYCOUNT));
        assert!(record.is_statistic(K_LASTPLAYED));
        assert!(!record.is_statistic(K_RATING));
    }
}
