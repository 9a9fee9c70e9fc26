//! Static metadata schemas for all entry kinds.
//!
//! Declarations are const tables composed at first use: every kind's
//! schema starts with the mandatory subset (name/desc/image/thumbnail),
//! so the superset invariant holds by construction and is never checked
//! at runtime. The store keeps the mandatory fields in the same row as
//! entry identity for every kind (listing a system never joins the
//! kind-specific tables), and the in-memory model mirrors that layout.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::keys::*;

/// Which schema applies to a catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Game,
    Folder,
    Filter,
}

/// Value type of a metadata field. Values are stored raw and coerced at
/// read time, so this drives editors and read-site parsing only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    String,
    MultilineString,
    Path,
    /// Float in [0, 1], clamped at read time.
    Rating,
    Date,
    DateTime,
    Int,
}

/// One field declaration: key, type, default, plus editor display strings.
#[derive(Clone, Copy, Debug)]
pub struct FieldDecl {
    pub key: &'static str,
    pub ty: FieldType,
    pub default: &'static str,
    /// Runtime-derived (play count, last played), not user-authored.
    pub statistic: bool,
    pub label: &'static str,
    pub prompt: &'static str,
}

impl FieldDecl {
    pub const fn new(
        key: &'static str,
        ty: FieldType,
        default: &'static str,
        statistic: bool,
        label: &'static str,
        prompt: &'static str,
    ) -> Self {
        Self {
            key,
            ty,
            default,
            statistic,
            label,
            prompt,
        }
    }
}

const MANDATORY_DECLS: &[FieldDecl] = &[
    FieldDecl::new(K_NAME, FieldType::String, "", false, "name", "enter display name"),
    FieldDecl::new(
        K_DESC,
        FieldType::MultilineString,
        "",
        false,
        "description",
        "enter description",
    ),
    FieldDecl::new(K_IMAGE, FieldType::Path, "", false, "image", "enter path to image"),
    FieldDecl::new(
        K_THUMBNAIL,
        FieldType::Path,
        "",
        false,
        "thumbnail",
        "enter path to thumbnail",
    ),
];

const GAME_ONLY_DECLS: &[FieldDecl] = &[
    FieldDecl::new(K_RATING, FieldType::Rating, "0.000000", false, "rating", "enter rating"),
    FieldDecl::new(
        K_RELEASEDATE,
        FieldType::Date,
        NOT_A_DATE_TIME,
        false,
        "release date",
        "enter release date",
    ),
    FieldDecl::new(
        K_DEVELOPER,
        FieldType::String,
        "unknown",
        false,
        "developer",
        "enter game developer",
    ),
    FieldDecl::new(
        K_PUBLISHER,
        FieldType::String,
        "unknown",
        false,
        "publisher",
        "enter game publisher",
    ),
    FieldDecl::new(K_GENRE, FieldType::String, "unknown", false, "genre", "enter game genre"),
    FieldDecl::new(
        K_PLAYERS,
        FieldType::Int,
        "1",
        false,
        "players",
        "enter number of players",
    ),
    FieldDecl::new(
        K_PLAYCOUNT,
        FieldType::Int,
        "0",
        true,
        "play count",
        "enter number of times played",
    ),
    FieldDecl::new(
        K_LASTPLAYED,
        FieldType::DateTime,
        NOT_A_DATE_TIME,
        true,
        "last played",
        "enter last played date",
    ),
];

const FILTER_ONLY_DECLS: &[FieldDecl] = &[
    FieldDecl::new(
        K_QUERY,
        FieldType::MultilineString,
        "rating > .6 AND playcount > 0",
        false,
        "query",
        "enter query",
    ),
    FieldDecl::new(
        K_ORDERING,
        FieldType::String,
        "",
        false,
        "order by",
        "enter columns to order by",
    ),
    FieldDecl::new(K_MAXCOUNT, FieldType::Int, "0", false, "limit", "enter limit on results"),
];

/// Ordered field declarations for one entry kind.
#[derive(Debug)]
pub struct MetaSchema {
    kind: EntryKind,
    decls: Vec<FieldDecl>,
}

impl MetaSchema {
    fn compose(kind: EntryKind, extra: &[FieldDecl]) -> Self {
        let mut decls = Vec::with_capacity(MANDATORY_DECLS.len() + extra.len());
        decls.extend_from_slice(MANDATORY_DECLS);
        decls.extend_from_slice(extra);
        Self { kind, decls }
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Declarations in schema order.
    pub fn decls(&self) -> &[FieldDecl] {
        &self.decls
    }

    pub fn decl(&self, key: &str) -> Option<&FieldDecl> {
        self.decls.iter().find(|d| d.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.decl(key).is_some()
    }
}

static GAME_SCHEMA: Lazy<MetaSchema> =
    Lazy::new(|| MetaSchema::compose(EntryKind::Game, GAME_ONLY_DECLS));
static FOLDER_SCHEMA: Lazy<MetaSchema> = Lazy::new(|| MetaSchema::compose(EntryKind::Folder, &[]));
static FILTER_SCHEMA: Lazy<MetaSchema> =
    Lazy::new(|| MetaSchema::compose(EntryKind::Filter, FILTER_ONLY_DECLS));

/// Ordered field declarations for `kind`. Pure, no I/O.
pub fn declarations_for(kind: EntryKind) -> &'static MetaSchema {
    match kind {
        EntryKind::Game => &GAME_SCHEMA,
        EntryKind::Folder => &FOLDER_SCHEMA,
        EntryKind::Filter => &FILTER_SCHEMA,
    }
}
