//! Consumed store contract.
//!
//! The persistent catalog (systems, records, tree queries, themes, the
//! launch side effect) lives behind [`SystemStore`]; this crate never
//! assumes anything about its implementation beyond the query contract.
//! No ordering or transaction guarantee holds across two separate store
//! calls: a `put_record` followed by a read is two independent round trips.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::entities::entry::CatalogEntry;
use crate::entities::record::MetaRecord;
use crate::entities::schema::EntryKind;
use crate::prefs::SharedPrefs;

/// Identifier of one system (console/platform) in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SystemId(String);

impl SystemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SystemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Platform family, as far as name derivation cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlatformClass {
    #[default]
    Generic,
    Arcade,
    NeoGeo,
}

/// Static facts about a system.
#[derive(Clone, Debug)]
pub struct SystemInfo {
    pub id: SystemId,
    pub fullname: String,
    pub platform: PlatformClass,
    /// Synthetic aggregate ("all games") whose contents are computed from
    /// the other systems and must be refreshed on entry.
    pub aggregate: bool,
}

/// Opaque theme handle. Parsing happens in the host; views only need to
/// know which set they wear and whether a reload happened since.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Theme {
    pub set: String,
    /// Bumped by every `load_theme`, so a rebuilt view can tell a reload
    /// from a cache hit.
    pub revision: u64,
}

/// One way of ordering a listing. `order_by` is the store-side sort key
/// expression; this layer treats it as opaque.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub label: String,
    pub order_by: String,
}

impl SortSpec {
    pub fn new(label: impl Into<String>, order_by: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            order_by: order_by.into(),
        }
    }

    /// Ordering override carried by a filter entry.
    pub fn custom(order_by: impl Into<String>) -> Self {
        Self::new("custom", order_by)
    }
}

static FILE_SORTS: Lazy<Vec<SortSpec>> = Lazy::new(|| {
    vec![
        SortSpec::new("name, ascending", "name"),
        SortSpec::new("name, descending", "name DESC"),
        SortSpec::new("rating, high to low", "rating DESC"),
        SortSpec::new("release date, new to old", "releasedate DESC"),
        SortSpec::new("times played", "playcount DESC"),
        SortSpec::new("last played", "lastplayed DESC"),
    ]
});

/// User-selectable sorts; `AppPrefs::sort_type_index` points into this.
pub fn file_sorts() -> &'static [SortSpec] {
    &FILE_SORTS
}

/// Wire form of a child listing row. `CatalogEntry::children*` materializes
/// rows into entries carrying the parent's catalog handle.
#[derive(Clone, Debug)]
pub struct ChildRow {
    pub file_id: String,
    pub kind: EntryKind,
    /// Display name when the store has one in the row (saves a record
    /// fetch per listed entry).
    pub name: Option<String>,
}

/// The external catalog/store collaborator.
pub trait SystemStore {
    /// Systems in carousel order.
    fn systems(&self) -> Vec<SystemId>;

    fn system_info(&self, system: &SystemId) -> Option<SystemInfo>;

    /// Current theme without reloading.
    fn theme(&self, system: &SystemId) -> Theme;

    /// Re-read the system's theme from its source; bumps the revision.
    fn load_theme(&self, system: &SystemId) -> Theme;

    /// View-variant predicate: does any entry of this system carry image
    /// metadata?
    fn has_entry_with_image(&self, system: &SystemId) -> bool;

    fn get_record(&self, file_id: &str, system: &SystemId) -> MetaRecord;

    /// Write a record through. The store may normalize values (clamp
    /// ratings, reformat dates); callers must re-read rather than trust
    /// what they wrote.
    fn put_record(&self, file_id: &str, system: &SystemId, kind: EntryKind, record: &MetaRecord);

    fn direct_children(
        &self,
        file_id: &str,
        system: &SystemId,
        include_files: bool,
        include_folders: bool,
        folders_first: bool,
        sort: &SortSpec,
    ) -> Vec<ChildRow>;

    fn recursive_descendants(
        &self,
        file_id: &str,
        system: &SystemId,
        include_files: bool,
        include_folders: bool,
        folders_first: bool,
        sort: &SortSpec,
    ) -> Vec<ChildRow>;

    fn filtered_children(
        &self,
        file_id: &str,
        system: &SystemId,
        folders_first: bool,
        match_expr: &str,
        limit: i32,
        sort: &SortSpec,
    ) -> Vec<ChildRow>;

    /// Start emulation for `entry`. Blocking; expected to update the
    /// entry's statistics fields before returning.
    fn launch_game(&self, entry: &CatalogEntry) -> anyhow::Result<()>;
}

/// Explicit dependency bundle handed to entries and the navigator: the
/// store plus the live preference handle. Replaces the original global
/// singleton lookups so everything is testable with fakes.
pub struct Catalog {
    pub store: Arc<dyn SystemStore>,
    pub prefs: SharedPrefs,
}

impl Catalog {
    pub fn new(store: Arc<dyn SystemStore>, prefs: SharedPrefs) -> Arc<Self> {
        Arc::new(Self { store, prefs })
    }

    /// Materialize an entry bound to this catalog.
    pub fn entry(
        self: &Arc<Self>,
        file_id: impl Into<String>,
        system: SystemId,
        kind: EntryKind,
    ) -> CatalogEntry {
        CatalogEntry::new(file_id, system, kind, Arc::clone(self))
    }

    /// The root folder of a system (empty file id by convention).
    pub fn root_entry(self: &Arc<Self>, system: &SystemId) -> CatalogEntry {
        self.entry("", system.clone(), EntryKind::Folder)
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog").finish_non_exhaustive()
    }
}
