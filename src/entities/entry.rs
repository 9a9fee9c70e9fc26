//! Catalog entries: identity plus lazily cached metadata over the store.
//!
//! Identity (file id, owning system, kind) is immutable after construction.
//! The display-name and metadata caches fill lazily and refill after
//! invalidation; an invalidated cache is never served stale. Caches use
//! `RefCell` and are not safe under concurrent access: callers serialize
//! per entry or accept redundant fetches (single-owner discipline in a
//! threaded port).

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use log::{trace, warn};

use super::clean_name::clean_entry_name;
use super::filter::to_filter_params;
use super::keys::K_NAME;
use super::record::MetaRecord;
use super::schema::EntryKind;
use crate::error::{CatalogError, Result};
use crate::store::{file_sorts, Catalog, ChildRow, SortSpec, SystemId};

#[derive(Clone)]
pub struct CatalogEntry {
    file_id: String,
    system: SystemId,
    kind: EntryKind,
    catalog: Option<Arc<Catalog>>,
    name_cache: RefCell<Option<String>>,
    meta_cache: RefCell<Option<MetaRecord>>,
}

impl CatalogEntry {
    pub fn new(
        file_id: impl Into<String>,
        system: SystemId,
        kind: EntryKind,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            system,
            kind,
            catalog: Some(catalog),
            name_cache: RefCell::new(None),
            meta_cache: RefCell::new(None),
        }
    }

    /// Entry with no resolved store. Every store-crossing operation fails
    /// with [`CatalogError::StoreUnavailable`].
    pub fn detached(file_id: impl Into<String>, system: SystemId, kind: EntryKind) -> Self {
        Self {
            file_id: file_id.into(),
            system,
            kind,
            catalog: None,
            name_cache: RefCell::new(None),
            meta_cache: RefCell::new(None),
        }
    }

    /// Materialize a store listing row, inheriting the parent's catalog
    /// handle. A name carried in the row pre-fills the cache.
    pub fn from_row(row: ChildRow, system: SystemId, catalog: Arc<Catalog>) -> Self {
        let entry = Self::new(row.file_id, system, row.kind, catalog);
        *entry.name_cache.borrow_mut() = row.name.filter(|n| !n.is_empty());
        entry
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn system(&self) -> &SystemId {
        &self.system
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Display name.
    ///
    /// Resolution order is significant: cached name, then the persisted
    /// `name` metadata field, then a name derived from the file id. The
    /// result is cached whichever rung produced it.
    pub fn name(&self) -> Result<String> {
        if let Some(name) = self.name_cache.borrow().as_ref() {
            return Ok(name.clone());
        }

        let mut name = self.metadata()?.get(K_NAME)?.to_string();
        if name.is_empty() {
            let platform = self
                .catalog()?
                .store
                .system_info(&self.system)
                .map(|info| info.platform)
                .unwrap_or_default();
            name = clean_entry_name(&self.file_id, platform);
        }

        *self.name_cache.borrow_mut() = Some(name.clone());
        Ok(name)
    }

    /// The entry's metadata record, fetching from the store when the cache
    /// is invalid.
    pub fn metadata(&self) -> Result<MetaRecord> {
        if let Some(record) = self.meta_cache.borrow().as_ref() {
            return Ok(record.clone());
        }

        let catalog = self.catalog()?;
        let record = catalog.store.get_record(&self.file_id, &self.system);
        trace!("fetched metadata for {}/{}", self.system, self.file_id);
        *self.meta_cache.borrow_mut() = Some(record.clone());
        Ok(record)
    }

    /// Write `record` through to the store.
    ///
    /// The round trip may normalize values (ratings clamp, dates reformat),
    /// so the local cache is dropped first and the next read re-fetches
    /// instead of trusting what was written.
    pub fn set_metadata(&self, record: &MetaRecord) -> Result<()> {
        self.invalidate_metadata();
        let catalog = self.catalog()?;
        catalog
            .store
            .put_record(&self.file_id, &self.system, self.kind, record);
        Ok(())
    }

    /// Drop both caches; the next `name()`/`metadata()` goes to the store.
    pub fn invalidate_metadata(&self) {
        *self.meta_cache.borrow_mut() = None;
        *self.name_cache.borrow_mut() = None;
    }

    /// Non-recursive children.
    ///
    /// Filter entries evaluate their stored parameters against the store
    /// instead of listing physical children; a non-empty ordering override
    /// replaces `sort`. When `sort` is `None` the process-wide preference
    /// is read *at call time*, so two identical calls can legitimately
    /// return differently ordered results if the user changed the sort
    /// preference in between. Intended behavior, not a bug.
    pub fn children(&self, sort: Option<&SortSpec>) -> Result<Vec<CatalogEntry>> {
        let catalog = Arc::clone(self.catalog()?);
        let (folders_first, default_sort) = listing_prefs(&catalog);
        let sort = sort.unwrap_or(&default_sort);

        let rows = if self.kind == EntryKind::Filter {
            let record = self.metadata()?;
            let params = to_filter_params(&record)?;
            let effective = params.ordering.clone().unwrap_or_else(|| sort.clone());
            catalog.store.filtered_children(
                &self.file_id,
                &self.system,
                folders_first,
                &params.match_expr,
                params.limit,
                &effective,
            )
        } else {
            catalog
                .store
                .direct_children(&self.file_id, &self.system, true, true, folders_first, sort)
        };

        Ok(self.materialize(rows, &catalog))
    }

    /// Recursive descendants. Filters are not expanded further: a filter's
    /// computed result set is already flat, so this is `children()`.
    pub fn children_recursive(
        &self,
        include_folders: bool,
        sort: Option<&SortSpec>,
    ) -> Result<Vec<CatalogEntry>> {
        if self.kind == EntryKind::Filter {
            return self.children(sort);
        }

        let catalog = Arc::clone(self.catalog()?);
        let (folders_first, default_sort) = listing_prefs(&catalog);
        let sort = sort.unwrap_or(&default_sort);

        let rows = catalog.store.recursive_descendants(
            &self.file_id,
            &self.system,
            true,
            include_folders,
            folders_first,
            sort,
        );
        Ok(self.materialize(rows, &catalog))
    }

    fn materialize(&self, rows: Vec<ChildRow>, catalog: &Arc<Catalog>) -> Vec<CatalogEntry> {
        rows.into_iter()
            .map(|row| CatalogEntry::from_row(row, self.system.clone(), Arc::clone(catalog)))
            .collect()
    }

    fn catalog(&self) -> Result<&Arc<Catalog>> {
        self.catalog.as_ref().ok_or_else(|| CatalogError::StoreUnavailable {
            file_id: self.file_id.clone(),
        })
    }
}

/// Snapshot the listing-related preferences (folders-first flag and the
/// selected default sort) at call time.
fn listing_prefs(catalog: &Arc<Catalog>) -> (bool, SortSpec) {
    let prefs = catalog.prefs.read().unwrap_or_else(|e| e.into_inner());
    let sorts = file_sorts();
    let sort = sorts.get(prefs.sort_type_index).cloned().unwrap_or_else(|| {
        warn!(
            "sort_type_index {} out of range, falling back to {}",
            prefs.sort_type_index, sorts[0].label
        );
        sorts[0].clone()
    });
    (prefs.sort_folders_first, sort)
}

impl PartialEq for CatalogEntry {
    /// Identity equality; cache state does not participate.
    fn eq(&self, other: &Self) -> bool {
        self.file_id == other.file_id && self.system == other.system && self.kind == other.kind
    }
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("file_id", &self.file_id)
            .field("system", &self.system)
            .field("kind", &self.kind)
            .field("resolved", &self.catalog.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::keys::{K_DEVELOPER, K_GENRE, K_NAME, K_PLAYERS};
    use crate::prefs::{shared, AppPrefs};
    use crate::test_utils::MemStore;

    fn setup() -> (Arc<MemStore>, Arc<Catalog>) {
        let store = Arc::new(MemStore::with_systems(&["snes"]));
        let prefs = shared(AppPrefs::default());
        let catalog = Catalog::new(store.clone(), prefs);
        (store, catalog)
    }

    #[test]
    fn name_derives_from_path_when_store_has_none() {
        let (_store, catalog) = setup();
        let entry = catalog.entry(
            "roms/snes/Super Game (USA) [!].sfc",
            SystemId::from("snes"),
            EntryKind::Game,
        );
        assert_eq!(entry.name().unwrap(), "Super Game");
    }

    #[test]
    fn persisted_name_wins_over_derivation() {
        let (store, catalog) = setup();
        let mut record = MetaRecord::new(EntryKind::Game);
        record.set(K_NAME, "Stored Title (keep tags)").unwrap();
        store.set_record("snes", "roms/snes/whatever (USA).sfc", record);

        let entry = catalog.entry(
            "roms/snes/whatever (USA).sfc",
            SystemId::from("snes"),
            EntryKind::Game,
        );
        // Returned verbatim, no re-derivation.
        assert_eq!(entry.name().unwrap(), "Stored Title (keep tags)");
    }

    #[test]
    fn name_cache_prevents_repeat_fetches() {
        let (store, catalog) = setup();
        let entry = catalog.entry("roms/snes/a.sfc", SystemId::from("snes"), EntryKind::Game);
        entry.name().unwrap();
        entry.name().unwrap();
        assert_eq!(store.get_record_calls(), 1);
    }

    #[test]
    fn metadata_fetches_once_until_invalidated() {
        let (store, catalog) = setup();
        let entry = catalog.entry("roms/snes/a.sfc", SystemId::from("snes"), EntryKind::Game);

        entry.metadata().unwrap();
        entry.metadata().unwrap();
        assert_eq!(store.get_record_calls(), 1);

        entry.invalidate_metadata();
        entry.metadata().unwrap();
        assert_eq!(store.get_record_calls(), 2);
    }

    #[test]
    fn set_metadata_always_invalidates() {
        let (store, catalog) = setup();
        let entry = catalog.entry("roms/snes/a.sfc", SystemId::from("snes"), EntryKind::Game);

        let record = entry.metadata().unwrap();
        assert_eq!(store.get_record_calls(), 1);

        // Even an unchanged record must force the next read to the store.
        entry.set_metadata(&record).unwrap();
        assert_eq!(store.put_record_calls(), 1);
        entry.metadata().unwrap();
        assert_eq!(store.get_record_calls(), 2);
    }

    #[test]
    fn detached_entries_fail_with_store_unavailable() {
        let entry = CatalogEntry::detached("a.sfc", SystemId::from("snes"), EntryKind::Game);
        assert!(matches!(
            entry.metadata(),
            Err(CatalogError::StoreUnavailable { .. })
        ));
        assert!(matches!(entry.name(), Err(CatalogError::StoreUnavailable { .. })));
        assert!(matches!(
            entry.children(None),
            Err(CatalogError::StoreUnavailable { .. })
        ));
    }

    #[test]
    fn filter_children_pass_params_and_respect_the_limit() {
        let (store, catalog) = setup();
        let mut record = MetaRecord::new(EntryKind::Filter);
        record.set(K_GENRE, "genre = 'rpg'").unwrap();
        record.set(K_PLAYERS, "2").unwrap();
        record.set(K_DEVELOPER, "").unwrap();
        store.set_record("snes", "filters/rpg", record);
        store.set_children(
            "snes",
            "filters/rpg",
            vec![
                MemStore::game_row("a.sfc"),
                MemStore::game_row("b.sfc"),
                MemStore::game_row("c.sfc"),
            ],
        );

        let filter = catalog.entry("filters/rpg", SystemId::from("snes"), EntryKind::Filter);
        let children = filter.children(None).unwrap();
        assert_eq!(children.len(), 2);

        let calls = store.filtered_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].match_expr, "genre = 'rpg'");
        assert_eq!(calls[0].limit, 2);
        // No override: the preference-selected default sort went through.
        assert_eq!(calls[0].order_by, "name");
    }

    #[test]
    fn filter_ordering_overrides_caller_sort() {
        let (store, catalog) = setup();
        let mut record = MetaRecord::new(EntryKind::Filter);
        record.set(K_DEVELOPER, "rating DESC").unwrap();
        record.set(K_PLAYERS, "0").unwrap();
        store.set_record("snes", "filters/best", record);

        let filter = catalog.entry("filters/best", SystemId::from("snes"), EntryKind::Filter);
        let explicit = SortSpec::new("name, ascending", "name");
        filter.children(Some(&explicit)).unwrap();

        let calls = store.filtered_calls();
        assert_eq!(calls[0].order_by, "rating DESC");
    }

    #[test]
    fn recursive_listing_of_a_filter_is_its_flat_listing() {
        let (store, catalog) = setup();
        store.set_record("snes", "filters/all", MetaRecord::new(EntryKind::Filter));

        let filter = catalog.entry("filters/all", SystemId::from("snes"), EntryKind::Filter);
        filter.children_recursive(true, None).unwrap();

        assert_eq!(store.filtered_calls().len(), 1);
        assert_eq!(store.recursive_calls(), 0);
    }

    #[test]
    fn default_sort_tracks_the_live_preference() {
        let (store, catalog) = setup();
        let root = catalog.root_entry(&SystemId::from("snes"));

        root.children(None).unwrap();
        {
            let mut prefs = catalog.prefs.write().unwrap();
            prefs.sort_type_index = 2; // rating, high to low
        }
        root.children(None).unwrap();

        let sorts = store.direct_sorts();
        assert_eq!(sorts, vec!["name".to_string(), "rating DESC".to_string()]);
    }

    #[test]
    fn identity_equality_ignores_cache_state() {
        let (_store, catalog) = setup();
        let a = catalog.entry("x.sfc", SystemId::from("snes"), EntryKind::Game);
        let b = catalog.entry("x.sfc", SystemId::from("snes"), EntryKind::Game);
        a.name().unwrap();
        assert_eq!(a, b);
    }
}
