//! Shared test doubles: an in-memory store with call counters and a
//! recording render sink.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use glam::Vec2;

use crate::entities::{CatalogEntry, EntryKind, MetaRecord};
use crate::entities::keys::K_PLAYCOUNT;
use crate::render::RenderSink;
use crate::store::{
    ChildRow, PlatformClass, SortSpec, SystemId, SystemInfo, SystemStore, Theme,
};
use crate::views::{GameListView, SystemSelectView};

/// One recorded `filtered_children` invocation.
#[derive(Clone, Debug)]
pub struct FilteredCall {
    pub match_expr: String,
    pub limit: i32,
    pub order_by: String,
}

/// In-memory `SystemStore` with observable call counts. Single-threaded,
/// like everything in this crate's tests.
#[derive(Default)]
pub struct MemStore {
    systems: RefCell<Vec<SystemInfo>>,
    records: RefCell<HashMap<(String, String), MetaRecord>>,
    children: RefCell<HashMap<(String, String), Vec<ChildRow>>>,
    images: RefCell<HashSet<String>>,
    theme_revisions: RefCell<HashMap<String, u64>>,
    get_record_calls: Cell<u32>,
    put_record_calls: Cell<u32>,
    direct_calls: Cell<u32>,
    recursive_calls: Cell<u32>,
    direct_sorts: RefCell<Vec<String>>,
    filtered: RefCell<Vec<FilteredCall>>,
    launched: RefCell<Vec<String>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with generic, non-aggregate systems in the given order.
    pub fn with_systems(ids: &[&str]) -> Self {
        let store = Self::new();
        for id in ids {
            store.add_system(id, PlatformClass::Generic, false);
        }
        store
    }

    pub fn add_system(&self, id: &str, platform: PlatformClass, aggregate: bool) {
        self.systems.borrow_mut().push(SystemInfo {
            id: SystemId::from(id),
            fullname: id.to_uppercase(),
            platform,
            aggregate,
        });
    }

    pub fn mark_has_image(&self, id: &str) {
        self.images.borrow_mut().insert(id.to_string());
    }

    pub fn set_record(&self, system: &str, file_id: &str, record: MetaRecord) {
        self.records
            .borrow_mut()
            .insert((system.to_string(), file_id.to_string()), record);
    }

    pub fn set_children(&self, system: &str, parent: &str, rows: Vec<ChildRow>) {
        self.children
            .borrow_mut()
            .insert((system.to_string(), parent.to_string()), rows);
    }

    pub fn game_row(file_id: &str) -> ChildRow {
        ChildRow {
            file_id: file_id.to_string(),
            kind: EntryKind::Game,
            name: None,
        }
    }

    // === Observations ===

    pub fn get_record_calls(&self) -> u32 {
        self.get_record_calls.get()
    }

    pub fn put_record_calls(&self) -> u32 {
        self.put_record_calls.get()
    }

    pub fn direct_calls(&self) -> u32 {
        self.direct_calls.get()
    }

    pub fn recursive_calls(&self) -> u32 {
        self.recursive_calls.get()
    }

    /// `order_by` of every direct-children call, in order.
    pub fn direct_sorts(&self) -> Vec<String> {
        self.direct_sorts.borrow().clone()
    }

    pub fn filtered_calls(&self) -> Vec<FilteredCall> {
        self.filtered.borrow().clone()
    }

    pub fn launched(&self) -> Vec<String> {
        self.launched.borrow().clone()
    }

    pub fn theme_revision(&self, system: &str) -> u64 {
        self.theme_revisions
            .borrow()
            .get(system)
            .copied()
            .unwrap_or(0)
    }

    fn rows_for(&self, system: &SystemId, parent: &str) -> Vec<ChildRow> {
        self.children
            .borrow()
            .get(&(system.as_str().to_string(), parent.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

impl SystemStore for MemStore {
    fn systems(&self) -> Vec<SystemId> {
        self.systems.borrow().iter().map(|info| info.id.clone()).collect()
    }

    fn system_info(&self, system: &SystemId) -> Option<SystemInfo> {
        self.systems.borrow().iter().find(|info| info.id == *system).cloned()
    }

    fn theme(&self, system: &SystemId) -> Theme {
        Theme {
            set: format!("{system}-default"),
            revision: self.theme_revision(system.as_str()),
        }
    }

    fn load_theme(&self, system: &SystemId) -> Theme {
        let revision = {
            let mut revisions = self.theme_revisions.borrow_mut();
            let entry = revisions.entry(system.as_str().to_string()).or_insert(0);
            *entry += 1;
            *entry
        };
        Theme {
            set: format!("{system}-default"),
            revision,
        }
    }

    fn has_entry_with_image(&self, system: &SystemId) -> bool {
        self.images.borrow().contains(system.as_str())
    }

    fn get_record(&self, file_id: &str, system: &SystemId) -> MetaRecord {
        self.get_record_calls.set(self.get_record_calls.get() + 1);
        self.records
            .borrow()
            .get(&(system.as_str().to_string(), file_id.to_string()))
            .cloned()
            .unwrap_or_else(|| MetaRecord::new(EntryKind::Game))
    }

    fn put_record(&self, file_id: &str, system: &SystemId, _kind: EntryKind, record: &MetaRecord) {
        self.put_record_calls.set(self.put_record_calls.get() + 1);
        self.set_record(system.as_str(), file_id, record.clone());
    }

    fn direct_children(
        &self,
        file_id: &str,
        system: &SystemId,
        _include_files: bool,
        _include_folders: bool,
        _folders_first: bool,
        sort: &SortSpec,
    ) -> Vec<ChildRow> {
        self.direct_calls.set(self.direct_calls.get() + 1);
        self.direct_sorts.borrow_mut().push(sort.order_by.clone());
        self.rows_for(system, file_id)
    }

    fn recursive_descendants(
        &self,
        file_id: &str,
        system: &SystemId,
        _include_files: bool,
        _include_folders: bool,
        _folders_first: bool,
        _sort: &SortSpec,
    ) -> Vec<ChildRow> {
        self.recursive_calls.set(self.recursive_calls.get() + 1);
        self.rows_for(system, file_id)
    }

    fn filtered_children(
        &self,
        file_id: &str,
        system: &SystemId,
        _folders_first: bool,
        match_expr: &str,
        limit: i32,
        sort: &SortSpec,
    ) -> Vec<ChildRow> {
        self.filtered.borrow_mut().push(FilteredCall {
            match_expr: match_expr.to_string(),
            limit,
            order_by: sort.order_by.clone(),
        });
        let mut rows = self.rows_for(system, file_id);
        if limit > 0 {
            rows.truncate(limit as usize);
        }
        rows
    }

    fn launch_game(&self, entry: &CatalogEntry) -> anyhow::Result<()> {
        self.launched.borrow_mut().push(entry.file_id().to_string());

        // The launch side effect bumps statistics before returning.
        let key = (
            entry.system().as_str().to_string(),
            entry.file_id().to_string(),
        );
        let mut records = self.records.borrow_mut();
        let record = records.entry(key).or_insert_with(|| MetaRecord::new(EntryKind::Game));
        let count = record.get_parsed::<i32>(K_PLAYCOUNT).unwrap_or(0);
        record.set(K_PLAYCOUNT, (count + 1).to_string()).ok();
        Ok(())
    }
}

/// Render sink that records every draw call.
#[derive(Default)]
pub struct RecordingSink {
    pub system_draws: Vec<Vec2>,
    pub gamelist_draws: Vec<(String, Vec2)>,
    pub overlays: Vec<f32>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.system_draws.clear();
        self.gamelist_draws.clear();
        self.overlays.clear();
    }
}

impl RenderSink for RecordingSink {
    fn draw_system_select(&mut self, _view: &SystemSelectView, offset: Vec2) {
        self.system_draws.push(offset);
    }

    fn draw_game_list(&mut self, view: &GameListView, offset: Vec2) {
        self.gamelist_draws.push((view.system().to_string(), offset));
    }

    fn draw_overlay(&mut self, opacity: f32) {
        self.overlays.push(opacity);
    }
}
