//! Per-system game list view.
//!
//! Shows one container's listing at a time: the system root until the user
//! descends into a folder or filter. The concrete variant (basic text list
//! vs. detail pane with artwork) is chosen by the navigator when it builds
//! the view; behavior here is identical, the variant only changes what the
//! host renders.

use glam::Vec2;
use log::warn;
use uuid::Uuid;

use super::ViewEvent;
use crate::entities::{CatalogEntry, EntryKind};
use crate::help::HelpPrompt;
use crate::input::{Action, DeviceConfig, InputEvent};
use crate::store::{SystemId, Theme};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameListKind {
    /// Text-only listing.
    Basic,
    /// Listing plus image/description pane.
    Detailed,
}

pub struct GameListView {
    id: Uuid,
    system: SystemId,
    kind: GameListKind,
    theme: Theme,
    position: Vec2,
    size: Vec2,
    root: CatalogEntry,
    /// Containers descended into, outermost first.
    cursor_stack: Vec<CatalogEntry>,
    entries: Vec<CatalogEntry>,
    cursor: usize,
}

impl GameListView {
    pub fn new(root: CatalogEntry, kind: GameListKind, theme: Theme) -> Self {
        let mut view = Self {
            id: Uuid::new_v4(),
            system: root.system().clone(),
            kind,
            theme,
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            root,
            cursor_stack: Vec::new(),
            entries: Vec::new(),
            cursor: 0,
        };
        view.populate();
        view
    }

    /// Instance identity; survives nothing — a rebuilt view gets a new id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn system(&self) -> &SystemId {
        &self.system
    }

    pub fn kind(&self) -> GameListKind {
        self.kind
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn cursor_entry(&self) -> Option<&CatalogEntry> {
        self.entries.get(self.cursor)
    }

    pub fn cursor_file_id(&self) -> Option<String> {
        self.cursor_entry().map(|e| e.file_id().to_string())
    }

    /// Move the cursor to the entry with `file_id`; false when the current
    /// listing has no such entry.
    pub fn set_cursor_to(&mut self, file_id: &str) -> bool {
        match self.entries.iter().position(|e| e.file_id() == file_id) {
            Some(idx) => {
                self.cursor = idx;
                true
            }
            None => false,
        }
    }

    /// The displayed file set changed; re-list and keep the cursor on the
    /// same entry where possible.
    pub fn on_files_changed(&mut self) {
        let keep = self.cursor_file_id();
        self.populate();
        if let Some(file_id) = keep {
            self.set_cursor_to(&file_id);
        }
    }

    /// A single entry's metadata changed; drop its caches so the next
    /// read re-fetches.
    pub fn on_meta_data_changed(&mut self, file_id: &str) {
        self.invalidate_entry(file_id);
    }

    /// Statistics (play count, last played) changed, typically after a
    /// launch.
    pub fn on_statistics_changed(&mut self, file_id: &str) {
        self.invalidate_entry(file_id);
    }

    pub fn input(&mut self, config: &dyn DeviceConfig, event: &InputEvent) -> Option<ViewEvent> {
        if !event.pressed() {
            return None;
        }

        if config.maps_to(Action::Up, event) {
            self.move_cursor(-1);
            return Some(ViewEvent::Consumed);
        }
        if config.maps_to(Action::Down, event) {
            self.move_cursor(1);
            return Some(ViewEvent::Consumed);
        }
        if config.maps_to(Action::Accept, event) {
            let entry = self.cursor_entry()?.clone();
            return match entry.kind() {
                EntryKind::Game => Some(ViewEvent::Launch(entry)),
                EntryKind::Folder | EntryKind::Filter => {
                    self.descend(entry);
                    Some(ViewEvent::Consumed)
                }
            };
        }
        if config.maps_to(Action::Back, event) {
            return if self.cursor_stack.is_empty() {
                Some(ViewEvent::LeaveToSystemSelect)
            } else {
                self.ascend();
                Some(ViewEvent::Consumed)
            };
        }
        if config.maps_to(Action::Left, event) {
            return Some(ViewEvent::PrevSystem);
        }
        if config.maps_to(Action::Right, event) {
            return Some(ViewEvent::NextSystem);
        }
        None
    }

    pub fn help_prompts(&self) -> Vec<HelpPrompt> {
        let accept = match self.cursor_entry().map(|e| e.kind()) {
            Some(EntryKind::Game) => "launch",
            _ => "open",
        };
        vec![
            HelpPrompt::new("up/down", "choose"),
            HelpPrompt::new("a", accept),
            HelpPrompt::new("b", "back"),
            HelpPrompt::new("left/right", "system"),
        ]
    }

    /// Depth of container descent (0 = system root).
    pub fn depth(&self) -> usize {
        self.cursor_stack.len()
    }

    fn populate(&mut self) {
        let source = self.cursor_stack.last().unwrap_or(&self.root);
        match source.children(None) {
            Ok(entries) => self.entries = entries,
            Err(err) => {
                warn!("listing {}/{} failed: {err}", self.system, source.file_id());
                self.entries.clear();
            }
        }
        if self.cursor >= self.entries.len() {
            self.cursor = 0;
        }
    }

    fn move_cursor(&mut self, delta: i32) {
        let len = self.entries.len() as i32;
        if len == 0 {
            return;
        }
        self.cursor = (((self.cursor as i32 + delta) % len + len) % len) as usize;
    }

    fn descend(&mut self, container: CatalogEntry) {
        self.cursor_stack.push(container);
        self.cursor = 0;
        self.populate();
    }

    fn ascend(&mut self) {
        let popped = self.cursor_stack.pop();
        self.populate();
        if let Some(container) = popped {
            self.set_cursor_to(container.file_id());
        }
    }

    fn invalidate_entry(&mut self, file_id: &str) {
        if let Some(entry) = self.entries.iter().find(|e| e.file_id() == file_id) {
            entry.invalidate_metadata();
        }
    }
}
