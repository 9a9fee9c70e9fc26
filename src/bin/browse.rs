//! Headless demo of the navigation core.
//!
//! Wires an in-memory store with a few systems to the navigator and runs a
//! scripted browsing session on a simulated frame loop: carousel → game
//! list → folder descent → launch → back. Draw calls land in the log at
//! debug level (`RUST_LOG=debug` to see them).

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use glam::Vec2;
use log::{debug, info};

use romshelf::config::DEFAULT_SCREEN;
use romshelf::entities::keys::{K_DEVELOPER, K_GENRE, K_NAME, K_PLAYCOUNT, K_PLAYERS, K_RATING};
use romshelf::entities::{CatalogEntry, EntryKind, MetaRecord};
use romshelf::input::{Action, InputEvent, KeyMap};
use romshelf::prefs::{shared, AppPrefs};
use romshelf::render::RenderSink;
use romshelf::store::{
    Catalog, ChildRow, PlatformClass, SortSpec, SystemId, SystemInfo, SystemStore, Theme,
};
use romshelf::views::{GameListView, SystemSelectView, ViewNavigator};
use romshelf::{paths, TransitionStyle};

#[derive(Parser)]
#[command(name = "browse", about = "Headless demo of the romshelf navigation core")]
struct Cli {
    /// Transition style: fade or slide
    #[arg(long, default_value = "fade")]
    transition: String,

    /// Simulated frame delta in milliseconds
    #[arg(long, default_value_t = 16)]
    tick_ms: i32,

    /// Config directory override (else ROMSHELF_CONFIG_DIR / platform dir)
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

const CODE_UP: u32 = 1;
const CODE_DOWN: u32 = 2;
const CODE_ACCEPT: u32 = 3;
const CODE_BACK: u32 = 4;
const CODE_MENU: u32 = 5;
const CODE_LEFT: u32 = 6;
const CODE_RIGHT: u32 = 7;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let mut prefs = AppPrefs::default();
    let prefs_path = paths::config_file("prefs.json", cli.config_dir.as_deref());
    if prefs_path.exists() {
        prefs = AppPrefs::load(&prefs_path)?;
        info!("loaded prefs from {}", prefs_path.display());
    }
    prefs.transition_style = match cli.transition.as_str() {
        "slide" => TransitionStyle::Slide,
        _ => TransitionStyle::Fade,
    };

    let store = Arc::new(DemoStore::new());
    let catalog = Catalog::new(store, shared(prefs));
    let mut nav = ViewNavigator::new(catalog, DEFAULT_SCREEN);

    let mut map = KeyMap::new();
    map.bind(CODE_UP, Action::Up)
        .bind(CODE_DOWN, Action::Down)
        .bind(CODE_ACCEPT, Action::Accept)
        .bind(CODE_BACK, Action::Back)
        .bind(CODE_MENU, Action::Menu)
        .bind(CODE_LEFT, Action::Left)
        .bind(CODE_RIGHT, Action::Right);

    nav.go_to_start();
    run_frames(&mut nav, cli.tick_ms, 2000);

    let script: &[(&str, u32)] = &[
        ("carousel right", CODE_RIGHT),
        ("enter system", CODE_ACCEPT),
        ("cursor down", CODE_DOWN),
        ("open folder", CODE_ACCEPT),
        ("launch game", CODE_ACCEPT),
        ("leave folder", CODE_BACK),
        ("next system", CODE_RIGHT),
        ("back to carousel", CODE_BACK),
        ("open menu", CODE_MENU),
    ];

    for (label, code) in script {
        info!("--- {label}");
        nav.input(&map, &InputEvent::new(0, *code, 1));
        nav.input(&map, &InputEvent::new(0, *code, 0));
        run_frames(&mut nav, cli.tick_ms, 4000);

        for event in nav.poll_events() {
            info!("host event: {event:?}");
        }
        report(&mut nav);
    }

    info!("session done");
    Ok(())
}

/// Tick the navigator and draw each frame until `total_ms` has elapsed.
fn run_frames(nav: &mut ViewNavigator, tick_ms: i32, total_ms: i32) {
    let mut sink = LogSink;
    let mut elapsed = 0;
    while elapsed < total_ms {
        nav.update(tick_ms);
        nav.render(Vec2::ZERO, &mut sink);
        elapsed += tick_ms;
    }
}

fn report(nav: &mut ViewNavigator) {
    let cursor = nav
        .current_system()
        .cloned()
        .and_then(|system| {
            let view = nav.game_list_view(&system);
            view.cursor_entry().map(|e| e.name().unwrap_or_default())
        })
        .unwrap_or_default();
    info!(
        "state: {:?} system={:?} camera={} fade={:.2} cursor={:?}",
        nav.viewing(),
        nav.current_system().map(|s| s.to_string()),
        nav.camera().target(),
        nav.fade_opacity(),
        cursor,
    );
}

/// Draw calls go to the debug log instead of a GPU.
struct LogSink;

impl RenderSink for LogSink {
    fn draw_system_select(&mut self, _view: &SystemSelectView, offset: Vec2) {
        debug!("draw carousel at {offset}");
    }

    fn draw_game_list(&mut self, view: &GameListView, offset: Vec2) {
        debug!(
            "draw {:?} list for {} at {offset} ({} entries)",
            view.kind(),
            view.system(),
            view.entries().len()
        );
    }

    fn draw_overlay(&mut self, opacity: f32) {
        debug!("draw overlay opacity={opacity:.2}");
    }
}

/// In-memory demo catalog: two real systems, one aggregate, a folder and a
/// filter, a handful of games.
struct DemoStore {
    systems: Vec<SystemInfo>,
    tree: HashMap<(String, String), Vec<ChildRow>>,
    records: RefCell<HashMap<(String, String), MetaRecord>>,
    theme_revisions: RefCell<HashMap<String, u64>>,
}

impl DemoStore {
    fn new() -> Self {
        let mut store = Self {
            systems: Vec::new(),
            tree: HashMap::new(),
            records: RefCell::new(HashMap::new()),
            theme_revisions: RefCell::new(HashMap::new()),
        };

        store.add_system("arcade", PlatformClass::Arcade, false);
        store.add_system("snes", PlatformClass::Generic, false);
        store.add_system("all", PlatformClass::Generic, true);

        store.add_game("arcade", "mslug.zip", "run and gun", 0.9);
        store.add_game("arcade", "sf2.zip", "fighting", 0.85);
        store.add_game("arcade", "pacman.zip", "maze", 0.8);

        store.add_folder("snes", "rpg", "RPGs");
        store.add_game("snes", "rpg/Chrono Quest (USA).sfc", "rpg", 0.95);
        store.add_game("snes", "rpg/Mana Saga (Europe) [!].sfc", "rpg", 0.9);
        store.add_game("snes", "Racer X (USA).sfc", "racing", 0.6);
        store.add_filter("snes", "filters/best-rpgs", "rpg", 2);

        // The aggregate lists every game across systems.
        let mut rows: Vec<ChildRow> = Vec::new();
        for ((system, _), children) in &store.tree {
            if system != "all" {
                rows.extend(children.iter().filter(|r| r.kind == EntryKind::Game).cloned());
            }
        }
        store.tree.insert(("all".into(), "".into()), rows);

        store
    }

    fn add_system(&mut self, id: &str, platform: PlatformClass, aggregate: bool) {
        self.systems.push(SystemInfo {
            id: SystemId::from(id),
            fullname: id.to_uppercase(),
            platform,
            aggregate,
        });
    }

    fn add_game(&mut self, system: &str, file_id: &str, genre: &str, rating: f32) {
        let mut record = MetaRecord::new(EntryKind::Game);
        record.set(K_GENRE, genre).ok();
        record.set(K_RATING, format!("{rating:.6}")).ok();
        self.records
            .borrow_mut()
            .insert((system.to_string(), file_id.to_string()), record);

        let parent = match file_id.rsplit_once('/') {
            Some((dir, _)) => dir.to_string(),
            None => String::new(),
        };
        self.tree
            .entry((system.to_string(), parent))
            .or_default()
            .push(ChildRow {
                file_id: file_id.to_string(),
                kind: EntryKind::Game,
                name: None,
            });
    }

    fn add_folder(&mut self, system: &str, file_id: &str, name: &str) {
        self.tree
            .entry((system.to_string(), String::new()))
            .or_default()
            .push(ChildRow {
                file_id: file_id.to_string(),
                kind: EntryKind::Folder,
                name: Some(name.to_string()),
            });
    }

    fn add_filter(&mut self, system: &str, file_id: &str, genre_match: &str, limit: i32) {
        let mut record = MetaRecord::new(EntryKind::Filter);
        record.set(K_NAME, format!("Best of {genre_match}")).ok();
        record.set(K_GENRE, genre_match).ok();
        record.set(K_PLAYERS, limit.to_string()).ok();
        record.set(K_DEVELOPER, "rating DESC").ok();
        self.records
            .borrow_mut()
            .insert((system.to_string(), file_id.to_string()), record);

        self.tree
            .entry((system.to_string(), String::new()))
            .or_default()
            .push(ChildRow {
                file_id: file_id.to_string(),
                kind: EntryKind::Filter,
                name: None,
            });
    }

    fn rating_of(&self, system: &SystemId, file_id: &str) -> f32 {
        self.records
            .borrow()
            .get(&(system.as_str().to_string(), file_id.to_string()))
            .and_then(|r| r.get_rating(K_RATING).ok())
            .unwrap_or(0.0)
    }

    fn sort_rows(&self, system: &SystemId, mut rows: Vec<ChildRow>, folders_first: bool, sort: &SortSpec) -> Vec<ChildRow> {
        match sort.order_by.as_str() {
            "rating DESC" => rows.sort_by(|a, b| {
                self.rating_of(system, &b.file_id)
                    .total_cmp(&self.rating_of(system, &a.file_id))
            }),
            "name DESC" => rows.sort_by(|a, b| b.file_id.cmp(&a.file_id)),
            _ => rows.sort_by(|a, b| a.file_id.cmp(&b.file_id)),
        }
        if folders_first {
            rows.sort_by_key(|r| r.kind == EntryKind::Game);
        }
        rows
    }

    /// Every game row of a system, folders flattened.
    fn all_games(&self, system: &SystemId) -> Vec<ChildRow> {
        self.tree
            .iter()
            .filter(|((sys, _), _)| sys == system.as_str())
            .flat_map(|(_, rows)| rows.iter())
            .filter(|row| row.kind == EntryKind::Game)
            .cloned()
            .collect()
    }
}

impl SystemStore for DemoStore {
    fn systems(&self) -> Vec<SystemId> {
        self.systems.iter().map(|info| info.id.clone()).collect()
    }

    fn system_info(&self, system: &SystemId) -> Option<SystemInfo> {
        self.systems.iter().find(|info| info.id == *system).cloned()
    }

    fn theme(&self, system: &SystemId) -> Theme {
        Theme {
            set: "carbon".to_string(),
            revision: self
                .theme_revisions
                .borrow()
                .get(system.as_str())
                .copied()
                .unwrap_or(0),
        }
    }

    fn load_theme(&self, system: &SystemId) -> Theme {
        *self
            .theme_revisions
            .borrow_mut()
            .entry(system.as_str().to_string())
            .or_insert(0) += 1;
        self.theme(system)
    }

    fn has_entry_with_image(&self, system: &SystemId) -> bool {
        // Only the home systems ship artwork in this demo.
        system.as_str() != "all"
    }

    fn get_record(&self, file_id: &str, system: &SystemId) -> MetaRecord {
        self.records
            .borrow()
            .get(&(system.as_str().to_string(), file_id.to_string()))
            .cloned()
            .unwrap_or_else(|| MetaRecord::new(EntryKind::Game))
    }

    fn put_record(&self, file_id: &str, system: &SystemId, _kind: EntryKind, record: &MetaRecord) {
        self.records
            .borrow_mut()
            .insert((system.as_str().to_string(), file_id.to_string()), record.clone());
    }

    fn direct_children(
        &self,
        file_id: &str,
        system: &SystemId,
        _include_files: bool,
        include_folders: bool,
        folders_first: bool,
        sort: &SortSpec,
    ) -> Vec<ChildRow> {
        let rows = self
            .tree
            .get(&(system.as_str().to_string(), file_id.to_string()))
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|row| include_folders || row.kind != EntryKind::Folder)
            .collect();
        self.sort_rows(system, rows, folders_first, sort)
    }

    fn recursive_descendants(
        &self,
        _file_id: &str,
        system: &SystemId,
        _include_files: bool,
        include_folders: bool,
        folders_first: bool,
        sort: &SortSpec,
    ) -> Vec<ChildRow> {
        let mut rows = self.all_games(system);
        if include_folders {
            rows.extend(
                self.tree
                    .get(&(system.as_str().to_string(), String::new()))
                    .into_iter()
                    .flatten()
                    .filter(|row| row.kind == EntryKind::Folder)
                    .cloned(),
            );
        }
        self.sort_rows(system, rows, folders_first, sort)
    }

    fn filtered_children(
        &self,
        _file_id: &str,
        system: &SystemId,
        folders_first: bool,
        match_expr: &str,
        limit: i32,
        sort: &SortSpec,
    ) -> Vec<ChildRow> {
        // Demo-grade matching: the expression is a genre substring.
        let rows: Vec<ChildRow> = self
            .all_games(system)
            .into_iter()
            .filter(|row| {
                self.get_record(&row.file_id, system)
                    .get(K_GENRE)
                    .map(|genre| genre.contains(match_expr))
                    .unwrap_or(false)
            })
            .collect();
        let mut rows = self.sort_rows(system, rows, folders_first, sort);
        if limit > 0 {
            rows.truncate(limit as usize);
        }
        rows
    }

    fn launch_game(&self, entry: &CatalogEntry) -> anyhow::Result<()> {
        info!("pretending to emulate {}/{}", entry.system(), entry.file_id());
        let key = (
            entry.system().as_str().to_string(),
            entry.file_id().to_string(),
        );
        let mut records = self.records.borrow_mut();
        let record = records
            .entry(key)
            .or_insert_with(|| MetaRecord::new(EntryKind::Game));
        let count = record.get_parsed::<i32>(K_PLAYCOUNT).unwrap_or(0);
        record.set(K_PLAYCOUNT, (count + 1).to_string()).ok();
        Ok(())
    }
}
