//! View lifecycle and navigation state machine.
//!
//! Owns exactly one current screen (system carousel or one system's game
//! list), lazily builds and caches per-system views, and drives the camera
//! and fade animations that move between them. Long-lived: there is no
//! terminal state. Everything runs on the host's frame loop — one
//! `update` and one `render` per frame, no locking anywhere.
//!
//! Game-list views sit side by side in world space, one screen-width slot
//! per system. The carousel illusion comes from wrapping the camera by one
//! scene width (screen width × cached view count) instead of reordering
//! anything.

use std::sync::Arc;

use glam::Vec2;
use indexmap::IndexMap;
use log::{error, info, warn};
use uuid::Uuid;

use super::gamelist::{GameListKind, GameListView};
use super::system_select::SystemSelectView;
use super::ViewEvent;
use crate::config::{
    FADE_DURATION_MS, FADE_WAIT_MS, GAMELIST_PARK_ROWS, LAUNCH_FADE_MS, LAUNCH_IN_MS,
    LAUNCH_OUT_MS, SLIDE_DURATION_MS, SYSTEM_PARK_ROWS,
};
use crate::core::animation::{easing, Effect, TimedAnimation};
use crate::core::camera::{Camera, Viewport};
use crate::entities::{CatalogEntry, EntryKind};
use crate::error::CatalogError;
use crate::help::HelpPrompt;
use crate::input::{Action, DeviceConfig, InputEvent};
use crate::prefs::TransitionStyle;
use crate::render::RenderSink;
use crate::store::{Catalog, SystemId};

/// Which screen is current.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Viewing {
    Nothing,
    SystemSelect,
    GameList,
}

/// Requests surfaced to the host via [`ViewNavigator::poll_events`].
#[derive(Clone, Debug, PartialEq)]
pub enum NavEvent {
    /// User asked for the options menu; carries the system when a game
    /// list was current.
    MenuRequested { system: Option<SystemId> },
    /// The launch side effect ran (successfully or not).
    GameLaunched { system: SystemId, file_id: String },
}

/// Deferred work attached to an animation's completion.
#[derive(Clone, Debug)]
enum NavFinish {
    /// Full fade reached: snap the camera and play the fade-out half.
    FadeSnap { target: Vec2 },
    /// Out-leg done: run the blocking launch, then play the return leg.
    LaunchGame { entry: CatalogEntry, return_to: Vec2 },
    /// Return leg done: unlock input, statistics have changed.
    LaunchReturn { system: SystemId, file_id: String },
}

const SLOT_TRANSITION: usize = 0;
const SLOT_LAUNCH: usize = 1;
const SLOT_COUNT: usize = 2;

pub struct ViewNavigator {
    catalog: Arc<Catalog>,
    screen: Vec2,
    viewing: Viewing,
    current_system: Option<SystemId>,
    camera: Camera,
    fade_opacity: f32,
    lock_input: bool,
    gamelist_views: IndexMap<SystemId, GameListView>,
    system_view: Option<SystemSelectView>,
    slots: [Option<TimedAnimation<NavFinish>>; SLOT_COUNT],
    events: Vec<NavEvent>,
}

impl ViewNavigator {
    pub fn new(catalog: Arc<Catalog>, screen: Vec2) -> Self {
        Self {
            catalog,
            screen,
            viewing: Viewing::Nothing,
            current_system: None,
            camera: Camera::new(),
            fade_opacity: 0.0,
            lock_input: false,
            gamelist_views: IndexMap::new(),
            system_view: None,
            slots: [None, None],
            events: Vec::new(),
        }
    }

    pub fn viewing(&self) -> Viewing {
        self.viewing
    }

    pub fn current_system(&self) -> Option<&SystemId> {
        self.current_system.as_ref()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn fade_opacity(&self) -> f32 {
        self.fade_opacity
    }

    pub fn input_locked(&self) -> bool {
        self.lock_input
    }

    /// Drain pending host requests.
    pub fn poll_events(&mut self) -> Vec<NavEvent> {
        std::mem::take(&mut self.events)
    }

    // === Navigation ===

    /// Boot entry point: the first system's carousel slot.
    pub fn go_to_start(&mut self) {
        match self.catalog.store.systems().into_iter().next() {
            Some(first) => self.go_to_system_select(&first),
            None => warn!("no systems in catalog, staying on Nothing"),
        }
    }

    pub fn go_to_system_select(&mut self, system: &SystemId) {
        self.viewing = Viewing::SystemSelect;
        self.current_system = Some(system.clone());

        let slot_x = self.system_index(system) as f32 * self.screen.x;
        let view = self.ensure_system_view();
        let park_y = view.position().y;
        view.set_position(Vec2::new(slot_x, park_y));
        view.go_to_system(system);

        self.fade_opacity = 0.0;
        self.play_view_transition();
    }

    /// Switch to `system`'s game list. `direction` is the travel direction
    /// (negative = backward) and decides which way the carousel wraps when
    /// the destination would sit behind the camera.
    pub fn go_to_game_list(&mut self, system: &SystemId, direction: i32) {
        if self.viewing == Viewing::SystemSelect {
            // Re-slot the carousel to the target system, shifting the
            // camera by the same amount so nothing visibly jumps.
            let slot_x = self.system_index(system) as f32 * self.screen.x;
            let shift = {
                let view = self.ensure_system_view();
                let shift = slot_x - view.position().x;
                let park_y = view.position().y;
                view.set_position(Vec2::new(slot_x, park_y));
                shift
            };
            self.camera.translate(Vec2::new(-shift, 0.0));

            // Aggregate contents are computed from the other systems, so
            // entering one from the carousel refreshes its cached view.
            let aggregate = self
                .catalog
                .store
                .system_info(system)
                .map(|info| info.aggregate)
                .unwrap_or(false);
            if aggregate {
                self.on_files_changed(Some(system));
            }
        }

        self.viewing = Viewing::GameList;
        self.current_system = Some(system.clone());
        self.ensure_game_list_view(system);

        let pos = self
            .gamelist_views
            .get(system)
            .map(|v| v.position())
            .unwrap_or_default();
        let scene_width = self.scene_width();
        if direction < 0 && pos.x > self.camera.target().x {
            self.camera.translate(Vec2::new(-scene_width, 0.0));
        }
        if direction > 0 && pos.x < self.camera.target().x {
            self.camera.translate(Vec2::new(scene_width, 0.0));
        }

        self.play_view_transition();
    }

    pub fn go_to_next_game_list(&mut self) {
        self.go_to_adjacent(1);
    }

    pub fn go_to_prev_game_list(&mut self) {
        self.go_to_adjacent(-1);
    }

    fn go_to_adjacent(&mut self, direction: i32) {
        if self.viewing != Viewing::GameList {
            warn!("adjacent-system navigation outside GameList, ignoring");
            return;
        }
        let Some(current) = self.current_system.clone() else {
            return;
        };
        let systems = self.catalog.store.systems();
        if systems.is_empty() {
            return;
        }
        let len = systems.len() as i32;
        let idx = systems.iter().position(|s| *s == current).unwrap_or(0) as i32;
        let target = systems[(((idx + direction) % len + len) % len) as usize].clone();
        self.go_to_game_list(&target, direction);
    }

    /// Start the launch sequence for a game entry.
    ///
    /// Input stays locked from here until the return transition finishes;
    /// the statistics-changed notification fires at that same point, after
    /// the store has had its blocking chance to bump play counts.
    pub fn launch(&mut self, entry: &CatalogEntry) {
        if entry.kind() != EntryKind::Game {
            error!(
                "{}",
                CatalogError::InvalidLaunchTarget {
                    file_id: entry.file_id().to_string(),
                }
            );
            return;
        }

        // A leftover return leg must not fire its unlock under us.
        self.slots[SLOT_LAUNCH] = None;
        self.lock_input = true;

        let view_pos = self.current_view_position();
        let center = view_pos + self.screen * 0.5;
        let finish = NavFinish::LaunchGame {
            entry: entry.clone(),
            return_to: -view_pos,
        };

        let anim = match self.transition_style() {
            TransitionStyle::Fade => {
                TimedAnimation::new(Effect::Fade, LAUNCH_FADE_MS).then(finish)
            }
            TransitionStyle::Slide => TimedAnimation::new(
                Effect::LaunchZoom {
                    from: self.camera.translation(),
                    to: self.screen * 0.5 - center,
                    fade_in: false,
                },
                LAUNCH_OUT_MS,
            )
            .with_easing(easing::ease_out_cubic)
            .then(finish),
        };
        self.slots[SLOT_LAUNCH] = Some(anim);
        info!("launching {}/{}", entry.system(), entry.file_id());
    }

    // === View cache ===

    /// The cached game-list view for `system`, building it on miss.
    pub fn game_list_view(&mut self, system: &SystemId) -> &GameListView {
        self.ensure_game_list_view(system);
        &self.gamelist_views[system]
    }

    pub fn system_list_view(&mut self) -> &SystemSelectView {
        self.ensure_system_view()
    }

    pub fn game_list_view_count(&self) -> usize {
        self.gamelist_views.len()
    }

    /// Eagerly materialize every system's game-list view.
    pub fn preload(&mut self) {
        for system in self.catalog.store.systems() {
            self.ensure_game_list_view(&system);
        }
    }

    fn ensure_game_list_view(&mut self, system: &SystemId) {
        if self.gamelist_views.contains_key(system) {
            return;
        }

        let root = self.catalog.root_entry(system);
        let kind = if self.catalog.store.has_entry_with_image(system) {
            GameListKind::Detailed
        } else {
            GameListKind::Basic
        };
        let theme = self.catalog.store.theme(system);
        let mut view = GameListView::new(root, kind, theme);
        view.set_position(Vec2::new(
            self.system_index(system) as f32 * self.screen.x,
            self.screen.y * GAMELIST_PARK_ROWS,
        ));
        view.set_size(self.screen);

        info!("built {kind:?} game list view for {system}");
        self.gamelist_views.insert(system.clone(), view);
    }

    fn ensure_system_view(&mut self) -> &mut SystemSelectView {
        let screen = self.screen;
        let store = &self.catalog.store;
        self.system_view.get_or_insert_with(|| {
            let mut view = SystemSelectView::new(store.systems());
            view.set_position(Vec2::new(0.0, screen.y * SYSTEM_PARK_ROWS));
            view.set_size(screen);
            info!("built system select view");
            view
        })
    }

    // === Change propagation ===

    /// `None` notifies every cached view. Keys are snapshotted first: a
    /// notification can rebuild a view, which would invalidate live
    /// iteration over the cache.
    pub fn on_files_changed(&mut self, system: Option<&SystemId>) {
        match system {
            Some(system) => {
                if let Some(view) = self.gamelist_views.get_mut(system) {
                    view.on_files_changed();
                }
            }
            None => {
                let systems: Vec<SystemId> = self.gamelist_views.keys().cloned().collect();
                for system in systems {
                    if let Some(view) = self.gamelist_views.get_mut(&system) {
                        view.on_files_changed();
                    }
                }
            }
        }
    }

    /// No-op when the system's view is not materialized; it will see fresh
    /// data on first construction.
    pub fn on_meta_data_changed(&mut self, system: &SystemId, file_id: &str) {
        if let Some(view) = self.gamelist_views.get_mut(system) {
            view.on_meta_data_changed(file_id);
        }
    }

    pub fn on_statistics_changed(&mut self, system: &SystemId, file_id: &str) {
        if let Some(view) = self.gamelist_views.get_mut(system) {
            view.on_statistics_changed(file_id);
        }
    }

    // === Reload ===

    /// Rebuild the cached view with instance id `view_id`, preserving its
    /// cursor. The current-view reference needs no fixing up: it is
    /// resolved from `(viewing, current_system)`, never from a stale
    /// pointer.
    pub fn reload_game_list(&mut self, view_id: Uuid, reload_theme: bool) {
        let Some(system) = self
            .gamelist_views
            .iter()
            .find(|(_, view)| view.id() == view_id)
            .map(|(system, _)| system.clone())
        else {
            warn!("reload requested for unknown view {view_id}");
            return;
        };

        let cursor = self
            .gamelist_views
            .get(&system)
            .and_then(|v| v.cursor_file_id());
        self.gamelist_views.shift_remove(&system);

        if reload_theme {
            self.catalog.store.load_theme(&system);
        }

        self.ensure_game_list_view(&system);
        if let (Some(view), Some(cursor)) = (self.gamelist_views.get_mut(&system), cursor) {
            view.set_cursor_to(&cursor);
        }
    }

    /// Tear down and rebuild every cached view (themes reloaded), keeping
    /// each system's cursor, then re-resolve the current screen from
    /// logical state.
    pub fn reload_all(&mut self) {
        let cursors: Vec<(SystemId, Option<String>)> = self
            .gamelist_views
            .iter()
            .map(|(system, view)| (system.clone(), view.cursor_file_id()))
            .collect();
        self.gamelist_views.clear();

        for (system, cursor) in cursors {
            self.catalog.store.load_theme(&system);
            self.ensure_game_list_view(&system);
            if let (Some(view), Some(cursor)) = (self.gamelist_views.get_mut(&system), cursor) {
                view.set_cursor_to(&cursor);
            }
        }

        self.system_view = None;
        self.ensure_system_view();

        match self.viewing {
            Viewing::GameList => {
                if let Some(system) = self.current_system.clone() {
                    self.ensure_game_list_view(&system);
                }
            }
            Viewing::SystemSelect => {
                if let Some(system) = self.current_system.clone() {
                    if let Some(view) = self.system_view.as_mut() {
                        view.go_to_system(&system);
                    }
                }
            }
            Viewing::Nothing => self.go_to_start(),
        }
    }

    // === Frame loop ===

    pub fn update(&mut self, delta_ms: i32) {
        for slot in 0..SLOT_COUNT {
            self.advance_slot(slot, delta_ms);
        }
    }

    /// Emit this frame's draw calls: the carousel, every cached game list
    /// intersecting the viewport (twice when the viewport hangs past an
    /// edge of the scene — the horizontal wrap), and the fade overlay.
    pub fn render(&mut self, parent: Vec2, sink: &mut dyn RenderSink) {
        let trans = self.camera.translation() + parent;

        self.ensure_system_view();
        if let Some(view) = &self.system_view {
            sink.draw_system_select(view, trans);
        }

        let viewport = Viewport::from_translation(trans, self.screen);
        let scene_width = self.scene_width();

        let mut wrap_trans = None;
        if viewport.min.x < 0.0 {
            wrap_trans = Some(trans + Vec2::new(-scene_width, 0.0));
        }
        if viewport.max.x > scene_width {
            wrap_trans = Some(trans + Vec2::new(scene_width, 0.0));
        }
        let wrap_viewport = wrap_trans.map(|t| Viewport::from_translation(t, self.screen));

        for view in self.gamelist_views.values() {
            let min = view.position();
            let max = min + view.size();
            if viewport.intersects(min, max) {
                sink.draw_game_list(view, trans);
            }
            if let (Some(wrap_trans), Some(wrap_viewport)) = (wrap_trans, wrap_viewport) {
                if wrap_viewport.intersects(min, max) {
                    sink.draw_game_list(view, wrap_trans);
                }
            }
        }

        if self.fade_opacity > 0.0 {
            sink.draw_overlay(self.fade_opacity);
        }
    }

    /// Returns true when the event was consumed. Everything is consumed
    /// while input is locked (launch in flight).
    pub fn input(&mut self, config: &dyn DeviceConfig, event: &InputEvent) -> bool {
        if self.lock_input {
            return true;
        }

        if config.maps_to(Action::Menu, event) && event.pressed() {
            let system = match self.viewing {
                Viewing::GameList => self.current_system.clone(),
                _ => None,
            };
            self.events.push(NavEvent::MenuRequested { system });
            return true;
        }

        let view_event = match self.viewing {
            Viewing::Nothing => return false,
            Viewing::SystemSelect => {
                self.ensure_system_view();
                self.system_view
                    .as_mut()
                    .and_then(|view| view.input(config, event))
            }
            Viewing::GameList => {
                let Some(system) = self.current_system.clone() else {
                    return false;
                };
                self.ensure_game_list_view(&system);
                self.gamelist_views
                    .get_mut(&system)
                    .and_then(|view| view.input(config, event))
            }
        };

        let Some(view_event) = view_event else {
            return false;
        };
        match view_event {
            ViewEvent::Consumed => {}
            ViewEvent::Launch(entry) => self.launch(&entry),
            ViewEvent::EnterSystem(system) => self.go_to_game_list(&system, 0),
            ViewEvent::LeaveToSystemSelect => {
                if let Some(system) = self.current_system.clone() {
                    self.go_to_system_select(&system);
                }
            }
            ViewEvent::NextSystem => self.go_to_next_game_list(),
            ViewEvent::PrevSystem => self.go_to_prev_game_list(),
        }
        true
    }

    pub fn help_prompts(&self) -> Vec<HelpPrompt> {
        let mut prompts = match self.viewing {
            Viewing::Nothing => return Vec::new(),
            Viewing::SystemSelect => self
                .system_view
                .as_ref()
                .map(|view| view.help_prompts())
                .unwrap_or_default(),
            Viewing::GameList => self
                .current_system
                .as_ref()
                .and_then(|system| self.gamelist_views.get(system))
                .map(|view| view.help_prompts())
                .unwrap_or_default(),
        };
        prompts.push(HelpPrompt::new("select", "menu"));
        prompts
    }

    // === Transitions ===

    /// Animate the camera to the current view.
    ///
    /// Fade style ramps opacity to full, snaps the camera at the midpoint,
    /// then ramps back down. A fade requested mid-fade cancels the old
    /// record and fast-forwards the new one from the current opacity, so
    /// the second half of a prior transition is resumed, never replayed.
    fn play_view_transition(&mut self) {
        let target = self.current_view_position();
        if target == self.camera.target() && self.slots[SLOT_TRANSITION].is_none() {
            return;
        }

        match self.transition_style() {
            TransitionStyle::Fade => {
                // Cancel whatever is in flight, leaving opacity where it is.
                self.slots[SLOT_TRANSITION] = None;
                self.slots[SLOT_TRANSITION] = Some(
                    TimedAnimation::new(Effect::Fade, FADE_DURATION_MS)
                        .then(NavFinish::FadeSnap { target }),
                );

                let faded_ms = (self.fade_opacity * FADE_DURATION_MS as f32) as i32;
                if target == self.camera.target() {
                    // Not changing screens: skip the first half entirely.
                    self.advance_slot(SLOT_TRANSITION, FADE_DURATION_MS);
                    self.advance_slot(SLOT_TRANSITION, FADE_WAIT_MS);
                    self.advance_slot(SLOT_TRANSITION, FADE_DURATION_MS - faded_ms);
                } else {
                    self.advance_slot(SLOT_TRANSITION, faded_ms);
                }
            }
            TransitionStyle::Slide => {
                self.slots[SLOT_TRANSITION] = Some(
                    TimedAnimation::new(
                        Effect::MoveCamera {
                            from: self.camera.translation(),
                            to: -target,
                        },
                        SLIDE_DURATION_MS,
                    )
                    .with_easing(easing::ease_out_cubic),
                );
            }
        }
    }

    fn advance_slot(&mut self, slot: usize, delta_ms: i32) {
        let Some(anim) = self.slots[slot].as_mut() else {
            return;
        };
        let finished = anim.advance(delta_ms);
        let progress = anim.progress();
        let effect = anim.effect;
        self.apply_effect(effect, progress);

        if finished {
            let payload = self.slots[slot].as_mut().and_then(|a| a.take_finish());
            self.slots[slot] = None;
            if let Some(action) = payload {
                self.handle_finish(action);
            }
        }
    }

    fn apply_effect(&mut self, effect: Effect, t: f32) {
        match effect {
            Effect::Fade => self.fade_opacity = t,
            Effect::MoveCamera { from, to } => self.camera.set_translation(from.lerp(to, t)),
            Effect::LaunchZoom { from, to, fade_in } => {
                self.camera.set_translation(from.lerp(to, t));
                self.fade_opacity = if fade_in { 1.0 - t } else { t };
            }
        }
    }

    fn handle_finish(&mut self, action: NavFinish) {
        match action {
            NavFinish::FadeSnap { target } => {
                self.camera.snap_to(target);
                self.slots[SLOT_TRANSITION] = Some(
                    TimedAnimation::new(Effect::Fade, FADE_DURATION_MS)
                        .with_delay(FADE_WAIT_MS)
                        .reversed(),
                );
            }
            NavFinish::LaunchGame { entry, return_to } => {
                // Blocking handoff; the store updates play statistics
                // before returning.
                if let Err(err) = self.catalog.store.launch_game(&entry) {
                    warn!("launch of {} failed: {err:#}", entry.file_id());
                }
                self.events.push(NavEvent::GameLaunched {
                    system: entry.system().clone(),
                    file_id: entry.file_id().to_string(),
                });

                let finish = NavFinish::LaunchReturn {
                    system: entry.system().clone(),
                    file_id: entry.file_id().to_string(),
                };
                let anim = match self.transition_style() {
                    TransitionStyle::Fade => {
                        TimedAnimation::new(Effect::Fade, LAUNCH_FADE_MS).reversed().then(finish)
                    }
                    TransitionStyle::Slide => TimedAnimation::new(
                        Effect::LaunchZoom {
                            from: self.camera.translation(),
                            to: return_to,
                            fade_in: true,
                        },
                        LAUNCH_IN_MS,
                    )
                    .with_easing(easing::ease_out_cubic)
                    .then(finish),
                };
                self.slots[SLOT_LAUNCH] = Some(anim);
            }
            NavFinish::LaunchReturn { system, file_id } => {
                self.lock_input = false;
                self.on_statistics_changed(&system, &file_id);
            }
        }
    }

    // === Helpers ===

    fn transition_style(&self) -> TransitionStyle {
        self.catalog
            .prefs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .transition_style
    }

    /// The horizontal period of the carousel: screen width times the
    /// number of game-list views materialized right now.
    fn scene_width(&self) -> f32 {
        self.screen.x * self.gamelist_views.len() as f32
    }

    fn system_index(&self, system: &SystemId) -> usize {
        self.catalog
            .store
            .systems()
            .iter()
            .position(|s| s == system)
            .unwrap_or(0)
    }

    fn current_view_position(&self) -> Vec2 {
        match self.viewing {
            Viewing::Nothing => Vec2::ZERO,
            Viewing::SystemSelect => self
                .system_view
                .as_ref()
                .map(|view| view.position())
                .unwrap_or(Vec2::ZERO),
            Viewing::GameList => self
                .current_system
                .as_ref()
                .and_then(|system| self.gamelist_views.get(system))
                .map(|view| view.position())
                .unwrap_or(Vec2::ZERO),
        }
    }
}
