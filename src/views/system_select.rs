//! System carousel view.
//!
//! One slot per system, one screen-width apart; the navigator slides the
//! whole strip so the selected slot sits under the camera.

use glam::Vec2;

use super::ViewEvent;
use crate::help::HelpPrompt;
use crate::input::{Action, DeviceConfig, InputEvent};
use crate::store::SystemId;

pub struct SystemSelectView {
    position: Vec2,
    size: Vec2,
    systems: Vec<SystemId>,
    cursor: usize,
}

impl SystemSelectView {
    pub fn new(systems: Vec<SystemId>) -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            systems,
            cursor: 0,
        }
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

    pub fn systems(&self) -> &[SystemId] {
        &self.systems
    }

    pub fn selected(&self) -> Option<&SystemId> {
        self.systems.get(self.cursor)
    }

    /// Put the cursor on `system` without animating.
    pub fn go_to_system(&mut self, system: &SystemId) {
        if let Some(idx) = self.systems.iter().position(|s| s == system) {
            self.cursor = idx;
        }
    }

    pub fn input(&mut self, config: &dyn DeviceConfig, event: &InputEvent) -> Option<ViewEvent> {
        if !event.pressed() {
            return None;
        }

        if config.maps_to(Action::Left, event) {
            self.move_cursor(-1);
            return Some(ViewEvent::Consumed);
        }
        if config.maps_to(Action::Right, event) {
            self.move_cursor(1);
            return Some(ViewEvent::Consumed);
        }
        if config.maps_to(Action::Accept, event) {
            return self.selected().cloned().map(ViewEvent::EnterSystem);
        }
        None
    }

    pub fn help_prompts(&self) -> Vec<HelpPrompt> {
        vec![
            HelpPrompt::new("left/right", "choose system"),
            HelpPrompt::new("a", "select"),
        ]
    }

    fn move_cursor(&mut self, delta: i32) {
        let len = self.systems.len() as i32;
        if len == 0 {
            return;
        }
        self.cursor = (((self.cursor as i32 + delta) % len + len) % len) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyMap;

    fn systems() -> Vec<SystemId> {
        vec![SystemId::from("nes"), SystemId::from("snes"), SystemId::from("arcade")]
    }

    fn keymap() -> KeyMap {
        let mut map = KeyMap::new();
        map.bind(10, Action::Left).bind(11, Action::Right).bind(12, Action::Accept);
        map
    }

    #[test]
    fn cursor_is_cyclic() {
        let mut view = SystemSelectView::new(systems());
        let map = keymap();
        view.input(&map, &InputEvent::new(0, 10, 1));
        assert_eq!(view.selected().unwrap().as_str(), "arcade");
        view.input(&map, &InputEvent::new(0, 11, 1));
        assert_eq!(view.selected().unwrap().as_str(), "nes");
    }

    #[test]
    fn accept_enters_the_selected_system() {
        let mut view = SystemSelectView::new(systems());
        view.go_to_system(&SystemId::from("snes"));
        let map = keymap();
        assert_eq!(
            view.input(&map, &InputEvent::new(0, 12, 1)),
            Some(ViewEvent::EnterSystem(SystemId::from("snes")))
        );
    }

    #[test]
    fn go_to_unknown_system_keeps_the_cursor() {
        let mut view = SystemSelectView::new(systems());
        view.go_to_system(&SystemId::from("snes"));
        view.go_to_system(&SystemId::from("missing"));
        assert_eq!(view.selected().unwrap().as_str(), "snes");
    }
}
