//! Input seam.
//!
//! Device handling lives in the host: raw events arrive here already tagged
//! with a device id and code, and a `DeviceConfig` answers whether an event
//! maps to a logical action. The navigator and views only ever reason about
//! `Action`s.

use std::collections::HashMap;

/// Logical actions the navigation core understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Accept,
    Back,
    Menu,
}

/// A raw input event from the host. `value == 0` means release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub device: i32,
    pub code: u32,
    pub value: i32,
}

impl InputEvent {
    pub fn new(device: i32, code: u32, value: i32) -> Self {
        Self {
            device,
            code,
            value,
        }
    }

    pub fn pressed(&self) -> bool {
        self.value != 0
    }
}

/// Per-device mapping from raw events to logical actions.
pub trait DeviceConfig {
    fn maps_to(&self, action: Action, event: &InputEvent) -> bool;
}

/// Straight code-to-action table. Enough for keyboards, demos and tests;
/// real controller mapping belongs to the host.
#[derive(Clone, Debug, Default)]
pub struct KeyMap {
    bindings: HashMap<u32, Action>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, code: u32, action: Action) -> &mut Self {
        self.bindings.insert(code, action);
        self
    }
}

impl DeviceConfig for KeyMap {
    fn maps_to(&self, action: Action, event: &InputEvent) -> bool {
        self.bindings.get(&event.code) == Some(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keymap_maps_bound_codes_only() {
        let mut map = KeyMap::new();
        map.bind(13, Action::Accept).bind(27, Action::Back);

        let accept = InputEvent::new(0, 13, 1);
        let other = InputEvent::new(0, 99, 1);

        assert!(map.maps_to(Action::Accept, &accept));
        assert!(!map.maps_to(Action::Back, &accept));
        assert!(!map.maps_to(Action::Accept, &other));
    }

    #[test]
    fn release_events_are_not_presses() {
        let ev = InputEvent::new(0, 13, 0);
        assert!(!ev.pressed());
    }
}
