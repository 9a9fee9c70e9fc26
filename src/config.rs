//! Tunable constants shared across the crate.

use glam::Vec2;

/// Logical screen size used when the host does not override it.
pub const DEFAULT_SCREEN: Vec2 = Vec2::new(1280.0, 720.0);

/// Duration of one half of a fade transition (in then out).
pub const FADE_DURATION_MS: i32 = 240;

/// Hold time between the fade-in and fade-out halves.
pub const FADE_WAIT_MS: i32 = 320;

/// Duration of a camera slide between views.
pub const SLIDE_DURATION_MS: i32 = 400;

/// Zoom/fade-out duration before handing off to the emulator.
pub const LAUNCH_OUT_MS: i32 = 1500;

/// Zoom/fade-in duration when control returns from the emulator.
pub const LAUNCH_IN_MS: i32 = 600;

/// Fade duration for launch sequences in "fade" transition style.
pub const LAUNCH_FADE_MS: i32 = 800;

/// Game-list views park this many screen heights below the origin until
/// the camera travels to them.
pub const GAMELIST_PARK_ROWS: f32 = 2.0;

/// The system carousel parks one screen height below the origin.
pub const SYSTEM_PARK_ROWS: f32 = 1.0;
