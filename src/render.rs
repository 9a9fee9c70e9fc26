//! Render seam.
//!
//! The navigator walks its scene once per frame and emits draw calls into a
//! `RenderSink`; rasterization, clipping and theming live in the host. The
//! offset handed with each call is the combined camera + parent translation
//! to apply to the view's world position.

use glam::Vec2;

use crate::views::{GameListView, SystemSelectView};

pub trait RenderSink {
    fn draw_system_select(&mut self, view: &SystemSelectView, offset: Vec2);
    fn draw_game_list(&mut self, view: &GameListView, offset: Vec2);
    /// Full-screen translucent overlay; called only when opacity is
    /// nonzero.
    fn draw_overlay(&mut self, opacity: f32);
}
