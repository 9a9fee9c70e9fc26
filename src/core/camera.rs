//! Translation-only 2D camera.
//!
//! Views live at fixed world positions (one screen-width slot per system);
//! the camera's translation is what moves. The view whose position equals
//! the camera target is the one visually centered.

use glam::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    translation: Vec2,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current translation applied to world content.
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn set_translation(&mut self, translation: Vec2) {
        self.translation = translation;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.translation += delta;
    }

    /// The world point currently centered: content at `target()` renders
    /// at the origin.
    pub fn target(&self) -> Vec2 {
        -self.translation
    }

    /// Center `target` immediately, no animation.
    pub fn snap_to(&mut self, target: Vec2) {
        self.translation = -target;
    }
}

/// Axis-aligned world-space rectangle visible under a given translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub min: Vec2,
    pub max: Vec2,
}

impl Viewport {
    /// Inverse-transform the screen rectangle into world space.
    pub fn from_translation(translation: Vec2, screen: Vec2) -> Self {
        let min = -translation;
        Self {
            min,
            max: min + screen,
        }
    }

    /// Overlap test against a world-space box.
    pub fn intersects(&self, min: Vec2, max: Vec2) -> bool {
        max.x >= self.min.x && max.y >= self.min.y && min.x <= self.max.x && min.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_centers_the_target() {
        let mut camera = Camera::new();
        camera.snap_to(Vec2::new(2560.0, 720.0));
        assert_eq!(camera.translation(), Vec2::new(-2560.0, -720.0));
        assert_eq!(camera.target(), Vec2::new(2560.0, 720.0));
    }

    #[test]
    fn viewport_is_the_inverse_transformed_screen() {
        let mut camera = Camera::new();
        camera.snap_to(Vec2::new(1280.0, 0.0));
        let viewport = Viewport::from_translation(camera.translation(), Vec2::new(1280.0, 720.0));
        assert_eq!(viewport.min, Vec2::new(1280.0, 0.0));
        assert_eq!(viewport.max, Vec2::new(2560.0, 720.0));
    }

    #[test]
    fn intersection_includes_touching_edges() {
        let viewport = Viewport {
            min: Vec2::ZERO,
            max: Vec2::new(100.0, 100.0),
        };
        assert!(viewport.intersects(Vec2::new(100.0, 0.0), Vec2::new(200.0, 50.0)));
        assert!(!viewport.intersects(Vec2::new(100.1, 0.0), Vec2::new(200.0, 50.0)));
        assert!(viewport.intersects(Vec2::new(-50.0, -50.0), Vec2::new(0.0, 0.0)));
    }
}
