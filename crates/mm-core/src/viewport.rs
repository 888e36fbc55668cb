//! Screen ↔ canvas coordinate transform.
//!
//! Screen space is pointer pixels; canvas space is where nodes live. The
//! canvas surface sits at `origin` on screen, is shifted by `pan` (screen
//! pixels) and scaled by `scale`:
//!
//! ```text
//! screen = origin + pan + canvas * scale
//! ```
//!
//! View state is never part of a snapshot and never enters history.

use crate::config::CanvasConfig;

/// Pan offset and zoom scale of the canvas view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub pan_x: f64,
    pub pan_y: f64,
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            scale: 1.0,
        }
    }
}

/// Top-left corner of the canvas surface in screen space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Origin {
    pub x: f64,
    pub y: f64,
}

impl ViewTransform {
    pub fn screen_to_canvas(&self, origin: Origin, sx: f64, sy: f64) -> (f64, f64) {
        (
            (sx - origin.x - self.pan_x) / self.scale,
            (sy - origin.y - self.pan_y) / self.scale,
        )
    }

    pub fn canvas_to_screen(&self, origin: Origin, cx: f64, cy: f64) -> (f64, f64) {
        (
            cx * self.scale + self.pan_x + origin.x,
            cy * self.scale + self.pan_y + origin.y,
        )
    }

    /// Shift the view by a screen-space pointer delta. Independent of scale.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Zoom one wheel notch around the screen point `(sx, sy)`.
    ///
    /// Positive `delta_y` (wheel down) zooms out, anything else zooms in.
    /// The canvas point under the cursor stays under the cursor. A notch
    /// that would leave `[min_scale, max_scale]` is ignored entirely.
    ///
    /// Returns `true` if the view changed.
    pub fn zoom_at(
        &mut self,
        origin: Origin,
        sx: f64,
        sy: f64,
        delta_y: f64,
        config: &CanvasConfig,
    ) -> bool {
        let (cx, cy) = self.screen_to_canvas(origin, sx, sy);
        let new_scale = if delta_y > 0.0 {
            self.scale / config.zoom_factor
        } else {
            self.scale * config.zoom_factor
        };

        if !config.scale_in_range(new_scale) {
            return false;
        }

        self.pan_x += cx * (self.scale - new_scale);
        self.pan_y += cy * (self.scale - new_scale);
        self.scale = new_scale;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn identity_transform() {
        let v = ViewTransform::default();
        assert_eq!(v.screen_to_canvas(Origin::default(), 100.0, 50.0), (100.0, 50.0));
    }

    #[test]
    fn origin_and_pan_are_subtracted_before_scaling() {
        let v = ViewTransform {
            pan_x: 20.0,
            pan_y: -10.0,
            scale: 2.0,
        };
        let origin = Origin { x: 100.0, y: 50.0 };
        let (cx, cy) = v.screen_to_canvas(origin, 220.0, 140.0);
        assert_eq!((cx, cy), (50.0, 50.0));
        assert_eq!(v.canvas_to_screen(origin, cx, cy), (220.0, 140.0));
    }

    #[test]
    fn pan_ignores_scale() {
        let mut v = ViewTransform {
            scale: 2.5,
            ..Default::default()
        };
        v.pan_by(10.0, -4.0);
        assert_eq!((v.pan_x, v.pan_y), (10.0, -4.0));
    }

    #[test]
    fn zoom_keeps_cursor_point_fixed() {
        let config = CanvasConfig::default();
        let origin = Origin { x: 30.0, y: 40.0 };
        let mut v = ViewTransform {
            pan_x: 15.0,
            pan_y: -5.0,
            scale: 1.0,
        };
        let before = v.screen_to_canvas(origin, 300.0, 200.0);
        assert!(v.zoom_at(origin, 300.0, 200.0, -120.0, &config));
        assert!(close(v.scale, 1.1));
        let after = v.screen_to_canvas(origin, 300.0, 200.0);
        assert!(close(before.0, after.0));
        assert!(close(before.1, after.1));
    }

    #[test]
    fn zoom_out_divides() {
        let config = CanvasConfig::default();
        let mut v = ViewTransform::default();
        assert!(v.zoom_at(Origin::default(), 0.0, 0.0, 120.0, &config));
        assert!(close(v.scale, 1.0 / 1.1));
    }

    #[test]
    fn out_of_range_zoom_is_a_noop() {
        let config = CanvasConfig::default();
        let mut v = ViewTransform {
            pan_x: 7.0,
            pan_y: 9.0,
            scale: 2.9,
        };
        let before = v;
        assert!(!v.zoom_at(Origin::default(), 400.0, 300.0, -1.0, &config));
        assert_eq!(v, before);

        let mut v = ViewTransform {
            pan_x: 7.0,
            pan_y: 9.0,
            scale: 0.21,
        };
        let before = v;
        assert!(!v.zoom_at(Origin::default(), 400.0, 300.0, 1.0, &config));
        assert_eq!(v, before);
    }

    #[test]
    fn repeated_zoom_in_stops_below_max() {
        let config = CanvasConfig::default();
        let mut v = ViewTransform::default();
        let mut steps = 0;
        while v.zoom_at(Origin::default(), 0.0, 0.0, -1.0, &config) {
            steps += 1;
        }
        assert_eq!(steps, 11);
        assert!(v.scale <= config.max_scale);
    }
}
