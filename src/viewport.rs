//! Viewport sizing and the double-click fullscreen toggle.

use std::time::{Duration, Instant};

/// Drawing-buffer pixel ratio never exceeds this, even on denser displays.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Two clicks closer than this in time form a double-click.
pub const DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(400);

/// Two clicks farther apart than this (logical pixels) never form a double-click.
pub const DOUBLE_CLICK_SLOP: f64 = 4.0;

/// Window size in logical pixels plus the display's scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Build from the window's physical size and scale factor.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::new(width as f64 / scale, height as f64 / scale, scale)
    }

    /// Device pixel ratio clamped to [`MAX_PIXEL_RATIO`].
    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.min(MAX_PIXEL_RATIO)
    }

    /// Width over height, used as the camera aspect.
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            (self.width / self.height) as f32
        } else {
            1.0
        }
    }

    /// Size of the offscreen scene target: logical size times the clamped
    /// pixel ratio, at least 1x1.
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        let w = (self.width * ratio).round().max(1.0) as u32;
        let h = (self.height * ratio).round().max(1.0) as u32;
        (w, h)
    }

    /// Whether the window currently has no visible area.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Everything a window resize changes.
///
/// Apply in field order: viewport, then camera aspect, then the surface and
/// the drawing buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resize {
    pub viewport: Viewport,
    pub aspect: f32,
    /// Swapchain size in physical pixels.
    pub surface: (u32, u32),
    /// Offscreen scene target size.
    pub drawing_buffer: (u32, u32),
}

impl Resize {
    /// Plan a resize to a physical window size. `None` while the window has
    /// no visible area, so a minimized window keeps its last layout.
    pub fn plan(width: u32, height: u32, scale_factor: f64) -> Option<Self> {
        let viewport = Viewport::from_physical(width, height, scale_factor);
        if viewport.is_degenerate() {
            return None;
        }
        Some(Self {
            viewport,
            aspect: viewport.aspect(),
            surface: (width, height),
            drawing_buffer: viewport.drawing_buffer_size(),
        })
    }
}

/// Turns a stream of left clicks into double-click events.
#[derive(Debug, Clone, Default)]
pub struct DoubleClickDetector {
    last_click: Option<(Instant, (f64, f64))>,
}

impl DoubleClickDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a click at `position` (logical pixels). Returns `true` when it
    /// completes a double-click. A completed double-click is consumed, so a
    /// third quick click starts a new pair.
    pub fn click(&mut self, now: Instant, position: (f64, f64)) -> bool {
        if let Some((at, (x, y))) = self.last_click {
            let close_in_time = now.saturating_duration_since(at) <= DOUBLE_CLICK_INTERVAL;
            let (dx, dy) = (position.0 - x, position.1 - y);
            let close_in_space = (dx * dx + dy * dy).sqrt() <= DOUBLE_CLICK_SLOP;
            if close_in_time && close_in_space {
                self.last_click = None;
                return true;
            }
        }
        self.last_click = Some((now, position));
        false
    }

    /// Forget a pending first click.
    pub fn reset(&mut self) {
        self.last_click = None;
    }
}
