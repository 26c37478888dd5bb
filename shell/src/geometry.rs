//! Window geometry: desktop area, cascade placement and clamping.

use shared_types::WindowBounds;

/// The part of the viewport windows may occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesktopArea {
    pub width: i32,
    pub height: i32,
}

impl DesktopArea {
    pub fn from_viewport(viewport_width: i32, viewport_height: i32, taskbar_height: i32) -> Self {
        Self {
            width: viewport_width.max(0),
            height: viewport_height.saturating_sub(taskbar_height).max(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeLayout {
    pub origin: i32,
    pub step: i32,
    pub right_margin: i32,
    pub bottom_margin: i32,
}

/// Shrink a requested size so it fits inside the desktop area.
pub fn fit_size(width: i32, height: i32, area: DesktopArea) -> (i32, i32) {
    (width.clamp(0, area.width), height.clamp(0, area.height))
}

/// Initial position of the window opened while `open_count` windows already exist.
pub fn cascade_position(
    open_count: usize,
    width: i32,
    height: i32,
    area: DesktopArea,
    layout: CascadeLayout,
) -> (i32, i32) {
    let offset = i32::try_from(open_count)
        .unwrap_or(i32::MAX)
        .saturating_mul(layout.step);
    let along = layout.origin.saturating_add(offset);
    let x = along
        .min((area.width - width).saturating_sub(layout.right_margin))
        .max(0);
    let y = along
        .min((area.height - height).saturating_sub(layout.bottom_margin))
        .max(0);
    (x, y)
}

/// Keep the whole window inside the desktop area, shrinking it first if needed.
pub fn clamp_bounds(bounds: WindowBounds, area: DesktopArea) -> WindowBounds {
    let (width, height) = fit_size(bounds.width, bounds.height, area);
    WindowBounds {
        x: bounds.x.clamp(0, area.width - width),
        y: bounds.y.clamp(0, area.height - height),
        width,
        height,
    }
}

/// Move a window's origin while keeping it inside the desktop area.
pub fn clamp_origin(x: i32, y: i32, width: i32, height: i32, area: DesktopArea) -> (i32, i32) {
    let max_x = (area.width - width).max(0);
    let max_y = (area.height - height).max(0);
    (x.clamp(0, max_x), y.clamp(0, max_y))
}

pub fn maximized_bounds(area: DesktopArea) -> WindowBounds {
    WindowBounds {
        x: 0,
        y: 0,
        width: area.width,
        height: area.height,
    }
}
