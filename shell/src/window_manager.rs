//! WindowManager - owns every open window, its taskbar proxy and its application
//!
//! One window per app id. The manager is the only place that mutates window
//! geometry, stacking, focus and drag state, and the single dispatch point for
//! keyboard input. Changes are queued as [`DesktopEvent`]s; resource work for
//! the host runtime is queued as [`ResourceChange`]s.

use serde_json::json;
use shared_types::{DesktopEvent, PointerTarget, TaskbarButton, WindowState};

use crate::apps::{AppContext, Application, ContentArea, KeyOutcome, TeardownHandle};
use crate::config::ShellConfig;
use crate::geometry::{self, DesktopArea};
use crate::ids;
use crate::keys::Key;
use crate::registry::AppRegistry;
use crate::resources::{ResourceChange, ResourceCounts, Resources, TimerId};

const TASKBAR_LABEL_LIMIT: usize = 18;
const TASKBAR_LABEL_KEEP: usize = 15;
const FIRST_Z_INDEX: u32 = 100;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("Window not found: {0}")]
    WindowNotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Taskbar text for a window title
pub fn taskbar_label(title: &str) -> String {
    if title.chars().count() > TASKBAR_LABEL_LIMIT {
        let kept: String = title.chars().take(TASKBAR_LABEL_KEEP).collect();
        format!("{kept}...")
    } else {
        title.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragAnchor {
    offset_x: i32,
    offset_y: i32,
}

struct OpenWindow {
    window: WindowState,
    taskbar: TaskbarButton,
    content: ContentArea,
    app: Box<dyn Application>,
    teardown: Option<TeardownHandle>,
    drag: Option<DragAnchor>,
}

pub struct WindowManager {
    config: ShellConfig,
    area: DesktopArea,
    registry: AppRegistry,
    /// Open windows in the order they were opened
    windows: Vec<OpenWindow>,
    active_window: Option<String>,
    next_z_index: u32,
    resources: Resources,
    events: Vec<DesktopEvent>,
}

impl std::fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowManager")
            .field("area", &self.area)
            .field("windows", &self.windows.len())
            .field("active_window", &self.active_window)
            .field("next_z_index", &self.next_z_index)
            .finish()
    }
}

impl WindowManager {
    pub fn new(config: ShellConfig, registry: AppRegistry) -> Self {
        let area = config.desktop_area();
        Self {
            config,
            area,
            registry,
            windows: Vec::new(),
            active_window: None,
            next_z_index: FIRST_Z_INDEX,
            resources: Resources::new(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn area(&self) -> DesktopArea {
        self.area
    }

    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn window(&self, window_id: &str) -> Option<&WindowState> {
        self.windows
            .iter()
            .find(|w| w.window.id == window_id)
            .map(|w| &w.window)
    }

    pub fn window_for_app(&self, app_id: &str) -> Option<&WindowState> {
        self.windows
            .iter()
            .find(|w| w.window.app_id == app_id)
            .map(|w| &w.window)
    }

    /// Every open window, bottom of the stack first
    pub fn windows(&self) -> Vec<WindowState> {
        let mut windows: Vec<WindowState> = self.windows.iter().map(|w| w.window.clone()).collect();
        windows.sort_by_key(|w| w.z_index);
        windows
    }

    pub fn taskbar(&self) -> Vec<TaskbarButton> {
        self.windows.iter().map(|w| w.taskbar.clone()).collect()
    }

    pub fn active_window(&self) -> Option<&str> {
        self.active_window.as_deref()
    }

    pub fn open_count(&self) -> usize {
        self.windows.len()
    }

    pub fn is_dragging(&self, window_id: &str) -> bool {
        self.index_of(window_id)
            .map(|idx| self.windows[idx].drag.is_some())
            .unwrap_or(false)
    }

    pub fn resource_counts(&self) -> ResourceCounts {
        self.resources.counts()
    }

    pub fn resources_owned_by(&self, window_id: &str) -> ResourceCounts {
        self.resources.owned_by(window_id)
    }

    pub fn drain_events(&mut self) -> Vec<DesktopEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_resource_changes(&mut self) -> Vec<ResourceChange> {
        self.resources.drain_changes()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Open a window for `app_id`, or bring its existing window forward.
    ///
    /// Returns the window id, or `None` for an unknown app id.
    pub fn open_or_focus(&mut self, app_id: &str) -> Option<String> {
        if let Some(existing) = self.windows.iter().find(|w| w.window.app_id == app_id) {
            let window_id = existing.window.id.clone();
            let result = if existing.window.minimized {
                self.restore(&window_id)
            } else {
                self.focus(&window_id)
            };
            if let Err(e) = result {
                tracing::warn!(window_id = %window_id, error = %e, "Could not raise existing window");
            }
            return Some(window_id);
        }

        let Some(entry) = self.registry.get(app_id).cloned() else {
            tracing::warn!(app_id = %app_id, "Unknown app id; no window created");
            return None;
        };
        let definition = entry.definition;

        let (width, height) =
            geometry::fit_size(definition.default_width, definition.default_height, self.area);
        let (x, y) = geometry::cascade_position(
            self.windows.len(),
            width,
            height,
            self.area,
            self.config.cascade(),
        );
        let window_id = ids::window_id();

        let window = WindowState {
            id: window_id.clone(),
            app_id: definition.id.clone(),
            title: definition.name.clone(),
            icon: definition.icon.clone(),
            x,
            y,
            width,
            height,
            z_index: 0,
            minimized: false,
            maximized: false,
            restore_bounds: None,
            props: json!({}),
        };
        let taskbar = TaskbarButton {
            window_id: window_id.clone(),
            app_id: definition.id.clone(),
            label: taskbar_label(&definition.name),
            icon: definition.icon.clone(),
            active: false,
        };
        let content = ContentArea {
            window_id: window_id.clone(),
            app_id: definition.id.clone(),
            template: definition.content_template.clone(),
            width,
            height,
        };

        self.windows.push(OpenWindow {
            window,
            taskbar,
            content,
            app: (entry.factory)(&self.config),
            teardown: None,
            drag: None,
        });
        let idx = self.windows.len() - 1;

        let teardown = self.with_app(idx, |app, cx| app.mount(cx));
        self.windows[idx].teardown = Some(teardown);
        self.events
            .push(DesktopEvent::WindowOpened(self.windows[idx].window.clone()));

        tracing::info!(
            window_id = %window_id,
            app_id = %app_id,
            x,
            y,
            width,
            height,
            "Window opened"
        );

        if let Err(e) = self.focus(&window_id) {
            tracing::warn!(window_id = %window_id, error = %e, "Could not focus new window");
        }
        Some(window_id)
    }

    pub fn focus(&mut self, window_id: &str) -> Result<(), ShellError> {
        let idx = self.require(window_id)?;
        if self.windows[idx].window.minimized {
            return Err(ShellError::InvalidOperation(
                "cannot focus minimized window".to_string(),
            ));
        }

        if let Some(previous) = self.active_window.take() {
            if previous != window_id {
                tracing::debug!(window_id = %previous, "Window deactivated");
            }
        }

        let z = self.next_z();
        for entry in &mut self.windows {
            entry.taskbar.active = false;
        }
        let entry = &mut self.windows[idx];
        entry.window.z_index = z;
        entry.taskbar.active = true;
        self.active_window = Some(window_id.to_string());

        self.events.push(DesktopEvent::WindowFocused {
            window_id: window_id.to_string(),
            z_index: z,
        });
        tracing::debug!(window_id = %window_id, z_index = z, "Window focused");
        Ok(())
    }

    pub fn minimize(&mut self, window_id: &str) -> Result<(), ShellError> {
        let idx = self.require(window_id)?;
        let entry = &mut self.windows[idx];
        if entry.window.minimized {
            return Ok(());
        }
        entry.window.minimized = true;
        entry.taskbar.active = false;
        entry.drag = None;

        self.events.push(DesktopEvent::WindowMinimized {
            window_id: window_id.to_string(),
        });
        tracing::info!(window_id = %window_id, "Window minimized");

        if self.active_window.as_deref() == Some(window_id) {
            self.active_window = None;
            self.focus_topmost();
        }
        Ok(())
    }

    pub fn restore(&mut self, window_id: &str) -> Result<(), ShellError> {
        let idx = self.require(window_id)?;
        let entry = &mut self.windows[idx];
        if entry.window.minimized {
            entry.window.minimized = false;
            self.events.push(DesktopEvent::WindowRestored {
                window_id: window_id.to_string(),
                bounds: entry.window.bounds(),
            });
            tracing::info!(window_id = %window_id, "Window restored");
        }
        self.focus(window_id)
    }

    pub fn toggle_maximize(&mut self, window_id: &str) -> Result<(), ShellError> {
        let idx = self.require(window_id)?;
        let area = self.area;
        let entry = &mut self.windows[idx];
        entry.window.minimized = false;

        if entry.window.maximized {
            let saved = entry
                .window
                .restore_bounds
                .take()
                .unwrap_or_else(|| entry.window.bounds());
            let bounds = geometry::clamp_bounds(saved, area);
            entry.window.set_bounds(bounds);
            entry.window.maximized = false;
            self.events.push(DesktopEvent::WindowRestored {
                window_id: window_id.to_string(),
                bounds,
            });
            tracing::info!(window_id = %window_id, "Window unmaximized");
        } else {
            entry.window.restore_bounds = Some(entry.window.bounds());
            let bounds = geometry::maximized_bounds(area);
            entry.window.set_bounds(bounds);
            entry.window.maximized = true;
            entry.drag = None;
            self.events.push(DesktopEvent::WindowMaximized {
                window_id: window_id.to_string(),
                bounds,
            });
            tracing::info!(window_id = %window_id, "Window maximized");
        }
        self.focus(window_id)
    }

    pub fn close(&mut self, window_id: &str) -> Result<(), ShellError> {
        let idx = self.require(window_id)?;

        let released = match self.windows[idx].teardown.take() {
            Some(handle) => handle.run(&mut self.resources),
            None => self.resources.release_window(window_id),
        };
        let entry = self.windows.remove(idx);

        self.events.push(DesktopEvent::WindowClosed {
            window_id: window_id.to_string(),
        });
        tracing::info!(
            window_id = %window_id,
            app_id = %entry.window.app_id,
            timers = released.timers,
            key_listeners = released.key_listeners,
            object_urls = released.object_urls,
            "Window closed"
        );

        if self.active_window.as_deref() == Some(window_id) {
            self.active_window = None;
            self.focus_topmost();
        }
        Ok(())
    }

    pub fn taskbar_click(&mut self, window_id: &str) -> Result<(), ShellError> {
        let idx = self.require(window_id)?;
        if self.windows[idx].window.minimized {
            self.restore(window_id)
        } else if self.active_window.as_deref() == Some(window_id) {
            self.minimize(window_id)
        } else {
            self.focus(window_id)
        }
    }

    // ========================================================================
    // Dragging
    // ========================================================================

    /// Start dragging from a title-bar press. Returns whether a drag began.
    pub fn begin_drag(
        &mut self,
        window_id: &str,
        x: i32,
        y: i32,
        target: PointerTarget,
    ) -> Result<bool, ShellError> {
        let idx = self.require(window_id)?;
        if target == PointerTarget::ControlButton {
            return Ok(false);
        }
        let window = &self.windows[idx].window;
        if window.maximized || window.minimized {
            return Ok(false);
        }

        self.focus(window_id)?;
        let entry = &mut self.windows[idx];
        entry.drag = Some(DragAnchor {
            offset_x: x.saturating_sub(entry.window.x),
            offset_y: y.saturating_sub(entry.window.y),
        });
        tracing::debug!(window_id = %window_id, "Drag started");
        Ok(true)
    }

    pub fn pointer_move(&mut self, x: i32, y: i32) {
        let area = self.area;
        for entry in &mut self.windows {
            let Some(anchor) = entry.drag else {
                continue;
            };
            let (nx, ny) = geometry::clamp_origin(
                x.saturating_sub(anchor.offset_x),
                y.saturating_sub(anchor.offset_y),
                entry.window.width,
                entry.window.height,
                area,
            );
            if (nx, ny) != (entry.window.x, entry.window.y) {
                entry.window.x = nx;
                entry.window.y = ny;
                self.events.push(DesktopEvent::WindowMoved {
                    window_id: entry.window.id.clone(),
                    x: nx,
                    y: ny,
                });
            }
        }
    }

    pub fn pointer_up(&mut self) {
        for entry in &mut self.windows {
            entry.drag = None;
        }
    }

    // ========================================================================
    // Input routing
    // ========================================================================

    /// Deliver a key to the active window if its application listens for keys.
    pub fn dispatch_key(&mut self, key: &Key) -> KeyOutcome {
        let Some(active) = self.active_window.clone() else {
            return KeyOutcome::Ignored;
        };
        if !self.resources.has_key_listener(&active) {
            return KeyOutcome::Ignored;
        }
        let Some(idx) = self.index_of(&active) else {
            return KeyOutcome::Ignored;
        };
        if self.windows[idx].window.minimized {
            return KeyOutcome::Ignored;
        }
        self.with_app(idx, |app, cx| app.on_key(cx, key))
    }

    /// Forward input to a window's application. Application errors are logged
    /// and do not affect other windows.
    pub fn app_input(
        &mut self,
        window_id: &str,
        input: shared_types::AppInput,
    ) -> Result<(), ShellError> {
        let idx = self.require(window_id)?;
        let app_id = self.windows[idx].window.app_id.clone();
        if let Err(e) = self.with_app(idx, |app, cx| app.on_input(cx, input)) {
            tracing::warn!(window_id = %window_id, app_id = %app_id, error = %e, "Application rejected input");
        }
        Ok(())
    }

    /// Run a timer callback. Returns false for timers that no longer exist.
    pub fn fire_timer(&mut self, timer: TimerId) -> bool {
        let Some(owner) = self.resources.timer_owner(timer).map(str::to_string) else {
            tracing::debug!(timer = timer.0, "Ignoring stale timer");
            return false;
        };
        let Some(idx) = self.index_of(&owner) else {
            self.resources.cancel_timer(&owner, timer);
            return false;
        };
        self.with_app(idx, |app, cx| app.on_timer(cx, timer));
        true
    }

    /// Re-clamp every window after the browser viewport changed size.
    pub fn set_viewport(&mut self, width: i32, height: i32) {
        let area = self.config.area_for_viewport(width, height);
        if area == self.area {
            return;
        }
        self.area = area;
        for entry in &mut self.windows {
            let bounds = if entry.window.maximized {
                geometry::maximized_bounds(area)
            } else {
                geometry::clamp_bounds(entry.window.bounds(), area)
            };
            entry.window.set_bounds(bounds);
        }
        tracing::debug!(width = area.width, height = area.height, "Desktop area resized");
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn next_z(&mut self) -> u32 {
        let z = self.next_z_index;
        self.next_z_index += 1;
        z
    }

    fn index_of(&self, window_id: &str) -> Option<usize> {
        self.windows.iter().position(|w| w.window.id == window_id)
    }

    fn require(&self, window_id: &str) -> Result<usize, ShellError> {
        self.index_of(window_id)
            .ok_or_else(|| ShellError::WindowNotFound(window_id.to_string()))
    }

    /// Focus the highest non-minimized window, or record that none is active.
    fn focus_topmost(&mut self) {
        let next = self
            .windows
            .iter()
            .filter(|w| !w.window.minimized)
            .max_by_key(|w| w.window.z_index)
            .map(|w| w.window.id.clone());
        match next {
            Some(window_id) => {
                if let Err(e) = self.focus(&window_id) {
                    tracing::warn!(window_id = %window_id, error = %e, "Could not focus next window");
                }
            }
            None => self.events.push(DesktopEvent::ActiveCleared),
        }
    }

    /// Call into a window's application with a context scoped to that window,
    /// then apply title changes and refresh the window's props.
    fn with_app<R>(
        &mut self,
        idx: usize,
        f: impl FnOnce(&mut dyn Application, &mut AppContext<'_>) -> R,
    ) -> R {
        let entry = &mut self.windows[idx];
        let mut cx = AppContext::new(&entry.content, &mut self.resources);
        let result = f(entry.app.as_mut(), &mut cx);
        let title = cx.take_title();

        entry.window.props = entry.app.snapshot();
        if let Some(title) = title {
            entry.taskbar.label = taskbar_label(&title);
            entry.window.title = title.clone();
            self.events.push(DesktopEvent::TitleChanged {
                window_id: entry.window.id.clone(),
                title,
            });
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{AppInput, WindowBounds, APP_CALCULATOR, APP_NOTEPAD, APP_PAINT, APP_SNAKE};

    fn manager() -> WindowManager {
        WindowManager::new(ShellConfig::default(), AppRegistry::with_core_apps())
    }

    #[test]
    fn test_taskbar_label_truncation() {
        assert_eq!(taskbar_label("Calculator"), "Calculator");
        assert_eq!(taskbar_label("Untitled - Notepad"), "Untitled - Notepad");
        assert_eq!(taskbar_label("Untitled - Notepad!"), "Untitled - Note...");
    }

    #[test]
    fn test_open_or_focus_is_idempotent() {
        let mut wm = manager();
        let first = wm.open_or_focus(APP_NOTEPAD).unwrap();
        let second = wm.open_or_focus(APP_NOTEPAD).unwrap();
        assert_eq!(first, second);
        assert_eq!(wm.open_count(), 1);
        assert_eq!(wm.taskbar().len(), 1);
        assert!(first.starts_with("win_"));
    }

    #[test]
    fn test_unknown_app_opens_nothing() {
        let mut wm = manager();
        assert_eq!(wm.open_or_focus("minesweeper"), None);
        assert_eq!(wm.open_count(), 0);
        assert!(wm.drain_events().is_empty());
    }

    #[test]
    fn test_cascade_positions() {
        let mut wm = manager();
        let a = wm.open_or_focus(APP_NOTEPAD).unwrap();
        let b = wm.open_or_focus(APP_CALCULATOR).unwrap();
        let a = wm.window(&a).unwrap();
        let b = wm.window(&b).unwrap();
        assert_eq!((a.x, a.y), (50, 50));
        assert_eq!((b.x, b.y), (70, 70));
    }

    #[test]
    fn test_focus_raises_and_moves_active_flag() {
        let mut wm = manager();
        let a = wm.open_or_focus(APP_NOTEPAD).unwrap();
        let b = wm.open_or_focus(APP_CALCULATOR).unwrap();
        assert_eq!(wm.active_window(), Some(b.as_str()));

        wm.focus(&a).unwrap();
        assert_eq!(wm.active_window(), Some(a.as_str()));
        assert!(wm.window(&a).unwrap().z_index > wm.window(&b).unwrap().z_index);
        let active: Vec<_> = wm.taskbar().into_iter().filter(|t| t.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].window_id, a);
    }

    #[test]
    fn test_focus_minimized_is_error() {
        let mut wm = manager();
        let a = wm.open_or_focus(APP_NOTEPAD).unwrap();
        wm.minimize(&a).unwrap();
        assert_eq!(
            wm.focus(&a),
            Err(ShellError::InvalidOperation(
                "cannot focus minimized window".to_string()
            ))
        );
        assert_eq!(
            wm.focus("win_missing"),
            Err(ShellError::WindowNotFound("win_missing".to_string()))
        );
    }

    #[test]
    fn test_minimize_active_focuses_next_highest() {
        let mut wm = manager();
        let a = wm.open_or_focus(APP_NOTEPAD).unwrap();
        let b = wm.open_or_focus(APP_CALCULATOR).unwrap();
        let c = wm.open_or_focus(APP_PAINT).unwrap();
        wm.focus(&a).unwrap();

        // Stack is now b < c < a
        wm.minimize(&a).unwrap();
        assert_eq!(wm.active_window(), Some(c.as_str()));
        wm.minimize(&c).unwrap();
        assert_eq!(wm.active_window(), Some(b.as_str()));
        wm.minimize(&b).unwrap();
        assert_eq!(wm.active_window(), None);
        assert!(wm.taskbar().iter().all(|t| !t.active));
    }

    #[test]
    fn test_open_minimized_app_restores_it() {
        let mut wm = manager();
        let a = wm.open_or_focus(APP_NOTEPAD).unwrap();
        wm.minimize(&a).unwrap();
        assert_eq!(wm.open_or_focus(APP_NOTEPAD).unwrap(), a);
        assert!(!wm.window(&a).unwrap().minimized);
        assert_eq!(wm.active_window(), Some(a.as_str()));
    }

    #[test]
    fn test_maximize_round_trip_restores_geometry() {
        let mut wm = manager();
        let a = wm.open_or_focus(APP_PAINT).unwrap();
        let before = wm.window(&a).unwrap().bounds();

        wm.toggle_maximize(&a).unwrap();
        let maximized = wm.window(&a).unwrap();
        assert!(maximized.maximized);
        assert_eq!(maximized.bounds(), geometry::maximized_bounds(wm.area()));
        assert_eq!(maximized.restore_bounds, Some(before));

        wm.toggle_maximize(&a).unwrap();
        let restored = wm.window(&a).unwrap();
        assert!(!restored.maximized);
        assert_eq!(restored.bounds(), before);
        assert_eq!(restored.restore_bounds, None);
    }

    #[test]
    fn test_toggle_maximize_unminimizes() {
        let mut wm = manager();
        let a = wm.open_or_focus(APP_NOTEPAD).unwrap();
        wm.minimize(&a).unwrap();
        wm.toggle_maximize(&a).unwrap();
        let window = wm.window(&a).unwrap();
        assert!(!window.minimized);
        assert!(window.maximized);
        assert_eq!(wm.active_window(), Some(a.as_str()));
    }

    #[test]
    fn test_taskbar_click_cycle() {
        let mut wm = manager();
        let a = wm.open_or_focus(APP_NOTEPAD).unwrap();
        let b = wm.open_or_focus(APP_CALCULATOR).unwrap();

        // b is active: click minimizes it
        wm.taskbar_click(&b).unwrap();
        assert!(wm.window(&b).unwrap().minimized);
        assert_eq!(wm.active_window(), Some(a.as_str()));

        // b minimized: click restores and focuses
        wm.taskbar_click(&b).unwrap();
        assert!(!wm.window(&b).unwrap().minimized);
        assert_eq!(wm.active_window(), Some(b.as_str()));

        // a inactive: click focuses
        wm.taskbar_click(&a).unwrap();
        assert_eq!(wm.active_window(), Some(a.as_str()));
    }

    #[test]
    fn test_drag_moves_and_clamps() {
        let mut wm = manager();
        let a = wm.open_or_focus(APP_CALCULATOR).unwrap();
        assert!(wm.begin_drag(&a, 60, 55, PointerTarget::TitleBar).unwrap());

        wm.pointer_move(110, 105);
        let window = wm.window(&a).unwrap();
        assert_eq!((window.x, window.y), (100, 100));

        wm.pointer_move(-500, 5000);
        let window = wm.window(&a).unwrap();
        assert_eq!((window.x, window.y), (0, 720 - 320));

        wm.pointer_up();
        wm.pointer_move(300, 300);
        let window = wm.window(&a).unwrap();
        assert_eq!((window.x, window.y), (0, 400));
    }

    #[test]
    fn test_extreme_pointer_coordinates_stay_in_bounds() {
        let mut wm = manager();
        let a = wm.open_or_focus(APP_CALCULATOR).unwrap();
        let inside = |wm: &WindowManager| {
            let w = wm.window(&a).unwrap();
            let area = wm.area();
            w.x >= 0 && w.y >= 0 && w.x + w.width <= area.width && w.y + w.height <= area.height
        };

        assert!(wm.begin_drag(&a, 0, 0, PointerTarget::TitleBar).unwrap());
        wm.pointer_move(i32::MAX, 10);
        assert!(inside(&wm));
        wm.pointer_move(i32::MIN, i32::MAX);
        assert!(inside(&wm));
        wm.pointer_up();

        assert!(wm
            .begin_drag(&a, i32::MIN, i32::MAX, PointerTarget::TitleBar)
            .unwrap());
        wm.pointer_move(i32::MAX, i32::MIN);
        assert!(inside(&wm));
        wm.pointer_up();

        wm.set_viewport(800, i32::MIN);
        assert_eq!(wm.area().height, 0);
        assert!(inside(&wm));
    }

    #[test]
    fn test_drag_ignored_on_controls_and_maximized() {
        let mut wm = manager();
        let a = wm.open_or_focus(APP_NOTEPAD).unwrap();
        assert!(!wm
            .begin_drag(&a, 60, 55, PointerTarget::ControlButton)
            .unwrap());
        wm.toggle_maximize(&a).unwrap();
        assert!(!wm.begin_drag(&a, 60, 55, PointerTarget::TitleBar).unwrap());
        assert!(!wm.is_dragging(&a));
    }

    #[test]
    fn test_minimize_ends_drag() {
        let mut wm = manager();
        let a = wm.open_or_focus(APP_NOTEPAD).unwrap();
        wm.begin_drag(&a, 60, 55, PointerTarget::TitleBar).unwrap();
        wm.minimize(&a).unwrap();
        assert!(!wm.is_dragging(&a));
    }

    #[test]
    fn test_keys_only_reach_active_listening_window() {
        let mut wm = manager();
        let snake = wm.open_or_focus(APP_SNAKE).unwrap();
        assert_eq!(wm.dispatch_key(&Key::ArrowRight), KeyOutcome::Consumed);

        let _notepad = wm.open_or_focus(APP_NOTEPAD).unwrap();
        assert_eq!(wm.dispatch_key(&Key::ArrowUp), KeyOutcome::Ignored);

        wm.focus(&snake).unwrap();
        wm.minimize(&snake).unwrap();
        assert_eq!(wm.dispatch_key(&Key::ArrowUp), KeyOutcome::Ignored);
    }

    #[test]
    fn test_close_releases_everything() {
        let mut wm = manager();
        let snake = wm.open_or_focus(APP_SNAKE).unwrap();
        wm.dispatch_key(&Key::ArrowRight);
        assert_eq!(wm.resources_owned_by(&snake).timers, 1);
        assert_eq!(wm.resources_owned_by(&snake).key_listeners, 1);

        wm.close(&snake).unwrap();
        assert_eq!(wm.resource_counts(), ResourceCounts::default());
        assert_eq!(wm.open_count(), 0);
        assert_eq!(wm.active_window(), None);

        let changes = wm.drain_resource_changes();
        assert!(changes
            .iter()
            .any(|c| matches!(c, ResourceChange::TimerCancelled { .. })));
    }

    #[test]
    fn test_fire_timer_after_close_is_stale() {
        let mut wm = manager();
        let snake = wm.open_or_focus(APP_SNAKE).unwrap();
        wm.dispatch_key(&Key::ArrowRight);
        let timer = wm
            .drain_resource_changes()
            .into_iter()
            .find_map(|c| match c {
                ResourceChange::TimerStarted { timer, .. } => Some(timer),
                _ => None,
            })
            .unwrap();
        assert!(wm.fire_timer(timer));
        wm.close(&snake).unwrap();
        assert!(!wm.fire_timer(timer));
    }

    #[test]
    fn test_app_input_refreshes_props_and_absorbs_errors() {
        let mut wm = manager();
        let calc = wm.open_or_focus(APP_CALCULATOR).unwrap();
        for key in ["7", "+", "3", "="] {
            wm.app_input(
                &calc,
                AppInput::Button {
                    value: key.to_string(),
                },
            )
            .unwrap();
        }
        assert_eq!(wm.window(&calc).unwrap().props["display"], "10");

        // Wrong input kind is logged, not surfaced
        assert!(wm.app_input(&calc, AppInput::Clear).is_ok());
        assert_eq!(wm.window(&calc).unwrap().props["display"], "10");
    }

    #[test]
    fn test_title_change_updates_taskbar() {
        let mut wm = manager();
        let player = wm.open_or_focus(shared_types::APP_MEDIA_PLAYER).unwrap();
        wm.app_input(
            &player,
            AppInput::FileSelected {
                name: "a_really_long_holiday_video_file.mp4".to_string(),
                mime: "video/mp4".to_string(),
                object_url: Some("blob:1".to_string()),
            },
        )
        .unwrap();
        let window = wm.window(&player).unwrap();
        assert_eq!(window.title, "a_really_long_holiday_video... - Media Player");
        let button = wm.taskbar().into_iter().next().unwrap();
        assert_eq!(button.label, "a_really_long_h...");
    }

    #[test]
    fn test_viewport_shrink_reclamps_windows() {
        let mut wm = manager();
        let paint = wm.open_or_focus(APP_PAINT).unwrap();
        let notepad = wm.open_or_focus(APP_NOTEPAD).unwrap();
        wm.toggle_maximize(&notepad).unwrap();

        wm.set_viewport(500, 440);
        let area = wm.area();
        assert_eq!((area.width, area.height), (500, 400));

        let p = wm.window(&paint).unwrap();
        assert!(p.x >= 0 && p.x + p.width <= area.width);
        assert!(p.y >= 0 && p.y + p.height <= area.height);
        assert_eq!(
            wm.window(&notepad).unwrap().bounds(),
            geometry::maximized_bounds(area)
        );
    }

    #[test]
    fn test_window_opened_event_precedes_focus() {
        let mut wm = manager();
        let a = wm.open_or_focus(APP_NOTEPAD).unwrap();
        let events = wm.drain_events();
        assert!(matches!(events[0], DesktopEvent::WindowOpened(ref w) if w.id == a));
        assert!(matches!(events[1], DesktopEvent::WindowFocused { ref window_id, .. } if *window_id == a));
    }

    #[test]
    fn test_bounds_stay_inside_after_random_drags() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut wm = manager();
        let a = wm.open_or_focus(APP_PAINT).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let w = wm.window(&a).unwrap().clone();
            wm.begin_drag(&a, w.x + 10, w.y + 5, PointerTarget::TitleBar)
                .unwrap();
            for _ in 0..20 {
                wm.pointer_move(rng.random_range(-2000..2000), rng.random_range(-2000..2000));
                let w = wm.window(&a).unwrap();
                let bounds: WindowBounds = w.bounds();
                assert!(bounds.x >= 0 && bounds.x + bounds.width <= 1280);
                assert!(bounds.y >= 0 && bounds.y + bounds.height <= 720);
            }
            wm.pointer_up();
        }
    }
}
