//! Shared types between the desktop core and the browser front end
//!
//! These types are used by both:
//! - the `shell` crate (window manager, actor, headless driver)
//! - Dioxus components (WASM)
//!
//! Serializable with serde so the headless driver can speak JSON lines

use serde::{Deserialize, Serialize};

// ============================================================================
// Application identifiers
// ============================================================================

pub const APP_NOTEPAD: &str = "notepad";
pub const APP_CALCULATOR: &str = "calculator";
pub const APP_PAINT: &str = "paint";
pub const APP_MEDIA_PLAYER: &str = "mediaplayer";
pub const APP_SNAKE: &str = "snake";

// ============================================================================
// UI State
// ============================================================================

/// Desktop snapshot - every open window, the taskbar and the shell chrome
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DesktopState {
    /// Open windows ordered by z-index (bottom first)
    pub windows: Vec<WindowState>,
    pub active_window: Option<String>,
    /// Taskbar proxies in the order their windows were opened
    pub taskbar: Vec<TaskbarButton>,
    pub apps: Vec<AppDefinition>,
    pub start_menu_open: bool,
    pub clock: String,
}

impl DesktopState {
    pub fn window(&self, window_id: &str) -> Option<&WindowState> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn window_for_app(&self, app_id: &str) -> Option<&WindowState> {
        self.windows.iter().find(|w| w.app_id == app_id)
    }
}

/// Position and size of a window in desktop coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Individual window state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowState {
    pub id: String,
    pub app_id: String, // "notepad", "snake", etc.
    pub title: String,
    pub icon: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub z_index: u32,
    pub minimized: bool,
    pub maximized: bool,
    /// Geometry recorded right before the latest maximize; only set while maximized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_bounds: Option<WindowBounds>,
    pub props: serde_json::Value, // App-specific view model
}

impl WindowState {
    pub fn bounds(&self) -> WindowBounds {
        WindowBounds {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn set_bounds(&mut self, bounds: WindowBounds) {
        self.x = bounds.x;
        self.y = bounds.y;
        self.width = bounds.width;
        self.height = bounds.height;
    }
}

/// Taskbar proxy for one open window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskbarButton {
    pub window_id: String,
    pub app_id: String,
    pub label: String,
    pub icon: String,
    pub active: bool,
}

/// App definition for the registry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppDefinition {
    pub id: String,
    pub name: String,
    pub icon: String,             // icon path
    pub content_template: String, // markup rendered into the window's content area
    pub default_width: i32,
    pub default_height: i32,
}

// ============================================================================
// Input
// ============================================================================

/// What a pointer-down on a window's title bar landed on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    #[default]
    TitleBar,
    ControlButton,
}

/// Input delivered to the application hosted in a window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum AppInput {
    /// Calculator key (`"7"`, `"+"`, `"C"`, `"<-"`...)
    Button { value: String },
    /// Full text area contents after an edit
    Text { text: String },
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
    SetColor { color: String },
    SetLineWidth { width: u32 },
    Clear,
    /// A local file was picked; the browser supplies its blob URL when it has one
    FileSelected {
        name: String,
        mime: String,
        #[serde(default)]
        object_url: Option<String>,
    },
    Play,
    Pause,
    Ended,
    PlaybackFailed { reason: String },
    Restart,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StartMenuItem {
    App { app_id: String },
    ShutDown,
}

// ============================================================================
// Command / event protocol
// ============================================================================

/// Commands accepted by the desktop actor and the headless driver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DesktopCommand {
    OpenApp { app_id: String },
    Focus { window_id: String },
    Minimize { window_id: String },
    Restore { window_id: String },
    ToggleMaximize { window_id: String },
    Close { window_id: String },
    TaskbarClick { window_id: String },
    PointerDown {
        window_id: String,
        x: i32,
        y: i32,
        #[serde(default)]
        target: PointerTarget,
    },
    PointerMove { x: i32, y: i32 },
    PointerUp,
    Key { key: String },
    AppInput { window_id: String, input: AppInput },
    StartButton,
    StartMenuSelect { item: StartMenuItem },
    ClickOutside,
    IconActivate { app_id: String },
    Resize { width: i32, height: i32 },
    GetState,
}

/// Change notifications emitted by the window manager
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DesktopEvent {
    WindowOpened(WindowState),
    WindowClosed { window_id: String },
    WindowFocused { window_id: String, z_index: u32 },
    WindowMoved { window_id: String, x: i32, y: i32 },
    WindowMinimized { window_id: String },
    WindowMaximized { window_id: String, bounds: WindowBounds },
    WindowRestored { window_id: String, bounds: WindowBounds },
    ActiveCleared,
    TitleChanged { window_id: String, title: String },
    ClockTick { text: String },
    Notice { message: String },
}

// ============================================================================
// Tests
// ============================================================================
