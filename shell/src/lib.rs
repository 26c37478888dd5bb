//! Desktop shell core - window manager, application plug-ins and runtime
//!
//! The window manager and apps are plain synchronous state machines so the
//! browser front end can drive them in-process. With the `runtime` feature the
//! crate adds a ractor [`actors::DesktopActor`] that serializes input and backs
//! application timers with tokio tasks.

#[cfg(feature = "runtime")]
pub mod actors;
pub mod apps;
pub mod clock;
pub mod config;
pub mod desktop;
pub mod geometry;
pub mod ids;
pub mod keys;
pub mod registry;
pub mod resources;
pub mod start_menu;
pub mod window_manager;

pub use config::ShellConfig;
pub use desktop::Desktop;
pub use window_manager::{ShellError, WindowManager};
