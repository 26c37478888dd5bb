//! Desktop shell - workspace, taskbar and start menu around the in-process
//! window manager

use dioxus::prelude::*;
use shell::ShellConfig;

mod components;
mod desktop_shell;
mod effects;
pub mod state;

pub use desktop_shell::DesktopShell;

#[component]
pub fn Desktop(config: ShellConfig) -> Element {
    rsx! {
        DesktopShell { config }
    }
}
