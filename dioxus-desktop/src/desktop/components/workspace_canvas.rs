use dioxus::prelude::*;
use shared_types::{AppDefinition, WindowState};

use crate::desktop::components::desktop_icons::DesktopIcons;
use crate::desktop::state::ShellHandle;
use crate::desktop_window::FloatingWindow;

#[component]
pub fn WorkspaceCanvas(
    apps: Vec<AppDefinition>,
    windows: Vec<WindowState>,
    active_window: Option<String>,
    dragging: Option<String>,
    shell: ShellHandle,
) -> Element {
    rsx! {
        div {
            class: "desktop-workspace",
            style: "flex: 1; position: relative; overflow: hidden;",

            DesktopIcons { apps, shell }

            // Minimized windows stay mounted so canvases and media keep their state
            for window in windows.iter() {
                FloatingWindow {
                    key: "{window.id}",
                    window: window.clone(),
                    is_active: active_window.as_ref() == Some(&window.id),
                    dragging: dragging.as_ref() == Some(&window.id),
                    shell,
                }
            }
        }
    }
}
