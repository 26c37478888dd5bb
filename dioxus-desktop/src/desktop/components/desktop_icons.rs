use dioxus::prelude::*;
use shared_types::{AppDefinition, DesktopCommand};

use crate::desktop::state::ShellHandle;

#[component]
pub fn DesktopIcons(apps: Vec<AppDefinition>, shell: ShellHandle) -> Element {
    rsx! {
        div {
            class: "desktop-icons",
            style: "position: absolute; top: 0.75rem; left: 0.75rem; z-index: 1; display: grid; grid-auto-flow: row; grid-template-columns: 5rem; gap: 1rem;",

            for app in apps {
                DesktopIcon {
                    key: "{app.id}",
                    app: app.clone(),
                    shell,
                }
            }
        }
    }
}

#[component]
pub fn DesktopIcon(app: AppDefinition, shell: ShellHandle) -> Element {
    let app_id = app.id.clone();

    rsx! {
        button {
            class: "desktop-icon",
            style: "display: flex; flex-direction: column; align-items: center; gap: 0.25rem; padding: 0.25rem; background: transparent; border: none; cursor: default;",
            ondoubleclick: move |_| {
                shell.command(DesktopCommand::IconActivate {
                    app_id: app_id.clone(),
                });
            },

            img {
                src: "{app.icon}",
                width: "32",
                height: "32",
                alt: "",
                style: "pointer-events: none; user-select: none;",
            }
            span {
                style: "font-size: 0.6875rem; color: white; text-align: center; max-width: 100%; padding: 0 2px; text-shadow: 1px 1px 1px black; pointer-events: none; user-select: none;",
                "{app.name}"
            }
        }
    }
}
