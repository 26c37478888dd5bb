//! Window manager integration tests
//!
//! Drives a full `Desktop` through the command protocol and checks the
//! stacking, focus, geometry and resource invariants across app mixes.

use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use shared_types::{
    AppDefinition, AppInput, DesktopCommand, DesktopEvent, PointerTarget, APP_CALCULATOR,
    APP_MEDIA_PLAYER, APP_NOTEPAD, APP_PAINT, APP_SNAKE,
};
use shell::apps::{AppContext, AppError, Application, TeardownHandle};
use shell::registry::{app_factory, AppRegistry};
use shell::resources::ResourceCounts;
use shell::{Desktop, ShellConfig};

const ALL_APPS: [&str; 5] = [
    APP_NOTEPAD,
    APP_CALCULATOR,
    APP_PAINT,
    APP_MEDIA_PLAYER,
    APP_SNAKE,
];

fn desktop() -> Desktop {
    Desktop::with_core_apps(ShellConfig::default())
}

fn active_flags(desktop: &Desktop) -> usize {
    desktop
        .state()
        .taskbar
        .iter()
        .filter(|button| button.active)
        .count()
}

#[test]
fn test_open_every_app_once() {
    let mut desktop = desktop();
    for app in ALL_APPS {
        desktop.apply(DesktopCommand::OpenApp {
            app_id: app.to_string(),
        })
        .unwrap();
        desktop.apply(DesktopCommand::IconActivate {
            app_id: app.to_string(),
        })
        .unwrap();
    }
    let state = desktop.state();
    assert_eq!(state.windows.len(), ALL_APPS.len());
    assert_eq!(state.taskbar.len(), ALL_APPS.len());
    for app in ALL_APPS {
        assert_eq!(state.windows.iter().filter(|w| w.app_id == app).count(), 1);
    }
}

#[test]
fn test_at_most_one_active_through_random_operations() {
    let mut desktop = desktop();
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..400 {
        let app = ALL_APPS[rng.random_range(0..ALL_APPS.len())];
        let window_id = desktop
            .state()
            .window_for_app(app)
            .map(|w| w.id.clone());

        let command = match (rng.random_range(0..6), window_id) {
            (0, _) | (_, None) => DesktopCommand::OpenApp {
                app_id: app.to_string(),
            },
            (1, Some(window_id)) => DesktopCommand::Minimize { window_id },
            (2, Some(window_id)) => DesktopCommand::TaskbarClick { window_id },
            (3, Some(window_id)) => DesktopCommand::ToggleMaximize { window_id },
            (4, Some(window_id)) => DesktopCommand::Close { window_id },
            (_, Some(window_id)) => DesktopCommand::Focus { window_id },
        };
        // Focusing a minimized window is an expected error here
        let _ = desktop.apply(command);

        let state = desktop.state();
        assert!(active_flags(&desktop) <= 1);
        match &state.active_window {
            Some(active) => {
                let window = state.window(active).unwrap();
                assert!(!window.minimized, "minimized window is active");
                let button = state
                    .taskbar
                    .iter()
                    .find(|b| &b.window_id == active)
                    .unwrap();
                assert!(button.active);
                // Active window is on top of every visible window
                let top = state
                    .windows
                    .iter()
                    .filter(|w| !w.minimized)
                    .map(|w| w.z_index)
                    .max()
                    .unwrap();
                assert_eq!(window.z_index, top);
            }
            None => assert_eq!(active_flags(&desktop), 0),
        }
        for window in &state.windows {
            assert!(window.x >= 0 && window.y >= 0);
            assert!(window.x + window.width <= 1280);
            assert!(window.y + window.height <= 720);
            assert_eq!(window.maximized, window.restore_bounds.is_some());
        }
    }
}

#[test]
fn test_drag_through_commands_stays_in_bounds() {
    let mut desktop = desktop();
    let window_id = desktop.open_or_focus(APP_NOTEPAD).unwrap();
    desktop
        .apply(DesktopCommand::PointerDown {
            window_id: window_id.clone(),
            x: 80,
            y: 60,
            target: PointerTarget::TitleBar,
        })
        .unwrap();

    for (x, y) in [(5000, 5000), (-300, 200), (640, -90), (700, 400)] {
        desktop.apply(DesktopCommand::PointerMove { x, y }).unwrap();
        let state = desktop.state();
        let window = state.window(&window_id).unwrap();
        assert!(window.x >= 0 && window.x + window.width <= 1280);
        assert!(window.y >= 0 && window.y + window.height <= 720);
    }
    desktop.apply(DesktopCommand::PointerUp).unwrap();

    let events = desktop.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, DesktopEvent::WindowMoved { .. })));
}

#[test]
fn test_closing_apps_leaves_no_resources() {
    let mut desktop = desktop();
    let snake = desktop.open_or_focus(APP_SNAKE).unwrap();
    desktop
        .apply(DesktopCommand::Key {
            key: "ArrowUp".to_string(),
        })
        .unwrap();
    let player = desktop.open_or_focus(APP_MEDIA_PLAYER).unwrap();
    desktop
        .apply(DesktopCommand::AppInput {
            window_id: player.clone(),
            input: AppInput::FileSelected {
                name: "clip.mp4".to_string(),
                mime: "video/mp4".to_string(),
                object_url: None,
            },
        })
        .unwrap();

    let wm = desktop.window_manager();
    assert_eq!(
        wm.resource_counts(),
        ResourceCounts {
            timers: 1,
            key_listeners: 1,
            object_urls: 1
        }
    );

    desktop
        .apply(DesktopCommand::Close { window_id: snake })
        .unwrap();
    desktop
        .apply(DesktopCommand::Close { window_id: player })
        .unwrap();
    assert_eq!(
        desktop.window_manager().resource_counts(),
        ResourceCounts::default()
    );
    assert_eq!(desktop.state().active_window, None);
}

#[test]
fn test_command_protocol_from_json_lines() {
    let mut desktop = desktop();
    let lines = [
        r#"{"type":"StartButton"}"#,
        r#"{"type":"StartMenuSelect","item":{"kind":"app","app_id":"paint"}}"#,
        r#"{"type":"Resize","width":800,"height":640}"#,
    ];
    for line in lines {
        let command: DesktopCommand = serde_json::from_str(line).unwrap();
        desktop.apply(command).unwrap();
    }
    let state = desktop.state();
    assert!(!state.start_menu_open);
    let paint = state.window_for_app(APP_PAINT).unwrap();
    assert!(paint.width <= 800 && paint.x + paint.width <= 800);
    assert!(paint.height <= 600 && paint.y + paint.height <= 600);
}

/// An app that always fails its input
struct Broken;

impl Application for Broken {
    fn mount(&mut self, cx: &mut AppContext<'_>) -> TeardownHandle {
        cx.teardown()
    }

    fn on_input(&mut self, _cx: &mut AppContext<'_>, _input: AppInput) -> Result<(), AppError> {
        Err(AppError::InvalidValue("always broken".to_string()))
    }

    fn snapshot(&self) -> serde_json::Value {
        json!({ "broken": true })
    }
}

#[test]
fn test_failing_app_does_not_affect_others() {
    let mut registry = AppRegistry::with_core_apps();
    registry.register(
        AppDefinition {
            id: "broken".to_string(),
            name: "Broken".to_string(),
            icon: "icons/xp_icon.svg".to_string(),
            content_template: String::new(),
            default_width: 200,
            default_height: 150,
        },
        app_factory(|_| Broken),
    );
    let mut desktop = Desktop::new(ShellConfig::default(), registry);

    let calc = desktop.open_or_focus(APP_CALCULATOR).unwrap();
    let broken = desktop.open_or_focus("broken").unwrap();
    desktop
        .apply(DesktopCommand::AppInput {
            window_id: broken.clone(),
            input: AppInput::Clear,
        })
        .unwrap();
    desktop
        .apply(DesktopCommand::AppInput {
            window_id: calc.clone(),
            input: AppInput::Button {
                value: "9".to_string(),
            },
        })
        .unwrap();

    let state = desktop.state();
    assert_eq!(state.window(&calc).unwrap().props["display"], "9");
    assert_eq!(state.window(&broken).unwrap().props["broken"], true);
}

/// Holds an object URL and records what its teardown hook saw
struct Recorder {
    seen: Arc<Mutex<Vec<ResourceCounts>>>,
}

impl Application for Recorder {
    fn mount(&mut self, cx: &mut AppContext<'_>) -> TeardownHandle {
        cx.register_object_url("blob:recording");
        let seen = Arc::clone(&self.seen);
        cx.teardown_with(move |held| seen.lock().unwrap().push(held))
    }

    fn on_input(&mut self, _cx: &mut AppContext<'_>, input: AppInput) -> Result<(), AppError> {
        Err(AppError::unsupported("recorder", &input))
    }

    fn snapshot(&self) -> serde_json::Value {
        json!({})
    }
}

#[test]
fn test_teardown_hook_runs_once_before_release() {
    let seen: Arc<Mutex<Vec<ResourceCounts>>> = Arc::default();
    let mut registry = AppRegistry::with_core_apps();
    let factory_seen = Arc::clone(&seen);
    registry.register(
        AppDefinition {
            id: "recorder".to_string(),
            name: "Recorder".to_string(),
            icon: "icons/xp_icon.svg".to_string(),
            content_template: String::new(),
            default_width: 200,
            default_height: 150,
        },
        Arc::new(move |_: &ShellConfig| -> Box<dyn Application> {
            Box::new(Recorder {
                seen: Arc::clone(&factory_seen),
            })
        }),
    );
    let mut desktop = Desktop::new(ShellConfig::default(), registry);

    let window_id = desktop.open_or_focus("recorder").unwrap();
    assert!(seen.lock().unwrap().is_empty());

    desktop
        .apply(DesktopCommand::Close {
            window_id: window_id.clone(),
        })
        .unwrap();
    assert!(desktop
        .apply(DesktopCommand::Close {
            window_id: window_id.clone(),
        })
        .is_err());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    // The hook ran while the window still held its URL
    assert_eq!(seen[0].object_urls, 1);
    assert_eq!(
        desktop.window_manager().resource_counts(),
        ResourceCounts::default()
    );
}

#[test]
fn test_extreme_protocol_values_are_not_fatal() {
    let mut desktop = desktop();
    let notepad = desktop.open_or_focus(APP_NOTEPAD).unwrap();
    let commands = [
        DesktopCommand::PointerDown {
            window_id: notepad.clone(),
            x: 0,
            y: 0,
            target: PointerTarget::TitleBar,
        },
        DesktopCommand::PointerMove { x: i32::MAX, y: 10 },
        DesktopCommand::PointerMove {
            x: i32::MIN,
            y: i32::MIN,
        },
        DesktopCommand::PointerUp,
        DesktopCommand::Resize {
            width: 800,
            height: i32::MIN,
        },
        DesktopCommand::Resize {
            width: i32::MAX,
            height: i32::MAX,
        },
    ];
    for command in commands {
        desktop.apply(command).unwrap();
    }

    let area = desktop.window_manager().area();
    let window = desktop.state().window(&notepad).unwrap().clone();
    assert!(window.x >= 0 && window.x + window.width <= area.width);
    assert!(window.y >= 0 && window.y + window.height <= area.height);
}
