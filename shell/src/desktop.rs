//! Desktop - the window manager plus the shell chrome around it
//!
//! Start menu, desktop icons and the taskbar clock all funnel app launches
//! through [`WindowManager::open_or_focus`]. [`Desktop::apply`] is the one
//! entry point for [`DesktopCommand`]s, shared by the actor, the headless
//! binary and the browser front end.

use shared_types::{DesktopCommand, DesktopEvent, DesktopState, StartMenuItem};

use crate::apps::KeyOutcome;
use crate::clock::Clock;
use crate::config::ShellConfig;
use crate::keys::Key;
use crate::registry::AppRegistry;
use crate::start_menu::{StartMenu, SHUTDOWN_NOTICE};
use crate::window_manager::{ShellError, WindowManager};

#[derive(Debug)]
pub struct Desktop {
    wm: WindowManager,
    start_menu: StartMenu,
    clock: Clock,
    events: Vec<DesktopEvent>,
}

impl Desktop {
    pub fn new(config: ShellConfig, registry: AppRegistry) -> Self {
        let clock = Clock::new(config.clock_interval);
        Self {
            wm: WindowManager::new(config, registry),
            start_menu: StartMenu::default(),
            clock,
            events: Vec::new(),
        }
    }

    pub fn with_core_apps(config: ShellConfig) -> Self {
        Self::new(config, AppRegistry::with_core_apps())
    }

    pub fn window_manager(&self) -> &WindowManager {
        &self.wm
    }

    pub fn window_manager_mut(&mut self) -> &mut WindowManager {
        &mut self.wm
    }

    pub fn start_menu(&self) -> &StartMenu {
        &self.start_menu
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn open_or_focus(&mut self, app_id: &str) -> Option<String> {
        self.wm.open_or_focus(app_id)
    }

    pub fn click_start_button(&mut self) {
        self.start_menu.toggle();
    }

    /// A click that landed outside both the start menu and its button
    pub fn click_outside(&mut self) {
        self.start_menu.close();
    }

    /// Returns the opened window id for app entries.
    pub fn select_start_item(&mut self, item: StartMenuItem) -> Option<String> {
        self.start_menu.close();
        match item {
            StartMenuItem::App { app_id } => self.wm.open_or_focus(&app_id),
            StartMenuItem::ShutDown => {
                tracing::info!("Shut down selected");
                self.events.push(DesktopEvent::Notice {
                    message: SHUTDOWN_NOTICE.to_string(),
                });
                None
            }
        }
    }

    /// Double-click on a desktop icon
    pub fn activate_icon(&mut self, app_id: &str) -> Option<String> {
        self.wm.open_or_focus(app_id)
    }

    pub fn key(&mut self, raw: &str) -> KeyOutcome {
        self.wm.dispatch_key(&Key::parse(raw))
    }

    pub fn tick_clock<T: chrono::Timelike>(&mut self, now: &T) -> bool {
        let changed = self.clock.tick(now);
        if changed {
            self.events.push(DesktopEvent::ClockTick {
                text: self.clock.text().to_string(),
            });
        }
        changed
    }

    pub fn tick_clock_local(&mut self) -> bool {
        self.tick_clock(&chrono::Local::now())
    }

    pub fn apply(&mut self, command: DesktopCommand) -> Result<(), ShellError> {
        match command {
            DesktopCommand::OpenApp { app_id } => {
                self.open_or_focus(&app_id);
            }
            DesktopCommand::Focus { window_id } => self.wm.focus(&window_id)?,
            DesktopCommand::Minimize { window_id } => self.wm.minimize(&window_id)?,
            DesktopCommand::Restore { window_id } => self.wm.restore(&window_id)?,
            DesktopCommand::ToggleMaximize { window_id } => self.wm.toggle_maximize(&window_id)?,
            DesktopCommand::Close { window_id } => self.wm.close(&window_id)?,
            DesktopCommand::TaskbarClick { window_id } => self.wm.taskbar_click(&window_id)?,
            DesktopCommand::PointerDown {
                window_id,
                x,
                y,
                target,
            } => {
                self.wm.begin_drag(&window_id, x, y, target)?;
            }
            DesktopCommand::PointerMove { x, y } => self.wm.pointer_move(x, y),
            DesktopCommand::PointerUp => self.wm.pointer_up(),
            DesktopCommand::Key { key } => {
                self.key(&key);
            }
            DesktopCommand::AppInput { window_id, input } => {
                self.wm.app_input(&window_id, input)?
            }
            DesktopCommand::StartButton => self.click_start_button(),
            DesktopCommand::StartMenuSelect { item } => {
                self.select_start_item(item);
            }
            DesktopCommand::ClickOutside => self.click_outside(),
            DesktopCommand::IconActivate { app_id } => {
                self.activate_icon(&app_id);
            }
            DesktopCommand::Resize { width, height } => self.wm.set_viewport(width, height),
            DesktopCommand::GetState => {}
        }
        Ok(())
    }

    pub fn state(&self) -> DesktopState {
        DesktopState {
            windows: self.wm.windows(),
            active_window: self.wm.active_window().map(str::to_string),
            taskbar: self.wm.taskbar(),
            apps: self.wm.registry().definitions(),
            start_menu_open: self.start_menu.is_open(),
            clock: self.clock.text().to_string(),
        }
    }

    /// Window manager events first, then shell events, each in order
    pub fn drain_events(&mut self) -> Vec<DesktopEvent> {
        let mut events = self.wm.drain_events();
        events.append(&mut self.events);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use shared_types::{APP_CALCULATOR, APP_NOTEPAD};

    fn desktop() -> Desktop {
        Desktop::with_core_apps(ShellConfig::default())
    }

    #[test]
    fn test_start_menu_select_opens_and_closes_menu() {
        let mut desktop = desktop();
        desktop.apply(DesktopCommand::StartButton).unwrap();
        assert!(desktop.state().start_menu_open);

        desktop
            .apply(DesktopCommand::StartMenuSelect {
                item: StartMenuItem::App {
                    app_id: APP_CALCULATOR.to_string(),
                },
            })
            .unwrap();
        let state = desktop.state();
        assert!(!state.start_menu_open);
        assert!(state.window_for_app(APP_CALCULATOR).is_some());
    }

    #[test]
    fn test_click_outside_closes_menu() {
        let mut desktop = desktop();
        desktop.click_start_button();
        desktop.click_outside();
        assert!(!desktop.start_menu().is_open());
    }

    #[test]
    fn test_shutdown_emits_notice() {
        let mut desktop = desktop();
        desktop.click_start_button();
        desktop.select_start_item(StartMenuItem::ShutDown);
        assert!(!desktop.start_menu().is_open());
        let events = desktop.drain_events();
        assert_eq!(
            events,
            vec![DesktopEvent::Notice {
                message: SHUTDOWN_NOTICE.to_string()
            }]
        );
        assert_eq!(desktop.window_manager().open_count(), 0);
    }

    #[test]
    fn test_icon_activation_reuses_window() {
        let mut desktop = desktop();
        let first = desktop.activate_icon(APP_NOTEPAD);
        let second = desktop.activate_icon(APP_NOTEPAD);
        assert_eq!(first, second);
        assert_eq!(desktop.state().windows.len(), 1);
    }

    #[test]
    fn test_state_lists_apps_and_orders_windows_by_z() {
        let mut desktop = desktop();
        let a = desktop.open_or_focus(APP_NOTEPAD).unwrap();
        let _b = desktop.open_or_focus(APP_CALCULATOR).unwrap();
        desktop.apply(DesktopCommand::Focus { window_id: a.clone() }).unwrap();

        let state = desktop.state();
        assert_eq!(state.apps.len(), 5);
        assert_eq!(state.windows.last().map(|w| w.id.clone()), Some(a.clone()));
        assert_eq!(state.active_window, Some(a));
        // Taskbar keeps open order
        assert_eq!(state.taskbar[0].app_id, APP_NOTEPAD);
    }

    #[test]
    fn test_unknown_window_command_errors() {
        let mut desktop = desktop();
        let result = desktop.apply(DesktopCommand::Close {
            window_id: "win_nope".to_string(),
        });
        assert_eq!(result, Err(ShellError::WindowNotFound("win_nope".to_string())));
    }

    #[test]
    fn test_clock_tick_event_only_on_change() {
        let mut desktop = desktop();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        desktop.tick_clock(&noon);
        desktop.drain_events();
        assert!(!desktop.tick_clock(&noon));
        assert!(desktop.drain_events().is_empty());
        assert_eq!(desktop.state().clock, "12:00 PM");
    }
}
