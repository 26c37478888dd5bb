use shared_types::StartMenuItem;

use crate::registry::AppRegistry;

pub const SHUTDOWN_NOTICE: &str =
    "It is now safe to turn off your computer. (Just kidding, close the browser tab!)";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartMenu {
    open: bool,
}

impl StartMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Returns whether the menu was open.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    /// One entry per registered app followed by "Shut down"
    pub fn entries(registry: &AppRegistry) -> Vec<StartMenuItem> {
        registry
            .definitions()
            .into_iter()
            .map(|def| StartMenuItem::App { app_id: def.id })
            .chain(std::iter::once(StartMenuItem::ShutDown))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_close() {
        let mut menu = StartMenu::default();
        menu.toggle();
        assert!(menu.is_open());
        menu.toggle();
        assert!(!menu.is_open());
        menu.toggle();
        assert!(menu.close());
        assert!(!menu.close());
    }

    #[test]
    fn test_entries_end_with_shutdown() {
        let entries = StartMenu::entries(&AppRegistry::with_core_apps());
        assert_eq!(entries.len(), 6);
        assert_eq!(entries.last(), Some(&StartMenuItem::ShutDown));
    }
}
