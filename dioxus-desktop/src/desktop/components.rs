pub mod desktop_icons;
pub mod start_menu;
pub mod taskbar;
pub mod workspace_canvas;
