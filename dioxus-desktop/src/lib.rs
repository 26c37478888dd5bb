pub mod components;
pub mod desktop;
pub mod desktop_window;
pub mod interop;

pub use desktop::Desktop;
