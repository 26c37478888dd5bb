pub mod calculator;
pub mod media_player;
pub mod notepad;
pub mod paint;
pub mod snake;
pub mod styles;

pub use calculator::CalculatorView;
pub use media_player::MediaPlayerView;
pub use notepad::NotepadView;
pub use paint::PaintView;
pub use snake::SnakeView;
