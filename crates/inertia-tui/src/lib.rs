pub mod app;
pub mod event;
pub mod input;
pub mod keymap;
pub mod page;
pub mod surface;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use page::Page;
pub use surface::TerminalSurface;
pub use theme::Theme;
