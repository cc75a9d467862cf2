mod back_to_top;
mod page_view;
mod popup;
mod progress_bar;
mod status_bar;

pub use back_to_top::BackToTopWidget;
pub use page_view::PageViewWidget;
pub use popup::PopupWidget;
pub use progress_bar::ProgressBarWidget;
pub use status_bar::StatusBarWidget;
