mod log_line;
mod log_widget;
mod status_indicator;
mod toolbar;

pub use log_line::LogLineView;
pub use log_widget::LogViewer;
pub use status_indicator::StatusIndicator;
pub use toolbar::Toolbar;
