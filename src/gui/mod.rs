mod app;
mod theme;
mod utils;

pub use app::TermScanApp;
