mod question;

pub use question::{DisplayMode, MISSING_GLOSS, Question};

/// Which screen the application is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Home,
    Quiz,
    Result,
}
