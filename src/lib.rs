//! # category-quiz
//!
//! A terminal multiple-choice quiz over a question bank grouped by category
//! and subcategory. Each run samples up to ten questions, gives feedback
//! with an explanation after every answer and ends on a results table from
//! which single questions can be re-attempted.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use category_quiz::{Quiz, QuizError};
//!
//! fn main() -> Result<(), QuizError> {
//!     // Load questions from a JSON file
//!     let quiz = Quiz::from_json("questions.json")?;
//!
//!     // Run the quiz in the terminal
//!     quiz.run()?;
//!
//!     Ok(())
//! }
//! ```

mod app;
pub mod config;
mod data;
mod models;
pub mod quiz;
pub mod terminal;
mod ui;

#[cfg(test)]
mod testing;

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use rand::rngs::SmallRng;
use thiserror::Error;

pub use app::{App, Focus, HomeEntry};
pub use config::{Config, QuizSettings};
pub use data::{LoadError, load_embedded_questions, load_questions_from_json, parse_questions};
pub use models::{AppState, DisplayMode, MISSING_GLOSS, Question};
pub use quiz::QuestionBank;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Error loading questions from file.
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),
    /// IO error during quiz execution.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A quiz instance that can be run in the terminal.
pub struct Quiz {
    app: App,
}

impl Quiz {
    /// Create a new quiz from a vector of questions.
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            app: App::with_questions(questions),
        }
    }

    /// Create a quiz with explicit settings and random source.
    pub fn with_settings(questions: Vec<Question>, settings: QuizSettings, rng: SmallRng) -> Self {
        Self {
            app: App::new(QuestionBank::new(questions), settings, rng),
        }
    }

    /// Load a quiz from a JSON file.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use category_quiz::Quiz;
    ///
    /// let quiz = Quiz::from_json("questions.json").expect("Failed to load quiz");
    /// ```
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, QuizError> {
        let questions = load_questions_from_json(path)?;
        Ok(Self::new(questions))
    }

    /// Quiz over the question bank bundled with the crate.
    pub fn embedded() -> Result<Self, QuizError> {
        Ok(Self::new(load_embedded_questions()?))
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub fn run(mut self) -> Result<(), QuizError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app);
        terminal::restore()?;
        result
    }

    /// Get a reference to the underlying app for custom handling.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the underlying app for custom handling.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

fn run_event_loop(terminal: &mut terminal::AppTerminal, app: &mut App) -> Result<(), QuizError> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if handle_input(app, key.code) {
                break;
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode) -> bool {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
        return true;
    }

    match app.state {
        AppState::Home => handle_home_input(app, key),
        AppState::Quiz | AppState::Result if app.focus() == Focus::Tabs => {
            handle_tab_input(app, key)
        }
        AppState::Quiz => handle_quiz_input(app, key),
        AppState::Result => handle_result_input(app, key),
    }

    false
}

fn handle_home_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.home_next(),
        KeyCode::Up | KeyCode::Char('k') => app.home_previous(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate_home(),
        _ => {}
    }
}

fn handle_tab_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Right | KeyCode::Char('l') => app.tab_next(),
        KeyCode::Left | KeyCode::Char('h') => app.tab_previous(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate_tab(),
        KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab => app.focus_options(),
        _ => {}
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) {
    if app.submission().is_some() {
        match key {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n') => {
                app.advance(Instant::now())
            }
            KeyCode::Char('h') | KeyCode::Esc => app.go_home(),
            KeyCode::Tab => app.focus_tabs(),
            _ => {}
        }
        return;
    }

    match key {
        KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate_option(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(digit) = c.to_digit(10) {
                app.select_option(digit as usize - 1);
            }
        }
        KeyCode::Char('c') => app.submit_answer(),
        KeyCode::Char('h') | KeyCode::Esc => app.go_home(),
        KeyCode::Tab => app.focus_tabs(),
        _ => {}
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.result_next(),
        KeyCode::Up | KeyCode::Char('k') => app.result_previous(),
        KeyCode::Enter | KeyCode::Char(' ') => app.review_selected(),
        KeyCode::Char('w') => app.review_incorrect(),
        KeyCode::Tab => app.focus_tabs(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
        KeyCode::Char('h') | KeyCode::Esc => app.go_home(),
        _ => {}
    }
}
