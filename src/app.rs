use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::QuizSettings;
use crate::models::{AppState, Question};
use crate::quiz::{
    CardView, Explanation, Filter, NextStep, OptionGroup, Progress, QuestionBank, ResultRow,
    SELECT_PROMPT, Score, Session, SessionError, Submission, pool, sample,
};

/// Which widget receives arrow keys on the question screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Options,
    Tabs,
}

/// A selectable card on the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeEntry {
    pub filter: Filter,
    pub count: usize,
}

/// Question render scheduled after the progress animation.
#[derive(Debug, Clone, Copy)]
struct PendingQuestion {
    position: usize,
    due: Instant,
}

pub struct App {
    pub state: AppState,
    bank: QuestionBank,
    settings: QuizSettings,
    rng: SmallRng,
    session: Session,
    options: OptionGroup,
    submission: Option<Submission>,
    explanation: Option<Explanation>,
    notice: Option<String>,
    fill: Progress,
    focus: Focus,
    home_cursor: usize,
    tab_cursor: usize,
    result_cursor: usize,
    pending: Option<PendingQuestion>,
}

impl App {
    pub fn new(bank: QuestionBank, settings: QuizSettings, rng: SmallRng) -> Self {
        let session = Session::new(&bank);
        Self {
            state: AppState::Home,
            bank,
            settings,
            rng,
            session,
            options: OptionGroup::default(),
            submission: None,
            explanation: None,
            notice: None,
            fill: Progress::new(0, 0),
            focus: Focus::Options,
            home_cursor: 0,
            tab_cursor: 0,
            result_cursor: 0,
            pending: None,
        }
    }

    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self::new(
            QuestionBank::new(questions),
            QuizSettings::default(),
            SmallRng::from_entropy(),
        )
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn options(&self) -> &OptionGroup {
        &self.options
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    pub fn explanation(&self) -> Option<&Explanation> {
        self.explanation.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Progress bar fill. Runs ahead of the card while a transition is pending.
    pub fn fill(&self) -> Progress {
        self.fill
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn home_cursor(&self) -> usize {
        self.home_cursor
    }

    pub fn tab_cursor(&self) -> usize {
        self.tab_cursor
    }

    pub fn result_cursor(&self) -> usize {
        self.result_cursor
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn card(&self) -> CardView {
        CardView::build(
            &self.bank,
            &self.session,
            &self.options,
            self.submission.as_ref(),
        )
    }

    pub fn score(&self) -> Score {
        self.session.score(&self.bank)
    }

    pub fn rows(&self) -> Vec<ResultRow> {
        self.session.rows(&self.bank)
    }

    /// Category cards followed by subcategory cards, with their question counts.
    pub fn home_entries(&self) -> Vec<HomeEntry> {
        let categories = self.bank.categories().iter().map(|g| HomeEntry {
            filter: Filter::Category(g.name.clone()),
            count: g.count,
        });
        let subcategories = self.bank.subcategories().iter().map(|g| HomeEntry {
            filter: Filter::Subcategory(g.name.clone()),
            count: g.count,
        });
        categories.chain(subcategories).collect()
    }

    /// The tab bar is only shown for category runs.
    pub fn tabs_visible(&self) -> bool {
        self.state != AppState::Home && self.session.filter().is_some_and(Filter::is_category)
    }

    /// Category the tab bar marks as selected.
    pub fn current_category(&self) -> Option<&str> {
        match self.session.filter()? {
            Filter::Category(name) => Some(name),
            Filter::Subcategory(name) => self.bank.parent_category(name),
        }
    }

    // Home

    pub fn home_next(&mut self) {
        let len = self.home_entries().len();
        if len > 0 {
            self.home_cursor = (self.home_cursor + 1) % len;
        }
    }

    pub fn home_previous(&mut self) {
        let len = self.home_entries().len();
        if len > 0 {
            self.home_cursor = (self.home_cursor + len - 1) % len;
        }
    }

    pub fn activate_home(&mut self) {
        let Some(entry) = self.home_entries().into_iter().nth(self.home_cursor) else {
            return;
        };
        self.start(entry.filter);
    }

    pub fn start_category(&mut self, name: &str) {
        self.start(Filter::Category(name.to_string()));
    }

    pub fn start_subcategory(&mut self, name: &str) {
        self.start(Filter::Subcategory(name.to_string()));
    }

    /// Samples a fresh run for `filter` and shows its first question.
    pub fn start(&mut self, filter: Filter) {
        let candidates = pool(&self.bank, &filter);
        let available = candidates.len();
        let entries = sample(
            candidates,
            self.settings.sample_size,
            self.settings.shuffle_small_pools,
            &mut self.rng,
        );

        tracing::info!(
            filter = filter.label(),
            available,
            sampled = entries.len(),
            "starting run"
        );

        self.session = Session::start(&self.bank, filter, entries);
        self.state = AppState::Quiz;
        self.focus = Focus::Options;
        self.result_cursor = 0;
        if let Some(index) = self.current_category().and_then(|name| {
            self.bank
                .categories()
                .iter()
                .position(|g| g.name == name)
        }) {
            self.tab_cursor = index;
        }
        self.enter_question(0);
    }

    // Question

    pub fn select_next_option(&mut self) {
        if self.accepts_option_input() {
            self.options.next();
            self.notice = None;
        }
    }

    pub fn select_previous_option(&mut self) {
        if self.accepts_option_input() {
            self.options.previous();
            self.notice = None;
        }
    }

    pub fn activate_option(&mut self) {
        if self.accepts_option_input() {
            self.options.activate();
            self.notice = None;
        }
    }

    pub fn select_option(&mut self, index: usize) {
        if self.accepts_option_input() {
            self.options.select(index);
            self.notice = None;
        }
    }

    fn accepts_option_input(&self) -> bool {
        self.state == AppState::Quiz && self.pending.is_none() && self.submission.is_none()
    }

    /// Checks the selected option against the current question.
    pub fn submit_answer(&mut self) {
        if !self.accepts_option_input() || self.session.is_empty() {
            return;
        }

        let position = self.session.current();
        match self
            .session
            .submit(&self.bank, position, self.options.selected())
        {
            Ok(submission) => {
                tracing::info!(
                    position,
                    choice = submission.choice,
                    correct = submission.correct,
                    "answer recorded"
                );
                self.options.lock();
                self.explanation = self
                    .session
                    .question_at(&self.bank, position)
                    .map(|q| Explanation::new(q, submission.choice));
                self.submission = Some(submission);
                self.notice = None;
            }
            Err(SessionError::NothingSelected) => {
                self.notice = Some(SELECT_PROMPT.to_string());
            }
            Err(err) => self.report(err),
        }
    }

    /// Follows the control shown after an answer was checked.
    pub fn advance(&mut self, now: Instant) {
        if self.state != AppState::Quiz || self.pending.is_some() {
            return;
        }
        let Some(submission) = self.submission else {
            return;
        };

        match submission.next {
            NextStep::Question(position) => {
                self.fill = Progress::new(position, self.session.len());
                if self.settings.transition_delay.is_zero() {
                    self.enter_question(position);
                } else {
                    self.pending = Some(PendingQuestion {
                        position,
                        due: now + self.settings.transition_delay,
                    });
                }
            }
            NextStep::FinishReview => {
                tracing::info!(position = submission.position, "review finished");
                self.session.finish_review();
                self.show_results();
            }
            NextStep::Results => self.show_results(),
        }
    }

    /// Applies a pending question transition once it is due.
    pub fn tick(&mut self, now: Instant) {
        if let Some(pending) = self.pending {
            if now >= pending.due {
                self.pending = None;
                self.enter_question(pending.position);
            }
        }
    }

    fn enter_question(&mut self, position: usize) {
        self.pending = None;
        self.submission = None;
        self.explanation = None;
        self.notice = None;
        self.state = AppState::Quiz;
        self.focus = Focus::Options;

        if self.session.is_empty() {
            self.options = OptionGroup::default();
            self.fill = Progress::new(0, 0);
            return;
        }

        if let Err(err) = self.session.go_to(position) {
            self.report(err);
            return;
        }

        let choices = self
            .session
            .question_at(&self.bank, position)
            .map_or(0, |q| q.choices.len());
        self.options = OptionGroup::new(choices);
        self.fill = Progress::new(position, self.session.len());
    }

    pub fn go_home(&mut self) {
        tracing::info!("returning home");
        self.session = Session::new(&self.bank);
        self.state = AppState::Home;
        self.options = OptionGroup::default();
        self.submission = None;
        self.explanation = None;
        self.notice = None;
        self.pending = None;
        self.focus = Focus::Options;
        self.result_cursor = 0;
        self.fill = Progress::new(0, 0);
    }

    // Tabs

    /// Moves keyboard focus to the tab bar on the question and results screens.
    pub fn focus_tabs(&mut self) {
        if self.tabs_visible() && self.pending.is_none() {
            self.focus = Focus::Tabs;
        }
    }

    pub fn focus_options(&mut self) {
        self.focus = Focus::Options;
    }

    pub fn tab_next(&mut self) {
        let len = self.bank.categories().len();
        if len > 0 {
            self.tab_cursor = (self.tab_cursor + 1) % len;
        }
    }

    pub fn tab_previous(&mut self) {
        let len = self.bank.categories().len();
        if len > 0 {
            self.tab_cursor = (self.tab_cursor + len - 1) % len;
        }
    }

    pub fn activate_tab(&mut self) {
        let Some(name) = self
            .bank
            .categories()
            .get(self.tab_cursor)
            .map(|g| g.name.clone())
        else {
            return;
        };
        self.select_tab(&name);
        self.focus = Focus::Options;
    }

    /// Switches to category `name` unless it is already the active category run.
    pub fn select_tab(&mut self, name: &str) {
        if self.session.filter() == Some(&Filter::Category(name.to_string())) {
            return;
        }
        self.start_category(name);
    }

    // Results

    pub fn show_results(&mut self) {
        let score = self.score();
        tracing::info!(correct = score.correct, total = score.total, "showing results");
        self.state = AppState::Result;
        self.pending = None;
        self.focus = Focus::Options;
        self.fill = Progress::complete(self.session.len());
        self.result_cursor = self.result_cursor.min(self.session.len().saturating_sub(1));
    }

    pub fn result_next(&mut self) {
        let len = self.session.len();
        if len > 0 {
            self.result_cursor = (self.result_cursor + 1).min(len - 1);
        }
    }

    pub fn result_previous(&mut self) {
        self.result_cursor = self.result_cursor.saturating_sub(1);
    }

    pub fn review_selected(&mut self) {
        self.review(self.result_cursor);
    }

    /// Re-attempts the single question at run `position`.
    pub fn review(&mut self, position: usize) {
        match self.session.review(position) {
            Ok(()) => {
                tracing::info!(position, "reviewing question");
                self.result_cursor = position;
                self.enter_question(position);
            }
            Err(err) => self.report(err),
        }
    }

    /// Re-attempts every question not answered correctly.
    pub fn review_incorrect(&mut self) {
        if let Some(first) = self.session.review_incorrect(&self.bank) {
            tracing::info!(
                count = self.session.review_list().map_or(0, <[usize]>::len),
                "reviewing incorrect questions"
            );
            self.enter_question(first);
        }
    }

    pub fn restart(&mut self) {
        tracing::info!("restarting run");
        self.session.restart();
        self.result_cursor = 0;
        self.enter_question(0);
    }

    fn report(&mut self, err: SessionError) {
        tracing::warn!(error = %err, "ignored request");
        self.notice = Some(err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use super::*;
    use crate::quiz::AnswerStatus;
    use crate::testing::sized_bank;

    fn app_with(bank: QuestionBank, delay: Duration) -> App {
        let settings = QuizSettings {
            transition_delay: delay,
            ..QuizSettings::default()
        };
        App::new(bank, settings, SmallRng::seed_from_u64(42))
    }

    fn app() -> App {
        app_with(
            sized_bank(15, &[("資産", 3), ("負債", 2)]),
            Duration::ZERO,
        )
    }

    fn answer(app: &mut App, choice: usize) {
        app.select_option(choice);
        app.submit_answer();
        app.advance(Instant::now());
    }

    #[test]
    fn test_home_lists_categories_then_subcategories() {
        let app = app();
        let entries = app.home_entries();
        assert_eq!(
            entries,
            [
                HomeEntry {
                    filter: Filter::Category("監査論".to_string()),
                    count: 15
                },
                HomeEntry {
                    filter: Filter::Category("勘定科目等".to_string()),
                    count: 5
                },
                HomeEntry {
                    filter: Filter::Subcategory("資産".to_string()),
                    count: 3
                },
                HomeEntry {
                    filter: Filter::Subcategory("負債".to_string()),
                    count: 2
                },
            ]
        );
        assert_eq!(app.state, AppState::Home);
        assert!(!app.tabs_visible());
    }

    #[test]
    fn test_category_run_scenario() {
        let mut app = app();
        app.start_category("監査論");
        assert_eq!(app.state, AppState::Quiz);
        assert_eq!(app.session().len(), 10);
        assert!(app.tabs_visible());

        for position in 0..10 {
            assert_eq!(app.session().current(), position);
            answer(&mut app, if position < 7 { 0 } else { 2 });
        }

        assert_eq!(app.state, AppState::Result);
        assert_eq!(app.score().to_string(), "7 / 10");
        assert_eq!(app.fill().percent(), 100);
        assert_eq!(app.rows()[8].status, AnswerStatus::Incorrect);

        app.review(8);
        assert_eq!(app.state, AppState::Quiz);
        assert_eq!(app.session().current(), 8);
        assert_eq!(app.session().answer_at(8), None);

        app.select_option(0);
        app.submit_answer();
        assert_eq!(
            app.submission().map(|s| s.next),
            Some(NextStep::FinishReview)
        );
        app.advance(Instant::now());

        assert_eq!(app.state, AppState::Result);
        assert!(!app.session().is_reviewing());
        assert_eq!(app.score().to_string(), "8 / 10");
        assert_eq!(app.rows()[8].status, AnswerStatus::Correct);
    }

    #[test]
    fn test_subcategory_run_uses_whole_pool() {
        let mut app = app();
        app.start_subcategory("資産");

        assert_eq!(app.session().len(), 3);
        let ids: HashSet<&str> = (0..3)
            .filter_map(|p| app.session().question_at(app.bank(), p))
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(ids, HashSet::from(["資産-0", "資産-1", "資産-2"]));
        assert!(!app.tabs_visible());
        assert_eq!(app.current_category(), Some("勘定科目等"));
    }

    #[test]
    fn test_submit_without_selection_prompts() {
        let mut app = app();
        app.start_category("監査論");
        app.submit_answer();

        assert_eq!(app.notice(), Some(SELECT_PROMPT));
        assert!(app.submission().is_none());
        assert!(app.explanation().is_none());
        assert_eq!(app.session().answer_at(0), None);
        assert_eq!(app.session().current(), 0);

        app.advance(Instant::now());
        assert_eq!(app.session().current(), 0);

        app.select_next_option();
        assert_eq!(app.notice(), None);
        app.submit_answer();
        assert_eq!(app.session().answer_at(0), Some(1));
    }

    #[test]
    fn test_checked_answer_locks_options_and_explains() {
        let mut app = app();
        app.start_category("監査論");
        app.select_option(3);
        app.submit_answer();

        assert!(app.options().is_locked());
        app.select_option(0);
        assert_eq!(app.options().selected(), Some(3));

        let explanation = app.explanation().unwrap();
        assert_eq!(explanation.verdict.message(), "不正解。正解は「alpha」です。");
        assert_eq!(explanation.glosses[3].badge(), Some("✗ あなたの選択"));

        app.submit_answer();
        assert_eq!(app.session().answer_at(0), Some(3));
    }

    #[test]
    fn test_delayed_transition() {
        let mut app = app_with(sized_bank(3, &[]), Duration::from_millis(220));
        app.start_category("監査論");
        app.select_option(0);
        app.submit_answer();

        let now = Instant::now();
        app.advance(now);
        assert!(app.is_transitioning());
        assert_eq!(app.fill(), Progress::new(1, 3));
        assert_eq!(app.session().current(), 0);

        app.select_option(2);
        app.tick(now + Duration::from_millis(100));
        assert_eq!(app.session().current(), 0);

        app.tick(now + Duration::from_millis(300));
        assert!(!app.is_transitioning());
        assert_eq!(app.session().current(), 1);
        assert_eq!(app.options().selected(), None);
        assert!(app.submission().is_none());
    }

    #[test]
    fn test_next_question_takes_option_focus() {
        let mut app = app_with(sized_bank(3, &[]), Duration::from_millis(220));
        app.start_category("監査論");
        app.select_option(0);
        app.submit_answer();
        app.focus_tabs();
        assert_eq!(app.focus(), Focus::Tabs);

        let now = Instant::now();
        app.advance(now);
        app.focus_tabs();
        app.tick(now + Duration::from_millis(300));

        assert_eq!(app.session().current(), 1);
        assert_eq!(app.focus(), Focus::Options);
        assert_eq!(app.options().focus(), 0);
        match app.card() {
            CardView::Question(card) => assert!(card.choices[0].focused),
            CardView::Empty => panic!("expected a question card"),
        }
    }

    #[test]
    fn test_restart_clears_run() {
        let mut app = app();
        app.start_category("監査論");
        for _ in 0..10 {
            answer(&mut app, 0);
        }
        assert_eq!(app.score().correct, 10);

        app.restart();
        assert_eq!(app.state, AppState::Quiz);
        assert_eq!(app.session().current(), 0);
        assert!((0..10).all(|p| app.session().answer_at(p).is_none()));
        assert_eq!(app.score().correct, 0);
    }

    #[test]
    fn test_review_incorrect_then_finish() {
        let mut app = app();
        app.start_subcategory("資産");
        answer(&mut app, 1);
        answer(&mut app, 0);
        answer(&mut app, 1);
        assert_eq!(app.score().to_string(), "1 / 3");

        app.review_incorrect();
        assert_eq!(app.session().current(), 0);
        answer(&mut app, 0);
        assert_eq!(app.session().current(), 2);
        answer(&mut app, 0);

        assert_eq!(app.state, AppState::Result);
        assert_eq!(app.score().to_string(), "3 / 3");
    }

    #[test]
    fn test_tab_switching() {
        let mut app = app();
        app.start_category("監査論");
        app.select_option(0);
        app.submit_answer();

        app.select_tab("監査論");
        assert_eq!(app.session().answer_at(0), Some(0));

        app.focus_tabs();
        assert_eq!(app.focus(), Focus::Tabs);
        app.tab_next();
        app.activate_tab();
        assert_eq!(app.focus(), Focus::Options);
        assert_eq!(
            app.session().filter(),
            Some(&Filter::Category("勘定科目等".to_string()))
        );
        assert_eq!(app.session().len(), 5);
        assert_eq!(app.session().current(), 0);

        app.tab_next();
        assert_eq!(app.tab_cursor(), 0);
        app.tab_previous();
        assert_eq!(app.tab_cursor(), 1);
    }

    #[test]
    fn test_tab_switching_from_results() {
        let mut app = app();
        app.start_category("勘定科目等");
        for _ in 0..5 {
            answer(&mut app, 0);
        }
        assert_eq!(app.state, AppState::Result);
        assert!(app.tabs_visible());

        app.focus_tabs();
        assert_eq!(app.focus(), Focus::Tabs);
        app.tab_previous();
        app.activate_tab();

        assert_eq!(app.state, AppState::Quiz);
        assert_eq!(app.focus(), Focus::Options);
        assert_eq!(
            app.session().filter(),
            Some(&Filter::Category("監査論".to_string()))
        );
        assert_eq!(app.session().len(), 10);
    }

    #[test]
    fn test_subcategory_results_keep_tabs_hidden() {
        let mut app = app();
        app.start_subcategory("負債");
        for _ in 0..2 {
            answer(&mut app, 0);
        }
        assert_eq!(app.state, AppState::Result);
        assert!(!app.tabs_visible());
        app.focus_tabs();
        assert_eq!(app.focus(), Focus::Options);
    }

    #[test]
    fn test_go_home_discards_run() {
        let mut app = app();
        app.start_category("監査論");
        answer(&mut app, 0);
        app.go_home();

        assert_eq!(app.state, AppState::Home);
        assert!(app.session().is_empty());
        assert!(app.session().filter().is_none());
        assert!(app.notice().is_none());
    }

    #[test]
    fn test_empty_category_shows_empty_card() {
        let mut app = app();
        app.start_category("財務会計論");
        assert_eq!(app.state, AppState::Quiz);
        assert_eq!(app.card(), CardView::Empty);
        app.submit_answer();
        app.advance(Instant::now());
        assert_eq!(app.state, AppState::Quiz);
        assert!(app.notice().is_none());
    }

    #[test]
    fn test_out_of_range_review_is_reported() {
        let mut app = app();
        app.start_subcategory("負債");
        app.review(9);
        assert!(app.notice().is_some());
        assert!(!app.session().is_reviewing());
    }

    #[test]
    fn test_home_cursor_wraps_and_starts() {
        let mut app = app();
        app.home_previous();
        assert_eq!(app.home_cursor(), 3);
        app.activate_home();
        assert_eq!(
            app.session().filter(),
            Some(&Filter::Subcategory("負債".to_string()))
        );
        assert_eq!(app.session().len(), 2);
    }

    #[test]
    fn test_card_is_idempotent() {
        let mut app = app();
        app.start_category("監査論");
        app.select_option(1);
        assert_eq!(app.card(), app.card());
    }
}
