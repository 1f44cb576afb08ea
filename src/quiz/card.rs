//! View models for the question card. The renderer draws these as-is.

use super::bank::QuestionBank;
use super::session::{NextStep, Session, Submission};
use crate::models::Question;

pub const EMPTY_MESSAGE: &str = "このカテゴリの問題はまだありません。";
pub const SELECT_PROMPT: &str = "選択肢を選んでください。";

/// Position within a run as shown by the progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub position: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(position: usize, total: usize) -> Self {
        Self { position, total }
    }

    /// Fill shown once the run is over.
    pub fn complete(total: usize) -> Self {
        Self {
            position: total,
            total,
        }
    }

    pub fn label(&self) -> String {
        format!("{} / {}", self.position + 1, self.total)
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.position as f64 / self.total as f64).clamp(0.0, 1.0)
    }

    /// Fill percentage, the value exposed as the bar's current value.
    pub fn percent(&self) -> u16 {
        (self.ratio() * 100.0).round() as u16
    }
}

/// Radio-style option group: at most one selected, focus and selection move together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionGroup {
    len: usize,
    focus: usize,
    selected: Option<usize>,
    locked: bool,
}

impl OptionGroup {
    /// A group of `len` options with focus on the first and nothing selected.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn next(&mut self) {
        self.step(1);
    }

    pub fn previous(&mut self) {
        self.step(self.len.saturating_sub(1));
    }

    fn step(&mut self, by: usize) {
        if self.locked || self.len == 0 {
            return;
        }
        self.focus = (self.focus + by) % self.len;
        self.selected = Some(self.focus);
    }

    /// Selects the focused option.
    pub fn activate(&mut self) {
        let focus = self.focus;
        self.select(focus);
    }

    pub fn select(&mut self, index: usize) {
        if self.locked || index >= self.len {
            return;
        }
        self.focus = index;
        self.selected = Some(index);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMark {
    Unmarked,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceView {
    pub text: String,
    pub focused: bool,
    pub selected: bool,
    pub mark: ChoiceMark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect { correct_choice: String },
}

impl Verdict {
    pub fn message(&self) -> String {
        match self {
            Verdict::Correct => "正解！".to_string(),
            Verdict::Incorrect { correct_choice } => {
                format!("不正解。正解は「{}」です。", correct_choice)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossLine {
    pub choice: String,
    pub gloss: String,
    pub is_correct: bool,
    pub is_selected: bool,
}

impl GlossLine {
    pub fn badge(&self) -> Option<&'static str> {
        if self.is_correct {
            Some("✓ 正解")
        } else if self.is_selected {
            Some("✗ あなたの選択")
        } else {
            None
        }
    }
}

/// Feedback shown once an answer has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub verdict: Verdict,
    pub translation: String,
    pub glosses: Vec<GlossLine>,
}

impl Explanation {
    pub fn new(question: &Question, chosen: usize) -> Self {
        let verdict = if question.is_correct(chosen) {
            Verdict::Correct
        } else {
            Verdict::Incorrect {
                correct_choice: question.correct_choice().to_string(),
            }
        };

        let glosses = question
            .choices
            .iter()
            .enumerate()
            .map(|(index, choice)| GlossLine {
                choice: choice.clone(),
                gloss: question.gloss(index).to_string(),
                is_correct: question.is_correct(index),
                is_selected: index == chosen,
            })
            .collect();

        Self {
            verdict,
            translation: question.display_translation(),
            glosses,
        }
    }
}

/// Correct/incorrect marks for each choice after `chosen` was checked.
pub fn choice_marks(question: &Question, chosen: usize) -> Vec<ChoiceMark> {
    (0..question.choices.len())
        .map(|index| {
            if question.is_correct(index) {
                ChoiceMark::Correct
            } else if index == chosen {
                ChoiceMark::Incorrect
            } else {
                ChoiceMark::Unmarked
            }
        })
        .collect()
}

/// Label of the control shown after checking an answer.
pub fn next_label(submission: &Submission) -> &'static str {
    match submission.next {
        NextStep::Question(_) => "次の問題へ",
        NextStep::FinishReview => "復習を終了する",
        NextStep::Results => "結果を見る",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCard {
    pub heading: String,
    pub prompt: String,
    pub choices: Vec<ChoiceView>,
    pub progress: Progress,
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardView {
    Empty,
    Question(QuestionCard),
}

impl CardView {
    /// Builds the card for the session's current position.
    ///
    /// An empty run or a position outside it yields [`CardView::Empty`].
    pub fn build(
        bank: &QuestionBank,
        session: &Session,
        options: &OptionGroup,
        submission: Option<&Submission>,
    ) -> Self {
        let position = session.current();
        let Some(question) = session.question_at(bank, position) else {
            return CardView::Empty;
        };

        let marks = match submission {
            Some(sub) => choice_marks(question, sub.choice),
            None => vec![ChoiceMark::Unmarked; question.choices.len()],
        };

        let choices = question
            .choices
            .iter()
            .zip(marks)
            .enumerate()
            .map(|(index, (text, mark))| ChoiceView {
                text: text.clone(),
                focused: index == options.focus(),
                selected: options.selected() == Some(index),
                mark,
            })
            .collect();

        let label = session.filter().map_or("", |f| f.label());

        CardView::Question(QuestionCard {
            heading: format!("問題（{}） {}", label, position + 1),
            prompt: question.display_prompt(),
            choices,
            progress: Progress::new(position, session.len()),
            locked: options.is_locked(),
        })
    }
}
