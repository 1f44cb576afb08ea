//! Session state for one run: the sampled questions, recorded answers and
//! the review subset. Nothing here touches the terminal.

use std::fmt;

use thiserror::Error;

use super::bank::QuestionBank;
use super::sampling::Filter;
use crate::models::Question;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("position {position} is outside the current run of {len} question(s)")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("choice {choice} is outside the {count} available choice(s)")]
    ChoiceOutOfRange { choice: usize, count: usize },

    #[error("no choice selected")]
    NothingSelected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStatus {
    Unanswered,
    Correct,
    Incorrect,
}

impl AnswerStatus {
    pub fn label(self) -> &'static str {
        match self {
            AnswerStatus::Unanswered => "未回答",
            AnswerStatus::Correct => "正解",
            AnswerStatus::Incorrect => "不正解",
        }
    }
}

/// One line of the results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub position: usize,
    pub status: AnswerStatus,
}

impl ResultRow {
    pub fn ordinal(&self) -> usize {
        self.position + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            self.correct as f64 * 100.0 / self.total as f64
        } else {
            0.0
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.correct, self.total)
    }
}

/// What the control shown after an answer leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    Question(usize),
    FinishReview,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub position: usize,
    pub choice: usize,
    pub correct: bool,
    pub next: NextStep,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    filter: Option<Filter>,
    /// Sampled questions as absolute store positions, indexed by run position.
    entries: Vec<usize>,
    current: usize,
    answers: Vec<Option<usize>>,
    review: Option<Vec<usize>>,
}

impl Session {
    /// An idle session with no run, sized for `bank`.
    pub fn new(bank: &QuestionBank) -> Self {
        Self {
            answers: vec![None; bank.len()],
            ..Self::default()
        }
    }

    /// A fresh run over `entries`, given as absolute store positions.
    pub fn start(bank: &QuestionBank, filter: Filter, entries: Vec<usize>) -> Self {
        debug_assert!(entries.iter().all(|&abs| abs < bank.len()));
        Self {
            filter: Some(filter),
            entries,
            current: 0,
            answers: vec![None; bank.len()],
            review: None,
        }
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn review_list(&self) -> Option<&[usize]> {
        self.review.as_deref().filter(|list| !list.is_empty())
    }

    pub fn is_reviewing(&self) -> bool {
        self.review_list().is_some()
    }

    /// Absolute store position of the question at run `position`.
    pub fn absolute(&self, position: usize) -> Option<usize> {
        self.entries.get(position).copied()
    }

    pub fn question_at<'a>(&self, bank: &'a QuestionBank, position: usize) -> Option<&'a Question> {
        self.absolute(position).and_then(|abs| bank.get(abs))
    }

    pub fn answer_at(&self, position: usize) -> Option<usize> {
        self.absolute(position)
            .and_then(|abs| self.answers.get(abs).copied().flatten())
    }

    pub fn status_at(&self, bank: &QuestionBank, position: usize) -> AnswerStatus {
        match (self.answer_at(position), self.question_at(bank, position)) {
            (Some(choice), Some(q)) if q.is_correct(choice) => AnswerStatus::Correct,
            (Some(_), Some(_)) => AnswerStatus::Incorrect,
            _ => AnswerStatus::Unanswered,
        }
    }

    fn check_position(&self, position: usize) -> Result<usize, SessionError> {
        self.absolute(position).ok_or(SessionError::PositionOutOfRange {
            position,
            len: self.len(),
        })
    }

    pub fn go_to(&mut self, position: usize) -> Result<(), SessionError> {
        self.check_position(position)?;
        self.current = position;
        Ok(())
    }

    /// Records `selected` for the question at `position`.
    pub fn submit(
        &mut self,
        bank: &QuestionBank,
        position: usize,
        selected: Option<usize>,
    ) -> Result<Submission, SessionError> {
        let absolute = self.check_position(position)?;
        let choice = selected.ok_or(SessionError::NothingSelected)?;
        let question = bank.get(absolute).ok_or(SessionError::PositionOutOfRange {
            position,
            len: self.len(),
        })?;
        if choice >= question.choices.len() {
            return Err(SessionError::ChoiceOutOfRange {
                choice,
                count: question.choices.len(),
            });
        }

        if let Some(slot) = self.answers.get_mut(absolute) {
            *slot = Some(choice);
        }

        Ok(Submission {
            position,
            choice,
            correct: question.is_correct(choice),
            next: self.next_step(position),
        })
    }

    pub fn next_step(&self, position: usize) -> NextStep {
        if let Some(list) = self.review_list() {
            return match list.iter().position(|&p| p == position) {
                Some(at) if at + 1 < list.len() => NextStep::Question(list[at + 1]),
                _ => NextStep::FinishReview,
            };
        }

        if position + 1 < self.len() {
            NextStep::Question(position + 1)
        } else {
            NextStep::Results
        }
    }

    pub fn score(&self, bank: &QuestionBank) -> Score {
        let correct = (0..self.len())
            .filter(|&p| self.status_at(bank, p) == AnswerStatus::Correct)
            .count();
        Score {
            correct,
            total: self.len(),
        }
    }

    pub fn rows(&self, bank: &QuestionBank) -> Vec<ResultRow> {
        (0..self.len())
            .map(|position| ResultRow {
                position,
                status: self.status_at(bank, position),
            })
            .collect()
    }

    /// Clears the answer at `position` and makes it the only question to re-attempt.
    pub fn review(&mut self, position: usize) -> Result<(), SessionError> {
        self.review_positions(vec![position])
    }

    /// Re-attempts every question that is not answered correctly.
    ///
    /// Returns the first position to show, or `None` when everything is correct.
    pub fn review_incorrect(&mut self, bank: &QuestionBank) -> Option<usize> {
        let positions: Vec<usize> = self
            .rows(bank)
            .into_iter()
            .filter(|row| row.status != AnswerStatus::Correct)
            .map(|row| row.position)
            .collect();
        let first = positions.first().copied()?;
        self.review_positions(positions).ok()?;
        Some(first)
    }

    fn review_positions(&mut self, positions: Vec<usize>) -> Result<(), SessionError> {
        let first = match positions.first() {
            Some(&first) => first,
            None => return Ok(()),
        };
        let absolutes = positions
            .iter()
            .map(|&p| self.check_position(p))
            .collect::<Result<Vec<_>, _>>()?;

        for abs in absolutes {
            if let Some(slot) = self.answers.get_mut(abs) {
                *slot = None;
            }
        }
        self.review = Some(positions);
        self.current = first;
        Ok(())
    }

    pub fn finish_review(&mut self) {
        self.review = None;
    }

    /// Clears every answer in the run and goes back to the first question.
    pub fn restart(&mut self) {
        for &abs in &self.entries {
            if let Some(slot) = self.answers.get_mut(abs) {
                *slot = None;
            }
        }
        self.review = None;
        self.current = 0;
    }
}
