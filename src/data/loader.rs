use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::models::{DisplayMode, Question};

const EMBEDDED_QUESTIONS: &str = include_str!("../../data/questions.json");

/// Errors raised while reading or validating a question bank.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("question #{index} has an empty id")]
    EmptyId { index: usize },

    #[error("duplicate question id {id:?}")]
    DuplicateId { id: String },

    #[error("question {id:?} has {count} choice(s), at least 2 are required")]
    TooFewChoices { id: String, count: usize },

    #[error("question {id:?} answer {answer} is out of range for {count} choices")]
    AnswerOutOfRange { id: String, answer: usize, count: usize },

    #[error("question {id:?} has {meanings} meanings for {choices} choices")]
    TooManyMeanings {
        id: String,
        meanings: usize,
        choices: usize,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// Question as it appears in the JSON bank.
#[derive(Deserialize)]
struct QuestionRecord {
    id: RawId,
    category: String,
    #[serde(default)]
    subcategory: Option<String>,
    question: String,
    #[serde(default)]
    translation: String,
    choices: Vec<String>,
    answer: usize,
    #[serde(default)]
    meanings: Vec<Option<String>>,
    #[serde(default)]
    display: Option<DisplayMode>,
}

impl QuestionRecord {
    fn into_question(self) -> Question {
        let display = self
            .display
            .unwrap_or_else(|| DisplayMode::detect(&self.question, &self.translation));
        let subcategory = self.subcategory.filter(|s| !s.trim().is_empty());

        Question {
            id: self.id.into_string(),
            category: self.category,
            subcategory,
            question: self.question,
            translation: self.translation,
            choices: self.choices,
            answer: self.answer,
            meanings: self.meanings,
            display,
        }
    }
}

/// Loads the question bank compiled into the binary.
pub fn load_embedded_questions() -> Result<Vec<Question>, LoadError> {
    parse_questions(EMBEDDED_QUESTIONS)
}

pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();
    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let questions = parse_questions(&json_content)?;
    tracing::info!(path = %path.display(), count = questions.len(), "loaded question bank");
    Ok(questions)
}

/// Parses and validates a JSON array of questions.
pub fn parse_questions(json: &str) -> Result<Vec<Question>, LoadError> {
    let records: Vec<QuestionRecord> = serde_json::from_str(json)?;
    let questions: Vec<Question> = records.into_iter().map(QuestionRecord::into_question).collect();
    validate(&questions)?;
    Ok(questions)
}

fn validate(questions: &[Question]) -> Result<(), LoadError> {
    let mut seen = std::collections::HashSet::with_capacity(questions.len());

    for (index, q) in questions.iter().enumerate() {
        if q.id.trim().is_empty() {
            return Err(LoadError::EmptyId { index });
        }
        if !seen.insert(q.id.as_str()) {
            return Err(LoadError::DuplicateId { id: q.id.clone() });
        }
        if q.choices.len() < 2 {
            return Err(LoadError::TooFewChoices {
                id: q.id.clone(),
                count: q.choices.len(),
            });
        }
        if q.answer >= q.choices.len() {
            return Err(LoadError::AnswerOutOfRange {
                id: q.id.clone(),
                answer: q.answer,
                count: q.choices.len(),
            });
        }
        if q.meanings.len() > q.choices.len() {
            return Err(LoadError::TooManyMeanings {
                id: q.id.clone(),
                meanings: q.meanings.len(),
                choices: q.choices.len(),
            });
        }
    }

    Ok(())
}
