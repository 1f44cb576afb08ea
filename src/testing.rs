//! Question fixtures shared by the unit tests.

use crate::models::{DisplayMode, Question};
use crate::quiz::QuestionBank;

/// Four-choice question whose correct answer is choice 0.
pub fn question(id: &str, category: &str, subcategory: Option<&str>) -> Question {
    Question {
        id: id.to_string(),
        category: category.to_string(),
        subcategory: subcategory.map(str::to_string),
        question: format!("Question {}", id),
        translation: format!("問題 {}", id),
        choices: ["alpha", "beta", "gamma", "delta"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        answer: 0,
        meanings: vec![Some("アルファ".to_string()), Some("ベータ".to_string()), None],
        display: DisplayMode::Plain,
    }
}

/// `auditing` questions in 監査論 followed by the given 勘定科目等 subcategories.
pub fn sized_bank(auditing: usize, subcategories: &[(&str, usize)]) -> QuestionBank {
    let mut questions: Vec<Question> = (0..auditing)
        .map(|i| question(&format!("aud-{}", i), "監査論", None))
        .collect();

    for (name, count) in subcategories {
        for i in 0..*count {
            questions.push(question(
                &format!("{}-{}", name, i),
                "勘定科目等",
                Some(name),
            ));
        }
    }

    QuestionBank::new(questions)
}
