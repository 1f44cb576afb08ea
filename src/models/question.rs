use serde::{Deserialize, Serialize};

/// Shown in place of a choice gloss the question bank does not provide.
pub const MISSING_GLOSS: &str = "—";

const TERM_LOOKUP_PROMPT: &str = "The company reported (　) on the balance sheet.";
const TERM_LOOKUP_SENTENCE_SUFFIX: &str = "は貸借対照表で報告される。";
const TERM_LOOKUP_QUESTION_SUFFIX: &str = "は英語でどれか。";

/// How a question's prompt and translation are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Prompt and translation are shown as written.
    #[default]
    Plain,
    /// An account-name lookup, shown as a fill-in-the-blank sentence.
    TermLookup,
}

impl DisplayMode {
    /// Resolves the display mode from the question text.
    ///
    /// Called once while loading the bank; rendering only looks at the tag.
    pub fn detect(question: &str, translation: &str) -> Self {
        let prompt = question.to_lowercase();
        if prompt.contains("which english term corresponds to the japanese account")
            || translation.contains("英語でどれか。")
        {
            Self::TermLookup
        } else {
            Self::Plain
        }
    }
}

/// A single multiple-choice question from the bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub question: String,
    pub translation: String,
    pub choices: Vec<String>,
    pub answer: usize,
    pub meanings: Vec<Option<String>>,
    pub display: DisplayMode,
}

impl Question {
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.answer
    }

    pub fn correct_choice(&self) -> &str {
        self.choices
            .get(self.answer)
            .map(String::as_str)
            .unwrap_or(MISSING_GLOSS)
    }

    /// Gloss for the choice at `index`, or the placeholder when it is missing.
    pub fn gloss(&self, index: usize) -> &str {
        self.meanings
            .get(index)
            .and_then(|m| m.as_deref())
            .unwrap_or(MISSING_GLOSS)
    }

    /// Prompt as it should be displayed.
    pub fn display_prompt(&self) -> String {
        match self.display {
            DisplayMode::Plain => self.question.clone(),
            DisplayMode::TermLookup => TERM_LOOKUP_PROMPT.to_string(),
        }
    }

    /// Translation as it should be displayed.
    pub fn display_translation(&self) -> String {
        match self.display {
            DisplayMode::Plain => self.translation.clone(),
            DisplayMode::TermLookup => {
                // The term is the correct choice's gloss, not `meanings[0]`.
                let term = match self.meanings.get(self.answer).and_then(|m| m.as_deref()) {
                    Some(term) => term.to_string(),
                    None => self
                        .translation
                        .replace(TERM_LOOKUP_QUESTION_SUFFIX, "")
                        .trim()
                        .to_string(),
                };
                format!("{}{}", term, TERM_LOOKUP_SENTENCE_SUFFIX)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(meanings: Vec<Option<String>>) -> Question {
        Question {
            id: "acc-1".to_string(),
            category: "勘定科目等".to_string(),
            subcategory: Some("資産".to_string()),
            question: "Which English term corresponds to the Japanese account '現金'?".to_string(),
            translation: "現金は英語でどれか。".to_string(),
            choices: vec!["Inventory".to_string(), "Cash".to_string()],
            answer: 1,
            meanings,
            display: DisplayMode::TermLookup,
        }
    }

    #[test]
    fn test_detect_display_mode() {
        assert_eq!(
            DisplayMode::detect("which ENGLISH term corresponds to the Japanese account x?", ""),
            DisplayMode::TermLookup
        );
        assert_eq!(
            DisplayMode::detect("Pick one.", "売掛金は英語でどれか。"),
            DisplayMode::TermLookup
        );
        assert_eq!(
            DisplayMode::detect("The auditor shall obtain ( ) evidence.", "監査人は証拠を入手する。"),
            DisplayMode::Plain
        );
    }

    #[test]
    fn test_gloss_placeholder() {
        let q = lookup(vec![Some("棚卸資産".to_string())]);
        assert_eq!(q.gloss(0), "棚卸資産");
        assert_eq!(q.gloss(1), MISSING_GLOSS);

        let q = lookup(vec![None, Some("現金".to_string())]);
        assert_eq!(q.gloss(0), MISSING_GLOSS);
    }

    #[test]
    fn test_term_lookup_uses_correct_gloss() {
        let q = lookup(vec![Some("棚卸資産".to_string()), Some("現金".to_string())]);
        assert_eq!(q.display_prompt(), TERM_LOOKUP_PROMPT);
        assert_eq!(q.display_translation(), "現金は貸借対照表で報告される。");
    }

    #[test]
    fn test_term_lookup_falls_back_to_translation() {
        let q = lookup(Vec::new());
        assert_eq!(q.display_translation(), "現金は貸借対照表で報告される。");
    }

    #[test]
    fn test_plain_display_is_untouched() {
        let mut q = lookup(Vec::new());
        q.display = DisplayMode::Plain;
        assert_eq!(q.display_prompt(), q.question);
        assert_eq!(q.display_translation(), q.translation);
        assert!(q.is_correct(1));
        assert_eq!(q.correct_choice(), "Cash");
    }
}
