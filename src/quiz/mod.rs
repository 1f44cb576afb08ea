//! The quiz state machine: question bank lookups, sampling, session state
//! and the view models the renderer draws.

mod bank;
mod card;
mod sampling;
mod session;

pub use bank::{GroupCount, QuestionBank};
pub use card::{
    CardView, ChoiceMark, ChoiceView, EMPTY_MESSAGE, Explanation, GlossLine, OptionGroup,
    Progress, QuestionCard, SELECT_PROMPT, Verdict, choice_marks, next_label,
};
pub use sampling::{DEFAULT_SAMPLE_SIZE, Filter, pool, sample};
pub use session::{AnswerStatus, NextStep, ResultRow, Score, Session, SessionError, Submission};
