//! crates/alumnos_core/src/questionnaire.rs
//!
//! Questions are a tagged union over their kind. On the wire they keep the
//! backend's flat shape: `{ type, text, options, correctAnswer }`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Questionnaire;
use crate::validation::ValidationError;

/// Default number of questions shown to each student.
pub const DEFAULT_QUESTIONS_TO_SHOW: u32 = 10;

/// The discriminant of a [`QuestionKind`], used when the author switches a question's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindTag {
    Open,
    Multiple,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionKind {
    Open {
        #[serde(default, rename = "correctAnswer")]
        correct_answer: String,
    },
    Multiple {
        #[serde(default)]
        options: Vec<String>,
        #[serde(default, rename = "correctAnswer")]
        correct_answer: String,
    },
    Boolean {
        #[serde(default, rename = "correctAnswer", with = "bool_answer")]
        correct_answer: Option<bool>,
    },
}

impl QuestionKind {
    pub fn empty(tag: KindTag) -> Self {
        match tag {
            KindTag::Open => QuestionKind::Open {
                correct_answer: String::new(),
            },
            KindTag::Multiple => QuestionKind::Multiple {
                options: Vec::new(),
                correct_answer: String::new(),
            },
            KindTag::Boolean => QuestionKind::Boolean {
                correct_answer: None,
            },
        }
    }

    pub fn tag(&self) -> KindTag {
        match self {
            QuestionKind::Open { .. } => KindTag::Open,
            QuestionKind::Multiple { .. } => KindTag::Multiple,
            QuestionKind::Boolean { .. } => KindTag::Boolean,
        }
    }

    /// The answers a student can pick from. Open questions take free text and return none.
    pub fn choices(&self) -> Vec<String> {
        match self {
            QuestionKind::Open { .. } => Vec::new(),
            QuestionKind::Multiple { options, .. } => options.clone(),
            QuestionKind::Boolean { .. } => vec!["true".to_string(), "false".to_string()],
        }
    }
}

/// A question as authored by a teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Default for Question {
    fn default() -> Self {
        Question {
            text: String::new(),
            kind: QuestionKind::empty(KindTag::Open),
        }
    }
}

/// A question served to a student for answering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentedQuestion {
    #[serde(alias = "_id")]
    pub id: String,
    pub text: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

mod bool_answer {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<bool>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(true) => s.serialize_str("true"),
            Some(false) => s.serialize_str("false"),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(match raw.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        })
    }
}

//=========================================================================================
// Authoring Draft
//=========================================================================================

/// Form state accumulated while a teacher builds a questionnaire.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionnaireDraft {
    pub title: String,
    pub instructions: String,
    /// Due date as typed, `YYYY-MM-DD`.
    pub due_date: String,
    pub questions_to_show: u32,
    pub questions: Vec<Question>,
}

impl Default for QuestionnaireDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            instructions: String::new(),
            due_date: String::new(),
            questions_to_show: DEFAULT_QUESTIONS_TO_SHOW,
            questions: Vec::new(),
        }
    }
}

impl QuestionnaireDraft {
    /// Appends an empty open question and returns its index.
    pub fn add_question(&mut self) -> usize {
        self.questions.push(Question::default());
        self.questions.len() - 1
    }

    fn question_mut(&mut self, index: usize) -> Result<&mut Question, ValidationError> {
        self.questions
            .get_mut(index)
            .ok_or(ValidationError::NoSuchQuestion(index))
    }

    pub fn set_text(&mut self, index: usize, text: &str) -> Result<(), ValidationError> {
        self.question_mut(index)?.text = text.to_string();
        Ok(())
    }

    /// Switches a question's kind. The text is kept, kind-specific fields start over.
    pub fn set_kind(&mut self, index: usize, tag: KindTag) -> Result<(), ValidationError> {
        let question = self.question_mut(index)?;
        if question.kind.tag() != tag {
            question.kind = QuestionKind::empty(tag);
        }
        Ok(())
    }

    /// Sets the options of a multiple-choice question from a comma separated list.
    /// Ignored for other kinds, which have no options to edit.
    pub fn set_options(&mut self, index: usize, raw: &str) -> Result<(), ValidationError> {
        if let QuestionKind::Multiple { options, .. } = &mut self.question_mut(index)?.kind {
            *options = raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(())
    }

    pub fn set_correct_answer(&mut self, index: usize, raw: &str) -> Result<(), ValidationError> {
        match &mut self.question_mut(index)?.kind {
            QuestionKind::Open { correct_answer } | QuestionKind::Multiple { correct_answer, .. } => {
                *correct_answer = raw.to_string();
            }
            QuestionKind::Boolean { correct_answer } => {
                *correct_answer = match raw {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => None,
                };
            }
        }
        Ok(())
    }

    /// Checks the top-level fields and builds the document to submit.
    pub fn build(
        &self,
        teacher_id: Option<String>,
        class_id: Option<String>,
    ) -> Result<Questionnaire, ValidationError> {
        if self.title.trim().is_empty()
            || self.instructions.trim().is_empty()
            || self.due_date.trim().is_empty()
        {
            return Err(ValidationError::IncompleteForm);
        }
        if self.questions.is_empty() {
            return Err(ValidationError::NoQuestions);
        }
        let due_date = NaiveDate::parse_from_str(self.due_date.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(self.due_date.clone()))?;

        Ok(Questionnaire {
            title: self.title.clone(),
            instructions: self.instructions.clone(),
            due_date,
            questions: self.questions.clone(),
            questions_to_show: self.questions_to_show,
            teacher_id,
            class_id,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
