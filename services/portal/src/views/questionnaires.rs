//! services/portal/src/views/questionnaires.rs
//!
//! Questionnaire authoring for teachers, plus taking one and listing who answered.

use std::collections::HashMap;

use alumnos_core::domain::{Answer, AnswerSheet, Respondent, Session};
use alumnos_core::questionnaire::{PresentedQuestion, QuestionnaireDraft};
use alumnos_core::ports::PortError;
use tracing::{error, info, warn};

use crate::views::{banner_text, AppState, SessionContext, ViewError, ViewResult};

pub const SAVED: &str = "questionnaire saved";
pub const SAVE_FAILED: &str = "could not save the questionnaire";

//=========================================================================================
// Builder
//=========================================================================================

pub struct QuestionnaireBuilder {
    state: AppState,
    session: Session,
    pub class_id: Option<String>,
    pub draft: QuestionnaireDraft,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl QuestionnaireBuilder {
    pub fn mount(state: AppState, ctx: &SessionContext, class_id: Option<String>) -> ViewResult<Self> {
        Ok(Self {
            state,
            session: ctx.require()?,
            class_id,
            draft: QuestionnaireDraft::default(),
            notice: None,
            error: None,
        })
    }

    /// Stores the draft. The draft is only cleared when the server confirms success.
    pub async fn submit(&mut self) -> ViewResult<()> {
        self.error = None;
        self.notice = None;
        let teacher_id = Some(self.session.user.id.clone()).filter(|id| !id.is_empty());
        let questionnaire = match self.draft.build(teacher_id, self.class_id.clone()) {
            Ok(q) => q,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };

        match self
            .state
            .questionnaires
            .create_questionnaire(&self.session.token, &questionnaire)
            .await
        {
            Ok(true) => {
                info!(title = %questionnaire.title, questions = questionnaire.questions.len(), "Questionnaire saved");
                self.notice = Some(SAVED.to_string());
                self.draft.reset();
                Ok(())
            }
            Ok(false) => {
                warn!(title = %questionnaire.title, "Questionnaire not confirmed by the server");
                self.error = Some(SAVE_FAILED.to_string());
                Err(PortError::Unexpected("save not confirmed".to_string()).into())
            }
            Err(e) => {
                error!(title = %questionnaire.title, "Failed to save questionnaire: {}", e);
                self.error = Some(banner_text(&e, SAVE_FAILED));
                Err(ViewError::Failed(e))
            }
        }
    }
}

//=========================================================================================
// Taking a Questionnaire
//=========================================================================================

pub struct QuestionnaireTaker {
    state: AppState,
    session: Session,
    pub questionnaire_id: String,
    pub questions: Vec<PresentedQuestion>,
    answers: HashMap<String, String>,
    pub submitted: bool,
}

impl QuestionnaireTaker {
    /// Fetches this student's random selection. Failures leave the list empty.
    pub async fn mount(state: AppState, ctx: &SessionContext, questionnaire_id: &str) -> ViewResult<Self> {
        let session = ctx.require()?;
        let questions = state
            .questionnaires
            .random_questions(&session.token, questionnaire_id, &session.user.id)
            .await
            .unwrap_or_else(|e| {
                error!(questionnaire_id, "Failed to fetch questions: {}", e);
                Vec::new()
            });
        Ok(Self {
            state,
            session,
            questionnaire_id: questionnaire_id.to_string(),
            questions,
            answers: HashMap::new(),
            submitted: false,
        })
    }

    pub fn answer(&mut self, question_id: &str, value: &str) {
        self.answers
            .insert(question_id.to_string(), value.to_string());
    }

    /// One entry per presented question, in order; unanswered ones are empty.
    pub fn answer_sheet(&self) -> AnswerSheet {
        AnswerSheet {
            student_id: self.session.user.id.clone(),
            answers: self
                .questions
                .iter()
                .map(|q| Answer {
                    question_id: q.id.clone(),
                    answer: self.answers.get(&q.id).cloned().unwrap_or_default(),
                })
                .collect(),
        }
    }

    /// Sends the answers. Failures are only logged.
    pub async fn submit(&mut self) {
        let sheet = self.answer_sheet();
        match self
            .state
            .questionnaires
            .submit_answers(&self.session.token, &self.questionnaire_id, &sheet)
            .await
        {
            Ok(()) => {
                info!(questionnaire_id = %self.questionnaire_id, "Answers sent");
                self.submitted = true;
            }
            Err(e) => error!(questionnaire_id = %self.questionnaire_id, "Failed to send answers: {}", e),
        }
    }
}

//=========================================================================================
// Responses
//=========================================================================================

pub struct ResponsesView {
    pub questionnaire_id: String,
    pub respondents: Vec<Respondent>,
}

impl ResponsesView {
    pub async fn mount(state: AppState, ctx: &SessionContext, questionnaire_id: &str) -> ViewResult<Self> {
        let session = ctx.require()?;
        let respondents = state
            .questionnaires
            .responses(&session.token, questionnaire_id)
            .await
            .unwrap_or_else(|e| {
                error!(questionnaire_id, "Failed to fetch responses: {}", e);
                Vec::new()
            });
        Ok(Self {
            questionnaire_id: questionnaire_id.to_string(),
            respondents,
        })
    }
}
