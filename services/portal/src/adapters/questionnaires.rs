//! services/portal/src/adapters/questionnaires.rs

use alumnos_core::domain::{AnswerSheet, QuestionSet, Questionnaire, Respondent};
use alumnos_core::ports::{PortError, PortResult, QuestionnaireService};
use async_trait::async_trait;
use serde::Deserialize;

use crate::adapters::HttpApi;

#[derive(Deserialize)]
struct SaveResult {
    #[serde(default)]
    success: bool,
}

/// Reads the save acknowledgement. An empty body counts as a failed save.
pub fn parse_save_result(body: &str) -> bool {
    if body.trim().is_empty() {
        return false;
    }
    serde_json::from_str::<SaveResult>(body)
        .map(|r| r.success)
        .unwrap_or(false)
}

#[async_trait]
impl QuestionnaireService for HttpApi {
    async fn create_questionnaire(
        &self,
        token: &str,
        questionnaire: &Questionnaire,
    ) -> PortResult<bool> {
        let response = self
            .send(self.post(token, "/api/questionnaires").json(questionnaire))
            .await?;
        let body = response
            .text()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(parse_save_result(&body))
    }

    async fn random_questions(
        &self,
        token: &str,
        questionnaire_id: &str,
        student_id: &str,
    ) -> PortResult<QuestionSet> {
        let path = format!(
            "/api/questionnaires/{}/random-questions/{}",
            questionnaire_id, student_id
        );
        self.send_json(self.get(token, &path)).await
    }

    async fn submit_answers(
        &self,
        token: &str,
        questionnaire_id: &str,
        answers: &AnswerSheet,
    ) -> PortResult<()> {
        let path = format!("/api/questionnaires/{}/submit", questionnaire_id);
        self.send(self.post(token, &path).json(answers)).await?;
        Ok(())
    }

    async fn responses(&self, token: &str, questionnaire_id: &str) -> PortResult<Vec<Respondent>> {
        let path = format!("/api/questionnaires/{}/responses", questionnaire_id);
        self.send_json(self.get(token, &path)).await
    }
}
