//! Classify-persona stage

use serde::Serialize;
use tracing::{debug, info};

use super::Pipeline;
use crate::domain::{NOT_ENTERED, OBJECTIVE_NOT_SET, Okr, Persona, PersonaClassification, PersonaCode, VisionAnswers, or_placeholder};
use crate::error::PipelineError;
use crate::extract::extract;

#[derive(Debug, Serialize)]
struct PersonaLine {
    code: String,
    name: String,
    description: String,
    traits: String,
    vision_focus: String,
}

#[derive(Debug, Serialize)]
struct ClassifyContext {
    objective: String,
    key_results: String,
    vision: String,
    personas: Vec<PersonaLine>,
    codes: String,
}

/// Key results as one comma-separated line, or the placeholder
pub(super) fn joined_key_results(okr: &Okr) -> String {
    let krs: Vec<&str> = okr
        .key_results
        .iter()
        .map(|kr| kr.trim())
        .filter(|kr| !kr.is_empty())
        .collect();
    if krs.is_empty() {
        NOT_ENTERED.to_string()
    } else {
        krs.join(", ")
    }
}

fn classify_context(okr: &Okr, vision: &VisionAnswers) -> ClassifyContext {
    let catalog = PersonaCode::catalog();
    let codes: Vec<&str> = PersonaCode::ALL.iter().map(|c| c.as_str()).collect();
    ClassifyContext {
        objective: or_placeholder(&okr.objective, OBJECTIVE_NOT_SET).to_string(),
        key_results: joined_key_results(okr),
        vision: vision.render_full(),
        personas: catalog
            .into_iter()
            .map(|p| PersonaLine {
                code: p.code.to_string(),
                name: p.name,
                description: p.description,
                traits: p.traits.join(", "),
                vision_focus: p.vision_focus,
            })
            .collect(),
        codes: codes.join(", "),
    }
}

impl Pipeline {
    /// Assign one catalog persona; unknown codes and unparseable replies resolve to the default
    pub async fn classify_persona(&self, okr: &Okr, vision: &VisionAnswers) -> Result<Persona, PipelineError> {
        debug!(answered = vision.answered(), "Pipeline::classify_persona: called");
        let ctx = classify_context(okr, vision);
        let raw = self
            .call(
                "classify-persona",
                &ctx,
                &self.stages.classify_persona,
                "Failed to classify persona",
            )
            .await?;

        let extraction = extract::<PersonaClassification>("classify-persona", &raw);
        let persona = extraction.value.into_persona();
        info!(code = %persona.code, confidence = persona.confidence, source = ?extraction.source, "Persona classified");
        Ok(persona)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_PERSONA;
    use crate::llm::client::mock::MockLlmClient;
    use std::sync::Arc;

    fn okr() -> Okr {
        Okr {
            objective: "Lead the AI platform team".to_string(),
            key_results: vec!["Ship v2".to_string(), "Hire 2".to_string(), "NPS 50".to_string()],
        }
    }

    #[test]
    fn test_context_lists_catalog() {
        let ctx = classify_context(&okr(), &VisionAnswers::default());
        assert_eq!(ctx.personas.len(), 6);
        assert_eq!(ctx.codes, "A, B, C, D, E, F");
        assert_eq!(ctx.key_results, "Ship v2, Hire 2, NPS 50");
        assert!(ctx.vision.contains(NOT_ENTERED));
    }

    #[test]
    fn test_context_placeholders() {
        let ctx = classify_context(&Okr::default(), &VisionAnswers::default());
        assert_eq!(ctx.objective, OBJECTIVE_NOT_SET);
        assert_eq!(ctx.key_results, NOT_ENTERED);
    }

    #[tokio::test]
    async fn test_classify_known_code() {
        let mock = Arc::new(MockLlmClient::texts(&[
            r#"{"persona_code":"B","confidence":0.75,"reasoning":"Plans ahead"}"#,
        ]));
        let pipeline = Pipeline::with_defaults(mock.clone());
        let persona = pipeline.classify_persona(&okr(), &VisionAnswers::default()).await.unwrap();
        assert_eq!(persona.code, PersonaCode::B);
        assert_eq!(persona.name, "Strategic Planner");
        assert_eq!(persona.reasoning, "Plans ahead");

        let prompt = &mock.requests()[0].messages[0].content;
        assert!(prompt.contains("- F: Learning Grower"));
        assert!(prompt.contains("Objective: Lead the AI platform team"));
    }

    #[tokio::test]
    async fn test_classify_fenced_reply() {
        let pipeline = Pipeline::with_defaults(Arc::new(MockLlmClient::texts(&[
            "Here is my analysis:\n```json\n{\"personaCode\": \"C\", \"confidence\": 85, \"reasoning\": \"Loves new ideas\"}\n```\nHope this helps!",
        ])));
        let persona = pipeline.classify_persona(&okr(), &VisionAnswers::default()).await.unwrap();
        assert_eq!(persona.code, PersonaCode::C);
        assert_eq!(persona.reasoning, "Loves new ideas");
        assert!((persona.confidence - 0.85).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_classify_unknown_code_uses_default() {
        let pipeline = Pipeline::with_defaults(Arc::new(MockLlmClient::texts(&[
            r#"{"persona_code":"Z","confidence":0.9,"reasoning":"x"}"#,
        ])));
        let persona = pipeline.classify_persona(&okr(), &VisionAnswers::default()).await.unwrap();
        assert_eq!(persona.code, DEFAULT_PERSONA);
        assert_eq!(persona.confidence, 0.9);
        assert_eq!(persona.reasoning, "x");
    }

    #[tokio::test]
    async fn test_classify_garbage_uses_default() {
        let pipeline = Pipeline::with_defaults(Arc::new(MockLlmClient::texts(&["I think you are a B"])));
        let persona = pipeline.classify_persona(&okr(), &VisionAnswers::default()).await.unwrap();
        assert_eq!(persona, Persona::default_persona());
    }
}
