//! Replays recorded generator responses from a JSON file.
//!
//! Fixture layout: `{"structure": <value>, "slides": {"<slideNumber>": <raw>}}`.
//! Both keys are optional. A slide with no recorded entry fails, so a fixture
//! can exercise placeholder substitution.

use crate::error::{GenerationError, Result};
use crate::generator::{ContentGenerator, SlideRequest, StructureRequest};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Fixture {
    structure: Option<Value>,
    slides: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct FixtureGenerator {
    fixture: Fixture,
}

impl FixtureGenerator {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let fixture: Fixture = serde_json::from_str(json)?;
        log::debug!("Loaded fixture with {} recorded slides", fixture.slides.len());
        Ok(Self { fixture })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Record a raw response for a 1-based slide number.
    pub fn with_slide(mut self, slide_number: usize, raw: Value) -> Self {
        self.fixture.slides.insert(slide_number.to_string(), raw);
        self
    }
}

#[async_trait]
impl ContentGenerator for FixtureGenerator {
    async fn generate_structure(
        &self,
        _request: &StructureRequest,
    ) -> std::result::Result<Value, GenerationError> {
        self.fixture
            .structure
            .clone()
            .ok_or(GenerationError::MissingStructure)
    }

    async fn generate_slide(
        &self,
        request: &SlideRequest,
    ) -> std::result::Result<Value, GenerationError> {
        self.fixture
            .slides
            .get(&request.slide_number.to_string())
            .cloned()
            .ok_or(GenerationError::MissingSlide {
                slide_number: request.slide_number,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::orchestrator::PresentationOrchestrator;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_recorded_slides_replay_and_gaps_degrade() {
        let generator = FixtureGenerator::from_json_str(
            r#"{
                "structure": {"title": {"text": "Recorded Deck"}},
                "slides": {
                    "1": {"type": "title", "title": {"text": "Welcome"}},
                    "2": {"title": "Agenda", "items": [{"text": "Intro"}, "Wrap-up"]}
                }
            }"#,
        )
        .unwrap();
        let orchestrator = PresentationOrchestrator::new(Arc::new(generator));

        let deck = orchestrator
            .generate_presentation("A 5 slide discovery call for Acme Corp")
            .await
            .unwrap();

        assert_eq!(deck.title, "Recorded Deck");
        assert_eq!(deck.slides.len(), 5);
        assert_eq!(deck.slides[0].title(), "Welcome");
        assert_eq!(deck.slides[1].data["items"], json!(["Intro", "Wrap-up"]));
        assert_eq!(deck.degraded_slides, vec![3, 4, 5]);
        assert!(deck.success);
    }

    #[tokio::test]
    async fn test_missing_structure_is_a_generation_error() {
        let generator = FixtureGenerator::default().with_slide(1, json!({"title": "Only"}));
        let request = StructureRequest::new(
            &salesdeck_core::GenerationParameters::new("topic", salesdeck_core::SalesStage::Demo),
            3,
        );
        assert_eq!(
            generator.generate_structure(&request).await,
            Err(GenerationError::MissingStructure)
        );
    }

    #[test]
    fn test_invalid_fixture_json() {
        let err = FixtureGenerator::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, Error::FixtureError(_)));
    }

    #[test]
    fn test_fixture_keys_are_optional() {
        assert!(FixtureGenerator::from_json_str("{}").is_ok());
    }
}
