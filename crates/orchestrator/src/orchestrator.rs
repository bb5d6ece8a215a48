//! Presentation orchestration.
//!
//! Picks a recipe for the prompt, seeds each slide with registry metadata,
//! generates every slide concurrently, and normalizes the results in recipe
//! order. A failed slide becomes a placeholder; the deck keeps its length.

use crate::error::{Error, Result};
use crate::generator::{ContentGenerator, SlideRequest, StructureRequest};
use futures::future::join_all;
use salesdeck_core::{
    analyze_prompt, select_recipe, CanonicalSlide, Coercer, DeckConfig, GenerationParameters,
    Layout, MetadataContext, SalesStage, SlideMetadata, SlideTransformer,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// One planned slide.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub slide_type: String,
    pub title: String,
    pub description: String,
    pub layout: Layout,
}

impl Section {
    fn metadata(&self) -> SlideMetadata {
        SlideMetadata {
            title: self.title.clone(),
            description: self.description.clone(),
            layout: self.layout,
        }
    }
}

/// The planned deck: a title plus one section per recipe entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationStructure {
    pub title: String,
    pub sales_stage: SalesStage,
    pub recipe: String,
    pub sections: Vec<Section>,
}

/// Normalized slides for a structure, with the 1-based numbers of slides
/// that had to be replaced by placeholders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideSet {
    pub slides: Vec<CanonicalSlide>,
    pub degraded_slides: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDeck {
    pub title: String,
    pub parameters: GenerationParameters,
    pub recipe: String,
    pub slides: Vec<CanonicalSlide>,
    pub degraded_slides: Vec<usize>,
    pub success: bool,
}

pub struct PresentationOrchestrator {
    generator: Arc<dyn ContentGenerator>,
    transformer: SlideTransformer,
    config: DeckConfig,
}

impl PresentationOrchestrator {
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            generator,
            transformer: SlideTransformer::new(),
            config: DeckConfig::default(),
        }
    }

    /// Apply configuration. The coercer is rebuilt from it; the registry is kept.
    pub fn with_config(mut self, config: DeckConfig) -> Self {
        self.transformer = self.transformer.with_coercer(Coercer::from_config(&config));
        self.config = config;
        self
    }

    pub fn with_transformer(mut self, transformer: SlideTransformer) -> Self {
        self.transformer = transformer;
        self
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    pub fn transformer(&self) -> &SlideTransformer {
        &self.transformer
    }

    /// Generate and normalize a full deck from a prompt.
    pub async fn generate_presentation(&self, prompt: &str) -> Result<GeneratedDeck> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(Error::EmptyPrompt);
        }

        let parameters = analyze_prompt(prompt);
        log::info!(
            "Generating {} presentation on '{}'",
            parameters.sales_stage,
            parameters.topic
        );

        let structure = self.plan(&parameters, prompt).await;
        let SlideSet {
            slides,
            degraded_slides,
        } = self.generate_slides(&parameters, &structure).await;

        Ok(GeneratedDeck {
            title: structure.title,
            parameters,
            recipe: structure.recipe,
            slides,
            degraded_slides,
            success: true,
        })
    }

    /// Plan the deck for already-extracted parameters.
    ///
    /// Recipe selection without a slide-count hint is keyed on the topic.
    pub async fn generate_presentation_structure(
        &self,
        params: &GenerationParameters,
    ) -> PresentationStructure {
        self.plan(params, &params.topic).await
    }

    async fn plan(&self, params: &GenerationParameters, seed: &str) -> PresentationStructure {
        let recipe = select_recipe(
            params.sales_stage,
            params.slide_count_hint,
            seed,
            self.config.recipe_selection,
        );
        let context = MetadataContext {
            company_name: params.company_name.as_deref(),
            industry: params.industry_name(),
        };

        let registry = self.transformer.registry();
        let mut sections: Vec<Section> = recipe
            .slides
            .iter()
            .map(|type_id| {
                let metadata = registry.get_metadata(type_id, context);
                Section {
                    slide_type: type_id.to_string(),
                    title: metadata.title,
                    description: metadata.description,
                    layout: metadata.layout,
                }
            })
            .collect();

        let mut title = default_title(params);
        if self.config.request_structure {
            let request = StructureRequest::new(params, sections.len());
            match self.generator.generate_structure(&request).await {
                Ok(response) => title = self.apply_structure(&response, &title, &mut sections),
                Err(err) => log::warn!("Structure generation failed, using catalog metadata: {err}"),
            }
        }

        log::info!(
            "Planned {} slides from recipe '{}'",
            sections.len(),
            recipe.name
        );
        PresentationStructure {
            title,
            sales_stage: params.sales_stage,
            recipe: recipe.name.to_string(),
            sections,
        }
    }

    /// Take titles and descriptions from a structure response.
    ///
    /// Section count and types always follow the recipe; extra or missing
    /// response sections are ignored.
    fn apply_structure(&self, response: &Value, default_title: &str, sections: &mut [Section]) -> String {
        let coercer = self.transformer.coercer();
        let title = coercer.coerce_to_string(response.get("title").unwrap_or(&Value::Null), default_title);

        if let Some(items) = response.get("sections").and_then(Value::as_array) {
            for (section, item) in sections.iter_mut().zip(items) {
                let (item_title, item_description) = match item {
                    Value::Object(map) => (map.get("title"), map.get("description")),
                    other => (Some(other), None),
                };
                if let Some(value) = item_title {
                    section.title = coercer.coerce_to_string(value, &section.title);
                }
                if let Some(value) = item_description {
                    section.description = coercer.coerce_to_string(value, &section.description);
                }
            }
        }
        title
    }

    /// Generate every section concurrently and normalize in recipe order.
    pub async fn generate_slides(
        &self,
        params: &GenerationParameters,
        structure: &PresentationStructure,
    ) -> SlideSet {
        let total = structure.sections.len();
        let requests: Vec<SlideRequest> = structure
            .sections
            .iter()
            .enumerate()
            .map(|(index, section)| slide_request(params, section, index + 1, total))
            .collect();

        let results = join_all(requests.iter().map(|req| self.generator.generate_slide(req))).await;

        let mut slides = Vec::with_capacity(total);
        let mut degraded_slides = Vec::new();
        for (index, (section, result)) in structure.sections.iter().zip(results).enumerate() {
            let slide = match result {
                Ok(raw) => {
                    let raw = self.seed_title(raw, &section.title);
                    self.transformer.transform_slide_as(&raw, index, &section.slide_type)
                }
                Err(err) => {
                    log::warn!(
                        "Slide {} ({}) failed, substituting placeholder: {err}",
                        index + 1,
                        section.slide_type
                    );
                    degraded_slides.push(index + 1);
                    self.transformer
                        .placeholder_slide(index, &section.slide_type, &section.metadata())
                }
            };
            slides.push(slide);
        }

        log::info!(
            "Generated {} slides ({} placeholders)",
            slides.len(),
            degraded_slides.len()
        );
        SlideSet {
            slides,
            degraded_slides,
        }
    }

    /// Give raw content the section title when it carries none of its own.
    fn seed_title(&self, raw: Value, title: &str) -> Value {
        let mut fields = match raw {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            bare => {
                let mut map = Map::new();
                map.insert("content".to_string(), bare);
                map
            }
        };
        let has_title = fields
            .get("title")
            .and_then(|t| self.transformer.coercer().find_string(t))
            .is_some();
        if !has_title {
            fields.insert("title".to_string(), Value::String(title.to_string()));
        }
        Value::Object(fields)
    }
}

fn default_title(params: &GenerationParameters) -> String {
    match &params.company_name {
        Some(company) => format!("{} for {}", params.topic, company),
        None => params.topic.clone(),
    }
}

fn slide_request(
    params: &GenerationParameters,
    section: &Section,
    slide_number: usize,
    total_slides: usize,
) -> SlideRequest {
    SlideRequest {
        title: section.title.clone(),
        context: section.description.clone(),
        slide_type: section.slide_type.clone(),
        slide_number,
        total_slides,
        main_topic: params.topic.clone(),
        company_name: params.company_name.clone(),
        challenges: params.challenges.clone(),
        industry: params.industry_name().map(str::to_string),
        competitors: params.competitors.clone(),
        budget: params.budget.clone(),
        timeline: params.timeline.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::outline::OutlineGenerator;
    use async_trait::async_trait;
    use salesdeck_core::transform::conforms;
    use salesdeck_core::RecipeSelection;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    const SEVEN_SLIDE_PROMPT: &str = "Create a 7 slide discovery deck for Acme Corp about data governance";

    /// Delegates to the outline generator, failing where told to.
    #[derive(Default)]
    struct Scripted {
        fail_slide: Option<usize>,
        fail_structure: bool,
        structure_calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentGenerator for Scripted {
        async fn generate_structure(
            &self,
            request: &StructureRequest,
        ) -> std::result::Result<Value, GenerationError> {
            self.structure_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_structure {
                return Err(GenerationError::Timeout);
            }
            OutlineGenerator.generate_structure(request).await
        }

        async fn generate_slide(
            &self,
            request: &SlideRequest,
        ) -> std::result::Result<Value, GenerationError> {
            if self.fail_slide == Some(request.slide_number) {
                return Err(GenerationError::Request("quota exceeded".to_string()));
            }
            OutlineGenerator.generate_slide(request).await
        }
    }

    /// Later slides finish first.
    #[derive(Default)]
    struct ReverseOrder {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        completed: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl ContentGenerator for ReverseOrder {
        async fn generate_structure(
            &self,
            _request: &StructureRequest,
        ) -> std::result::Result<Value, GenerationError> {
            Ok(json!({}))
        }

        async fn generate_slide(
            &self,
            request: &SlideRequest,
        ) -> std::result::Result<Value, GenerationError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let delay = (request.total_slides - request.slide_number + 1) as u64 * 15;
            tokio::time::sleep(Duration::from_millis(delay)).await;

            self.completed.lock().unwrap().push(request.slide_number);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(json!({ "title": { "text": format!("Generated {}", request.slide_number) } }))
        }
    }

    /// Returns the same raw values for every call.
    struct Canned {
        structure: Value,
        slide: Value,
    }

    #[async_trait]
    impl ContentGenerator for Canned {
        async fn generate_structure(
            &self,
            _request: &StructureRequest,
        ) -> std::result::Result<Value, GenerationError> {
            Ok(self.structure.clone())
        }

        async fn generate_slide(
            &self,
            _request: &SlideRequest,
        ) -> std::result::Result<Value, GenerationError> {
            Ok(self.slide.clone())
        }
    }

    #[tokio::test]
    async fn test_failed_slide_becomes_placeholder_in_place() {
        let generator = Arc::new(Scripted {
            fail_slide: Some(3),
            ..Default::default()
        });
        let orchestrator = PresentationOrchestrator::new(generator);

        let deck = orchestrator
            .generate_presentation(SEVEN_SLIDE_PROMPT)
            .await
            .unwrap();

        assert!(deck.success);
        assert_eq!(deck.recipe, "discovery-consultative");
        assert_eq!(deck.slides.len(), 7);
        assert_eq!(deck.degraded_slides, vec![3]);

        let ids: Vec<_> = deck.slides.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            ["slide-1", "slide-2", "slide-3", "slide-4", "slide-5", "slide-6", "slide-7"]
        );

        let recipe = salesdeck_core::get_recipes(SalesStage::Discovery)[0];
        let types: Vec<_> = deck.slides.iter().map(|s| s.slide_type.as_str()).collect();
        assert_eq!(types, recipe.slides);

        let placeholder = &deck.slides[2];
        assert_eq!(placeholder.data["placeholder"], json!(true));
        assert_eq!(placeholder.title(), "The Challenge");
        assert!(deck.slides[3].data.get("placeholder").is_none());
    }

    #[tokio::test]
    async fn test_slides_keep_recipe_order_despite_completion_order() {
        let generator = Arc::new(ReverseOrder::default());
        let orchestrator = PresentationOrchestrator::new(generator.clone());

        let deck = orchestrator
            .generate_presentation(SEVEN_SLIDE_PROMPT)
            .await
            .unwrap();

        let completed = generator.completed.lock().unwrap().clone();
        assert_eq!(completed, vec![7, 6, 5, 4, 3, 2, 1]);
        assert!(generator.peak.load(Ordering::SeqCst) > 1);

        for (index, slide) in deck.slides.iter().enumerate() {
            assert_eq!(slide.number(), Some(index + 1));
            assert_eq!(slide.title(), format!("Generated {}", index + 1));
        }
    }

    #[tokio::test]
    async fn test_structure_failure_falls_back_to_metadata() {
        let generator = Arc::new(Scripted {
            fail_structure: true,
            ..Default::default()
        });
        let orchestrator = PresentationOrchestrator::new(generator);
        let params = analyze_prompt(SEVEN_SLIDE_PROMPT);

        let structure = orchestrator.generate_presentation_structure(&params).await;

        assert_eq!(structure.title, "data governance for Acme Corp");
        assert_eq!(structure.sections.len(), 7);
        assert_eq!(structure.sections[0].slide_type, "title");
        assert!(structure.sections.iter().all(|s| !s.title.is_empty()));
    }

    #[tokio::test]
    async fn test_structure_request_can_be_disabled() {
        let generator = Arc::new(Scripted::default());
        let config = DeckConfig {
            request_structure: false,
            ..Default::default()
        };
        let orchestrator = PresentationOrchestrator::new(generator.clone()).with_config(config);

        orchestrator.generate_presentation(SEVEN_SLIDE_PROMPT).await.unwrap();
        assert_eq!(generator.structure_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_structure_response_is_coerced() {
        let generator = Arc::new(Canned {
            structure: json!({
                "title": { "text": "Governance Roadmap" },
                "sections": [{ "title": ["Welcome"] }, "Today's Agenda", { "description": 42 }],
            }),
            slide: json!({}),
        });
        let orchestrator = PresentationOrchestrator::new(generator);
        let params = analyze_prompt(SEVEN_SLIDE_PROMPT);

        let structure = orchestrator.generate_presentation_structure(&params).await;

        assert_eq!(structure.title, "Governance Roadmap");
        assert_eq!(structure.sections[0].title, "Welcome");
        assert_eq!(structure.sections[1].title, "Today's Agenda");
        assert_eq!(structure.sections[2].description, "42");
        assert_eq!(structure.sections.len(), 7);
    }

    #[tokio::test]
    async fn test_malformed_slide_content_is_normalized() {
        let generator = Arc::new(Canned {
            structure: json!(null),
            slide: json!({
                "title": { "value": { "text": "Deep Title" } },
                "subtitle": [{ "label": "First" }, "Second"],
                "items": [{ "text": "One" }, 2, null],
                "questions": ["What blocks you today?"],
                "steps": { "action": { "name": "Sign" } },
            }),
        });
        let orchestrator = PresentationOrchestrator::new(generator);

        let deck = orchestrator
            .generate_presentation(SEVEN_SLIDE_PROMPT)
            .await
            .unwrap();

        let registry = orchestrator.transformer().registry();
        for slide in &deck.slides {
            assert_eq!(slide.title(), "Deep Title");
            assert!(conforms(registry.get_schema(&slide.slide_type), &slide.data));
        }
        assert!(deck.degraded_slides.is_empty());
    }

    #[tokio::test]
    async fn test_untitled_content_gets_section_title() {
        let generator = Arc::new(Canned {
            structure: json!({}),
            slide: json!("Just a sentence"),
        });
        let orchestrator = PresentationOrchestrator::new(generator);
        let params = analyze_prompt(SEVEN_SLIDE_PROMPT);
        let structure = orchestrator.generate_presentation_structure(&params).await;

        let set = orchestrator.generate_slides(&params, &structure).await;

        for (slide, section) in set.slides.iter().zip(&structure.sections) {
            assert_eq!(slide.title(), section.title);
        }
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected() {
        let orchestrator = PresentationOrchestrator::new(Arc::new(OutlineGenerator));
        let err = orchestrator.generate_presentation("   ").await.unwrap_err();
        assert!(matches!(err, Error::EmptyPrompt));
    }

    #[tokio::test]
    async fn test_generation_is_deterministic_for_a_prompt() {
        let config = DeckConfig {
            recipe_selection: RecipeSelection::PromptHash,
            ..Default::default()
        };
        let orchestrator =
            PresentationOrchestrator::new(Arc::new(OutlineGenerator)).with_config(config);
        let prompt = "Prepare a proposal for Initech about workflow automation";

        let a = orchestrator.generate_presentation(prompt).await.unwrap();
        let b = orchestrator.generate_presentation(prompt).await.unwrap();
        assert_eq!(a, b);
    }
}
