//! The seam to the external content generator.
//!
//! Responses are untrusted JSON: the orchestrator coerces every value it
//! reads from them.

use crate::error::GenerationError;
use async_trait::async_trait;
use salesdeck_core::{GenerationParameters, SalesStage};
use serde::Serialize;
use serde_json::Value;

/// Request for the overall presentation structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureRequest {
    pub topic: String,
    pub audience: String,
    pub purpose: String,
    pub slide_count: usize,
    pub sales_stage: SalesStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenges: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
}

impl StructureRequest {
    pub fn new(params: &GenerationParameters, slide_count: usize) -> Self {
        Self {
            topic: params.topic.clone(),
            audience: params.audience.clone(),
            purpose: params.purpose.clone(),
            slide_count,
            sales_stage: params.sales_stage,
            industry: params.industry_name().map(str::to_string),
            company_name: params.company_name.clone(),
            challenges: params.challenges.clone(),
            competitors: params.competitors.clone(),
            budget: params.budget.clone(),
            timeline: params.timeline.clone(),
        }
    }
}

/// Request for one slide's content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideRequest {
    pub title: String,
    /// Templated description of what the slide should cover.
    pub context: String,
    pub slide_type: String,
    /// 1-based position in the deck.
    pub slide_number: usize,
    pub total_slides: usize,
    pub main_topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenges: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
}

/// Produces raw presentation content.
///
/// Implementations may fail per call; failures are isolated to the slide
/// (or structure) they were asked for.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Suggest a presentation title and section headings.
    async fn generate_structure(&self, request: &StructureRequest)
        -> Result<Value, GenerationError>;

    /// Produce raw content for one slide.
    async fn generate_slide(&self, request: &SlideRequest) -> Result<Value, GenerationError>;
}
