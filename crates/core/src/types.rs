//! Domain types for normalized slides and prompt-derived generation parameters.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Untyped slide content as produced by an external generator.
///
/// Nothing about its shape is trusted.
pub type RawSlide = Value;

/// A slide after normalization against its type's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSlide {
    /// Sequential identifier, `slide-1`, `slide-2`, ...
    pub id: String,

    /// Resolved slide type identifier (always a registered type).
    #[serde(rename = "type")]
    pub slide_type: String,

    /// Layout hint taken from the slide type's schema.
    pub layout: Layout,

    /// Normalized field values.
    pub data: Map<String, Value>,
}

impl CanonicalSlide {
    /// 1-based position of this slide, parsed back out of its id.
    pub fn number(&self) -> Option<usize> {
        self.id.strip_prefix("slide-")?.parse().ok()
    }

    /// Text value of a scalar field, if present.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    /// The slide title. Every schema declares one.
    pub fn title(&self) -> &str {
        self.text("title").unwrap_or_default()
    }
}

/// Layout hint consumed by rendering components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Layout {
    Title,
    Content,
    Centered,
    TwoColumn,
    Grid,
    Matrix,
    Chart,
    Table,
    Timeline,
    Comparison,
    Quote,
}

/// Slide families, used for recipe category tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlideFamily {
    Structural,
    Analytical,
    Financial,
    Narrative,
}

/// Phase of the sales cycle. Drives recipe selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SalesStage {
    Discovery,
    Demo,
    Proposal,
    Closing,
    #[default]
    General,
}

impl SalesStage {
    /// All stages in declaration order.
    pub const ALL: [SalesStage; 5] = [
        SalesStage::Discovery,
        SalesStage::Demo,
        SalesStage::Proposal,
        SalesStage::Closing,
        SalesStage::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Demo => "demo",
            Self::Proposal => "proposal",
            Self::Closing => "closing",
            Self::General => "general",
        }
    }

    /// What a deck at this stage is meant to achieve.
    pub fn purpose(&self) -> &'static str {
        match self {
            Self::Discovery => "Understand the prospect's needs and qualify the opportunity",
            Self::Demo => "Show how the solution solves the prospect's problems",
            Self::Proposal => "Present a tailored solution with pricing and expected return",
            Self::Closing => "Resolve final concerns and secure commitment",
            Self::General => "Inform and persuade the audience",
        }
    }

    /// Audience assumed when the prompt does not name one.
    pub fn default_audience(&self) -> &'static str {
        match self {
            Self::Discovery => "prospective client stakeholders",
            Self::Demo => "technical evaluators and end users",
            Self::Proposal => "decision makers",
            Self::Closing => "executive sponsors",
            Self::General => "business stakeholders",
        }
    }
}

impl fmt::Display for SalesStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SalesStage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "discovery" => Ok(Self::Discovery),
            "demo" => Ok(Self::Demo),
            "proposal" => Ok(Self::Proposal),
            "closing" => Ok(Self::Closing),
            "general" => Ok(Self::General),
            _ => Err(Error::UnknownStage(s.to_string())),
        }
    }
}

/// Closed set of industries recognized in prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Industry {
    Technology,
    Healthcare,
    Finance,
    Retail,
    Manufacturing,
    Education,
    RealEstate,
    #[default]
    Other,
}

impl Industry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technology => "technology",
            Self::Healthcare => "healthcare",
            Self::Finance => "finance",
            Self::Retail => "retail",
            Self::Manufacturing => "manufacturing",
            Self::Education => "education",
            Self::RealEstate => "realEstate",
            Self::Other => "other",
        }
    }

    /// Human-facing name, or None for `Other`.
    pub fn display_name(&self) -> Option<&'static str> {
        match self {
            Self::Technology => Some("technology"),
            Self::Healthcare => Some("healthcare"),
            Self::Finance => Some("financial services"),
            Self::Retail => Some("retail"),
            Self::Manufacturing => Some("manufacturing"),
            Self::Education => Some("education"),
            Self::RealEstate => Some("real estate"),
            Self::Other => None,
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "technology" | "tech" => Ok(Self::Technology),
            "healthcare" => Ok(Self::Healthcare),
            "finance" => Ok(Self::Finance),
            "retail" => Ok(Self::Retail),
            "manufacturing" => Ok(Self::Manufacturing),
            "education" => Ok(Self::Education),
            "realestate" => Ok(Self::RealEstate),
            "other" => Ok(Self::Other),
            _ => Err(Error::UnknownIndustry(s.to_string())),
        }
    }
}

/// Requested slide count, possibly a range. A suggestion only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideCountHint {
    pub min: usize,
    pub max: usize,
}

impl SlideCountHint {
    /// Build a hint, ordering the bounds.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn exact(count: usize) -> Self {
        Self::new(count, count)
    }

    /// Distance from a recipe length to this hint; zero inside the range.
    pub fn distance(&self, len: usize) -> usize {
        if len < self.min {
            self.min - len
        } else if len > self.max {
            len - self.max
        } else {
            0
        }
    }
}

/// Parameters extracted from a free-text prompt.
///
/// Optional fields are `None` when nothing was found, so downstream templating
/// can tell "not found" apart from "found but empty".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParameters {
    pub topic: String,
    pub audience: String,
    pub purpose: String,
    pub slide_count_hint: Option<SlideCountHint>,
    pub sales_stage: SalesStage,
    pub industry: Industry,
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

impl GenerationParameters {
    /// Parameters for a topic with stage defaults and nothing extracted.
    pub fn new(topic: impl Into<String>, sales_stage: SalesStage) -> Self {
        Self {
            topic: topic.into(),
            audience: sales_stage.default_audience().to_string(),
            purpose: sales_stage.purpose().to_string(),
            slide_count_hint: None,
            sales_stage,
            industry: Industry::Other,
            company_name: None,
            challenges: None,
            competitors: None,
            budget: None,
            timeline: None,
        }
    }

    /// Industry display name for templating, if one was recognized.
    pub fn industry_name(&self) -> Option<&'static str> {
        self.industry.display_name()
    }
}
