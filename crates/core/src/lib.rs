//! Core domain types, shape coercion, slide-type registry, and slide
//! normalization for sales presentation generation.

pub mod coerce;
pub mod config;
pub mod error;
pub mod intent;
pub mod recipes;
pub mod registry;
pub mod schemas;
pub mod transform;
pub mod types;

pub use coerce::Coercer;
pub use config::{DeckConfig, RecipeSelection};
pub use error::{Error, Result, SchemaError};
pub use intent::analyze_prompt;
pub use recipes::{all_recipes, get_recipes, get_recipes_by_name, select_recipe, Recipe};
pub use registry::{FieldRule, FieldSpec, MetadataContext, Registry, SlideMetadata, SlideTypeSchema};
pub use transform::SlideTransformer;
pub use types::{
    CanonicalSlide, GenerationParameters, Industry, Layout, RawSlide, SalesStage, SlideCountHint,
    SlideFamily,
};
