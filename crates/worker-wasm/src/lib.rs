//! WASM-compatible wrapper for slide normalization.
//!
//! This crate exposes slide normalization, prompt analysis, and recipe
//! lookup to JavaScript for use in Cloudflare Workers.

use salesdeck_core::{
    analyze_prompt, get_recipes_by_name, CanonicalSlide, GenerationParameters, Industry,
    MetadataContext, Registry, SlideFamily, SlideMetadata, SlideTransformer,
};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// A recipe as seen by JavaScript callers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInfo {
    pub name: String,
    pub stage: String,
    pub slides: Vec<String>,
    /// Slide families visited, in order.
    pub categories: Vec<SlideFamily>,
}

/// Normalize one raw slide.
///
/// # Arguments
/// * `raw` - Any JSON-like value produced by a content generator
/// * `index` - 0-based position; the slide id is `slide-{index + 1}`
#[wasm_bindgen(js_name = transformSlide)]
pub fn transform_slide(raw: JsValue, index: usize) -> Result<JsValue, JsValue> {
    let raw = from_js(raw)?;
    to_js(&transform_slide_impl(&raw, index))
}

fn transform_slide_impl(raw: &Value, index: usize) -> CanonicalSlide {
    SlideTransformer::new().transform_slide(raw, index)
}

/// Normalize an array of raw slides, numbering them in order.
#[wasm_bindgen(js_name = normalizeSlides)]
pub fn normalize_slides(raw_list: JsValue) -> Result<JsValue, JsValue> {
    let raw_list = from_js(raw_list)?;
    let slides = normalize_slides_impl(&raw_list).map_err(|e| JsValue::from_str(&e))?;
    to_js(&slides)
}

fn normalize_slides_impl(raw_list: &Value) -> Result<Vec<CanonicalSlide>, String> {
    match raw_list {
        Value::Array(items) => Ok(SlideTransformer::new().transform_slides(items)),
        _ => Err("Expected an array of slides".to_string()),
    }
}

/// Extract generation parameters from a prompt.
#[wasm_bindgen(js_name = analyzePrompt)]
pub fn analyze_prompt_js(prompt: &str) -> Result<JsValue, JsValue> {
    let params = analyze_prompt_impl(prompt).map_err(|e| JsValue::from_str(&e))?;
    to_js(&params)
}

fn analyze_prompt_impl(prompt: &str) -> Result<GenerationParameters, String> {
    if prompt.trim().is_empty() {
        return Err("Prompt must not be empty".to_string());
    }
    Ok(analyze_prompt(prompt))
}

/// Recipes for a sales stage; unknown stages get the general recipes.
#[wasm_bindgen(js_name = getRecipes)]
pub fn get_recipes(stage: &str) -> Result<JsValue, JsValue> {
    to_js(&get_recipes_impl(stage))
}

fn get_recipes_impl(stage: &str) -> Vec<RecipeInfo> {
    let registry = Registry::builtin();
    get_recipes_by_name(stage)
        .iter()
        .map(|recipe| RecipeInfo {
            name: recipe.name.to_string(),
            stage: recipe.stage.to_string(),
            slides: recipe.slides.iter().map(|s| s.to_string()).collect(),
            categories: recipe.category_tags(&registry),
        })
        .collect()
}

/// Title, description, and layout for a slide type.
///
/// # Arguments
/// * `slide_type` - Slide type id; unknown ids get the generic content metadata
/// * `company_name` - Substituted into templates when present
/// * `industry` - An industry name (`finance`, `realEstate`) or free text
#[wasm_bindgen(js_name = getSlideMetadata)]
pub fn get_slide_metadata(
    slide_type: &str,
    company_name: Option<String>,
    industry: Option<String>,
) -> Result<JsValue, JsValue> {
    to_js(&get_slide_metadata_impl(
        slide_type,
        company_name.as_deref(),
        industry.as_deref(),
    ))
}

fn get_slide_metadata_impl(
    slide_type: &str,
    company_name: Option<&str>,
    industry: Option<&str>,
) -> SlideMetadata {
    let industry = industry.map(|name| match name.parse::<Industry>() {
        Ok(known) => known.display_name().unwrap_or(name),
        Err(_) => name,
    });
    let context = MetadataContext {
        company_name,
        industry,
    };
    Registry::builtin().get_metadata(slide_type, context)
}

fn from_js(value: JsValue) -> Result<Value, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid input: {}", e)))
}

/// Serialize with plain objects rather than JS `Map`s.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
