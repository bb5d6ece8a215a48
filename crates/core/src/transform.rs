//! Slide transformer.
//!
//! Applies a slide type's field rules to an untrusted raw slide and produces
//! a [`CanonicalSlide`]. Text fields always come out as strings and list
//! fields as arrays of strings, at any record-list depth. Fields a schema does
//! not coerce are copied through untouched.

use crate::coerce::{is_blank, parse_number, Coercer};
use crate::config::DeckConfig;
use crate::registry::{
    is_reserved_passthrough, FieldRule, FieldSpec, Registry, SlideMetadata, SlideTypeSchema,
};
use crate::types::{CanonicalSlide, RawSlide};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::sync::{Arc, LazyLock};

static DEFAULT_TRANSFORMER: LazyLock<SlideTransformer> = LazyLock::new(SlideTransformer::new);

/// Key a non-object raw slide is stored under before transformation.
const BARE_VALUE_FIELD: &str = "content";

/// Normalizes raw slides against a registry.
#[derive(Debug, Clone)]
pub struct SlideTransformer {
    registry: Arc<Registry>,
    coercer: Coercer,
}

impl Default for SlideTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl SlideTransformer {
    /// Transformer over the built-in registry with the default coercer.
    pub fn new() -> Self {
        Self {
            registry: Registry::builtin(),
            coercer: Coercer::new(),
        }
    }

    pub fn from_config(config: &DeckConfig) -> Self {
        Self::new().with_coercer(Coercer::from_config(config))
    }

    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_coercer(mut self, coercer: Coercer) -> Self {
        self.coercer = coercer;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn coercer(&self) -> &Coercer {
        &self.coercer
    }

    /// Normalize one slide. `index` is 0-based; ids and title fallbacks are 1-based.
    ///
    /// The type comes from `raw.type` when it names a registered type,
    /// otherwise the generic `content` schema applies.
    pub fn transform_slide(&self, raw: &RawSlide, index: usize) -> CanonicalSlide {
        self.transform(raw, index, None)
    }

    /// Normalize one slide whose type is already known from its recipe.
    ///
    /// A registered `raw.type` still wins; `declared_type` replaces a missing
    /// or unknown one.
    pub fn transform_slide_as(
        &self,
        raw: &RawSlide,
        index: usize,
        declared_type: &str,
    ) -> CanonicalSlide {
        self.transform(raw, index, Some(declared_type))
    }

    /// Normalize a list of slides, numbering them in order.
    pub fn transform_slides(&self, raws: &[RawSlide]) -> Vec<CanonicalSlide> {
        raws.iter()
            .enumerate()
            .map(|(index, raw)| self.transform_slide(raw, index))
            .collect()
    }

    /// Slide standing in for one whose content could not be generated.
    ///
    /// Carries the metadata title and empty body fields, and is built through
    /// the same transformation path as generated slides.
    pub fn placeholder_slide(
        &self,
        index: usize,
        type_id: &str,
        metadata: &SlideMetadata,
    ) -> CanonicalSlide {
        let mut raw = Map::new();
        raw.insert("title".to_string(), Value::String(metadata.title.clone()));
        raw.insert("placeholder".to_string(), Value::Bool(true));
        self.transform_slide_as(&Value::Object(raw), index, type_id)
    }

    fn transform(&self, raw: &RawSlide, index: usize, declared: Option<&str>) -> CanonicalSlide {
        let slide_number = index + 1;
        let fields: Cow<'_, Map<String, Value>> = match raw {
            Value::Object(map) => Cow::Borrowed(map),
            Value::Null => Cow::Owned(Map::new()),
            other => {
                log::debug!("Slide {slide_number} is not an object, treating it as content");
                let mut map = Map::new();
                map.insert(BARE_VALUE_FIELD.to_string(), other.clone());
                Cow::Owned(map)
            }
        };

        let raw_type = fields.get("type");
        let from_raw = raw_type
            .and_then(Value::as_str)
            .and_then(|t| self.registry.resolve(t));
        let schema = match (from_raw, declared) {
            (Some(schema), _) => schema,
            (None, Some(declared)) => self.registry.get_schema(declared),
            (None, None) => self.registry.fallback_schema(),
        };
        if from_raw.is_none() {
            if let Some(raw_type) = raw_type {
                log::warn!(
                    "Slide {slide_number} has unrecognized type {raw_type}, using '{}'",
                    schema.type_id
                );
            }
        }

        // The raw type survives unless a declared type had to replace it, so
        // re-transforming `data` resolves to the same schema.
        let type_value = match raw_type {
            Some(value) if from_raw.is_some() || declared.is_none() => value.clone(),
            _ => Value::String(schema.type_id.to_string()),
        };

        let (mut data, _) = self.apply_rules(&fields, schema.field_rules, slide_number, true);
        for (key, value) in fields.iter() {
            if key == "type" {
                continue;
            }
            if is_reserved_passthrough(key) || !coerces(schema.field_rules, key) {
                data.insert(key.clone(), value.clone());
            }
        }
        data.insert("type".to_string(), type_value);

        CanonicalSlide {
            id: format!("slide-{slide_number}"),
            slide_type: schema.type_id.to_string(),
            layout: schema.layout_hint,
            data,
        }
    }

    /// Coerce every declared field. Returns the fields and whether any of
    /// them carried real content (as opposed to a fallback).
    fn apply_rules(
        &self,
        fields: &Map<String, Value>,
        rules: &[FieldSpec],
        slide_number: usize,
        top_level: bool,
    ) -> (Map<String, Value>, bool) {
        let mut data = Map::new();
        let mut has_content = false;

        for spec in rules {
            if top_level && is_reserved_passthrough(spec.name) {
                continue;
            }
            let raw = fields.get(spec.name).unwrap_or(&Value::Null);

            let value = match spec.rule {
                FieldRule::ScalarString { fallback } => match self.coercer.find_string(raw) {
                    Some(text) => {
                        has_content = true;
                        Value::String(text)
                    }
                    None => {
                        if !raw.is_null() {
                            log::debug!(
                                "Slide {slide_number}: field '{}' had no usable text",
                                spec.name
                            );
                        }
                        Value::String(fallback.render(slide_number))
                    }
                },
                FieldRule::StringList => {
                    let items = self.coercer.coerce_to_string_list(raw, &[]);
                    has_content |= !items.is_empty();
                    Value::Array(items.into_iter().map(Value::String).collect())
                }
                FieldRule::NumberScalar { fallback } => match parse_number(raw) {
                    Some(number) => {
                        has_content = true;
                        number_value(number)
                    }
                    None => number_value(fallback),
                },
                FieldRule::RecordList { item } => {
                    let records = self.coercer.coerce_record_list(raw, |element| {
                        self.coerce_record(element, item, slide_number)
                    });
                    has_content |= !records.is_empty();
                    Value::Array(records.into_iter().map(Value::Object).collect())
                }
                FieldRule::Passthrough => continue,
            };

            data.insert(spec.name.to_string(), value);
        }

        (data, has_content)
    }

    /// One record-list element. None when it reduces to an empty record.
    fn coerce_record(
        &self,
        element: &Value,
        shape: &[FieldSpec],
        slide_number: usize,
    ) -> Option<Map<String, Value>> {
        let fields: Cow<'_, Map<String, Value>> = match element {
            Value::Object(map) => Cow::Borrowed(map),
            Value::Null => return None,
            bare => {
                // A bare value fills the record's first text-bearing field.
                let primary = shape.iter().find(|f| f.is_text_bearing())?;
                let mut map = Map::new();
                map.insert(primary.name.to_string(), bare.clone());
                Cow::Owned(map)
            }
        };

        let (mut record, mut has_content) = self.apply_rules(&fields, shape, slide_number, false);
        for (key, value) in fields.iter() {
            if !coerces(shape, key) {
                // A flag alone does not make a record.
                has_content |= !value.is_boolean() && !is_blank(value);
                record.insert(key.clone(), value.clone());
            }
        }

        has_content.then_some(record)
    }
}

/// Normalize with the built-in registry and default coercer.
pub fn transform_slide(raw: &RawSlide, index: usize) -> CanonicalSlide {
    DEFAULT_TRANSFORMER.transform_slide(raw, index)
}

/// Whether `key` is declared in `rules` with a coercing (non-passthrough) rule.
fn coerces(rules: &[FieldSpec], key: &str) -> bool {
    rules
        .iter()
        .any(|f| f.name == key && f.rule != FieldRule::Passthrough)
}

/// Whole numbers are emitted as integers.
fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < 9.0e15 {
        Value::from(number as i64)
    } else {
        Value::from(number)
    }
}

/// Check that every coerced field in `data` has its declared shape.
///
/// Used by tests and by callers that accept canonical slides from storage.
pub fn conforms(schema: &SlideTypeSchema, data: &Map<String, Value>) -> bool {
    fields_conform(schema.field_rules, data, true)
}

fn fields_conform(rules: &[FieldSpec], data: &Map<String, Value>, top_level: bool) -> bool {
    rules.iter().all(|spec| {
        if top_level && is_reserved_passthrough(spec.name) {
            return true;
        }
        match (spec.rule, data.get(spec.name)) {
            (FieldRule::Passthrough, _) => true,
            (FieldRule::ScalarString { .. }, Some(Value::String(_))) => true,
            (FieldRule::StringList, Some(Value::Array(items))) => items.iter().all(Value::is_string),
            (FieldRule::NumberScalar { .. }, Some(Value::Number(_))) => true,
            (FieldRule::RecordList { item }, Some(Value::Array(records))) => {
                records.iter().all(|record| match record {
                    Value::Object(map) => fields_conform(item, map, false),
                    _ => false,
                })
            }
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MetadataContext;
    use crate::types::Layout;
    use serde_json::json;

    fn malformed_text(variant: usize) -> Value {
        match variant % 7 {
            0 => json!({"text": "wrapped"}),
            1 => json!([{"value": "first"}, "second"]),
            2 => json!({"outer": {"label": ["deep"]}}),
            3 => json!([[{"content": {"name": "deeper"}}]]),
            4 => json!(12),
            5 => json!(null),
            _ => json!({}),
        }
    }

    fn malformed_fields(rules: &[FieldSpec], variant: usize) -> Map<String, Value> {
        let mut map = Map::new();
        for (offset, spec) in rules.iter().enumerate() {
            let v = variant + offset;
            let value = match spec.rule {
                FieldRule::ScalarString { .. } => malformed_text(v),
                FieldRule::StringList => match v % 3 {
                    0 => json!([{"text": "a"}, ["b", {"x": "c"}], {"value": {"number": "1"}}, null, 3]),
                    1 => json!({"label": {"text": "only"}}),
                    _ => json!([[], {}, ""]),
                },
                FieldRule::NumberScalar { .. } => match v % 3 {
                    0 => json!("$1,000"),
                    1 => json!({"amount": "5"}),
                    _ => json!("12.5%"),
                },
                FieldRule::RecordList { item } => match v % 2 {
                    0 => json!([
                        Value::Object(malformed_fields(item, v + 1)),
                        "bare string",
                        ["array item"],
                        {},
                        null,
                        Value::Object(malformed_fields(item, v + 2)),
                    ]),
                    _ => Value::Object(malformed_fields(item, v + 3)),
                },
                FieldRule::Passthrough => json!({"series": [1, 2, {"nested": true}]}),
            };
            map.insert(spec.name.to_string(), value);
        }
        map
    }

    #[test]
    fn test_scenario_title_with_wrapped_values() {
        let raw = json!({"type": "title", "title": {"text": "Q3 Sales"}, "subtitle": {"value": "Kickoff"}});
        let slide = transform_slide(&raw, 0);
        assert_eq!(slide.slide_type, "title");
        assert_eq!(slide.layout, Layout::Title);
        assert_eq!(slide.data["title"], "Q3 Sales");
        assert_eq!(slide.data["subtitle"], "Kickoff");
        assert_eq!(slide.data["presenter"], "");
    }

    #[test]
    fn test_scenario_executive_summary_points() {
        let raw = json!({
            "type": "executiveSummary",
            "supportingPoints": [
                {"label": {"text": "Cost"}, "value": {"number": "30%"}},
                {"label": "Growth", "value": "25%"}
            ]
        });
        let slide = transform_slide(&raw, 1);
        let points = slide.data["supportingPoints"].as_array().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], json!({"label": "Cost", "value": "30%"}));
        assert_eq!(points[1], json!({"label": "Growth", "value": "25%"}));
        assert_eq!(slide.data["title"], "Slide 2");
    }

    #[test]
    fn test_scenario_missing_type_uses_content_schema() {
        let raw = json!({
            "title": "Key Benefits",
            "bullets": [{"text": "Increase productivity"}, "Reduce costs", {"value": "Improve quality"}]
        });
        let slide = transform_slide(&raw, 2);
        assert_eq!(slide.slide_type, "content");
        assert_eq!(
            slide.data["bullets"],
            json!(["Increase productivity", "Reduce costs", "Improve quality"])
        );
        assert_eq!(slide.data["content"], "");
        assert_eq!(slide.data["type"], "content");
    }

    #[test]
    fn test_scenario_unknown_type_uses_generic_schema() {
        let raw = json!({"type": "unknownXyz", "title": ["Roadmap"], "content": {"body": {"text": "Soon"}}});
        let slide = transform_slide(&raw, 3);
        assert_eq!(slide.slide_type, "content");
        assert_eq!(slide.data["title"], "Roadmap");
        assert_eq!(slide.data["content"], "Soon");
        assert_eq!(slide.data["type"], "unknownXyz");
    }

    #[test]
    fn test_never_object_for_every_schema() {
        let registry = Registry::builtin();
        for schema in registry.schemas() {
            for variant in 0..7 {
                let mut raw = malformed_fields(schema.field_rules, variant);
                raw.insert("type".into(), json!(schema.type_id));
                let slide = transform_slide(&Value::Object(raw), variant);
                assert_eq!(slide.slide_type, schema.type_id);
                assert!(
                    conforms(schema, &slide.data),
                    "{} variant {variant}: {}",
                    schema.type_id,
                    Value::Object(slide.data.clone())
                );
            }
        }
    }

    #[test]
    fn test_idempotent_on_canonical_data() {
        let registry = Registry::builtin();
        for schema in registry.schemas() {
            for variant in 0..7 {
                let mut raw = malformed_fields(schema.field_rules, variant);
                raw.insert("type".into(), json!(schema.type_id));
                let first = transform_slide(&Value::Object(raw), variant);
                let second = transform_slide(&Value::Object(first.data.clone()), variant);
                assert_eq!(first, second, "{} variant {variant}", schema.type_id);
            }
        }
    }

    #[test]
    fn test_idempotent_for_declared_type() {
        let transformer = SlideTransformer::new();
        let raw = json!({"type": "mystery", "title": {"text": "Plan"}, "phases": ["Kickoff"]});
        let first = transformer.transform_slide_as(&raw, 0, "implementationTimeline");
        assert_eq!(first.slide_type, "implementationTimeline");
        assert_eq!(first.data["type"], "implementationTimeline");
        let second = transformer.transform_slide(&Value::Object(first.data.clone()), 0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_passthrough_fields_preserved() {
        let chart = json!({"labels": ["Q1", "Q2"], "datasets": [{"label": "Revenue", "data": [1, 2]}]});
        let before_after = json!({"before": {"text": "Manual"}, "after": ["Automated"]});
        let timeline = json!([{"phase": {"text": "One"}, "weeks": 4}]);
        let stakeholders = json!([{"name": {"text": "CFO"}}]);
        let raw = json!({
            "type": "content",
            "id": {"legacy": 7},
            "layout": {"columns": 2},
            "data": {"nested": {"text": "keep me"}},
            "chartData": chart,
            "beforeAfter": before_after,
            "timeline": timeline,
            "stakeholders": stakeholders,
            "extra": {"label": "undeclared"}
        });

        let slide = transform_slide(&raw, 0);
        assert_eq!(slide.data["chartData"], chart);
        assert_eq!(slide.data["beforeAfter"], before_after);
        assert_eq!(slide.data["timeline"], timeline);
        assert_eq!(slide.data["stakeholders"], stakeholders);
        assert_eq!(slide.data["data"], json!({"nested": {"text": "keep me"}}));
        assert_eq!(slide.data["id"], json!({"legacy": 7}));
        assert_eq!(slide.data["layout"], json!({"columns": 2}));
        assert_eq!(slide.data["extra"], json!({"label": "undeclared"}));
        assert_eq!(slide.id, "slide-1");
        assert_eq!(slide.layout, Layout::Content);
    }

    #[test]
    fn test_declared_passthrough_in_schema_is_not_coerced() {
        let chart = json!({"series": [{"value": 3}]});
        let raw = json!({"type": "roiCalculation", "chartData": chart, "roiPercentage": "240%"});
        let slide = transform_slide(&raw, 0);
        assert_eq!(slide.data["chartData"], chart);
        assert_eq!(slide.data["roiPercentage"], json!(240));
    }

    #[test]
    fn test_deterministic_output() {
        let raw = json!({"type": "pricing", "tiers": [{"name": {"label": "Pro"}, "price": 99}, "Enterprise"]});
        let a = transform_slide(&raw, 4);
        let b = transform_slide(&raw, 4);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_record_items_from_bare_values() {
        let raw = json!({"type": "pricing", "tiers": [{"name": {"label": "Pro"}, "price": 99, "recommended": true}, "Enterprise", null, {}]});
        let slide = transform_slide(&raw, 0);
        let tiers = slide.data["tiers"].as_array().unwrap();
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0]["name"], "Pro");
        assert_eq!(tiers[0]["price"], "99");
        assert_eq!(tiers[0]["period"], "per month");
        assert_eq!(tiers[0]["recommended"], true);
        assert_eq!(tiers[1]["name"], "Enterprise");
        assert_eq!(tiers[1]["features"], json!([]));
    }

    #[test]
    fn test_record_list_from_single_object() {
        let raw = json!({"type": "whyUs", "reasons": {"title": "Speed", "description": {"text": "Live in weeks"}}});
        let slide = transform_slide(&raw, 0);
        assert_eq!(
            slide.data["reasons"],
            json!([{"title": "Speed", "description": "Live in weeks"}])
        );
    }

    #[test]
    fn test_record_with_only_fallbacks_is_dropped() {
        let raw = json!({"type": "budgetBreakdown", "lineItems": [{"category": ""}, {"percentage": "n/a"}, {"amount": "$10k"}]});
        let slide = transform_slide(&raw, 0);
        let items = slide.data["lineItems"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["amount"], "$10k");
        assert_eq!(items[0]["percentage"], json!(0));
    }

    #[test]
    fn test_record_with_only_number_is_kept() {
        let raw = json!({"type": "budgetBreakdown", "lineItems": [{"percentage": "40%"}]});
        let slide = transform_slide(&raw, 0);
        assert_eq!(slide.data["lineItems"][0]["percentage"], json!(40));
        assert_eq!(slide.data["lineItems"][0]["category"], "");
    }

    #[test]
    fn test_record_with_only_flags_is_dropped() {
        let raw = json!({"type": "pricing", "tiers": [{"recommended": false}, {"name": "Pro", "recommended": true}]});
        let slide = transform_slide(&raw, 0);
        let tiers = slide.data["tiers"].as_array().unwrap();
        assert_eq!(tiers.len(), 1);
        assert_eq!(tiers[0]["name"], "Pro");
        assert_eq!(tiers[0]["recommended"], true);
    }

    #[test]
    fn test_snake_case_type_resolves() {
        let raw = json!({"type": "swot_analysis", "strengths": "Brand"});
        let slide = transform_slide(&raw, 0);
        assert_eq!(slide.slide_type, "swotAnalysis");
        assert_eq!(slide.layout, Layout::Grid);
        assert_eq!(slide.data["strengths"], json!(["Brand"]));
        assert_eq!(slide.data["threats"], json!([]));
        assert_eq!(slide.data["type"], "swot_analysis");
    }

    #[test]
    fn test_registered_raw_type_beats_declared() {
        let transformer = SlideTransformer::new();
        let raw = json!({"type": "testimonial", "quote": "Great"});
        let slide = transformer.transform_slide_as(&raw, 0, "pricing");
        assert_eq!(slide.slide_type, "testimonial");

        let raw = json!({"quote": "Great"});
        let slide = transformer.transform_slide_as(&raw, 0, "testimonial");
        assert_eq!(slide.slide_type, "testimonial");
        assert_eq!(slide.data["quote"], "Great");
    }

    #[test]
    fn test_non_object_raw_slides() {
        let slide = transform_slide(&json!("Just some text"), 0);
        assert_eq!(slide.slide_type, "content");
        assert_eq!(slide.data["content"], "Just some text");
        assert_eq!(slide.data["title"], "Slide 1");

        let slide = transform_slide(&json!(["First", "Second"]), 1);
        assert_eq!(slide.data["content"], "First");

        let slide = transform_slide(&json!(null), 2);
        assert_eq!(slide.data["title"], "Slide 3");
        assert_eq!(slide.data["bullets"], json!([]));
    }

    #[test]
    fn test_non_string_type_is_ignored() {
        let raw = json!({"type": {"text": "title"}, "title": "Hello"});
        let slide = transform_slide(&raw, 0);
        assert_eq!(slide.slide_type, "content");
        assert_eq!(slide.data["type"], json!({"text": "title"}));
    }

    #[test]
    fn test_transform_slides_numbers_sequentially() {
        let raws = vec![json!({"title": "A"}), json!(null), json!({"title": "C"})];
        let slides = SlideTransformer::new().transform_slides(&raws);
        let ids: Vec<_> = slides.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["slide-1", "slide-2", "slide-3"]);
        assert_eq!(slides[1].title(), "Slide 2");
    }

    #[test]
    fn test_placeholder_slide() {
        let transformer = SlideTransformer::new();
        let meta = transformer.registry().get_metadata(
            "caseStudy",
            MetadataContext {
                company_name: Some("Acme"),
                industry: Some("retail"),
            },
        );
        let slide = transformer.placeholder_slide(2, "caseStudy", &meta);
        assert_eq!(slide.id, "slide-3");
        assert_eq!(slide.slide_type, "caseStudy");
        assert_eq!(slide.title(), meta.title);
        assert_eq!(slide.data["placeholder"], true);
        assert_eq!(slide.data["results"], json!([]));
        assert_eq!(slide.data["client"], "");
        assert!(conforms(transformer.registry().get_schema("caseStudy"), &slide.data));
    }

    #[test]
    fn test_custom_carrier_order_flows_through() {
        let transformer = SlideTransformer::new()
            .with_coercer(Coercer::new().with_carrier_keys(["label", "text"]));
        let raw = json!({"title": {"text": "By text", "label": "By label"}});
        let slide = transformer.transform_slide(&raw, 0);
        assert_eq!(slide.data["title"], "By label");

        let slide = transform_slide(&raw, 0);
        assert_eq!(slide.data["title"], "By text");
    }

    #[test]
    fn test_json_round_trip() {
        let raw = json!({"type": "marketAnalysis", "marketSize": {"amount": "$4B"}, "chartData": {"points": [1.5, 2, null, true]}});
        let slide = transform_slide(&raw, 0);
        let json = serde_json::to_string(&slide).unwrap();
        let back: CanonicalSlide = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slide);
        assert_eq!(back.data["marketSize"], "$4B");
    }
}
