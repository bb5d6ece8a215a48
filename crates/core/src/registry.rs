//! Slide-type registry.
//!
//! Maps a slide-type identifier to its declarative field schema and the
//! metadata used to seed generation prompts. Unknown identifiers resolve to
//! the generic `content` schema so every slide can still be rendered.

use crate::error::SchemaError;
use crate::schemas::BUILTIN_SCHEMAS;
use crate::types::{Layout, SlideFamily};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock};

/// Type identifier used for unknown or missing slide types.
pub const FALLBACK_TYPE: &str = "content";

/// Field names that are always passed through untouched, whatever a schema
/// declares for them.
pub const RESERVED_PASSTHROUGH_FIELDS: &[&str] = &[
    "id",
    "type",
    "layout",
    "data",
    "chartData",
    "beforeAfter",
    "timeline",
    "stakeholders",
];

/// Maximum depth of record lists nested inside record lists.
pub const MAX_RECORD_NESTING: usize = 4;

static BUILTIN_REGISTRY: LazyLock<Arc<Registry>> = LazyLock::new(|| {
    Arc::new(Registry::new(BUILTIN_SCHEMAS.to_vec()).expect("built-in slide schemas are inconsistent"))
});

/// Whether a field name is on the fixed passthrough list.
pub fn is_reserved_passthrough(name: &str) -> bool {
    RESERVED_PASSTHROUGH_FIELDS.contains(&name)
}

/// Fallback used when a text field has no usable value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum TextFallback {
    Empty,
    Literal(&'static str),
    /// `Slide {n}` with the 1-based slide number.
    SlideNumber,
}

impl TextFallback {
    pub fn render(&self, slide_number: usize) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Literal(text) => (*text).to_string(),
            Self::SlideNumber => format!("Slide {slide_number}"),
        }
    }
}

/// How one destination field is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldRule {
    ScalarString { fallback: TextFallback },
    StringList,
    NumberScalar { fallback: f64 },
    RecordList { item: &'static [FieldSpec] },
    /// Structured data consumed directly by renderers; never coerced.
    Passthrough,
}

/// A named field and its rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rule: FieldRule,
}

impl FieldSpec {
    /// Text field with an empty fallback.
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            rule: FieldRule::ScalarString {
                fallback: TextFallback::Empty,
            },
        }
    }

    /// Text field with a fixed fallback.
    pub const fn text_or(name: &'static str, fallback: &'static str) -> Self {
        Self {
            name,
            rule: FieldRule::ScalarString {
                fallback: TextFallback::Literal(fallback),
            },
        }
    }

    /// The slide title, falling back to `Slide {n}`.
    pub const fn title() -> Self {
        Self {
            name: "title",
            rule: FieldRule::ScalarString {
                fallback: TextFallback::SlideNumber,
            },
        }
    }

    pub const fn list(name: &'static str) -> Self {
        Self {
            name,
            rule: FieldRule::StringList,
        }
    }

    pub const fn number(name: &'static str, fallback: f64) -> Self {
        Self {
            name,
            rule: FieldRule::NumberScalar { fallback },
        }
    }

    pub const fn records(name: &'static str, item: &'static [FieldSpec]) -> Self {
        Self {
            name,
            rule: FieldRule::RecordList { item },
        }
    }

    pub const fn raw(name: &'static str) -> Self {
        Self {
            name,
            rule: FieldRule::Passthrough,
        }
    }

    /// Whether this field carries renderable text (directly or nested).
    pub fn is_text_bearing(&self) -> bool {
        matches!(
            self.rule,
            FieldRule::ScalarString { .. } | FieldRule::StringList | FieldRule::RecordList { .. }
        )
    }
}

/// Declarative contract for one slide type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideTypeSchema {
    pub type_id: &'static str,
    pub family: SlideFamily,
    /// Title template; `{company}` and `{industry}` are substituted.
    pub title: &'static str,
    /// Description template; `{company}` and `{industry}` are substituted.
    pub description: &'static str,
    pub layout_hint: Layout,
    pub field_rules: &'static [FieldSpec],
}

impl SlideTypeSchema {
    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.field_rules.iter().find(|f| f.name == name)
    }

    /// Check the schema for internal consistency.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.type_id.trim().is_empty() {
            return Err(SchemaError::EmptyName(self.type_id.to_string()));
        }

        match self.field("title").map(|f| f.rule) {
            Some(FieldRule::ScalarString { .. }) => {}
            _ => return Err(SchemaError::MissingTitle(self.type_id.to_string())),
        }

        validate_fields(self.type_id, self.field_rules, 0)
    }
}

fn validate_fields(
    schema: &str,
    fields: &[FieldSpec],
    depth: usize,
) -> Result<(), SchemaError> {
    if depth > MAX_RECORD_NESTING {
        return Err(SchemaError::NestingTooDeep {
            schema: schema.to_string(),
            limit: MAX_RECORD_NESTING,
        });
    }

    let mut seen = HashSet::new();
    for field in fields {
        if field.name.trim().is_empty() {
            return Err(SchemaError::EmptyName(schema.to_string()));
        }
        if !seen.insert(field.name) {
            return Err(SchemaError::DuplicateField {
                schema: schema.to_string(),
                field: field.name.to_string(),
            });
        }
        if depth == 0 && is_reserved_passthrough(field.name) && field.rule != FieldRule::Passthrough
        {
            return Err(SchemaError::ReservedField {
                schema: schema.to_string(),
                field: field.name.to_string(),
            });
        }

        if let FieldRule::RecordList { item } = field.rule {
            if item.is_empty() {
                return Err(SchemaError::EmptyRecordShape {
                    schema: schema.to_string(),
                    field: field.name.to_string(),
                });
            }
            if !item.iter().any(FieldSpec::is_text_bearing) {
                return Err(SchemaError::RecordShapeWithoutText {
                    schema: schema.to_string(),
                    field: field.name.to_string(),
                });
            }
            validate_fields(schema, item, depth + 1)?;
        }
    }
    Ok(())
}

/// Values substituted into metadata templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataContext<'a> {
    pub company_name: Option<&'a str>,
    pub industry: Option<&'a str>,
}

/// Per-slide metadata used to seed generation prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideMetadata {
    pub title: String,
    pub description: String,
    pub layout: Layout,
}

/// Closed set of slide schemas keyed by type identifier.
#[derive(Debug)]
pub struct Registry {
    schemas: Vec<SlideTypeSchema>,
    by_id: HashMap<&'static str, usize>,
    /// Lookup key (lowercase, separators removed) to schema index.
    by_alias: HashMap<String, usize>,
    fallback: usize,
}

impl Registry {
    /// Build a registry, checking every schema. Must include `content`.
    pub fn new(schemas: Vec<SlideTypeSchema>) -> Result<Self, SchemaError> {
        let mut by_id = HashMap::new();
        let mut by_alias = HashMap::new();

        for (idx, schema) in schemas.iter().enumerate() {
            schema.validate()?;
            if by_id.insert(schema.type_id, idx).is_some() {
                return Err(SchemaError::DuplicateType(schema.type_id.to_string()));
            }
            by_alias.entry(alias_key(schema.type_id)).or_insert(idx);
        }

        let fallback = *by_id
            .get(FALLBACK_TYPE)
            .ok_or_else(|| SchemaError::MissingFallback(FALLBACK_TYPE.to_string()))?;

        Ok(Self {
            schemas,
            by_id,
            by_alias,
            fallback,
        })
    }

    /// The process-wide registry of built-in slide types.
    pub fn builtin() -> Arc<Registry> {
        Arc::clone(&BUILTIN_REGISTRY)
    }

    /// Resolve a raw type name to a registered schema.
    ///
    /// Exact ids match first; otherwise case and `_`, `-`, space separators
    /// are ignored (`swot_analysis` resolves to `swotAnalysis`).
    pub fn resolve(&self, type_id: &str) -> Option<&SlideTypeSchema> {
        let type_id = type_id.trim();
        if type_id.is_empty() {
            return None;
        }
        self.by_id
            .get(type_id)
            .or_else(|| self.by_alias.get(&alias_key(type_id)))
            .map(|&idx| &self.schemas[idx])
    }

    /// Schema for a type, or the generic `content` schema when unknown.
    pub fn get_schema(&self, type_id: &str) -> &SlideTypeSchema {
        self.resolve(type_id).unwrap_or_else(|| self.fallback_schema())
    }

    pub fn fallback_schema(&self) -> &SlideTypeSchema {
        &self.schemas[self.fallback]
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.resolve(type_id).is_some()
    }

    /// Registered type ids in declaration order.
    pub fn type_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemas.iter().map(|s| s.type_id)
    }

    pub fn schemas(&self) -> &[SlideTypeSchema] {
        &self.schemas
    }

    /// Templated title, description, and layout for a slide type.
    pub fn get_metadata(&self, type_id: &str, context: MetadataContext<'_>) -> SlideMetadata {
        let schema = self.get_schema(type_id);
        SlideMetadata {
            title: render_template(schema.title, context),
            description: render_template(schema.description, context),
            layout: schema.layout_hint,
        }
    }
}

fn alias_key(type_id: &str) -> String {
    type_id
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn render_template(template: &str, context: MetadataContext<'_>) -> String {
    let company = context
        .company_name
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("your organization");
    let industry = context
        .industry
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("your industry");

    template
        .replace("{company}", company)
        .replace("{industry}", industry)
}
