//! CLI tool for analyzing prompts, normalizing slide content, and
//! generating sales decks.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use salesdeck_core::{
    analyze_prompt, get_recipes, get_recipes_by_name, CanonicalSlide, DeckConfig, Recipe, Registry,
    SalesStage, SlideTransformer,
};
use salesdeck_orchestrator::{
    ContentGenerator, FixtureGenerator, OutlineGenerator, PresentationOrchestrator,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Generate sales presentations and normalize slide content.
#[derive(Parser, Debug)]
#[command(name = "salesdeck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the parameters extracted from a prompt
    Analyze {
        prompt: String,
    },

    /// List slide recipes per sales stage
    Recipes {
        /// Only this stage (unknown names list the general recipes)
        #[arg(short, long)]
        stage: Option<String>,
    },

    /// List slide types, or show one type's schema
    Schema {
        slide_type: Option<String>,
    },

    /// Normalize a raw slide or array of raw slides
    Normalize {
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a deck from a prompt
    Generate {
        prompt: String,

        /// Replay recorded responses instead of the offline outline generator
        #[arg(short, long)]
        fixtures: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = match &args.config {
        Some(path) => DeckConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DeckConfig::default(),
    };

    match &args.command {
        Command::Analyze { prompt } => emit(&analyze_prompt(prompt), None, args.pretty),
        Command::Recipes { stage } => emit(&recipe_listing(stage.as_deref()), None, args.pretty),
        Command::Schema { slide_type } => {
            let listing = schema_listing(slide_type.as_deref())?;
            emit(&listing, None, args.pretty)
        }
        Command::Normalize { input, output } => {
            let content = std::fs::read_to_string(input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let document: Value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", input.display()))?;

            let transformer = SlideTransformer::from_config(&config);
            let slides = normalize_document(&document, &transformer);
            if args.verbose {
                eprintln!("Normalized {} slides", slides.len());
            }
            emit(&slides, output.as_deref(), args.pretty)
        }
        Command::Generate {
            prompt,
            fixtures,
            output,
        } => {
            let generator: Arc<dyn ContentGenerator> = match fixtures {
                Some(path) => Arc::new(
                    FixtureGenerator::from_file(path)
                        .with_context(|| format!("Failed to load fixtures {}", path.display()))?,
                ),
                None => Arc::new(OutlineGenerator::new()),
            };
            let orchestrator = PresentationOrchestrator::new(generator).with_config(config);

            let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
            let deck = runtime.block_on(orchestrator.generate_presentation(prompt))?;

            if args.verbose {
                eprintln!(
                    "Generated {} slides from recipe '{}'",
                    deck.slides.len(),
                    deck.recipe
                );
                if !deck.degraded_slides.is_empty() {
                    eprintln!("  Placeholder slides: {:?}", deck.degraded_slides);
                }
            }
            emit(&deck, output.as_deref(), args.pretty)
        }
    }
}

/// Normalize one raw slide, or each element of an array of raw slides.
fn normalize_document(document: &Value, transformer: &SlideTransformer) -> Vec<CanonicalSlide> {
    match document {
        Value::Array(items) => transformer.transform_slides(items),
        single => vec![transformer.transform_slide(single, 0)],
    }
}

fn recipe_listing(stage: Option<&str>) -> Value {
    let registry = Registry::builtin();
    let describe = |recipe: &Recipe| {
        json!({
            "name": recipe.name,
            "slides": recipe.slides,
            "categories": recipe.category_tags(&registry),
        })
    };

    let groups: Vec<&'static [Recipe]> = match stage {
        Some(name) => vec![get_recipes_by_name(name)],
        None => SalesStage::ALL.iter().map(|s| get_recipes(*s)).collect(),
    };

    Value::Array(
        groups
            .into_iter()
            .map(|recipes| {
                json!({
                    "stage": recipes.first().map(|r| r.stage),
                    "recipes": recipes.iter().map(&describe).collect::<Vec<_>>(),
                })
            })
            .collect(),
    )
}

fn schema_listing(slide_type: Option<&str>) -> Result<Value> {
    let registry = Registry::builtin();
    match slide_type {
        Some(name) => {
            let schema = registry
                .resolve(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown slide type: {}", name))?;
            Ok(serde_json::to_value(schema)?)
        }
        None => Ok(Value::Array(
            registry
                .schemas()
                .iter()
                .map(|s| {
                    json!({
                        "type": s.type_id,
                        "family": s.family,
                        "title": s.title,
                        "layout": s.layout_hint,
                    })
                })
                .collect(),
        )),
    }
}

/// Serialize to stdout or a file.
fn emit<T: Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match output {
        Some(path) => write_output(path, &rendered),
        None => {
            println!("{}", rendered);
            Ok(())
        }
    }
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["salesdeck", "schema", "pricing", "--pretty", "-v"]).unwrap();
        assert!(args.pretty);
        assert!(args.verbose);
        assert!(matches!(args.command, Command::Schema { slide_type: Some(ref t) } if t == "pricing"));
    }

    #[test]
    fn test_normalize_single_and_array() {
        let transformer = SlideTransformer::new();

        let single = normalize_document(&json!({"title": {"text": "Solo"}}), &transformer);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].title(), "Solo");

        let many = normalize_document(&json!([{"title": "A"}, "bare text", null]), &transformer);
        let ids: Vec<_> = many.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["slide-1", "slide-2", "slide-3"]);
        assert_eq!(many[1].data["content"], "bare text");
    }

    #[test]
    fn test_recipe_listing_for_unknown_stage() {
        let listing = recipe_listing(Some("brainstorm"));
        assert_eq!(listing[0]["stage"], "general");
        assert!(!listing[0]["recipes"].as_array().unwrap().is_empty());

        let all = recipe_listing(None);
        assert_eq!(all.as_array().unwrap().len(), SalesStage::ALL.len());
    }

    #[test]
    fn test_schema_listing() {
        let one = schema_listing(Some("roi_calculation")).unwrap();
        assert_eq!(one["typeId"], "roiCalculation");
        assert!(schema_listing(Some("nope")).is_err());
        assert!(schema_listing(None).unwrap().as_array().unwrap().len() > 20);
    }
}
