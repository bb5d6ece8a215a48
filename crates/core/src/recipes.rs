//! Recipe catalog: proven slide sequences per sales stage.
//!
//! Each stage owns several interchangeable recipes so repeated generations
//! for the same stage produce varied narratives.

use crate::config::RecipeSelection;
use crate::registry::Registry;
use crate::types::{SalesStage, SlideCountHint, SlideFamily};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// An ordered sequence of slide types forming one narrative arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub name: &'static str,
    pub stage: SalesStage,
    pub slides: &'static [&'static str],
}

impl Recipe {
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Distinct slide families visited by this recipe, in first-seen order.
    pub fn category_tags(&self, registry: &Registry) -> Vec<SlideFamily> {
        let mut tags = Vec::new();
        for type_id in self.slides {
            let family = registry.get_schema(type_id).family;
            if !tags.contains(&family) {
                tags.push(family);
            }
        }
        tags
    }
}

const DISCOVERY: &[Recipe] = &[
    Recipe {
        name: "discovery-consultative",
        stage: SalesStage::Discovery,
        slides: &[
            "title",
            "agenda",
            "problemStatement",
            "discoveryQuestions",
            "stakeholderMap",
            "caseStudy",
            "nextSteps",
        ],
    },
    Recipe {
        name: "discovery-insight-led",
        stage: SalesStage::Discovery,
        slides: &[
            "title",
            "marketAnalysis",
            "problemStatement",
            "discoveryQuestions",
            "whyUs",
            "nextSteps",
        ],
    },
    Recipe {
        name: "discovery-brief",
        stage: SalesStage::Discovery,
        slides: &["title", "agenda", "discoveryQuestions", "teamIntroduction", "nextSteps"],
    },
];

const DEMO: &[Recipe] = &[
    Recipe {
        name: "demo-problem-solution",
        stage: SalesStage::Demo,
        slides: &[
            "title",
            "agenda",
            "problemStatement",
            "solutionOverview",
            "productDemo",
            "caseStudy",
            "objectionHandling",
            "nextSteps",
        ],
    },
    Recipe {
        name: "demo-before-after",
        stage: SalesStage::Demo,
        slides: &[
            "title",
            "beforeAfter",
            "productDemo",
            "dataVisualization",
            "testimonial",
            "implementationTimeline",
            "nextSteps",
        ],
    },
    Recipe {
        name: "demo-deep-dive",
        stage: SalesStage::Demo,
        slides: &[
            "title",
            "agenda",
            "executiveSummary",
            "problemStatement",
            "solutionOverview",
            "productDemo",
            "beforeAfter",
            "competitiveAnalysis",
            "testimonial",
            "nextSteps",
        ],
    },
];

const PROPOSAL: &[Recipe] = &[
    Recipe {
        name: "proposal-roi-focused",
        stage: SalesStage::Proposal,
        slides: &[
            "title",
            "executiveSummary",
            "problemStatement",
            "solutionOverview",
            "roiCalculation",
            "pricing",
            "implementationTimeline",
            "teamIntroduction",
            "nextSteps",
        ],
    },
    Recipe {
        name: "proposal-comprehensive",
        stage: SalesStage::Proposal,
        slides: &[
            "title",
            "agenda",
            "executiveSummary",
            "problemStatement",
            "swotAnalysis",
            "solutionOverview",
            "caseStudy",
            "roiCalculation",
            "budgetBreakdown",
            "pricing",
            "implementationTimeline",
            "nextSteps",
        ],
    },
    Recipe {
        name: "proposal-concise",
        stage: SalesStage::Proposal,
        slides: &[
            "title",
            "executiveSummary",
            "solutionOverview",
            "pricing",
            "roiCalculation",
            "nextSteps",
        ],
    },
];

const CLOSING: &[Recipe] = &[
    Recipe {
        name: "closing-confidence",
        stage: SalesStage::Closing,
        slides: &[
            "title",
            "executiveSummary",
            "objectionHandling",
            "caseStudy",
            "pricing",
            "implementationTimeline",
            "nextSteps",
        ],
    },
    Recipe {
        name: "closing-value-recap",
        stage: SalesStage::Closing,
        slides: &[
            "title",
            "beforeAfter",
            "roiCalculation",
            "testimonial",
            "nextSteps",
            "thankYou",
        ],
    },
];

const GENERAL: &[Recipe] = &[
    Recipe {
        name: "general-narrative",
        stage: SalesStage::General,
        slides: &[
            "title",
            "agenda",
            "executiveSummary",
            "problemStatement",
            "solutionOverview",
            "caseStudy",
            "whyUs",
            "nextSteps",
        ],
    },
    Recipe {
        name: "general-analytical",
        stage: SalesStage::General,
        slides: &[
            "title",
            "executiveSummary",
            "marketAnalysis",
            "swotAnalysis",
            "matrix",
            "competitiveAnalysis",
            "dataVisualization",
            "nextSteps",
        ],
    },
    Recipe {
        name: "general-short",
        stage: SalesStage::General,
        slides: &["title", "problemStatement", "solutionOverview", "whyUs", "thankYou"],
    },
];

/// Recipes for a stage, in declaration order. Never empty.
pub fn get_recipes(stage: SalesStage) -> &'static [Recipe] {
    match stage {
        SalesStage::Discovery => DISCOVERY,
        SalesStage::Demo => DEMO,
        SalesStage::Proposal => PROPOSAL,
        SalesStage::Closing => CLOSING,
        SalesStage::General => GENERAL,
    }
}

/// Recipes for a stage given by name; unknown names get the `general` set.
pub fn get_recipes_by_name(stage: &str) -> &'static [Recipe] {
    match stage.parse::<SalesStage>() {
        Ok(stage) => get_recipes(stage),
        Err(_) => {
            log::debug!("Unknown sales stage '{stage}', using general recipes");
            GENERAL
        }
    }
}

/// Every recipe across all stages.
pub fn all_recipes() -> impl Iterator<Item = &'static Recipe> {
    SalesStage::ALL
        .into_iter()
        .flat_map(|stage| get_recipes(stage).iter())
}

/// Pick the recipe for a presentation.
///
/// With a slide-count hint the closest-length recipe wins (ties go to the
/// first declared). Without one, `selection` decides; `PromptHash` is stable
/// for a given prompt and stage.
pub fn select_recipe(
    stage: SalesStage,
    hint: Option<SlideCountHint>,
    prompt: &str,
    selection: RecipeSelection,
) -> &'static Recipe {
    let recipes = get_recipes(stage);

    if let Some(hint) = hint {
        let mut best = &recipes[0];
        for recipe in &recipes[1..] {
            if hint.distance(recipe.len()) < hint.distance(best.len()) {
                best = recipe;
            }
        }
        return best;
    }

    match selection {
        RecipeSelection::First => &recipes[0],
        RecipeSelection::PromptHash => &recipes[prompt_bucket(prompt, stage, recipes.len())],
    }
}

fn prompt_bucket(prompt: &str, stage: SalesStage, buckets: usize) -> usize {
    let normalized = prompt.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let mut hasher = Sha256::new();
    hasher.update(stage.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(normalized.as_bytes());
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % buckets as u64) as usize
}
