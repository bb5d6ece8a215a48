//! Built-in slide-type schemas, grouped by family.

use crate::registry::{FieldSpec, SlideTypeSchema};
use crate::types::{Layout, SlideFamily};

// Shared record shapes.

const LABELED_VALUE: &[FieldSpec] = &[FieldSpec::text("label"), FieldSpec::text("value")];

const STATISTIC: &[FieldSpec] = &[
    FieldSpec::text("value"),
    FieldSpec::text("label"),
    FieldSpec::text("source"),
];

const TITLED_POINT: &[FieldSpec] = &[FieldSpec::text("title"), FieldSpec::text("description")];

const QUADRANT: &[FieldSpec] = &[
    FieldSpec::text("title"),
    FieldSpec::text("description"),
    FieldSpec::list("items"),
];

const COMPETITOR: &[FieldSpec] = &[
    FieldSpec::text("name"),
    FieldSpec::list("strengths"),
    FieldSpec::list("weaknesses"),
];

const QUESTION: &[FieldSpec] = &[FieldSpec::text("question"), FieldSpec::text("purpose")];

const PRICING_TIER: &[FieldSpec] = &[
    FieldSpec::text("name"),
    FieldSpec::text("price"),
    FieldSpec::text_or("period", "per month"),
    FieldSpec::list("features"),
    FieldSpec::raw("recommended"),
];

const LINE_ITEM: &[FieldSpec] = &[
    FieldSpec::text("category"),
    FieldSpec::text("amount"),
    FieldSpec::number("percentage", 0.0),
];

const RESULT_METRIC: &[FieldSpec] = &[FieldSpec::text("metric"), FieldSpec::text("value")];

const FEATURE: &[FieldSpec] = &[
    FieldSpec::text("name"),
    FieldSpec::text("description"),
    FieldSpec::text("benefit"),
];

const DEMO_STEP: &[FieldSpec] = &[FieldSpec::text("step"), FieldSpec::text("description")];

const PHASE: &[FieldSpec] = &[
    FieldSpec::text("phase"),
    FieldSpec::text("duration"),
    FieldSpec::list("activities"),
    FieldSpec::text("milestone"),
];

const OBJECTION: &[FieldSpec] = &[FieldSpec::text("objection"), FieldSpec::text("response")];

const ACTION_ITEM: &[FieldSpec] = &[
    FieldSpec::text("action"),
    FieldSpec::text("owner"),
    FieldSpec::text("dueDate"),
];

const TEAM_MEMBER: &[FieldSpec] = &[
    FieldSpec::text("name"),
    FieldSpec::text("role"),
    FieldSpec::text("bio"),
];

/// Every built-in slide type. `content` doubles as the fallback schema.
pub const BUILTIN_SCHEMAS: &[SlideTypeSchema] = &[
    // Structural
    SlideTypeSchema {
        type_id: "title",
        family: SlideFamily::Structural,
        title: "Partnering with {company}",
        description: "Opening slide introducing the presentation for {company}",
        layout_hint: Layout::Title,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("subtitle"),
            FieldSpec::text("presenter"),
            FieldSpec::text("date"),
            FieldSpec::text("companyName"),
        ],
    },
    SlideTypeSchema {
        type_id: "content",
        family: SlideFamily::Structural,
        title: "Key Points",
        description: "General content slide with supporting bullet points",
        layout_hint: Layout::Content,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("content"),
            FieldSpec::list("bullets"),
        ],
    },
    SlideTypeSchema {
        type_id: "agenda",
        family: SlideFamily::Structural,
        title: "Agenda",
        description: "Overview of what this conversation with {company} will cover",
        layout_hint: Layout::Content,
        field_rules: &[FieldSpec::title(), FieldSpec::list("items")],
    },
    SlideTypeSchema {
        type_id: "sectionHeader",
        family: SlideFamily::Structural,
        title: "Next Section",
        description: "Divider introducing the next part of the presentation",
        layout_hint: Layout::Centered,
        field_rules: &[FieldSpec::title(), FieldSpec::text("subtitle")],
    },
    SlideTypeSchema {
        type_id: "thankYou",
        family: SlideFamily::Structural,
        title: "Thank You",
        description: "Closing slide thanking {company} with contact details",
        layout_hint: Layout::Centered,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("message"),
            FieldSpec::text("contactName"),
            FieldSpec::text("email"),
            FieldSpec::text("phone"),
        ],
    },
    // Analytical
    SlideTypeSchema {
        type_id: "executiveSummary",
        family: SlideFamily::Analytical,
        title: "Executive Summary",
        description: "High-level summary of the opportunity for {company}",
        layout_hint: Layout::Content,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("summary"),
            FieldSpec::text("keyMessage"),
            FieldSpec::records("supportingPoints", LABELED_VALUE),
        ],
    },
    SlideTypeSchema {
        type_id: "problemStatement",
        family: SlideFamily::Analytical,
        title: "The Challenge",
        description: "The business problems {company} faces in {industry} and their impact",
        layout_hint: Layout::TwoColumn,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("problem"),
            FieldSpec::list("impacts"),
            FieldSpec::records("statistics", STATISTIC),
        ],
    },
    SlideTypeSchema {
        type_id: "discoveryQuestions",
        family: SlideFamily::Analytical,
        title: "Questions to Explore",
        description: "Discovery questions to uncover {company}'s priorities and constraints",
        layout_hint: Layout::Content,
        field_rules: &[FieldSpec::title(), FieldSpec::records("questions", QUESTION)],
    },
    SlideTypeSchema {
        type_id: "swotAnalysis",
        family: SlideFamily::Analytical,
        title: "SWOT Analysis",
        description: "Strengths, weaknesses, opportunities, and threats for {company} in {industry}",
        layout_hint: Layout::Grid,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::list("strengths"),
            FieldSpec::list("weaknesses"),
            FieldSpec::list("opportunities"),
            FieldSpec::list("threats"),
        ],
    },
    SlideTypeSchema {
        type_id: "matrix",
        family: SlideFamily::Analytical,
        title: "Priority Matrix",
        description: "Two-axis matrix positioning {company}'s initiatives by impact and effort",
        layout_hint: Layout::Matrix,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("xAxis"),
            FieldSpec::text("yAxis"),
            FieldSpec::records("quadrants", QUADRANT),
        ],
    },
    SlideTypeSchema {
        type_id: "marketAnalysis",
        family: SlideFamily::Analytical,
        title: "Market Landscape",
        description: "Market size, growth, and trends shaping {industry}",
        layout_hint: Layout::Chart,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("marketSize"),
            FieldSpec::text("growthRate"),
            FieldSpec::list("trends"),
            FieldSpec::raw("chartData"),
        ],
    },
    SlideTypeSchema {
        type_id: "competitiveAnalysis",
        family: SlideFamily::Analytical,
        title: "Competitive Landscape",
        description: "How the alternatives {company} is considering compare",
        layout_hint: Layout::Table,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::records("competitors", COMPETITOR),
            FieldSpec::list("differentiators"),
        ],
    },
    SlideTypeSchema {
        type_id: "stakeholderMap",
        family: SlideFamily::Analytical,
        title: "Stakeholder Map",
        description: "Decision makers and influencers at {company} and what each cares about",
        layout_hint: Layout::Grid,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("description"),
            FieldSpec::raw("stakeholders"),
        ],
    },
    SlideTypeSchema {
        type_id: "dataVisualization",
        family: SlideFamily::Analytical,
        title: "By the Numbers",
        description: "Chart highlighting the key metric behind the recommendation",
        layout_hint: Layout::Chart,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("insight"),
            FieldSpec::text_or("chartType", "bar"),
            FieldSpec::raw("chartData"),
        ],
    },
    // Financial
    SlideTypeSchema {
        type_id: "roiCalculation",
        family: SlideFamily::Financial,
        title: "Return on Investment",
        description: "Projected investment, savings, and payback period for {company}",
        layout_hint: Layout::Chart,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("investment"),
            FieldSpec::text("annualSavings"),
            FieldSpec::text("paybackPeriod"),
            FieldSpec::number("roiPercentage", 0.0),
            FieldSpec::list("assumptions"),
            FieldSpec::raw("chartData"),
        ],
    },
    SlideTypeSchema {
        type_id: "pricing",
        family: SlideFamily::Financial,
        title: "Investment Options",
        description: "Pricing tiers and what each includes for {company}",
        layout_hint: Layout::Grid,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::records("tiers", PRICING_TIER),
            FieldSpec::text("notes"),
        ],
    },
    SlideTypeSchema {
        type_id: "budgetBreakdown",
        family: SlideFamily::Financial,
        title: "Budget Breakdown",
        description: "How the proposed investment is allocated",
        layout_hint: Layout::Table,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("totalBudget"),
            FieldSpec::records("lineItems", LINE_ITEM),
        ],
    },
    // Narrative
    SlideTypeSchema {
        type_id: "solutionOverview",
        family: SlideFamily::Narrative,
        title: "Our Solution",
        description: "How the solution addresses {company}'s challenges",
        layout_hint: Layout::TwoColumn,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("overview"),
            FieldSpec::records("features", FEATURE),
        ],
    },
    SlideTypeSchema {
        type_id: "productDemo",
        family: SlideFamily::Narrative,
        title: "See It in Action",
        description: "Walkthrough of a scenario tailored to {company}'s workflow",
        layout_hint: Layout::Content,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("scenario"),
            FieldSpec::records("steps", DEMO_STEP),
            FieldSpec::list("keyTakeaways"),
        ],
    },
    SlideTypeSchema {
        type_id: "caseStudy",
        family: SlideFamily::Narrative,
        title: "Customer Success Story",
        description: "Results a similar {industry} customer achieved",
        layout_hint: Layout::TwoColumn,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("client"),
            FieldSpec::text("challenge"),
            FieldSpec::text("solution"),
            FieldSpec::records("results", RESULT_METRIC),
            FieldSpec::text("quote"),
        ],
    },
    SlideTypeSchema {
        type_id: "testimonial",
        family: SlideFamily::Narrative,
        title: "What Our Customers Say",
        description: "A customer quote relevant to {industry}",
        layout_hint: Layout::Quote,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("quote"),
            FieldSpec::text("author"),
            FieldSpec::text("role"),
            FieldSpec::text("company"),
        ],
    },
    SlideTypeSchema {
        type_id: "whyUs",
        family: SlideFamily::Narrative,
        title: "Why Choose Us",
        description: "Reasons we are the right partner for {company}",
        layout_hint: Layout::Grid,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::records("reasons", TITLED_POINT),
            FieldSpec::list("proofPoints"),
        ],
    },
    SlideTypeSchema {
        type_id: "beforeAfter",
        family: SlideFamily::Narrative,
        title: "Before and After",
        description: "How {company}'s day-to-day changes with the solution",
        layout_hint: Layout::Comparison,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("summary"),
            FieldSpec::raw("beforeAfter"),
        ],
    },
    SlideTypeSchema {
        type_id: "implementationTimeline",
        family: SlideFamily::Narrative,
        title: "Implementation Plan",
        description: "Phased rollout plan and milestones for {company}",
        layout_hint: Layout::Timeline,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::text("duration"),
            FieldSpec::records("phases", PHASE),
            FieldSpec::raw("timeline"),
        ],
    },
    SlideTypeSchema {
        type_id: "objectionHandling",
        family: SlideFamily::Narrative,
        title: "Addressing Your Concerns",
        description: "Common concerns raised by {company} and how we address them",
        layout_hint: Layout::TwoColumn,
        field_rules: &[FieldSpec::title(), FieldSpec::records("objections", OBJECTION)],
    },
    SlideTypeSchema {
        type_id: "teamIntroduction",
        family: SlideFamily::Narrative,
        title: "Your Team",
        description: "The people who will support {company}",
        layout_hint: Layout::Grid,
        field_rules: &[FieldSpec::title(), FieldSpec::records("members", TEAM_MEMBER)],
    },
    SlideTypeSchema {
        type_id: "nextSteps",
        family: SlideFamily::Narrative,
        title: "Next Steps",
        description: "Agreed actions, owners, and dates to move forward with {company}",
        layout_hint: Layout::Content,
        field_rules: &[
            FieldSpec::title(),
            FieldSpec::records("steps", ACTION_ITEM),
            FieldSpec::text("callToAction"),
        ],
    },
];
