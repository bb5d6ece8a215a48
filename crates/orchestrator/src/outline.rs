//! Offline content generator.
//!
//! Builds plausible raw slide content from the request alone, with no
//! network access. Output is deterministic for a given request.

use crate::error::GenerationError;
use crate::generator::{ContentGenerator, SlideRequest, StructureRequest};
use async_trait::async_trait;
use serde_json::{json, Value};

const DEFAULT_CHALLENGES: &[&str] = &[
    "Manual processes slow teams down",
    "Limited visibility into performance",
    "Rising operational costs",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineGenerator;

impl OutlineGenerator {
    pub fn new() -> Self {
        Self
    }

    fn slide_content(&self, req: &SlideRequest) -> Value {
        let company = req.company_name.as_deref().unwrap_or("your organization");
        let industry = req.industry.as_deref().unwrap_or("your industry");
        let topic = capitalize(&req.main_topic);
        let challenges: Vec<String> = match &req.challenges {
            Some(list) if !list.is_empty() => list.iter().map(|c| capitalize(c)).collect(),
            _ => DEFAULT_CHALLENGES.iter().map(|c| c.to_string()).collect(),
        };
        let timeline = req.timeline.as_deref().unwrap_or("90 days");
        let budget = req.budget.as_deref().unwrap_or("To be confirmed");

        match req.slide_type.as_str() {
            "title" => json!({
                "title": topic,
                "subtitle": format!("Prepared for {company}"),
                "presenter": "Account Team",
                "companyName": company,
            }),
            "agenda" => json!({
                "title": req.title,
                "items": [
                    format!("Where {company} is today"),
                    "What we heard",
                    format!("How {topic} helps"),
                    "Next steps",
                ],
            }),
            "sectionHeader" => json!({ "title": req.title, "subtitle": topic }),
            "thankYou" => json!({
                "title": req.title,
                "message": format!("Thank you for your time, {company}"),
                "contactName": "Account Team",
            }),
            "executiveSummary" => json!({
                "title": req.title,
                "summary": format!("{topic} addresses the priorities {company} shared with us."),
                "keyMessage": format!("Measurable results within {timeline}"),
                "supportingPoints": [
                    { "label": "Time to value", "value": timeline },
                    { "label": "Investment", "value": budget },
                    { "label": "Focus", "value": topic },
                ],
            }),
            "problemStatement" => json!({
                "title": req.title,
                "problem": format!("Teams across {industry} are under pressure to do more with less."),
                "impacts": challenges,
            }),
            "discoveryQuestions" => json!({
                "title": req.title,
                "questions": challenges
                    .iter()
                    .map(|c| json!({
                        "question": format!("How does \"{c}\" affect your team today?"),
                        "purpose": "Quantify impact",
                    }))
                    .collect::<Vec<_>>(),
            }),
            "swotAnalysis" => json!({
                "title": req.title,
                "strengths": [format!("Established position in {industry}")],
                "weaknesses": challenges,
                "opportunities": [format!("Adopt {topic}")],
                "threats": competitor_names(req),
            }),
            "matrix" => json!({
                "title": req.title,
                "xAxis": "Effort",
                "yAxis": "Impact",
                "quadrants": [
                    { "title": "Quick wins", "items": [topic] },
                    { "title": "Strategic bets", "items": challenges },
                ],
            }),
            "marketAnalysis" => json!({
                "title": req.title,
                "marketSize": "Growing",
                "trends": [format!("Consolidation in {industry}"), "Automation of routine work"],
            }),
            "competitiveAnalysis" => json!({
                "title": req.title,
                "competitors": competitor_names(req)
                    .iter()
                    .map(|name| json!({ "name": name, "weaknesses": ["Slower onboarding"] }))
                    .collect::<Vec<_>>(),
                "differentiators": ["Faster time to value", "Dedicated support"],
            }),
            "stakeholderMap" => json!({
                "title": req.title,
                "description": format!("Who shapes the decision at {company}"),
                "stakeholders": [
                    { "name": "Economic buyer", "influence": "high" },
                    { "name": "Champion", "influence": "medium" },
                ],
            }),
            "dataVisualization" => json!({
                "title": req.title,
                "insight": format!("{topic} reduces cycle time quarter over quarter"),
                "chartType": "line",
                "chartData": {
                    "labels": ["Q1", "Q2", "Q3", "Q4"],
                    "values": [100, 82, 70, 61],
                },
            }),
            "roiCalculation" => json!({
                "title": req.title,
                "investment": budget,
                "paybackPeriod": timeline,
                "assumptions": ["Current process costs stay flat", "Adoption across core teams"],
            }),
            "pricing" => json!({
                "title": req.title,
                "tiers": [
                    { "name": "Starter", "price": "$49", "features": ["Core features"] },
                    { "name": "Growth", "price": "$99", "features": ["Core features", "Analytics"], "recommended": true },
                ],
            }),
            "budgetBreakdown" => json!({
                "title": req.title,
                "totalBudget": budget,
                "lineItems": [
                    { "category": "Licenses", "percentage": 60 },
                    { "category": "Implementation", "percentage": 30 },
                    { "category": "Training", "percentage": 10 },
                ],
            }),
            "solutionOverview" => json!({
                "title": req.title,
                "overview": format!("{topic} built for {industry}"),
                "features": challenges
                    .iter()
                    .map(|c| json!({ "name": format!("Answer to: {c}") }))
                    .collect::<Vec<_>>(),
            }),
            "productDemo" => json!({
                "title": req.title,
                "scenario": format!("A day in the life at {company}"),
                "steps": [
                    { "step": "Connect your data" },
                    { "step": "Review the dashboard" },
                    { "step": "Act on recommendations" },
                ],
                "keyTakeaways": ["Set up in days", "Visible results"],
            }),
            "caseStudy" => json!({
                "title": req.title,
                "client": format!("A leading {industry} organization"),
                "challenge": challenges.first(),
                "solution": topic,
                "results": [{ "metric": "Time saved", "value": "30%" }],
            }),
            "testimonial" => json!({
                "title": req.title,
                "quote": "It changed how our team works.",
                "author": "Operations Lead",
            }),
            "whyUs" => json!({
                "title": req.title,
                "reasons": [
                    { "title": "Proven", "description": format!("Trusted across {industry}") },
                    { "title": "Partnership", "description": "A team that stays with you" },
                ],
            }),
            "beforeAfter" => json!({
                "title": req.title,
                "summary": format!("What changes for {company}"),
                "beforeAfter": { "before": challenges, "after": [format!("{topic} in place")] },
            }),
            "implementationTimeline" => json!({
                "title": req.title,
                "duration": timeline,
                "phases": [
                    { "phase": "Kickoff", "activities": ["Align on goals"] },
                    { "phase": "Rollout", "activities": ["Configure", "Train teams"] },
                    { "phase": "Review", "milestone": "Success review" },
                ],
            }),
            "objectionHandling" => json!({
                "title": req.title,
                "objections": [
                    { "objection": "Timing", "response": format!("We can go live within {timeline}") },
                    { "objection": "Cost", "response": "The plan pays back within the first year" },
                ],
            }),
            "teamIntroduction" => json!({
                "title": req.title,
                "members": [
                    { "name": "Account Executive", "role": "Your main contact" },
                    { "name": "Solutions Engineer", "role": "Technical lead" },
                ],
            }),
            "nextSteps" => json!({
                "title": req.title,
                "steps": [
                    { "action": "Confirm priorities", "owner": company },
                    { "action": "Share proposal", "owner": "Account Team" },
                ],
                "callToAction": "Schedule the follow-up",
            }),
            _ => json!({
                "title": req.title,
                "content": req.context,
                "bullets": challenges,
            }),
        }
    }
}

#[async_trait]
impl ContentGenerator for OutlineGenerator {
    async fn generate_structure(
        &self,
        request: &StructureRequest,
    ) -> Result<Value, GenerationError> {
        let topic = capitalize(&request.topic);
        let title = match &request.company_name {
            Some(company) => format!("{topic} for {company}"),
            None => topic,
        };
        Ok(json!({ "title": title }))
    }

    async fn generate_slide(&self, request: &SlideRequest) -> Result<Value, GenerationError> {
        Ok(self.slide_content(request))
    }
}

fn competitor_names(req: &SlideRequest) -> Vec<String> {
    match &req.competitors {
        Some(list) if !list.is_empty() => list.clone(),
        _ => vec!["Incumbent tools".to_string(), "In-house builds".to_string()],
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
