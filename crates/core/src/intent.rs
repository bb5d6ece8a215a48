//! Prompt analysis: heuristic extraction of generation parameters.
//!
//! Everything here is best-effort keyword and pattern matching. Fields that
//! cannot be found are left as `None`.

use crate::types::{GenerationParameters, Industry, SalesStage, SlideCountHint};
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Longest topic kept, in characters.
const MAX_TOPIC_CHARS: usize = 80;

/// Longest single challenge kept, in characters.
const MAX_CHALLENGE_CHARS: usize = 100;

/// Largest slide count accepted from a prompt.
const MAX_SLIDE_COUNT: usize = 40;

const DEFAULT_TOPIC: &str = "Business Presentation";

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static STAGE_PATTERNS: LazyLock<Vec<(SalesStage, Regex)>> = LazyLock::new(|| {
    vec![
        (
            SalesStage::Discovery,
            Regex::new(r"(?i)\b(?:discovery|first meeting|initial (?:call|meeting)|intro(?:ductory)? call|qualification|qualifying|needs assessment)\b").unwrap(),
        ),
        (
            SalesStage::Demo,
            Regex::new(r"(?i)\b(?:demos?|demonstration|product walkthrough|product tour|showcase)\b").unwrap(),
        ),
        (
            SalesStage::Proposal,
            Regex::new(r"(?i)\b(?:proposal|pricing|quote|rfp|business case|statement of work)\b").unwrap(),
        ),
        (
            SalesStage::Closing,
            Regex::new(r"(?i)\b(?:closing|close (?:the|a|this) deal|negotiation|negotiate|contract|final (?:meeting|presentation|pitch)|sign(?:ing)?[- ]off)\b").unwrap(),
        ),
    ]
});

static INDUSTRY_PATTERNS: LazyLock<Vec<(Industry, Regex)>> = LazyLock::new(|| {
    vec![
        (
            Industry::Technology,
            Regex::new(r"(?i)\b(?:software|saas|tech|technology|cloud|ai|artificial intelligence|cybersecurity|devops|data platform|it services)\b").unwrap(),
        ),
        (
            Industry::Healthcare,
            Regex::new(r"(?i)\b(?:health ?care|hospitals?|medical|clinics?|patients?|pharma(?:ceutical)?s?|biotech)\b").unwrap(),
        ),
        (
            Industry::Finance,
            Regex::new(r"(?i)\b(?:banks?|banking|financial|fintech|insurance|insurers?|investments?|wealth management|credit unions?|accounting)\b").unwrap(),
        ),
        (
            Industry::Retail,
            Regex::new(r"(?i)\b(?:retail|retailers?|e-?commerce|stores?|shopping|consumer goods|cpg)\b").unwrap(),
        ),
        (
            Industry::Manufacturing,
            Regex::new(r"(?i)\b(?:manufactur\w*|factory|factories|industrial|supply chain|production lines?)\b").unwrap(),
        ),
        (
            Industry::Education,
            Regex::new(r"(?i)\b(?:education(?:al)?|schools?|universit(?:y|ies)|colleges?|edtech|students?|teachers?)\b").unwrap(),
        ),
        (
            Industry::RealEstate,
            Regex::new(r"(?i)\b(?:real estate|property management|properties|realtors?|brokerages?|commercial property)\b").unwrap(),
        ),
    ]
});

static COMPANY_SUFFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][\w&'-]*(?:\s+[A-Z][\w&'-]*)*)\s+(Inc|Corp|Corporation|LLC|Ltd|Co|Group|Holdings|Technologies|Systems|Labs|GmbH|PLC)\b\.?")
        .unwrap()
});

static COMPANY_AFTER_PREPOSITION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:for|to|with|at|of|pitching|prospect|client|customer)\s+([A-Z](?:[\w&'-]|\.\w)*(?:\s+(?:[A-Z](?:[\w&'-]|\.\w)*|&))*)")
        .unwrap()
});

/// Capitalized words that are never a company name on their own.
const COMPANY_STOPWORDS: &[&str] = &[
    "A", "An", "The", "Our", "We", "I", "Us", "My", "Their", "Your", "This", "That", "CEO", "CFO",
    "CTO", "CIO", "COO", "CMO", "VP", "IT", "HR", "AI", "ROI", "KPI", "SaaS", "B2B", "B2C", "Q1",
    "Q2", "Q3", "Q4", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "January",
    "February", "March", "April", "May", "June", "July", "August", "September", "October",
    "November", "December",
];

static COMPETITOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:compet(?:ing|es|e)\s+(?:with|against)|competitors?\s+(?:are|is|include|including|like|such as)|versus|vs\.?|against|instead of|switching from|replacing)\s+([^.;:!?\n]+)")
        .unwrap()
});

static LIST_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*(?:,|;|/|\band\b|\bor\b|&)\s*").unwrap());

static BUDGET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:[$€£]\s?\d[\d,]*(?:\.\d+)?(?:\s?(?:k|mm|m|bn|b|thousand|million|billion)\b)?|\b\d[\d,]*(?:\.\d+)?\s?(?:k|m|thousand|million|billion)?\s?(?:usd|eur|gbp|dollars|euros|pounds)\b)")
        .unwrap()
});

static BUDGET_KEYWORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bbudget\s+(?:of|is|around|about|near|roughly|up to|:)?\s*(?:around|about|roughly)?\s*(\d[\d,]*(?:\.\d+)?\s?(?:k|m|thousand|million|billion)?)\b")
        .unwrap()
});

static DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:\d+|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)\s*[- ]?\s*(?:days?|weeks?|months?|quarters?|years?)\b")
        .unwrap()
});

static DEADLINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:by|before|in|within|during|until)\s+((?:the\s+)?(?:end of (?:the\s+)?(?:year|quarter|month)|(?:next|this) (?:week|month|quarter|year)|Q[1-4](?:\s+\d{4})?|(?:january|february|march|april|june|july|august|september|october|november|december)(?:\s+\d{4})?|20\d{2}))\b")
        .unwrap()
});

static CHALLENGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:struggl(?:ing|es|e) with|challenges? (?:with|around|include|including|are|is|like)|pain points? (?:are|is|include|including|like|around)|problems? with|issues? with|concerns? (?:about|around|with)|frustrated (?:with|by)|dealing with)\s+([^.;!?\n]+)")
        .unwrap()
});

static CLAUSE_BREAK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:but|so|because|which|who|while|and (?:they|we|he|she|it)|they|we)\b")
        .unwrap()
});

static SLIDE_RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:between\s+)?(\d{1,2})\s*(?:-|–|to|and)\s*(\d{1,2})\s*[- ]?slides?\b").unwrap()
});

static SLIDE_COUNT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}|three|four|five|six|seven|eight|nine|ten|eleven|twelve|fifteen|twenty)\s*[- ]?\s*slides?\b")
        .unwrap()
});

/// Topic markers, strongest first.
static TOPIC_REGEXES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)\b(?:about|regarding|covering)\s+").unwrap(),
        Regex::new(r"(?i)\b(?:on|introducing|showcasing|presenting|selling)\s+").unwrap(),
    ]
});

static DATE_START_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?|monday|tuesday|wednesday|thursday|friday|saturday|sunday|today|tomorrow)\b")
        .unwrap()
});

static TOPIC_CUT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:[.,;:!?]|\s+(?:for|to|with|at|that|which|so)\s+)").unwrap()
});

static COMMAND_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:please\s+)?(?:create|make|build|generate|prepare|design|draft|write|put together|i need|we need|help me (?:create|build|make|prepare))\s+(?:me\s+|us\s+)?(?:an?\s+|the\s+)?")
        .unwrap()
});

static DECK_WORDS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(?:\d{1,2}|\w+)[- ]slides?\s+)?(?:sales\s+)?(?:discovery call\s+|discovery\s+|demo\s+|proposal\s+|closing\s+|pitch\s+)?(?:presentation|deck|pitch deck|pitch|slides?|slideshow)?\s*(?:(?:for|to|with|about|on)\b)?\s*")
        .unwrap()
});

static ARTICLE_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:our|the|an?|their|your|my)\s+").unwrap());

static AUDIENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:for|to)\s+(?:the\s+|their\s+|our\s+|an?\s+)?((?:[\w'’&-]+\s+){0,3}?(?:team|teams|executives?|leadership|board|stakeholders|decision[- ]makers|buyers|managers|directors|engineers|developers|investors|c-suite|ceo|cfo|cto|cio|coo|cmo|vps?|vice presidents?|owners?|administrators|staff))\b")
        .unwrap()
});

static PURPOSE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:goal is to|aim is to|in order to|so that we can|to help us|objective is to)\s+([^.;!?\n]+)")
        .unwrap()
});

/// Extract generation parameters from a free-text prompt.
pub fn analyze_prompt(prompt: &str) -> GenerationParameters {
    let text = normalize_prompt(prompt);
    let sales_stage = detect_sales_stage(&text);

    let company_name = extract_company_name(&text);
    let mut competitors = extract_competitors(&text);
    if let (Some(list), Some(company)) = (competitors.as_mut(), company_name.as_deref()) {
        list.retain(|c| !c.eq_ignore_ascii_case(company));
    }
    let competitors = competitors.filter(|list| !list.is_empty());

    let params = GenerationParameters {
        topic: extract_topic(&text),
        audience: extract_audience(&text).unwrap_or_else(|| sales_stage.default_audience().to_string()),
        purpose: extract_purpose(&text).unwrap_or_else(|| sales_stage.purpose().to_string()),
        slide_count_hint: extract_slide_count(&text),
        sales_stage,
        industry: detect_industry(&text),
        company_name,
        challenges: extract_challenges(&text),
        competitors,
        budget: extract_budget(&text),
        timeline: extract_timeline(&text),
    };

    log::debug!(
        "Analyzed prompt: stage={}, industry={}, company={:?}",
        params.sales_stage,
        params.industry,
        params.company_name
    );
    params
}

/// NFKC-normalize and collapse whitespace.
pub fn normalize_prompt(prompt: &str) -> String {
    let composed: String = prompt.nfkc().collect();
    WHITESPACE_REGEX
        .replace_all(composed.trim(), " ")
        .replace(['\u{2018}', '\u{2019}'], "'")
}

/// The stage whose keyword appears first; `General` when none do.
pub fn detect_sales_stage(text: &str) -> SalesStage {
    STAGE_PATTERNS
        .iter()
        .filter_map(|(stage, re)| re.find(text).map(|m| (m.start(), *stage)))
        .min_by_key(|(start, _)| *start)
        .map(|(_, stage)| stage)
        .unwrap_or_default()
}

/// The industry with the most keyword hits; ties go to declaration order.
pub fn detect_industry(text: &str) -> Industry {
    let mut best = (0, Industry::Other);
    for (industry, re) in INDUSTRY_PATTERNS.iter() {
        let hits = re.find_iter(text).count();
        if hits > best.0 {
            best = (hits, *industry);
        }
    }
    best.1
}

pub fn extract_company_name(text: &str) -> Option<String> {
    if let Some(caps) = COMPANY_SUFFIX_REGEX.captures(text) {
        let name = trim_leading_stopwords(&caps[1]);
        if !name.is_empty() {
            return Some(format!("{} {}", name, &caps[2]));
        }
    }

    COMPANY_AFTER_PREPOSITION_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let candidate = caps[1]
                .trim_end_matches(['.', '&', ' '])
                .trim_end_matches("'s");
            let name = trim_leading_stopwords(candidate);
            (!name.is_empty()).then(|| name.to_string())
        })
        .next()
}

/// Drop leading stopwords ("The", "CFO", ...) from a capitalized phrase.
fn trim_leading_stopwords(phrase: &str) -> &str {
    let mut rest = phrase.trim();
    loop {
        let (first, tail) = rest.split_once(' ').unwrap_or((rest, ""));
        let bare = first.trim_end_matches("'s");
        if !first.is_empty() && COMPANY_STOPWORDS.contains(&bare) {
            rest = tail.trim_start();
        } else {
            return rest;
        }
    }
}

pub fn extract_competitors(text: &str) -> Option<Vec<String>> {
    let mut found: Vec<String> = Vec::new();
    for caps in COMPETITOR_REGEX.captures_iter(text) {
        for item in LIST_SEPARATOR_REGEX.split(&caps[1]) {
            if let Some(name) = leading_proper_noun(item) {
                if !found.iter().any(|f| f.eq_ignore_ascii_case(&name)) {
                    found.push(name);
                }
            }
        }
    }
    (!found.is_empty()).then_some(found)
}

/// The run of capitalized words an item starts with, after articles.
fn leading_proper_noun(item: &str) -> Option<String> {
    let item = ARTICLE_PREFIX_REGEX.replace(item.trim(), "");
    let words: Vec<&str> = item
        .split_whitespace()
        .take_while(|w| w.chars().next().is_some_and(|c| c.is_uppercase() || c.is_ascii_digit()))
        .collect();
    let name = words.join(" ");
    let name = trim_leading_stopwords(&name);
    (!name.is_empty()).then(|| name.to_string())
}

pub fn extract_budget(text: &str) -> Option<String> {
    BUDGET_REGEX
        .find(text)
        .map(|m| m.as_str().trim().to_string())
        .or_else(|| {
            BUDGET_KEYWORD_REGEX
                .captures(text)
                .map(|caps| caps[1].trim().to_string())
        })
}

/// A duration ("6 months") or deadline ("Q3 2025"), whichever comes first.
pub fn extract_timeline(text: &str) -> Option<String> {
    let duration = DURATION_REGEX
        .find(text)
        .map(|m| (m.start(), m.as_str().to_string()));
    let deadline = DEADLINE_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| (m.start(), m.as_str().to_string()));

    match (duration, deadline) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a.1 } else { b.1 }),
        (a, b) => a.or(b).map(|(_, s)| s),
    }
}

pub fn extract_challenges(text: &str) -> Option<Vec<String>> {
    let mut found = Vec::new();
    for caps in CHALLENGE_REGEX.captures_iter(text) {
        let clause = caps[1].trim();
        let clause = match CLAUSE_BREAK_REGEX.find(clause) {
            Some(m) => &clause[..m.start()],
            None => clause,
        };
        for item in LIST_SEPARATOR_REGEX.split(clause) {
            let item = ARTICLE_PREFIX_REGEX.replace(item.trim(), "");
            let item = item.trim();
            if item.is_empty() || item.chars().count() > MAX_CHALLENGE_CHARS {
                continue;
            }
            if !found.iter().any(|f: &String| f.eq_ignore_ascii_case(item)) {
                found.push(item.to_string());
            }
        }
    }
    (!found.is_empty()).then_some(found)
}

pub fn extract_slide_count(text: &str) -> Option<SlideCountHint> {
    if let Some(caps) = SLIDE_RANGE_REGEX.captures(text) {
        let a: usize = caps[1].parse().ok()?;
        let b: usize = caps[2].parse().ok()?;
        return valid_count(a.min(b)).and(valid_count(a.max(b))).map(|_| SlideCountHint::new(a, b));
    }

    let caps = SLIDE_COUNT_REGEX.captures(text)?;
    let word = caps[1].to_lowercase();
    let count = word.parse::<usize>().ok().or_else(|| number_word(&word))?;
    valid_count(count).map(SlideCountHint::exact)
}

fn valid_count(count: usize) -> Option<usize> {
    (1..=MAX_SLIDE_COUNT).contains(&count).then_some(count)
}

fn number_word(word: &str) -> Option<usize> {
    let n = match word {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "fifteen" => 15,
        "twenty" => 20,
        _ => return None,
    };
    Some(n)
}

/// What the deck is about, falling back to the prompt's first clause.
pub fn extract_topic(text: &str) -> String {
    let from_marker = TOPIC_REGEXES.iter().find_map(|re| {
        re.find_iter(text).find_map(|m| {
            let tail = &text[m.end()..];
            if DATE_START_REGEX.is_match(tail) {
                return None;
            }
            let clause = match TOPIC_CUT_REGEX.find(tail) {
                Some(m) => &tail[..m.start()],
                None => tail,
            };
            clean_topic(clause)
        })
    });
    if let Some(topic) = from_marker {
        return topic;
    }

    let stripped = COMMAND_PREFIX_REGEX.replace(text, "");
    let stripped = DECK_WORDS_REGEX.replace(&stripped, "");
    let clause = match TOPIC_CUT_REGEX.find(&stripped) {
        Some(m) => &stripped[..m.start()],
        None => &stripped[..],
    };
    clean_topic(clause).unwrap_or_else(|| DEFAULT_TOPIC.to_string())
}

fn clean_topic(clause: &str) -> Option<String> {
    let clause = ARTICLE_PREFIX_REGEX.replace(clause.trim(), "");
    let clause = clause.trim();
    if clause.is_empty() {
        return None;
    }

    let mut topic = String::new();
    for word in clause.split_whitespace() {
        if topic.chars().count() + word.chars().count() + 1 > MAX_TOPIC_CHARS {
            break;
        }
        if !topic.is_empty() {
            topic.push(' ');
        }
        topic.push_str(word);
    }
    (!topic.is_empty()).then_some(topic)
}

pub fn extract_audience(text: &str) -> Option<String> {
    AUDIENCE_REGEX
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

pub fn extract_purpose(text: &str) -> Option<String> {
    PURPOSE_REGEX.captures(text).map(|caps| {
        let purpose = caps[1].trim();
        let mut chars = purpose.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    })
}
