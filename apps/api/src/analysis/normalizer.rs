//! Response Normalizer: turns a raw model reply into a fully populated `CareerAnalysis`.
//!
//! Two phases, first match wins:
//! 1. Structured: the first `{...}` span that decodes into the four-field record
//!    and carries at least one of its fields.
//! 2. Heuristic: a line scanner keyed on section headers and list markers.
//!
//! Either way the result goes through `CareerAnalysis::with_defaults`, so the
//! caller never sees an empty field. Malformed content is never an error.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::models::CareerAnalysis;

/// Maximum items kept per list section by the heuristic scanner.
const SECTION_CAP: usize = 3;

/// Which phase produced a normalized result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationPhase {
    Structured,
    Heuristic,
}

#[derive(Debug, Clone)]
pub struct Normalized {
    pub analysis: CareerAnalysis,
    pub phase: NormalizationPhase,
}

/// Normalizes a raw reply. Infallible.
pub fn normalize(raw: &str) -> CareerAnalysis {
    normalize_with_phase(raw).analysis
}

pub fn normalize_with_phase(raw: &str) -> Normalized {
    let (extracted, phase) = match extract_structured(raw) {
        Some(analysis) => (analysis, NormalizationPhase::Structured),
        None => (scan_sections(raw), NormalizationPhase::Heuristic),
    };

    debug!(
        "Normalized reply via {:?}: roles={}, skill_gaps={}, courses={}, resume_chars={}",
        phase,
        extracted.roles().len(),
        extracted.skill_gaps().len(),
        extracted.courses().len(),
        extracted.rewritten_resume().len()
    );

    Normalized {
        analysis: extracted.with_defaults(),
        phase,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Phase 1: structured extraction
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuredReply {
    roles: Option<Vec<String>>,
    skill_gaps: Option<Vec<String>>,
    courses: Option<Vec<String>>,
    rewritten_resume: Option<String>,
}

impl StructuredReply {
    fn has_any_field(&self) -> bool {
        self.roles.is_some()
            || self.skill_gaps.is_some()
            || self.courses.is_some()
            || self.rewritten_resume.is_some()
    }
}

impl From<StructuredReply> for CareerAnalysis {
    fn from(reply: StructuredReply) -> Self {
        CareerAnalysis::new(
            reply.roles.unwrap_or_default(),
            reply.skill_gaps.unwrap_or_default(),
            reply.courses.unwrap_or_default(),
            reply.rewritten_resume.unwrap_or_default(),
        )
    }
}

/// Returns the first structured span that decodes, before any defaulting.
///
/// Candidates are tried in order of their opening brace. A candidate that
/// fails to decode does not hide the spans nested inside it. An object with
/// none of the four fields is only accepted when it spans the whole
/// first-`{`-to-last-`}` region; elsewhere it is an unrelated snippet.
pub fn extract_structured(raw: &str) -> Option<CareerAnalysis> {
    let outer = raw.find('{').zip(raw.rfind('}'));
    let mut from = 0;
    while let Some(offset) = raw[from..].find('{') {
        let start = from + offset;
        if let Some(len) = balanced_span_len(&raw.as_bytes()[start..]) {
            let span = &raw[start..start + len];
            if let Ok(reply) = serde_json::from_str::<StructuredReply>(span) {
                if reply.has_any_field() || outer == Some((start, start + len - 1)) {
                    return Some(reply.into());
                }
            }
        }
        from = start + 1;
    }
    None
}

/// Length of the brace-balanced span at the start of `bytes` (which begins
/// with `{`), or `None` if it never closes. Braces inside JSON string
/// literals do not count.
fn balanced_span_len(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

// ────────────────────────────────────────────────────────────────────────────
// Phase 2: heuristic section scanner
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Roles,
    SkillGaps,
    Courses,
    Resume,
}

/// Header keywords in priority order. A line matching several sections is
/// classified by the first row it matches.
const SECTION_HEADERS: [(Section, &[&str]); 4] = [
    (Section::Roles, &["roles", "positions"]),
    (Section::SkillGaps, &["skill gaps", "skills"]),
    (Section::Courses, &["courses", "training"]),
    (Section::Resume, &["resume", "cv"]),
];

fn classify_header(trimmed: &str) -> Option<Section> {
    let lower = trimmed.to_lowercase();
    SECTION_HEADERS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(section, _)| *section)
}

/// Strips a leading `1.` style number and then a leading `-` or `•`.
/// Returns `None` when the line carries no list marker at all.
fn strip_item_marker(trimmed: &str) -> Option<&str> {
    let digits = trimmed.len() - trimmed.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let numbered = digits > 0 && trimmed[digits..].starts_with('.');
    if !numbered && !trimmed.starts_with(['-', '•']) {
        return None;
    }

    let mut rest = trimmed;
    if numbered {
        rest = rest[digits + 1..].trim_start();
    }
    if let Some(stripped) = rest.strip_prefix(['-', '•']) {
        rest = stripped.trim_start();
    }
    Some(rest)
}

fn push_item(items: &mut Vec<String>, trimmed: &str) {
    if let Some(item) = strip_item_marker(trimmed) {
        if items.len() < SECTION_CAP {
            items.push(item.to_string());
        }
    }
}

/// Scans the reply line by line, before any defaulting.
pub fn scan_sections(raw: &str) -> CareerAnalysis {
    let mut roles = Vec::new();
    let mut skill_gaps = Vec::new();
    let mut courses = Vec::new();
    let mut resume = String::new();
    let mut section = Section::Preamble;

    for line in raw.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let trimmed = line.trim();

        if let Some(next) = classify_header(trimmed) {
            section = next;
            continue;
        }

        match section {
            Section::Preamble => {}
            Section::Roles => push_item(&mut roles, trimmed),
            Section::SkillGaps => push_item(&mut skill_gaps, trimmed),
            Section::Courses => push_item(&mut courses, trimmed),
            Section::Resume => {
                if !trimmed.is_empty() {
                    resume.push_str(line);
                    resume.push('\n');
                }
            }
        }
    }

    CareerAnalysis::new(roles, skill_gaps, courses, resume)
}
