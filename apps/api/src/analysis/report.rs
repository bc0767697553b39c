//! Plain-text career report: rendering, download naming, and re-reading.

use serde::Serialize;
use thiserror::Error;

use crate::analysis::models::CareerAnalysis;

const TITLE_PREFIX: &str = "AI Career Report for ";
const ROLES_HEADING: &str = "RECOMMENDED ROLES:";
const SKILL_GAPS_HEADING: &str = "SKILL GAPS TO FILL:";
const COURSES_HEADING: &str = "RECOMMENDED COURSES:";
const RESUME_HEADING: &str = "REWRITTEN RESUME:";
/// Prefix of the second and later lines of a multi-line list item.
const CONTINUATION_INDENT: &str = "   ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("report does not start with a title line")]
    MissingTitle,

    #[error("report is missing the {0:?} heading")]
    MissingHeading(&'static str),
}

/// A report read back into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedReport {
    pub career_path: String,
    pub analysis: CareerAnalysis,
}

/// Renders the downloadable report. Sections always appear in the order
/// roles, skill gaps, courses, rewritten resume.
pub fn render_report(analysis: &CareerAnalysis, career_path: &str) -> String {
    format!(
        "{TITLE_PREFIX}{career_path}\n\n\
         {ROLES_HEADING}\n{}\n\n\
         {SKILL_GAPS_HEADING}\n{}\n\n\
         {COURSES_HEADING}\n{}\n\n\
         {RESUME_HEADING}\n{}\n",
        numbered(analysis.roles()),
        numbered(analysis.skill_gaps()),
        numbered(analysis.courses()),
        analysis.rewritten_resume(),
    )
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let item = item.replace('\n', &format!("\n{CONTINUATION_INDENT}"));
            format!("{}. {item}", i + 1)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `career-report-<path>.txt`, lowercased, each whitespace run turned into `-`.
pub fn report_filename(career_path: &str) -> String {
    let mut slug = String::with_capacity(career_path.len());
    let mut in_whitespace = false;
    for c in career_path.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.push(c);
            in_whitespace = false;
        }
    }
    format!("career-report-{slug}.txt")
}

/// One-paragraph summary of the three lists, comma separated.
pub fn render_summary(analysis: &CareerAnalysis) -> String {
    format!(
        "Recommended Roles: {}\nSkill Gaps: {}\nCourses: {}",
        analysis.roles().join(", "),
        analysis.skill_gaps().join(", "),
        analysis.courses().join(", "),
    )
}

/// Reads a report produced by [`render_report`] back into its sections.
pub fn parse_report(text: &str) -> Result<ParsedReport, ReportError> {
    let (title, body) = text.split_once('\n').ok_or(ReportError::MissingTitle)?;
    let career_path = title
        .strip_prefix(TITLE_PREFIX)
        .ok_or(ReportError::MissingTitle)?
        .to_string();

    let body = body
        .strip_prefix(&format!("\n{ROLES_HEADING}\n"))
        .ok_or(ReportError::MissingHeading(ROLES_HEADING))?;
    let (roles, body) = split_at_heading(body, SKILL_GAPS_HEADING)?;
    let (skill_gaps, body) = split_at_heading(body, COURSES_HEADING)?;
    let (courses, resume) = split_at_heading(body, RESUME_HEADING)?;
    let resume = resume.strip_suffix('\n').unwrap_or(resume);

    Ok(ParsedReport {
        career_path,
        analysis: CareerAnalysis::new(
            unnumbered(roles),
            unnumbered(skill_gaps),
            unnumbered(courses),
            resume.to_string(),
        ),
    })
}

fn split_at_heading<'a>(
    body: &'a str,
    heading: &'static str,
) -> Result<(&'a str, &'a str), ReportError> {
    body.split_once(&format!("\n\n{heading}\n"))
        .ok_or(ReportError::MissingHeading(heading))
}

fn unnumbered(block: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    if block.is_empty() {
        return items;
    }
    for line in block.split('\n') {
        match (line.strip_prefix(CONTINUATION_INDENT), items.last_mut()) {
            (Some(rest), Some(item)) => {
                item.push('\n');
                item.push_str(rest);
            }
            _ => items.push(
                line.split_once(". ")
                    .filter(|(n, _)| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
                    .map(|(_, item)| item)
                    .unwrap_or(line)
                    .to_string(),
            ),
        }
    }
    items
}
