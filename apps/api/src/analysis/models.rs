use serde::{Deserialize, Serialize};

pub const FALLBACK_ROLES: [&str; 3] = ["Frontend Developer", "UI/UX Developer", "Web Developer"];
pub const FALLBACK_SKILL_GAPS: [&str; 3] = [
    "Modern JavaScript frameworks",
    "Responsive design",
    "Version control (Git)",
];
pub const FALLBACK_COURSES: [&str; 3] = [
    "Complete React Developer Course",
    "Advanced CSS and JavaScript",
    "Git and GitHub Masterclass",
];
pub const FALLBACK_RESUME: &str =
    "Unable to rewrite resume. Please check your input and try again.";

/// Target paths offered to users. Advisory only; any non-blank path is accepted.
pub const CAREER_PATHS: [&str; 12] = [
    "Frontend Developer",
    "Backend Developer",
    "Full Stack Developer",
    "Data Scientist",
    "Data Analyst",
    "Machine Learning Engineer",
    "DevOps Engineer",
    "UX/UI Designer",
    "Product Manager",
    "Cybersecurity Specialist",
    "Mobile Developer",
    "Cloud Engineer",
];

/// Result of one career analysis. Fields are private so a value cannot be
/// edited after normalization hands it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerAnalysis {
    roles: Vec<String>,
    skill_gaps: Vec<String>,
    courses: Vec<String>,
    rewritten_resume: String,
}

impl CareerAnalysis {
    pub fn new(
        roles: Vec<String>,
        skill_gaps: Vec<String>,
        courses: Vec<String>,
        rewritten_resume: String,
    ) -> Self {
        Self {
            roles,
            skill_gaps,
            courses,
            rewritten_resume,
        }
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn skill_gaps(&self) -> &[String] {
        &self.skill_gaps
    }

    pub fn courses(&self) -> &[String] {
        &self.courses
    }

    pub fn rewritten_resume(&self) -> &str {
        &self.rewritten_resume
    }

    /// Replaces every empty field with its fallback content.
    pub fn with_defaults(self) -> Self {
        Self {
            roles: or_fallback(self.roles, &FALLBACK_ROLES),
            skill_gaps: or_fallback(self.skill_gaps, &FALLBACK_SKILL_GAPS),
            courses: or_fallback(self.courses, &FALLBACK_COURSES),
            rewritten_resume: if self.rewritten_resume.is_empty() {
                FALLBACK_RESUME.to_string()
            } else {
                self.rewritten_resume
            },
        }
    }
}

fn or_fallback(items: Vec<String>, fallback: &[&str]) -> Vec<String> {
    if items.is_empty() {
        fallback.iter().map(|s| s.to_string()).collect()
    } else {
        items
    }
}
