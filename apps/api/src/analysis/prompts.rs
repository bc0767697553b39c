// Prompt constants for the career analysis call.

/// Career advisor prompt template.
/// Replace: {career_path} (every occurrence), {resume}
pub const CAREER_ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an AI career advisor.

Analyze this resume and do the following:

1. Suggest 3 suitable tech roles that align with the career path "{career_path}".
2. Highlight the key skill gaps that need to be filled for the "{career_path}" role.
3. Recommend 3 specific online courses that would help bridge these skill gaps.
4. Rewrite the resume to fit the selected career path: {career_path}.

Please format your response as JSON with the following structure:
{
  "roles": ["role1", "role2", "role3"],
  "skillGaps": ["gap1", "gap2", "gap3"],
  "courses": ["course1", "course2", "course3"],
  "rewrittenResume": "complete rewritten resume text"
}

Resume:
{resume}"#;

/// Renders the career analysis prompt. Both inputs are embedded verbatim.
pub fn build_career_prompt(resume: &str, career_path: &str) -> String {
    // Resume last so placeholders typed inside a resume are left alone
    CAREER_ANALYSIS_PROMPT_TEMPLATE
        .replace("{career_path}", career_path)
        .replace("{resume}", resume)
}
