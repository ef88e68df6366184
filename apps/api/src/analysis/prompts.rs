// Prompt templates for the three analysis modes.
// Placeholders: {text} = resume text, {jd} = job description,
// {response} = cached Percentage Match result (Improvisation only).

use crate::models::AnalysisMode;

/// Resume Analysis template. Replace `{text}` and `{jd}` before sending.
pub const RESUME_ANALYSIS_TEMPLATE: &str = "
You are an experienced Technical Human Resource Manager. Your task is to review the provided resume against the job description.
Please share your professional evaluation on whether the candidate's profile aligns with the role.
Highlight the strengths and weaknesses of the applicant in relation to the specified job requirements. Start with the name and job profile of the candidate
resume:{text}
description:{jd}
";

/// Percentage Match template. Replace `{text}` and `{jd}` before sending.
pub const PERCENTAGE_MATCH_TEMPLATE: &str = "
You are a skilled ATS (Applicant Tracking System) scanner with a deep understanding of data science and ATS functionality.
Your task is to evaluate the resume against the provided job description. Give me the percentage of match if the resume matches
the job description. First, the output should come as a percentage, then keywords missing, and finally, final thoughts.
resume:{text}
description:{jd}
";

/// Improvisation template. Replace `{text}`, `{jd}` and `{response}` before sending.
pub const IMPROVISATION_TEMPLATE: &str = "
Consider yourself as an ATS advisor for the application. Give the best possible improvisation suggestions from the response and form the resume and description. Highlight the skillsets which need to be improved according to the description.
resume:{text}
description:{jd}
response:{response}
";

/// Values substituted into a template.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    pub resume_text: &'a str,
    pub job_description: &'a str,
    /// Cached Percentage Match result. Only Improvisation reads it.
    pub percentage_match: Option<&'a str>,
}

pub fn template_for(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::ResumeAnalysis => RESUME_ANALYSIS_TEMPLATE,
        AnalysisMode::PercentageMatch => PERCENTAGE_MATCH_TEMPLATE,
        AnalysisMode::Improvisation => IMPROVISATION_TEMPLATE,
    }
}

/// Composes the prompt for `mode`.
pub fn build_prompt(mode: AnalysisMode, inputs: &PromptInputs<'_>) -> String {
    fill_template(
        template_for(mode),
        &[
            ("text", inputs.resume_text),
            ("jd", inputs.job_description),
            ("response", inputs.percentage_match.unwrap_or_default()),
        ],
    )
}

/// Single-pass `{name}` substitution. Inserted values are never re-scanned,
/// and braces that do not name a known placeholder are copied through.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(
        template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>(),
    );
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let substituted = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match substituted {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
