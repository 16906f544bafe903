// Prompt templates for the analysis pipeline.
// Placeholders are `{resume}` and `{jd}`; `render` fills them.

/// ATS-style analysis. The metric parser and section extractor depend on
/// these exact bullet labels.
pub const ATS_ANALYSIS_TEMPLATE: &str = "\
You are an ATS. Respond in bullets:
- Job Description Match With Ats score:
- Missing Keywords:
- Profile Summary:
- Personalized suggestions for skills, keywords and achievements that can enhance the provided resume:
- Application Success Rate:
- Skill Gap Percentage:
- Suggest 3 related job titles based on the following:
Resume:
{resume}
JD:
{jd}
";

pub const TAILORED_RESUME_TEMPLATE: &str = "\
You are a professional resume writer with 10+ years experience. Using the ORIGINAL resume and JD, write a fully tailored resume:
ORIGINAL:
{resume}
JD:
{jd}
Output only the resume.
";

pub const COVER_LETTER_TEMPLATE: &str = "Write a one-page cover letter for JD:\n{jd}";

pub const INTERVIEW_QUESTIONS_TEMPLATE: &str = "List 5 likely interview questions for JD:\n{jd}";

pub const SKILL_GAP_TEMPLATE: &str = "\
Compare the resume's skills to the JD requirements; give Skill Gap Percentage with bullet points \
and calculate the skill gap. Do not use tables; use bullet points.
Resume:
{resume}
JD:
{jd}";

pub const RELATED_ROLES_TEMPLATE: &str = "\
Suggest 3 related job titles based on the JD and resume below.
JD:
{jd}
Resume:
{resume}";

pub const SALARY_ESTIMATE_TEMPLATE: &str = "Estimate salary range in USD for JD:\n{jd}";

pub const NETWORKING_TIPS_TEMPLATE: &str = "Provide 3 networking tips for this JD:\n{jd}";

/// Substitutes the resume and JD into a template in a single pass, so
/// placeholder-like text inside either input is left alone.
pub fn render(template: &str, resume: &str, jd: &str) -> String {
    let mut out = String::with_capacity(template.len() + resume.len() + jd.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix("{resume}") {
            out.push_str(resume);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{jd}") {
            out.push_str(jd);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}
