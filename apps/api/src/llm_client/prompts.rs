// System instructions and user-payload builders for the three analysis tasks.

pub const SUMMARIZE_SYSTEM: &str = "You are a service that summarizes the given text. \
    Reply with the summary only.";

pub const EXTRACT_SKILLS_SYSTEM: &str = "You are a service that extracts skills from a resume. \
    Reply with the skills as a single comma-separated list.";

pub const MATCH_SYSTEM: &str = "You are a service that scores the relevance between a job \
    description and a resume. The score must be between 0 and 1. \
    Justify the score you give.";

/// Embeds the resume and the job description verbatim in one user message.
pub fn match_payload(candidate_resume: &str, job_description: &str) -> String {
    format!("Resume:\n{candidate_resume}\n\nJob description:\n{job_description}\n")
}
