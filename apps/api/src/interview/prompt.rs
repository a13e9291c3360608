//! System-prompt composition for one interview turn. Pure function over the
//! session parameters and the retrieved snippets.
//!
//! Line order is deliberate: the model conditions more heavily on later
//! content, so short volatile signals (mode, remaining count, the wrap-up
//! instruction) come before the long free-text job description and resume.
//! Every free-text field must already be clamped by the caller.

use crate::interview::knowledge::KnowledgeEntry;
use crate::interview::session::Mode;

pub struct PromptParams<'a> {
    pub job_description: &'a str,
    pub resume: &'a str,
    pub mode: Mode,
    pub experience_level: &'a str,
    pub focus_areas: &'a [String],
    pub target_role: &'a str,
    pub questions_remaining: Option<u32>,
}

pub fn compose(params: &PromptParams<'_>, retrieved: &[&KnowledgeEntry]) -> String {
    let mut lines: Vec<String> = vec![
        "You are an AI interview coach and interviewer.".to_string(),
        "Ask one clear question at a time and wait for the candidate response.".to_string(),
        "When the user answers, give brief, constructive feedback and ask the next question \
         unless the session is ending."
            .to_string(),
        "Keep tone supportive, specific, and tailored to the job context.".to_string(),
    ];

    if matches!(params.mode, Mode::Behavioral | Mode::Both) {
        lines.push("Behavioral mode uses STAR-style prompts and evaluation.".to_string());
    }
    if matches!(params.mode, Mode::Technical | Mode::Both) {
        lines.push(
            "Technical mode focuses on problem solving, tradeoffs, and correctness.".to_string(),
        );
    }

    lines.push(
        "If a resume is provided, weave in questions about specific roles, projects, or \
         achievements."
            .to_string(),
    );

    if params.questions_remaining == Some(0) {
        lines.push(
            "The session is ending: provide a concise wrap-up and do not ask another question."
                .to_string(),
        );
    }

    lines.push(format!("Interview mode: {}.", params.mode));
    if !params.experience_level.is_empty() {
        lines.push(format!("Experience level: {}.", params.experience_level));
    }
    if !params.target_role.is_empty() {
        lines.push(format!("Target role: {}.", params.target_role));
    }
    if !params.focus_areas.is_empty() {
        lines.push(format!("Focus areas: {}.", params.focus_areas.join(", ")));
    }
    if let Some(remaining) = params.questions_remaining {
        lines.push(format!("Questions remaining in this session: {remaining}."));
    }

    if !params.job_description.is_empty() {
        lines.push(format!("Job description:\n{}", params.job_description));
    }
    if !params.resume.is_empty() {
        lines.push(format!("Resume:\n{}", params.resume));
    }

    if !retrieved.is_empty() {
        let snippets: Vec<String> = retrieved
            .iter()
            .map(|entry| format!("- {}", entry.snippet))
            .collect();
        lines.push(format!(
            "Reference snippets (use if helpful):\n{}",
            snippets.join("\n")
        ));
    }

    lines.join("\n")
}
