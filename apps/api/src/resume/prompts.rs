// Resume parsing LLM prompts.

use std::fmt::Write;
use std::sync::OnceLock;

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, UNTRUSTED_INPUT_INSTRUCTION};
use crate::resume::schema::{prompt_shape, HyperlinkHint};

const RESUME_PARSE_RULES: &str = "\
You are a resume parsing engine. Extract structured data from the resume text.

Rules:
- Use null for missing scalar fields and [] for missing list fields.
- Keep keys exactly as in the structure below; add no other keys.
- Every list contains plain strings only, except education, work_experience and projects, \
which contain objects with exactly the keys shown.
- Keep dates as written in the resume. Use \"Present\" only as an end_date.
- For linkedin, github and website use the actual URLs from the extracted hyperlinks, \
never their display text. Every URL must start with http:// or https://.
- URLs containing \"linkedin.com\" go to linkedin, URLs containing \"github.com\" go to github, \
a portfolio or personal site goes to website, and project URLs go to that project's link.
- For awards, combine name and description into one string.";

/// System prompt: rules, shared guards and the expected record shape.
pub fn resume_parse_system() -> &'static str {
    static SYSTEM: OnceLock<String> = OnceLock::new();
    SYSTEM.get_or_init(|| {
        let shape = serde_json::to_string_pretty(&prompt_shape()).unwrap_or_default();
        format!(
            "{RESUME_PARSE_RULES}\n\n{UNTRUSTED_INPUT_INSTRUCTION}\n{JSON_ONLY_INSTRUCTION}\n\nOutput JSON structure:\n{shape}"
        )
    })
}

/// User prompt: the resume text followed by any harvested hyperlinks.
pub fn build_parse_prompt(resume_text: &str, hints: &[HyperlinkHint]) -> String {
    let mut prompt = format!("Resume text:\n{resume_text}");
    if !hints.is_empty() {
        prompt.push_str("\n\nExtracted hyperlinks (use these URLs, not the display text):\n");
        for (i, hint) in hints.iter().enumerate() {
            let _ = writeln!(prompt, "{}. Text: '{}' → URL: {}", i + 1, hint.text, hint.url);
        }
    }
    prompt
}
