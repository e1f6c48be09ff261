//! Fixed prompt templates for the model-backed analyses

use shared_types::{AnalysisKind, Issue};

/// Document text beyond this many characters is cut from the prompt
pub const MAX_DOCUMENT_CHARS: usize = 24_000;

/// Surrounding text sent with a fix request
pub const MAX_CONTEXT_CHARS: usize = 2_000;

const RESPONSE_SHAPE: &str = r#"Respond with JSON only, no prose and no code fences, in exactly this shape:
{"issues": [{"title": "...", "description": "...", "severity": "minor|moderate|major|critical", "category": "...", "text": "exact quote from the paper", "explanation": "...", "suggestion": "..."}]}
The "text" field must be copied verbatim from the paper. Return {"issues": []} if nothing is wrong."#;

/// Prompt for one analysis kind
pub fn build_prompt(kind: AnalysisKind, text: &str) -> String {
    let task = match kind {
        AnalysisKind::Content => {
            "Review the academic paper below for APA 7 writing quality. Report informal tone \
             (category \"tone\"), unclear or wordy sentences (category \"clarity\"), biased or \
             non-inclusive language (category \"content\"), and factual claims or statistics \
             that need a citation (category \"missingCitation\")."
        }
        AnalysisKind::Structure => {
            "Review the organization of the academic paper below against APA 7. Report missing \
             or misordered sections, heading problems, abstract problems, and paragraphs that \
             do not fit their section. Use category \"structure\"."
        }
        AnalysisKind::Citations => {
            "Verify the citations in the academic paper below against APA 7. Report in-text \
             citations without a matching reference entry, reference entries never cited, \
             author or year mismatches between the two, and incorrectly formatted references. \
             Use category \"citations\" or \"references\"."
        }
    };

    format!(
        "{}\n\n{}\n\nPAPER:\n{}",
        task,
        RESPONSE_SHAPE,
        truncate_chars(text, MAX_DOCUMENT_CHARS)
    )
}

/// Prompt for the fix-suggestion exchange
pub fn build_fix_prompt(issue: &Issue, context: &str) -> String {
    let target = issue.text.as_deref().unwrap_or("");
    format!(
        "Rewrite the quoted text so it complies with APA 7.\n\
         Problem: {}\n\
         Details: {}\n\
         Text to fix: \"{}\"\n\n\
         Surrounding text:\n{}\n\n\
         Respond with JSON only: {{\"original\": \"<text to fix, verbatim>\", \"replacement\": \"<corrected text>\", \"explanation\": \"<one sentence>\"}}",
        issue.title,
        issue.description,
        target,
        truncate_chars(context, MAX_CONTEXT_CHARS)
    )
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
