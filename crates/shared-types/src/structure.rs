//! Structure summary handed to the rule validators alongside the text

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructure {
    #[serde(default)]
    pub headings: Vec<Heading>,
    #[serde(default)]
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

impl DocumentStructure {
    /// Derive a structure summary from plain text.
    ///
    /// Markdown `#` prefixes give explicit levels. Short title-like lines
    /// without terminal punctuation are taken as level-1 headings.
    pub fn from_text(text: &str) -> Self {
        let mut structure = DocumentStructure::default();

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(heading) = markdown_heading(trimmed) {
                structure.headings.push(heading);
            } else if looks_like_heading(trimmed) {
                structure.headings.push(Heading {
                    level: 1,
                    text: trimmed.to_string(),
                });
            } else {
                structure.paragraphs.push(trimmed.to_string());
            }
        }

        structure
    }

    /// Case-insensitive check for a heading containing `needle`
    pub fn has_heading(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.headings
            .iter()
            .any(|h| h.text.to_lowercase().contains(&needle))
    }
}

fn markdown_heading(line: &str) -> Option<Heading> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = line[hashes..].trim();
    if rest.is_empty() {
        return None;
    }
    Some(Heading {
        level: hashes as u8,
        text: rest.to_string(),
    })
}

fn looks_like_heading(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() || words.len() > 10 || line.chars().count() > 80 {
        return false;
    }
    if line.ends_with(['.', ',', ';', ':', '?', '!', ')']) {
        return false;
    }
    let starts_upper = line.chars().next().is_some_and(|c| c.is_uppercase());
    // Every word longer than three letters is capitalized
    let title_case = words
        .iter()
        .filter(|w| w.chars().count() > 3)
        .all(|w| w.chars().next().is_some_and(|c| c.is_uppercase()));

    starts_upper && title_case
}
