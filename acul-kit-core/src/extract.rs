//! Pulls UI component source out of example markdown.

use regex::Regex;
use std::sync::LazyLock;

static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:tsx|jsx|typescript|javascript)\r?\n([\s\S]*?)```")
        .expect("code block pattern is valid")
});

/// A block only counts as a sample if it looks like component code.
const COMPONENT_MARKERS: &[&str] = &["React", "className", "import"];

/// One qualifying code block, indexed among the qualifying blocks of its document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub index: usize,
    pub code: String,
}

/// Every qualifying fenced block, in document order. Empty when the document
/// has none; callers skip such documents.
pub fn extract_samples(markdown: &str) -> Vec<Sample> {
    CODE_BLOCK
        .captures_iter(markdown)
        .filter_map(|caps| caps.get(1))
        .map(|body| body.as_str())
        .filter(|body| COMPONENT_MARKERS.iter().any(|marker| body.contains(marker)))
        .enumerate()
        .map(|(index, body)| Sample {
            index,
            code: body.trim().to_string(),
        })
        .collect()
}

/// The longest sample by character count; the earliest wins a tie.
pub fn best_sample(samples: &[Sample]) -> Option<&Sample> {
    samples.iter().fold(None, |best: Option<&Sample>, candidate| match best {
        Some(current) if current.code.chars().count() >= candidate.code.chars().count() => {
            Some(current)
        }
        _ => Some(candidate),
    })
}
