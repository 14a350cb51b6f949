//! Request intent classification.
//!
//! [`TASK_RULES`] is evaluated top to bottom and the first rule with a
//! keyword hit wins. Order is precedence: "analyze this code" is a coding
//! request because `CodeGeneration` is checked before `DataAnalysis`.
//!
//! Keywords match at word starts, so "bug" hits "bugs" but not "ladybug".
//! A phrase keyword such as "pros and cons" must appear as consecutive
//! words.

use crate::knowledge::TaskCategory;

/// Ordered classification rules: `(category, keywords)`.
///
/// Keywords are lowercase. Each word of a keyword must begin a word of the
/// request; every word but the last must match exactly.
pub const TASK_RULES: &[(TaskCategory, &[&str])] = &[
    (
        TaskCategory::CodeGeneration,
        &[
            "code",
            "function",
            "script",
            "program",
            "debug",
            "implement",
            "refactor",
            "algorithm",
            "api",
            "python",
            "javascript",
            "typescript",
            "sql",
            "compile",
            "bug",
        ],
    ),
    (
        TaskCategory::FormalWriting,
        &[
            "email",
            "letter",
            "report",
            "proposal",
            "memo",
            "formal",
            "professional",
            "business",
            "resume",
        ],
    ),
    (
        TaskCategory::CreativeWriting,
        &[
            "story",
            "poem",
            "creative",
            "fiction",
            "novel",
            "character",
            "lyrics",
            "narrative",
            "screenplay",
        ],
    ),
    (
        TaskCategory::DataAnalysis,
        &[
            "data",
            "analyze",
            "analysis",
            "statistic",
            "chart",
            "spreadsheet",
            "csv",
            "trend",
            "metric",
        ],
    ),
    (
        TaskCategory::ReasoningAndAnalysis,
        &[
            "explain",
            "why",
            "reason",
            "compare",
            "evaluate",
            "pros and cons",
            "think through",
            "solve",
            "logic",
            "decide",
        ],
    ),
];

/// Map a request to exactly one [`TaskCategory`]. Never fails.
pub fn classify(request: &str) -> TaskCategory {
    let lowered = request.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    TASK_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| has_keyword(&words, k)))
        .map_or(TaskCategory::General, |(category, _)| *category)
}

fn has_keyword(words: &[&str], keyword: &str) -> bool {
    let parts: Vec<&str> = keyword.split_whitespace().collect();
    let Some((last, leading)) = parts.split_last() else {
        return false;
    };
    words.windows(parts.len()).any(|window| {
        window[..leading.len()] == *leading && window[leading.len()].starts_with(last)
    })
}
