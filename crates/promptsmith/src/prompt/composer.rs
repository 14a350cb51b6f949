//! Meta-prompt composition.
//!
//! [`compose`] renders a fixed sequence of blocks: preamble, selected
//! principles, structural guidelines, anti-patterns, task-specific guidance,
//! closing. Sections whose source list is empty are omitted entirely.

use super::builder::{InstructionBuilder, numbered};
use crate::classifier::classify;
use crate::knowledge::{GuideEntry, KnowledgeDocument, Principle, TaskCategory, TaskGuide};
use crate::selector::select_principles;
use serde::Serialize;

pub const PREAMBLE: &str = "You are an expert prompt engineer. Refine and enhance the user's prompt based on these principles:";
pub const STRUCTURAL_HEADER: &str = "Key Structural Guidelines:";
pub const ANTI_PATTERN_HEADER: &str = "Common Anti-Patterns to Avoid:";
pub const TASK_GUIDANCE_HEADER: &str = "Task-Specific Guidance:";
pub const EXAMPLE_HEADER: &str = "Example Transformation:";
pub const CLOSING: &str = "Apply these principles to enhance the user's prompt. Return only the enhanced prompt, without commentary.";

/// Structural elements rendered per instruction.
pub const MAX_STRUCTURAL_ELEMENTS: usize = 2;
/// Anti-patterns rendered per instruction.
pub const MAX_ANTI_PATTERNS: usize = 3;

/// Render the instruction text. Identical inputs give identical output.
pub fn compose(document: &KnowledgeDocument, selected: &[&Principle], task: TaskCategory) -> String {
    InstructionBuilder::new(PREAMBLE)
        .raw(numbered(selected.iter().map(|p| entry(&p.title, &p.content))))
        .section(
            STRUCTURAL_HEADER,
            render_entries(&document.structural_elements, MAX_STRUCTURAL_ELEMENTS),
        )
        .section(
            ANTI_PATTERN_HEADER,
            render_entries(&document.anti_patterns, MAX_ANTI_PATTERNS),
        )
        .section_if(task != TaskCategory::General, TASK_GUIDANCE_HEADER, || {
            numbered(document.guides_for(task).iter().map(render_task_guide))
        })
        .raw(CLOSING)
        .build()
}

fn entry(title: &str, content: &str) -> String {
    format!("{title}\n{content}")
}

fn render_entries(entries: &[GuideEntry], limit: usize) -> String {
    numbered(entries.iter().take(limit).map(|e| entry(&e.title, &e.content)))
}

fn render_task_guide(guide: &TaskGuide) -> String {
    let mut out = entry(&guide.title, &guide.content);
    if let Some(example) = &guide.example {
        out.push_str(&format!(
            "\n{EXAMPLE_HEADER}\nBefore: {}\nAfter: {}",
            example.before, example.after
        ));
    }
    out
}

// ── Instruction ───────────────────────────────────────────────────

/// A composed meta-prompt plus the decisions that shaped it.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// The instruction text sent as the system message.
    pub text: String,
    /// Category the request was classified as.
    pub task: TaskCategory,
    /// Titles of the principles rendered, in output order.
    pub principles: Vec<String>,
}

impl Instruction {
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Select, classify, and compose in one step.
pub fn build_instruction(request: &str, document: &KnowledgeDocument) -> Instruction {
    let selected = select_principles(request, &document.principles);
    let task = classify(request);
    Instruction {
        text: compose(document, &selected, task),
        task,
        principles: selected.iter().map(|p| p.title.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::Example;
    use std::collections::BTreeMap;

    fn guide_entry(title: &str) -> GuideEntry {
        GuideEntry {
            title: title.into(),
            content: format!("{title} body"),
        }
    }

    fn principle(title: &str) -> Principle {
        Principle {
            title: title.into(),
            content: format!("{title} body"),
            ..Default::default()
        }
    }

    fn full_document() -> KnowledgeDocument {
        let mut tasks = BTreeMap::new();
        tasks.insert(
            "code_generation".to_string(),
            vec![
                TaskGuide {
                    title: "Name the language".into(),
                    content: "State the target language.".into(),
                    example: Some(Example {
                        before: "make a sorter".into(),
                        after: "Write a Rust function that sorts a Vec<i32>.".into(),
                    }),
                },
                TaskGuide {
                    title: "Give constraints".into(),
                    content: "Mention performance limits.".into(),
                    example: None,
                },
            ],
        );
        KnowledgeDocument {
            platform: "claude".into(),
            version: "1".into(),
            principles: vec![principle("Be clear"), principle("Give context")],
            structural_elements: vec![guide_entry("S1"), guide_entry("S2"), guide_entry("S3")],
            anti_patterns: vec![
                guide_entry("A1"),
                guide_entry("A2"),
                guide_entry("A3"),
                guide_entry("A4"),
            ],
            task_specific_guides: tasks,
        }
    }

    #[test]
    fn full_layout_is_exact() {
        let doc = full_document();
        let selected: Vec<&Principle> = doc.principles.iter().collect();
        let text = compose(&doc, &selected, TaskCategory::CodeGeneration);

        let expected = format!(
            "{PREAMBLE}\n\n\
             1. Be clear\nBe clear body\n\n\
             2. Give context\nGive context body\n\n\
             {STRUCTURAL_HEADER}\n\
             1. S1\nS1 body\n\n\
             2. S2\nS2 body\n\n\
             {ANTI_PATTERN_HEADER}\n\
             1. A1\nA1 body\n\n\
             2. A2\nA2 body\n\n\
             3. A3\nA3 body\n\n\
             {TASK_GUIDANCE_HEADER}\n\
             1. Name the language\nState the target language.\n\
             {EXAMPLE_HEADER}\n\
             Before: make a sorter\n\
             After: Write a Rust function that sorts a Vec<i32>.\n\n\
             2. Give constraints\nMention performance limits.\n\n\
             {CLOSING}"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn structural_limit_and_anti_pattern_limit() {
        let doc = full_document();
        let text = compose(&doc, &[], TaskCategory::General);
        assert!(!text.contains("S3"));
        assert!(!text.contains("A4"));
    }

    #[test]
    fn empty_structural_elements_suppress_header() {
        let doc = KnowledgeDocument {
            structural_elements: vec![],
            ..full_document()
        };
        let text = compose(&doc, &[], TaskCategory::CodeGeneration);
        assert!(!text.contains("Key Structural Guidelines:"));
    }

    #[test]
    fn absent_lists_suppress_every_optional_header() {
        let doc: KnowledgeDocument = serde_json::from_str(r#"{"platform":"bare"}"#).unwrap();
        let text = compose(&doc, &[], TaskCategory::CodeGeneration);
        assert_eq!(text, format!("{PREAMBLE}\n\n{CLOSING}"));
    }

    #[test]
    fn general_task_never_renders_task_guidance() {
        let mut doc = full_document();
        let unused = TaskGuide {
            title: "Unused".into(),
            ..Default::default()
        };
        doc.task_specific_guides.insert("general".into(), vec![unused]);
        let text = compose(&doc, &[], TaskCategory::General);
        assert!(!text.contains(TASK_GUIDANCE_HEADER));
        assert!(!text.contains("Unused"));
    }

    #[test]
    fn task_without_guides_has_no_header() {
        let doc = full_document();
        let text = compose(&doc, &[], TaskCategory::CreativeWriting);
        assert!(!text.contains(TASK_GUIDANCE_HEADER));
    }

    #[test]
    fn empty_guide_list_for_task_has_no_header() {
        let mut doc = full_document();
        doc.task_specific_guides.insert("data_analysis".into(), vec![]);
        let text = compose(&doc, &[], TaskCategory::DataAnalysis);
        assert!(!text.contains(TASK_GUIDANCE_HEADER));
    }

    #[test]
    fn compose_is_deterministic() {
        let doc = full_document();
        let selected: Vec<&Principle> = doc.principles.iter().collect();
        let a = compose(&doc, &selected, TaskCategory::CodeGeneration);
        let b = compose(&doc, &selected, TaskCategory::CodeGeneration);
        assert_eq!(a, b);
    }

    #[test]
    fn build_instruction_reports_task_and_titles() {
        let mut doc = full_document();
        doc.principles.push(Principle {
            title: "Specify language".into(),
            content: "Say which language.".into(),
            detection_patterns: vec!["write code".into()],
            priority: Some(90),
            ..Default::default()
        });
        let instruction = build_instruction("write code for a login form", &doc);
        assert_eq!(instruction.task, TaskCategory::CodeGeneration);
        assert_eq!(
            instruction.principles,
            ["Specify language", "Be clear", "Give context"]
        );
        assert!(instruction.text.starts_with(PREAMBLE));
        assert!(instruction.text.contains("1. Specify language\nSay which language."));
        assert!(instruction.text.contains(TASK_GUIDANCE_HEADER));
        assert!(instruction.into_text().ends_with(CLOSING));
    }
}
