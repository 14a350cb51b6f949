//! Block-structured instruction builder.
//!
//! [`InstructionBuilder`] assembles a meta-prompt from a preamble and a
//! sequence of headed or raw blocks. Blocks are joined with a blank line;
//! a block whose body is empty is dropped together with its header.

/// Builder for multi-block instruction text.
///
/// # Example
///
/// ```
/// use promptsmith::prompt::InstructionBuilder;
///
/// let text = InstructionBuilder::new("You are an editor.")
///     .section("Rules:", "1. Be brief")
///     .section("Empty:", "")
///     .raw("Go.")
///     .build();
///
/// assert_eq!(text, "You are an editor.\n\nRules:\n1. Be brief\n\nGo.");
/// ```
#[derive(Debug, Clone)]
pub struct InstructionBuilder {
    blocks: Vec<String>,
}

impl InstructionBuilder {
    /// Start a builder with the given preamble as its first block.
    pub fn new(preamble: impl Into<String>) -> Self {
        Self {
            blocks: vec![preamble.into()],
        }
    }

    /// Append a header line followed by `body`. Skipped if `body` is empty.
    pub fn section(mut self, header: &str, body: impl Into<String>) -> Self {
        let body = body.into();
        if !body.is_empty() {
            self.blocks.push(format!("{header}\n{body}"));
        }
        self
    }

    /// Conditionally append a section.
    ///
    /// The `body_fn` is only called when `condition` is true.
    pub fn section_if(
        self,
        condition: bool,
        header: &str,
        body_fn: impl FnOnce() -> String,
    ) -> Self {
        if condition {
            self.section(header, body_fn())
        } else {
            self
        }
    }

    /// Append text without a header. Skipped if `content` is empty.
    pub fn raw(mut self, content: impl Into<String>) -> Self {
        let content = content.into();
        if !content.is_empty() {
            self.blocks.push(content);
        }
        self
    }

    /// Join all blocks with a blank line between them.
    pub fn build(self) -> String {
        self.blocks.join("\n\n")
    }
}

/// Render items as a `1. ...` list with a blank line between entries.
pub fn numbered<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
