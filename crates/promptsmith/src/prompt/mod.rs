//! Meta-prompt assembly: the block builder and the guide-driven composer.
//!
//! 1. **[`InstructionBuilder`]**: joins a preamble and headed blocks into
//!    one string, dropping blocks with empty bodies.
//!
//! 2. **[`compose`]**: renders a [`KnowledgeDocument`](crate::knowledge::KnowledgeDocument)
//!    plus selected principles and a task category into instruction text.
//!    [`build_instruction`] runs selection and classification first.

pub mod builder;
pub mod composer;

pub use builder::{InstructionBuilder, numbered};
pub use composer::{Instruction, build_instruction, compose};
