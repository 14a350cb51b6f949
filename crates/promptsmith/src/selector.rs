//! Context-aware principle selection.
//!
//! Principles whose detection patterns appear in the request come first, in
//! document order. When fewer than [`MIN_MATCHED_BEFORE_FILL`] match, the
//! remaining slots are filled from the priority ranking. The result never
//! exceeds [`MAX_SELECTED_PRINCIPLES`] entries and never repeats a title.

use crate::knowledge::Principle;
use std::collections::HashSet;

/// Upper bound on principles rendered into a meta-prompt.
pub const MAX_SELECTED_PRINCIPLES: usize = 5;

/// Below this many matches, priority fill tops the selection up.
pub const MIN_MATCHED_BEFORE_FILL: usize = 3;

/// Principles sorted by [`Principle::rank`], ties kept in document order.
pub fn rank_principles(principles: &[Principle]) -> Vec<&Principle> {
    let mut ranked: Vec<&Principle> = principles.iter().collect();
    // `sort_by_key` is stable.
    ranked.sort_by_key(|p| p.rank());
    ranked
}

/// Pick up to five principles for `request`, matched ones first.
pub fn select_principles<'a>(request: &str, principles: &'a [Principle]) -> Vec<&'a Principle> {
    let lowered = request.to_lowercase();
    let mut seen: HashSet<&str> = HashSet::new();

    let mut selected: Vec<&Principle> = principles
        .iter()
        .filter(|p| p.matches(&lowered))
        .filter(|p| seen.insert(p.title.as_str()))
        .collect();

    if selected.len() < MIN_MATCHED_BEFORE_FILL {
        for principle in rank_principles(principles) {
            if selected.len() >= MAX_SELECTED_PRINCIPLES {
                break;
            }
            if seen.insert(principle.title.as_str()) {
                selected.push(principle);
            }
        }
    }

    selected.truncate(MAX_SELECTED_PRINCIPLES);
    selected
}
