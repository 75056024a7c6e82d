//! Edit-chain sequencing, validation, and display assembly.
//!
//! A chain is an ordered run of AI edit steps rooted at an optional source
//! image. Steps are keyed by `(chain_id, step)` with `step` starting at 1;
//! there is no stored previous-step pointer. Soft-deleted steps leave gaps
//! in the numbering -- surviving steps are never renumbered, and a deleted
//! step's number is never handed out again.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum allowed length for an edit prompt.
pub const MAX_PROMPT_LENGTH: usize = 2000;

/// Step number assigned to the first response in a chain.
pub const FIRST_STEP: i32 = 1;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an edit prompt: must be non-empty after trimming and within
/// [`MAX_PROMPT_LENGTH`].
pub fn validate_prompt(prompt: &str) -> Result<(), CoreError> {
    if prompt.trim().is_empty() {
        return Err(CoreError::Validation(
            "Prompt must not be empty".to_string(),
        ));
    }
    if prompt.len() > MAX_PROMPT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Prompt must not exceed {MAX_PROMPT_LENGTH} characters, got {}",
            prompt.len()
        )));
    }
    Ok(())
}

/// Compute the step number for a new response appended to a chain whose
/// highest existing step (deleted rows included) is `current_max`.
pub fn next_step(current_max: Option<i32>) -> i32 {
    current_max.unwrap_or(0) + 1
}

// ---------------------------------------------------------------------------
// Display sequence types
// ---------------------------------------------------------------------------

/// The root image a chain was started from, as shown at the head of the
/// carousel.
#[derive(Debug, Clone, Serialize)]
pub struct ChainSource {
    pub image_id: DbId,
    pub url: String,
    pub address: Option<String>,
}

/// One edit step in a chain, as shown in the carousel.
///
/// An empty `url` means generation for this step failed; clients render it
/// as a failed step, not a broken image.
#[derive(Debug, Clone, Serialize)]
pub struct ChainStep {
    pub response_id: DbId,
    pub step: i32,
    pub prompt: String,
    pub url: String,
}

/// A single item of the ordered display sequence.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainItem {
    Source(ChainSource),
    Step(ChainStep),
}

impl ChainItem {
    /// The response id if this item is a step, `None` for the source image.
    pub fn response_id(&self) -> Option<DbId> {
        match self {
            ChainItem::Source(_) => None,
            ChainItem::Step(step) => Some(step.response_id),
        }
    }
}

// ---------------------------------------------------------------------------
// Sequence logic
// ---------------------------------------------------------------------------

/// Check that step numbers are strictly increasing, with no value below
/// [`FIRST_STEP`]. Gaps are allowed (soft-deleted steps leave them).
///
/// `steps` must already be in storage order (step ascending); a duplicate or
/// out-of-order value indicates corrupted chain state.
pub fn check_step_sequence(steps: &[ChainStep]) -> Result<(), CoreError> {
    let mut previous: Option<i32> = None;
    for item in steps {
        if item.step < FIRST_STEP {
            return Err(CoreError::Internal(format!(
                "Chain step {} below minimum for response {}",
                item.step, item.response_id
            )));
        }
        if let Some(prev) = previous {
            if item.step <= prev {
                return Err(CoreError::Internal(format!(
                    "Chain steps not strictly increasing: {} after {}",
                    item.step, prev
                )));
            }
        }
        previous = Some(item.step);
    }
    Ok(())
}

/// Assemble the ordered display sequence for a chain: the source image
/// first (when the chain has one and it survives), then every surviving
/// step ascending.
///
/// Tolerates legacy chains with no source image and degenerate chains with
/// a source image but no steps. Callers pass only non-deleted steps; gaps
/// from deleted steps are kept as-is.
pub fn assemble_sequence(
    source: Option<ChainSource>,
    mut steps: Vec<ChainStep>,
) -> Result<Vec<ChainItem>, CoreError> {
    steps.sort_by_key(|s| s.step);
    check_step_sequence(&steps)?;

    let mut items = Vec::with_capacity(steps.len() + 1);
    if let Some(source) = source {
        items.push(ChainItem::Source(source));
    }
    items.extend(steps.into_iter().map(ChainItem::Step));
    Ok(items)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
