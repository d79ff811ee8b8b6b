//! Paste bookkeeping
//!
//! ```text
//! Idle ──► LayerInserted ──► ImagesResolving ──► Complete
//!   │            │
//!   │            └──► Failed(EngineParse)
//!   └──► Failed(MissingOctopusPart | InvalidTarget)
//! ```
//!
//! `LayerInserted` is entered when the layer is handed to the engine.
//! Image failures never leave the happy path; they end up as warnings on
//! the outcome.

use std::fmt;
use tracing::debug;

use crate::ImageLoadWarning;

/// Why a paste stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteFailure {
    /// No parsed design part in the payload
    MissingOctopusPart,
    /// Parent missing or layer id already taken
    InvalidTarget,
    /// The engine refused the layer description
    EngineParse,
}

impl fmt::Display for PasteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PasteFailure::MissingOctopusPart => "missing-octopus-part",
            PasteFailure::InvalidTarget => "invalid-target",
            PasteFailure::EngineParse => "engine-parse",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteState {
    Idle,
    LayerInserted,
    ImagesResolving,
    Complete,
    Failed(PasteFailure),
}

impl PasteState {
    fn can_advance_to(self, next: PasteState) -> bool {
        use PasteFailure::*;
        use PasteState::*;
        matches!(
            (self, next),
            (Idle, LayerInserted)
                | (Idle, Failed(MissingOctopusPart))
                | (Idle, Failed(InvalidTarget))
                | (LayerInserted, Failed(EngineParse))
                | (LayerInserted, ImagesResolving)
                | (ImagesResolving, Complete)
        )
    }
}

impl fmt::Display for PasteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasteState::Idle => f.write_str("idle"),
            PasteState::LayerInserted => f.write_str("layer-inserted"),
            PasteState::ImagesResolving => f.write_str("images-resolving"),
            PasteState::Complete => f.write_str("complete"),
            PasteState::Failed(reason) => write!(f, "failed({reason})"),
        }
    }
}

/// Tracks one paste through its states
#[derive(Debug, Clone)]
pub(crate) struct PasteProgress {
    history: Vec<PasteState>,
}

impl PasteProgress {
    pub(crate) fn start() -> Self {
        Self {
            history: vec![PasteState::Idle],
        }
    }

    pub(crate) fn state(&self) -> PasteState {
        self.history.last().copied().unwrap_or(PasteState::Idle)
    }

    pub(crate) fn advance(&mut self, next: PasteState) {
        let current = self.state();
        debug_assert!(current.can_advance_to(next), "paste cannot go from {current} to {next}");
        debug!(from = %current, to = %next, "Paste state");
        self.history.push(next);
    }

    pub(crate) fn fail(&mut self, reason: PasteFailure) {
        self.advance(PasteState::Failed(reason));
    }

    pub(crate) fn history(&self) -> &[PasteState] {
        &self.history
    }

    pub(crate) fn finish(self, layer_id: String, warnings: Vec<ImageLoadWarning>) -> PasteOutcome {
        PasteOutcome {
            layer_id,
            history: self.history,
            warnings,
        }
    }
}

/// Result of a completed paste
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteOutcome {
    /// Id of the inserted layer
    pub layer_id: String,
    /// Every state the paste passed through, starting with `Idle`
    pub history: Vec<PasteState>,
    pub warnings: Vec<ImageLoadWarning>,
}

impl PasteOutcome {
    pub fn state(&self) -> PasteState {
        self.history.last().copied().unwrap_or(PasteState::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut progress = PasteProgress::start();
        progress.advance(PasteState::LayerInserted);
        progress.advance(PasteState::ImagesResolving);
        progress.advance(PasteState::Complete);

        let outcome = progress.finish("L1".into(), Vec::new());
        assert_eq!(outcome.state(), PasteState::Complete);
        assert_eq!(outcome.history.len(), 4);
    }

    #[test]
    fn test_failure_edges_carry_their_reason() {
        assert!(PasteState::Idle.can_advance_to(PasteState::Failed(PasteFailure::MissingOctopusPart)));
        assert!(PasteState::Idle.can_advance_to(PasteState::Failed(PasteFailure::InvalidTarget)));
        assert!(PasteState::LayerInserted.can_advance_to(PasteState::Failed(PasteFailure::EngineParse)));

        assert!(!PasteState::Idle.can_advance_to(PasteState::Failed(PasteFailure::EngineParse)));
        assert!(!PasteState::LayerInserted.can_advance_to(PasteState::Failed(PasteFailure::MissingOctopusPart)));
        assert!(!PasteState::ImagesResolving.can_advance_to(PasteState::Failed(PasteFailure::EngineParse)));
        assert!(!PasteState::Complete.can_advance_to(PasteState::LayerInserted));
    }

    #[test]
    fn test_failed_state_display() {
        let mut progress = PasteProgress::start();
        progress.advance(PasteState::LayerInserted);
        progress.fail(PasteFailure::EngineParse);

        assert_eq!(progress.state().to_string(), "failed(engine-parse)");
        assert_eq!(progress.history().len(), 3);
    }
}
