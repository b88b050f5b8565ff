//! The choreographer's runtime vocabulary.
//!
//! Every runtime signal from the outside world (a scene-mode change, a
//! request to build or dissolve a group) is represented as a
//! `ChoreoCommand`. Consumers construct commands and pass them to
//! [`Choreographer::execute`]. Commands take effect on the next tick.

use super::Choreographer;
use crate::animation::staged::GroupState;
use crate::error::ChoreoError;

/// A runtime signal for the choreographer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoreoCommand {
    // ── Camera ──────────────────────────────────────────────────────
    /// Start (or restart) a camera transition.
    StartTransition {
        /// Transition key from the options.
        key: String,
    },

    /// Jump the active transition to its end.
    SkipTransition,

    // ── Groups ──────────────────────────────────────────────────────
    /// Request a discrete state for an animated group.
    SetGroupState {
        /// Group key from the options.
        key: String,
        /// Requested state.
        state: GroupState,
    },

    /// Change a group's element count.
    SetElementCount {
        /// Group key from the options.
        key: String,
        /// New number of elements, at least one.
        count: usize,
    },
}

impl Choreographer {
    /// Apply a command.
    ///
    /// Unknown keys and invalid element counts are errors. Group state
    /// requests outside the transition table are rejected as no-ops.
    ///
    /// # Errors
    ///
    /// Returns the error of the command's underlying method.
    pub fn execute(&mut self, command: ChoreoCommand) -> Result<(), ChoreoError> {
        match command {
            ChoreoCommand::StartTransition { key } => self.start_transition(&key),
            ChoreoCommand::SkipTransition => {
                self.skip_transition();
                Ok(())
            }
            ChoreoCommand::SetGroupState { key, state } => {
                let _ = self.set_group_state(&key, state)?;
                Ok(())
            }
            ChoreoCommand::SetElementCount { key, count } => {
                self.set_element_count(&key, count)
            }
        }
    }
}
