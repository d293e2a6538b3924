//! Two-capture match engine
//!
//! Holds the state of one round: nothing captured, first value stored, or
//! outcome computed. The engine is pure decision logic; it never retries
//! and never touches the decoder.

use crate::error::InvalidStateError;
use crate::models::{NormalizationMode, Outcome, RoundState};
use crate::normalize::normalize;
use log::debug;

/// Round state plus the mode every capture of the round is normalized with
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    mode: NormalizationMode,
    state: RoundState,
}

impl MatchEngine {
    /// Create an engine with an empty round
    pub fn new(mode: NormalizationMode) -> Self {
        Self {
            mode,
            state: RoundState::Empty,
        }
    }

    /// Active normalization mode
    pub fn mode(&self) -> NormalizationMode {
        self.mode
    }

    /// Current round state
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Swap the mode; only allowed before the first capture of a round
    pub fn set_mode(&mut self, mode: NormalizationMode) -> Result<(), InvalidStateError> {
        if !self.state.is_empty() {
            return Err(InvalidStateError::ModeChangeOutsideEmpty);
        }
        self.mode = mode;
        Ok(())
    }

    /// Feed one decoded payload into the round
    ///
    /// # Errors
    /// [`InvalidStateError::SubmitWhileResolved`] if the round already has an
    /// outcome; call [`MatchEngine::reset`] first.
    pub fn submit(&mut self, raw: &str) -> Result<Outcome, InvalidStateError> {
        let state = std::mem::take(&mut self.state);
        match state {
            RoundState::Empty => {
                let value = normalize(raw, self.mode);
                debug!("first capture under {}: {value}", self.mode);
                self.state = RoundState::AwaitingSecond {
                    first: value.clone(),
                };
                Ok(Outcome::FirstCaptured { value })
            }
            RoundState::AwaitingSecond { first } => {
                let second = normalize(raw, self.mode);
                let outcome = if first == second {
                    Outcome::Match { first, second }
                } else {
                    Outcome::NoMatch { first, second }
                };
                debug!("round resolved under {}: {outcome:?}", self.mode);
                self.state = RoundState::Resolved {
                    outcome: outcome.clone(),
                };
                Ok(outcome)
            }
            resolved @ RoundState::Resolved { .. } => {
                self.state = resolved;
                Err(InvalidStateError::SubmitWhileResolved)
            }
        }
    }

    /// Discard the round and start over; idempotent
    pub fn reset(&mut self) {
        self.state = RoundState::Empty;
    }
}
