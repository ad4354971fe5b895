//! Voice Session State
//!
//! The `VoiceSession` value and its transition methods. All phase changes go
//! through the methods below, which enforce the ordering
//! `Idle -> Activated -> Listening -> Recognized -> Executing -> Idle` and
//! keep `recognized_command` present exactly in `Recognized` and `Executing`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identity of one activation. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Activated,
    Listening,
    Recognized,
    Executing,
}

/// A timer-driven step of the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStep {
    /// Activated -> Listening.
    Listen,
    /// Listening -> Recognized (via the recognition source).
    Recognize,
    /// Surfaces the resolved course while executing.
    RevealCourse,
    /// Executing -> Idle.
    Settle,
}

impl TimerStep {
    /// The phase a session must be in for this step to still apply.
    pub fn expected_phase(self) -> Phase {
        match self {
            TimerStep::Listen => Phase::Activated,
            TimerStep::Recognize => Phase::Listening,
            TimerStep::RevealCourse | TimerStep::Settle => Phase::Executing,
        }
    }
}

/// Ties a pending timer to the session that armed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken {
    pub session: SessionId,
    pub step: TimerStep,
}

/// Why a transition was not applied. None of these are failures; the
/// session is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("a voice session is already active")]
    NotIdle,
    #[error("no voice session is active")]
    AlreadyIdle,
    #[error("expected phase {expected:?}, session is {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },
    #[error("timer fired for a stale session")]
    StaleTimer,
    #[error("execution cannot be cancelled")]
    ExecutionInProgress,
}

/// The serializable state of the voice interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VoiceSession {
    pub id: Option<SessionId>,
    pub phase: Phase,
    pub recognized_command: Option<String>,
    pub modal_visible: bool,
}

impl VoiceSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Checks whether `token` belongs to this session and its step is due.
    pub fn accepts(&self, token: &TimerToken) -> bool {
        self.id == Some(token.session) && self.phase == token.step.expected_phase()
    }

    /// Idle -> Activated. Shows the modal. Any other phase is ignored.
    pub fn activate(&mut self, id: SessionId) -> Result<(), Rejected> {
        if !self.is_idle() {
            return Err(Rejected::NotIdle);
        }
        *self = Self {
            id: Some(id),
            phase: Phase::Activated,
            recognized_command: None,
            modal_visible: true,
        };
        Ok(())
    }

    /// Activated -> Listening.
    pub fn begin_listening(&mut self, token: &TimerToken) -> Result<(), Rejected> {
        self.check_token(token, TimerStep::Listen)?;
        self.phase = Phase::Listening;
        Ok(())
    }

    /// Listening -> Recognized, storing the phrase.
    pub fn recognize(&mut self, token: &TimerToken, phrase: String) -> Result<(), Rejected> {
        self.check_token(token, TimerStep::Recognize)?;
        self.phase = Phase::Recognized;
        self.recognized_command = Some(phrase);
        Ok(())
    }

    /// Recognized -> Executing. Returns the command to interpret.
    pub fn begin_execution(&mut self) -> Result<String, Rejected> {
        self.expect_phase(Phase::Recognized)?;
        self.phase = Phase::Executing;
        Ok(self.recognized_command.clone().unwrap_or_default())
    }

    /// Hides the modal while execution is still settling.
    pub fn hide_modal(&mut self, token: &TimerToken) -> Result<(), Rejected> {
        self.check_token(token, TimerStep::RevealCourse)?;
        self.modal_visible = false;
        Ok(())
    }

    /// Executing -> Idle after the settle delay.
    pub fn finish_execution(&mut self, token: &TimerToken) -> Result<(), Rejected> {
        self.check_token(token, TimerStep::Settle)?;
        self.reset();
        Ok(())
    }

    /// User cancellation. Allowed from Activated, Listening and Recognized.
    /// Returns the id of the session that was dismissed.
    pub fn dismiss(&mut self) -> Result<SessionId, Rejected> {
        match self.phase {
            Phase::Idle => Err(Rejected::AlreadyIdle),
            Phase::Executing => Err(Rejected::ExecutionInProgress),
            Phase::Activated | Phase::Listening | Phase::Recognized => {
                let id = self.id.ok_or(Rejected::AlreadyIdle)?;
                self.reset();
                Ok(id)
            }
        }
    }

    /// Abandons a listening session whose recognition failed.
    pub fn abandon(&mut self, token: &TimerToken) -> Result<(), Rejected> {
        self.check_token(token, TimerStep::Recognize)?;
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), Rejected> {
        if self.phase != expected {
            return Err(Rejected::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn check_token(&self, token: &TimerToken, step: TimerStep) -> Result<(), Rejected> {
        if token.step != step || !self.accepts(token) {
            return Err(Rejected::StaleTimer);
        }
        Ok(())
    }
}
