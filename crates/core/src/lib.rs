pub mod bridge;
pub mod course;
pub mod course_source;
pub mod intent;
pub mod machine;
pub mod recognition;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod speech;

use session::{SessionId, TimerToken};
use speech::VoiceProfile;
use std::time::Duration;

/// Represents effects that the voice machine asks an external runtime to perform.
///
/// This enum is the boundary between the machine's decision-making and the
/// runtime's execution of side effects (speaking, sleeping, recognizing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Submit the text to the speech resolver. Fire-and-forget.
    Speak { text: String, profile: VoiceProfile },
    /// Deliver `Action::TimerFired(token)` after `delay`.
    Schedule { token: TimerToken, delay: Duration },
    /// Invalidate all pending timers of a session.
    CancelTimers(SessionId),
    /// Ask the recognition source for a phrase on behalf of `token`'s session.
    Recognize(TimerToken),
}
