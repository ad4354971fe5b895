//! Voice Session State Machine
//!
//! `VoiceMachine` is the synchronous decision core of a voice interaction.
//! It consumes [`Action`]s (user input, timer expiry, recognition results),
//! updates the [`VoiceSession`] and the selected course, and answers with the
//! [`Effect`]s a runtime must carry out. It never sleeps, spawns or speaks on
//! its own, so every transition can be exercised directly in tests.

use crate::{
    Effect, bridge,
    course::Course,
    intent::{Intent, interpret},
    session::{Phase, Rejected, SessionId, TimerStep, TimerToken, VoiceSession},
    settings::{Responses, VoiceTimings},
    speech::VoiceProfile,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Everything that can happen to a voice interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The microphone control was pressed.
    Activate,
    /// A timer armed by an earlier `Effect::Schedule` expired.
    TimerFired(TimerToken),
    /// The recognition source returned a phrase.
    PhraseRecognized { token: TimerToken, phrase: String },
    /// The recognition source gave up.
    RecognitionFailed { token: TimerToken },
    /// "Hør kommando": read the recognized command back.
    SpeakBack,
    /// "Utfør kommando": act on the recognized command.
    Execute,
    /// "Avbryt": close the modal.
    Dismiss,
    /// "Hør velkomstmelding": play the greeting.
    Greet,
    /// A course card was tapped.
    SelectCourse(String),
    /// Back from the course detail view.
    ClearCourse,
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Snapshot {
    pub session: VoiceSession,
    pub selected_course: Option<Course>,
}

pub struct VoiceMachine {
    session: VoiceSession,
    selected_course: Option<Course>,
    /// Course resolved during execution, shown when the reveal timer fires.
    pending_course: Option<Course>,
    courses: Arc<[Course]>,
    timings: VoiceTimings,
    responses: Responses,
    profile: VoiceProfile,
    next_session: u64,
}

impl VoiceMachine {
    pub fn new(courses: impl Into<Arc<[Course]>>) -> Self {
        Self {
            session: VoiceSession::new(),
            selected_course: None,
            pending_course: None,
            courses: courses.into(),
            timings: VoiceTimings::default(),
            responses: Responses::default(),
            profile: VoiceProfile::mascot(),
            next_session: 1,
        }
    }

    pub fn with_timings(mut self, timings: VoiceTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_responses(mut self, responses: Responses) -> Self {
        self.responses = responses;
        self
    }

    pub fn with_profile(mut self, profile: VoiceProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn session(&self) -> &VoiceSession {
        &self.session
    }

    pub fn selected_course(&self) -> Option<&Course> {
        self.selected_course.as_ref()
    }

    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            session: self.session.clone(),
            selected_course: self.selected_course.clone(),
        }
    }

    /// Applies one action and returns the effects to run, in order.
    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Activate => self.activate(),
            Action::TimerFired(token) => self.timer_fired(token),
            Action::PhraseRecognized { token, phrase } => self.phrase_recognized(token, phrase),
            Action::RecognitionFailed { token } => self.recognition_failed(token),
            Action::SpeakBack => self.speak_back(),
            Action::Execute => self.execute(),
            Action::Dismiss => self.dismiss(),
            Action::Greet => vec![self.speak(self.responses.greeting.clone())],
            Action::SelectCourse(id) => {
                self.select_course(&id);
                vec![]
            }
            Action::ClearCourse => {
                self.selected_course = None;
                vec![]
            }
        }
    }

    fn activate(&mut self) -> Vec<Effect> {
        let id = SessionId(self.next_session);
        match self.session.activate(id) {
            Ok(()) => {
                self.next_session += 1;
                info!(session = %id, "Voice session activated");
                vec![self.schedule(id, TimerStep::Listen, self.timings.listen_delay)]
            }
            Err(reason) => {
                debug!(%reason, phase = ?self.session.phase, "Ignoring activation");
                vec![]
            }
        }
    }

    fn timer_fired(&mut self, token: TimerToken) -> Vec<Effect> {
        let result = match token.step {
            TimerStep::Listen => self.session.begin_listening(&token).map(|()| {
                debug!(session = %token.session, "Listening");
                vec![self.schedule(token.session, TimerStep::Recognize, self.timings.recognize_delay)]
            }),
            TimerStep::Recognize => {
                if self.session.accepts(&token) {
                    Ok(vec![Effect::Recognize(token)])
                } else {
                    Err(Rejected::StaleTimer)
                }
            }
            TimerStep::RevealCourse => self.session.hide_modal(&token).map(|()| {
                self.reveal_pending_course();
                vec![]
            }),
            TimerStep::Settle => {
                if self.session.accepts(&token) {
                    self.reveal_pending_course();
                }
                self.session.finish_execution(&token).map(|()| {
                    info!(session = %token.session, "Voice session finished");
                    vec![Effect::CancelTimers(token.session)]
                })
            }
        };
        result.unwrap_or_else(|reason| {
            debug!(?token, %reason, "Discarding timer");
            vec![]
        })
    }

    fn phrase_recognized(&mut self, token: TimerToken, phrase: String) -> Vec<Effect> {
        match self.session.recognize(&token, phrase) {
            Ok(()) => info!(
                session = %token.session,
                command = self.session.recognized_command.as_deref().unwrap_or_default(),
                "Command recognized"
            ),
            Err(reason) => debug!(?token, %reason, "Discarding recognition result"),
        }
        vec![]
    }

    fn recognition_failed(&mut self, token: TimerToken) -> Vec<Effect> {
        match self.session.abandon(&token) {
            Ok(()) => {
                warn!(session = %token.session, "Recognition failed, closing voice session");
                vec![
                    Effect::CancelTimers(token.session),
                    self.speak(self.responses.not_understood.clone()),
                ]
            }
            Err(reason) => {
                debug!(?token, %reason, "Discarding recognition failure");
                vec![]
            }
        }
    }

    fn speak_back(&mut self) -> Vec<Effect> {
        match (&self.session.phase, &self.session.recognized_command) {
            (Phase::Recognized, Some(command)) => {
                vec![self.speak(self.responses.speak_back(command))]
            }
            _ => {
                debug!(phase = ?self.session.phase, "Nothing to speak back");
                vec![]
            }
        }
    }

    fn execute(&mut self) -> Vec<Effect> {
        let command = match self.session.begin_execution() {
            Ok(command) => command,
            Err(reason) => {
                debug!(%reason, "Ignoring execute");
                return vec![];
            }
        };
        let Some(session) = self.session.id else {
            return vec![];
        };

        let intent = interpret(&command);
        info!(%session, %command, ?intent, "Executing voice command");

        let mut effects = self.dispatch(session, intent);
        effects.push(self.schedule(session, TimerStep::Settle, self.timings.settle_delay));
        effects
    }

    fn dispatch(&mut self, session: SessionId, intent: Intent) -> Vec<Effect> {
        match intent {
            Intent::OpenCourse { hint } => {
                match bridge::resolve(&self.courses, &hint).cloned() {
                    Some(course) => {
                        info!(course_id = %course.id, title = %course.title, "Opening course");
                        self.pending_course = Some(course);
                        vec![
                            self.speak(self.responses.opening_course.clone()),
                            self.schedule(session, TimerStep::RevealCourse, self.timings.reveal_delay),
                        ]
                    }
                    None => {
                        info!(%hint, "No course matches, treating as not understood");
                        vec![self.speak(self.responses.not_understood.clone())]
                    }
                }
            }
            Intent::DemoBlinkLed => vec![self.speak(self.responses.blink_led.clone())],
            Intent::ExplainLed => vec![self.speak(self.responses.explain_led.clone())],
            Intent::Unrecognized => vec![self.speak(self.responses.not_understood.clone())],
        }
    }

    fn dismiss(&mut self) -> Vec<Effect> {
        match self.session.dismiss() {
            Ok(id) => {
                self.pending_course = None;
                info!(session = %id, "Voice session dismissed");
                vec![Effect::CancelTimers(id)]
            }
            Err(reason) => {
                debug!(%reason, "Ignoring dismiss");
                vec![]
            }
        }
    }

    fn select_course(&mut self, id: &str) {
        match self.courses.iter().find(|c| c.id == id) {
            Some(course) => self.selected_course = Some(course.clone()),
            None => warn!(course_id = %id, "Unknown course selected"),
        }
    }

    fn reveal_pending_course(&mut self) {
        if let Some(course) = self.pending_course.take() {
            self.selected_course = Some(course);
        }
    }

    fn speak(&self, text: String) -> Effect {
        Effect::Speak {
            text,
            profile: self.profile.clone(),
        }
    }

    fn schedule(&self, session: SessionId, step: TimerStep, delay: Duration) -> Effect {
        Effect::Schedule {
            token: TimerToken { session, step },
            delay,
        }
    }
}
