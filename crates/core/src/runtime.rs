//! Voice Runtime
//!
//! Runs a [`VoiceMachine`] on a tokio task and carries out the effects it
//! asks for. User input arrives through a cloneable [`VoiceHandle`]; the
//! presentation layer observes the interaction through [`VoiceEvent`]s.
//!
//! Speech is fire-and-forget: each `Speak` effect is submitted on its own
//! task and its outcome is reported as an event, never fed back into the
//! machine. A failed utterance therefore cannot stall or reset a session.
//!
//! Events go out on an unbounded channel. Publishing never waits on the
//! consumer, so a consumer that is itself blocked sending actions cannot
//! stall the runtime.

use crate::{
    Effect,
    machine::{Action, Snapshot, VoiceMachine},
    recognition::RecognitionSource,
    scheduler::Scheduler,
    session::TimerToken,
    speech::{SpeechOutcome, SpeechResolver, VoiceProfile},
};
use std::sync::Arc;
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

const ACTION_BUFFER: usize = 32;

/// What the presentation layer receives from a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    /// The interaction state changed.
    State(Snapshot),
    /// Cloud-rendered audio to play.
    Audio { data: Vec<u8> },
    /// A user-visible notice, e.g. that speech could not be played.
    Notification(String),
}

#[derive(Debug, Error)]
#[error("the voice runtime has stopped")]
pub struct RuntimeClosed;

/// Sends user actions into a running [`VoiceRuntime`].
#[derive(Clone)]
pub struct VoiceHandle {
    actions: mpsc::Sender<Action>,
}

impl VoiceHandle {
    pub async fn activate(&self) -> Result<(), RuntimeClosed> {
        self.send(Action::Activate).await
    }

    pub async fn speak_back(&self) -> Result<(), RuntimeClosed> {
        self.send(Action::SpeakBack).await
    }

    pub async fn execute(&self) -> Result<(), RuntimeClosed> {
        self.send(Action::Execute).await
    }

    pub async fn dismiss(&self) -> Result<(), RuntimeClosed> {
        self.send(Action::Dismiss).await
    }

    pub async fn greet(&self) -> Result<(), RuntimeClosed> {
        self.send(Action::Greet).await
    }

    pub async fn select_course(&self, id: impl Into<String>) -> Result<(), RuntimeClosed> {
        self.send(Action::SelectCourse(id.into())).await
    }

    pub async fn clear_course(&self) -> Result<(), RuntimeClosed> {
        self.send(Action::ClearCourse).await
    }

    async fn send(&self, action: Action) -> Result<(), RuntimeClosed> {
        self.actions.send(action).await.map_err(|_| RuntimeClosed)
    }
}

pub struct VoiceRuntime {
    machine: VoiceMachine,
    speech: Arc<SpeechResolver>,
    recognizer: Arc<dyn RecognitionSource>,
    scheduler: Scheduler,
    actions_rx: mpsc::Receiver<Action>,
    actions_weak: mpsc::WeakSender<Action>,
    events: mpsc::UnboundedSender<VoiceEvent>,
}

impl VoiceRuntime {
    /// Spawns the runtime. It stops once every [`VoiceHandle`] is dropped.
    pub fn start(
        machine: VoiceMachine,
        speech: Arc<SpeechResolver>,
        recognizer: Arc<dyn RecognitionSource>,
    ) -> (VoiceHandle, mpsc::UnboundedReceiver<VoiceEvent>, JoinHandle<()>) {
        let (actions_tx, actions_rx) = mpsc::channel(ACTION_BUFFER);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let actions_weak = actions_tx.downgrade();

        let runtime = Self {
            machine,
            speech,
            recognizer,
            scheduler: Scheduler::new(actions_weak.clone()),
            actions_rx,
            actions_weak,
            events: events_tx,
        };
        let task = tokio::spawn(runtime.run());

        (VoiceHandle { actions: actions_tx }, events_rx, task)
    }

    async fn run(mut self) {
        info!("Voice runtime started");
        self.emit(VoiceEvent::State(self.machine.snapshot()));

        while let Some(action) = self.actions_rx.recv().await {
            let before = self.machine.snapshot();
            let effects = self.machine.handle(action);
            let after = self.machine.snapshot();
            if after != before {
                self.emit(VoiceEvent::State(after));
            }
            for effect in effects {
                self.apply(effect);
            }
        }

        self.scheduler.cancel_all();
        info!("Voice runtime stopped");
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Speak { text, profile } => self.submit_speech(text, profile),
            Effect::Schedule { token, delay } => self.scheduler.schedule(token, delay),
            Effect::CancelTimers(session) => {
                self.scheduler.cancel_session(session);
            }
            Effect::Recognize(token) => self.recognize(token),
        }
    }

    fn submit_speech(&self, text: String, profile: VoiceProfile) {
        let speech = self.speech.clone();
        let events = self.events.clone();
        let failure_notice = self.machine.responses().speech_failed.clone();
        tokio::spawn(async move {
            let event = match speech.speak(&text, Some(profile)).await {
                Ok(SpeechOutcome::Cloud(data)) => VoiceEvent::Audio { data },
                Ok(SpeechOutcome::Local) => return,
                Err(e) => {
                    warn!(error = %e, recoverable = e.is_recoverable(), "Speech failed");
                    VoiceEvent::Notification(failure_notice)
                }
            };
            if events.send(event).is_err() {
                debug!("Event receiver dropped, discarding speech result");
            }
        });
    }

    fn recognize(&self, token: TimerToken) {
        let recognizer = self.recognizer.clone();
        let actions = self.actions_weak.clone();
        tokio::spawn(async move {
            let action = match recognizer.recognize().await {
                Ok(phrase) => Action::PhraseRecognized { token, phrase },
                Err(e) => {
                    warn!(error = %e, "Recognition failed");
                    Action::RecognitionFailed { token }
                }
            };
            match actions.upgrade() {
                Some(tx) => {
                    if tx.send(action).await.is_err() {
                        debug!(?token, "Runtime gone, dropping recognition result");
                    }
                }
                None => debug!(?token, "Runtime gone, dropping recognition result"),
            }
        });
    }

    fn emit(&self, event: VoiceEvent) {
        if self.events.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }
}
