//! Interview session orchestration.
//!
//! `intervox` drives an AI mock interview over a duplex voice call: a turn
//! controller walks an ordered question list, speaking each question and
//! listening for the candidate's answer, while a transcript aggregator and a
//! bounded screenshot buffer collect the material that is submitted to the
//! recruiting backend when the call ends.
//!
//! The voice call itself lives behind the [`voice::VoiceCallAdapter`] trait;
//! the controller owns exactly one adapter per session and never touches a
//! global call object, so the whole flow can be exercised with a scripted
//! fake.

pub mod capture;
pub mod config;
pub mod error;
pub mod interview;
pub mod session;
pub mod submission;
pub mod timer;
pub mod transcript;
pub mod voice;

pub use capture::{spawn_capture_task, CaptureBuffer, Frame, FrameSource, MAX_FRAMES};
pub use config::SessionConfig;
pub use error::{AdapterError, SequencerError, SessionError, SubmitError};
pub use interview::{
    InterviewScript, PhaseHandle, Question, QuestionKind, QuestionSequencer, TurnController,
    TurnPhase,
};
pub use session::{InterviewSession, SessionStatus};
pub use submission::{SubmissionClient, SubmissionReceipt, SubmissionState};
pub use timer::{SessionTimer, TimerState};
pub use transcript::{Speaker, TranscriptEntry, TranscriptLog};
pub use voice::{ListenOutcome, NullAdapter, VoiceCallAdapter};
