use thiserror::Error;

/// Errors raised by a [`crate::voice::VoiceCallAdapter`].
///
/// A listen timeout is not an error; the adapter resolves it as a
/// [`crate::voice::ListenOutcome`] with no transcript. Adapter errors are
/// absorbed at the turn boundary by the controller, which speaks an apology
/// and keeps the session alive.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("call transport error: {0}")]
    Transport(String),

    #[error("call is already disconnected")]
    Disconnected,
}

/// Errors from the question sequencer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequencerError {
    #[error("interview requires at least one question")]
    EmptyQuestionSet,

    #[error("question index {index} out of range (have {len} questions)")]
    OutOfRange { index: usize, len: usize },

    #[error("already at the last question")]
    AlreadyComplete,
}

/// Errors from the submission service. `InvalidInput` is detected before any
/// network traffic; `Failed` covers both transport and server-side rejection.
/// Neither is retried automatically; the caller surfaces them and offers a
/// manual retry.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("invalid submission payload: {0}")]
    InvalidInput(String),

    #[error("submission failed: {0}")]
    Failed(String),
}

/// Top-level error for running a full interview session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Sequencer(#[from] SequencerError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}
