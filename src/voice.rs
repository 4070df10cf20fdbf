use std::time::Duration;

use log::info;

use crate::error::AdapterError;

/// What a `listen` call heard. A timeout resolves successfully with
/// `transcript: None`; it is never surfaced as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenOutcome {
    pub transcript: Option<String>,
}

impl ListenOutcome {
    pub fn heard(text: impl Into<String>) -> Self {
        Self {
            transcript: Some(text.into()),
        }
    }

    pub fn silence() -> Self {
        Self { transcript: None }
    }

    /// The trimmed transcript, or `None` when nothing usable was heard.
    pub fn text(&self) -> Option<&str> {
        self.transcript
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Duplex voice-call capability: speech synthesis out, speech recognition in.
///
/// The real implementation lives on the other side of a call SDK. The
/// controller owns exactly one adapter per session and receives it as an
/// explicit dependency, so tests can substitute a scripted fake. Dropping the
/// adapter is how a caller releases the underlying call when the session is
/// torn down mid-turn.
pub trait VoiceCallAdapter {
    /// Speak `text` to the candidate; resolves once playback is handed off.
    fn speak(
        &mut self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), AdapterError>> + Send;

    /// Listen for up to `timeout`; resolves with silence on timeout.
    fn listen(
        &mut self,
        timeout: Duration,
    ) -> impl std::future::Future<Output = Result<ListenOutcome, AdapterError>> + Send;

    /// Pause the conversation for `duration`.
    fn sleep(
        &mut self,
        duration: Duration,
    ) -> impl std::future::Future<Output = Result<(), AdapterError>> + Send;
}

/// Adapter that logs speech and hears nothing. Handy for smoke-running the
/// interview flow without a live call.
#[derive(Debug, Default)]
pub struct NullAdapter;

impl VoiceCallAdapter for NullAdapter {
    async fn speak(&mut self, text: &str) -> Result<(), AdapterError> {
        info!("🗣️ (null call) {text}");
        Ok(())
    }

    async fn listen(&mut self, _timeout: Duration) -> Result<ListenOutcome, AdapterError> {
        Ok(ListenOutcome::silence())
    }

    async fn sleep(&mut self, duration: Duration) -> Result<(), AdapterError> {
        tokio::time::sleep(duration).await;
        Ok(())
    }
}
