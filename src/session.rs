use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capture::{CaptureBuffer, SharedCaptureBuffer};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::interview::{InterviewScript, PhaseHandle, Question, QuestionSequencer, TurnController};
use crate::submission::{SubmissionClient, SubmissionReceipt, SubmissionState};
use crate::timer::{SessionTimer, TimerState};
use crate::transcript::{TranscriptEntry, TranscriptLog, SharedTranscript};
use crate::voice::VoiceCallAdapter;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Created,
    Active,
    Completed,
    Failed,
}

/// One mock-interview session: owns the transcript, the capture buffer and
/// the clock, runs the call via a [`TurnController`], and submits the result.
///
/// The transcript and capture buffer belong exclusively to this session; a
/// new session starts from fresh buffers. The capture buffer is only cleared
/// once the backend acknowledges the submission, so a failed upload can be
/// retried with the same payload.
pub struct InterviewSession {
    pub session_id: String,
    config: SessionConfig,
    status: SessionStatus,
    transcript: SharedTranscript,
    captures: SharedCaptureBuffer,
    phase: PhaseHandle,
    timer: SessionTimer,
    submission: SubmissionState,
}

impl InterviewSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            config,
            status: SessionStatus::Created,
            transcript: TranscriptLog::shared(),
            captures: CaptureBuffer::shared(),
            phase: PhaseHandle::new(),
            timer: SessionTimer::new(),
            submission: SubmissionState::Idle,
        }
    }

    /// Shared transcript handle, for the live-transcript view.
    pub fn transcript(&self) -> SharedTranscript {
        self.transcript.clone()
    }

    /// Shared capture buffer handle, for the periodic screenshot task.
    pub fn captures(&self) -> SharedCaptureBuffer {
        self.captures.clone()
    }

    /// Most recently spoken transcript entry, if any.
    pub fn last_entry(&self) -> Option<TranscriptEntry> {
        self.transcript.lock().last_entry().cloned()
    }

    /// Whether the interviewer is currently producing speech.
    pub fn is_speaking(&self) -> bool {
        self.phase.is_speaking()
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run the interview end to end: drive the call through the turn
    /// controller, then submit transcript and screenshots to the backend.
    ///
    /// Returns the backend's receipt, or `None` when no backend URL is
    /// configured (the interview still runs and the transcript is kept).
    /// Submission failures are recorded in [`InterviewSession::submission`]
    /// and returned; the caller decides whether to retry via
    /// [`InterviewSession::resubmit`].
    pub async fn run<A: VoiceCallAdapter>(
        &mut self,
        adapter: A,
        questions: Vec<Question>,
        script: InterviewScript,
    ) -> Result<Option<SubmissionReceipt>, SessionError> {
        let sequencer = QuestionSequencer::new(questions)?;

        info!("🎬 Session {} activated", self.session_id);
        self.status = SessionStatus::Active;
        self.timer.start();

        let mut controller = TurnController::new(
            adapter,
            sequencer,
            script,
            self.transcript.clone(),
            &self.config,
        )
        .with_phase_handle(self.phase.clone());
        controller.run().await;

        let final_time = self.timer.stop();
        info!(
            "Session {} call finished after {} minute(s)",
            self.session_id, final_time.elapsed_minutes
        );

        if self.config.backend_url.is_none() {
            info!("No backend configured; skipping submission");
            self.status = SessionStatus::Completed;
            return Ok(None);
        }

        self.resubmit().await.map(Some)
    }

    /// Submit (or manually retry) the session's transcript and screenshots.
    pub async fn resubmit(&mut self) -> Result<SubmissionReceipt, SessionError> {
        let Some(base_url) = self.config.backend_url.clone() else {
            let reason = "no backend URL configured".to_string();
            self.submission = SubmissionState::Failed(reason.clone());
            return Err(SessionError::Submit(crate::error::SubmitError::Failed(
                reason,
            )));
        };

        self.submission = SubmissionState::Pending;
        let client = SubmissionClient::new(base_url);
        let frames = self.captures.lock().drain();

        // Snapshot outside the lock; the capture task may still be running.
        let transcript = self.transcript.lock().clone();
        let result = client.submit(&self.session_id, &transcript, &frames).await;

        match result {
            Ok(receipt) => {
                self.submission = SubmissionState::Succeeded;
                self.status = SessionStatus::Completed;
                // The upload is acknowledged; the frames can finally go.
                self.captures.lock().clear();
                Ok(receipt)
            }
            Err(e) => {
                warn!("Session {} submission failed: {e}", self.session_id);
                self.submission = SubmissionState::Failed(e.to_string());
                self.status = SessionStatus::Failed;
                Err(e.into())
            }
        }
    }
}
