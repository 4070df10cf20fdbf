use log::{error, info};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;

use crate::capture::{Frame, MAX_FRAMES};
use crate::error::SubmitError;
use crate::transcript::TranscriptLog;

/// Backend acknowledgment for an accepted submission. The body shape is
/// owned by the backend; it is carried through untouched.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub status: u16,
    pub body: Value,
}

/// Submission progress flags for the view layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(String),
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionState::Pending)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, SubmissionState::Succeeded)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SubmissionState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Sends the finished interview (transcript plus screenshots) to the
/// recruiting backend as one multipart request.
///
/// There is no automatic retry: a failed submission is reported to the
/// caller, and the capture buffer stays intact so a manual retry can resend
/// the same payload.
#[derive(Debug, Clone)]
pub struct SubmissionClient {
    http: reqwest::Client,
    base_url: String,
}

impl SubmissionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Submit the interview. The transcript must be non-empty; at most
    /// [`MAX_FRAMES`] images are attached, extras are filtered out rather
    /// than rejected.
    pub async fn submit(
        &self,
        session_id: &str,
        transcript: &TranscriptLog,
        frames: &[Frame],
    ) -> Result<SubmissionReceipt, SubmitError> {
        if transcript.is_empty() {
            return Err(SubmitError::InvalidInput(
                "transcript is empty; nothing to submit".to_string(),
            ));
        }

        let mut form = Form::new().text("transcript", transcript.serialize());
        for (i, frame) in frames.iter().take(MAX_FRAMES).enumerate() {
            let part = Part::bytes(frame.bytes.clone())
                .file_name(format!("capture-{}.{}", i + 1, frame.extension()))
                .mime_str(&frame.mime)
                .map_err(|e| SubmitError::InvalidInput(format!("bad frame mime type: {e}")))?;
            form = form.part("images", part);
        }

        let url = format!(
            "{}/interviews/{}/submission",
            self.base_url.trim_end_matches('/'),
            session_id
        );
        info!(
            "📤 Submitting interview {session_id}: {} transcript entries, {} image(s)",
            transcript.len(),
            frames.len().min(MAX_FRAMES)
        );

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmitError::Failed(format!("request failed: {e}")))?;

        let status = response.status();
        let body = match response.json::<Value>().await {
            Ok(value) => value,
            Err(_) => Value::Null,
        };

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("no error message provided");
            error!("❌ Submission rejected ({status}): {message}");
            return Err(SubmitError::Failed(format!(
                "backend rejected submission ({status}): {message}"
            )));
        }

        info!("✅ Interview {session_id} submitted successfully");
        Ok(SubmissionReceipt {
            status: status.as_u16(),
            body,
        })
    }
}
