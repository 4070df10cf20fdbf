use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use log::{debug, warn};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Hard cap on frames kept per session. Bounds the upload payload and keeps
/// memory flat during long interviews; captures past the cap are dropped.
pub const MAX_FRAMES: usize = 3;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("not a data URL")]
    NotADataUrl,

    #[error("unsupported data URL encoding (expected base64)")]
    UnsupportedEncoding,

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// One captured screenshot, as raw encoded image bytes plus its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl Frame {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }

    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/png")
    }

    /// Parse a `data:image/png;base64,...` URL, the shape screenshots arrive
    /// in from browser-side capture.
    pub fn from_data_url(url: &str) -> Result<Self, FrameError> {
        let rest = url.strip_prefix("data:").ok_or(FrameError::NotADataUrl)?;
        let (header, payload) = rest.split_once(',').ok_or(FrameError::NotADataUrl)?;
        let header = header
            .strip_suffix(";base64")
            .ok_or(FrameError::UnsupportedEncoding)?;
        let mime = if header.is_empty() { "image/png" } else { header };
        let bytes = base64::prelude::BASE64_STANDARD.decode(payload)?;
        Ok(Self::new(bytes, mime))
    }

    pub fn to_data_url(&self) -> String {
        let encoded = base64::prelude::BASE64_STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.mime, encoded)
    }

    /// File extension for multipart upload naming.
    pub fn extension(&self) -> &str {
        match self.mime.as_str() {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            _ => "bin",
        }
    }
}

/// Capacity-bounded store of screenshot frames taken during the call.
///
/// The first [`MAX_FRAMES`] captures survive; later ones are silently
/// dropped, not rotated. Contents stay put until the submission is
/// acknowledged or a new session clears the buffer.
#[derive(Debug, Default)]
pub struct CaptureBuffer {
    frames: Vec<Frame>,
}

/// Capture buffer handle shared with the periodic capture task.
pub type SharedCaptureBuffer = Arc<Mutex<CaptureBuffer>>;

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedCaptureBuffer {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Store `frame` if there is room. Returns `false` when the frame was
    /// dropped because the buffer is full.
    pub fn capture(&mut self, frame: Frame) -> bool {
        if self.frames.len() >= MAX_FRAMES {
            debug!("Capture buffer full ({MAX_FRAMES} frames); dropping screenshot");
            return false;
        }
        self.frames.push(frame);
        true
    }

    /// Current contents for submission. Does not clear; the buffer is only
    /// emptied once the submission is acknowledged successful.
    pub fn drain(&self) -> Vec<Frame> {
        self.frames.clone()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() >= MAX_FRAMES
    }
}

/// Something that can grab a screenshot frame on demand.
pub trait FrameSource {
    fn grab(&mut self) -> Result<Frame, FrameError>;
}

/// Spawn the periodic screenshot task: every `every`, grab a frame from
/// `source` and push it into the shared buffer until `shutdown` flips to
/// `true` or its sender is dropped.
///
/// This is the only writer that runs concurrently with the turn controller;
/// it touches the capture buffer exclusively, never the transcript.
pub fn spawn_capture_task<S>(
    buffer: SharedCaptureBuffer,
    mut source: S,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    S: FrameSource + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match source.grab() {
                        Ok(frame) => {
                            buffer.lock().capture(frame);
                        }
                        Err(e) => warn!("Screenshot capture failed: {e}"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("Capture task shutting down");
                        break;
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tag: u8) -> Frame {
        Frame::png(vec![tag; 4])
    }

    #[test]
    fn keeps_only_the_first_three_frames() {
        let mut buffer = CaptureBuffer::new();
        for tag in 0..5 {
            buffer.capture(frame(tag));
        }

        let drained = buffer.drain();
        assert_eq!(drained.len(), MAX_FRAMES);
        assert_eq!(drained, vec![frame(0), frame(1), frame(2)]);
        // Drain must not clear until the upload is acknowledged.
        assert_eq!(buffer.len(), MAX_FRAMES);
    }

    #[test]
    fn capture_reports_drops() {
        let mut buffer = CaptureBuffer::new();
        assert!(buffer.capture(frame(0)));
        assert!(buffer.capture(frame(1)));
        assert!(buffer.capture(frame(2)));
        assert!(buffer.is_full());
        assert!(!buffer.capture(frame(3)));
    }

    #[test]
    fn data_url_round_trip() {
        let original = Frame::png(vec![137, 80, 78, 71]);
        let url = original.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));

        let parsed = Frame::from_data_url(&url).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn rejects_malformed_data_urls() {
        assert!(matches!(
            Frame::from_data_url("http://example.com/shot.png"),
            Err(FrameError::NotADataUrl)
        ));
        assert!(matches!(
            Frame::from_data_url("data:image/png;utf8,oops"),
            Err(FrameError::UnsupportedEncoding)
        ));
        assert!(matches!(
            Frame::from_data_url("data:image/png;base64,@@@"),
            Err(FrameError::InvalidBase64(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn capture_task_fills_buffer_and_honors_shutdown() {
        struct CountingSource(u8);
        impl FrameSource for CountingSource {
            fn grab(&mut self) -> Result<Frame, FrameError> {
                self.0 += 1;
                Ok(Frame::png(vec![self.0]))
            }
        }

        let buffer = CaptureBuffer::shared();
        let (tx, rx) = watch::channel(false);
        let task = spawn_capture_task(
            buffer.clone(),
            CountingSource(0),
            Duration::from_secs(5),
            rx,
        );

        tokio::time::sleep(Duration::from_secs(26)).await;
        tx.send(true).unwrap();
        task.await.unwrap();

        // Five ticks elapsed but only the first three frames are kept.
        let drained = buffer.lock().drain();
        assert_eq!(drained.len(), MAX_FRAMES);
        assert_eq!(drained[0], Frame::png(vec![1]));
        assert_eq!(drained[2], Frame::png(vec![3]));
    }
}
