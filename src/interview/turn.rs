use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::config::SessionConfig;
use crate::error::AdapterError;
use crate::interview::{InterviewScript, QuestionSequencer};
use crate::transcript::{SharedTranscript, Speaker, TranscriptEntry};
use crate::voice::VoiceCallAdapter;

/// Short breather between an acknowledgment and the next question.
const TURN_PAUSE: Duration = Duration::from_millis(750);

/// Where the controller currently is in the call.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    #[default]
    NotStarted,
    Introducing,
    AwaitingConfirmation,
    AskingQuestion,
    AwaitingResponse,
    Acknowledging,
    Closing,
    AwaitingFinalQuestion,
    Terminated,
}

impl TurnPhase {
    /// Whether the assistant is producing speech in this phase. Drives the
    /// "interviewer is speaking" indicator in the view layer.
    pub fn is_speaking(self) -> bool {
        matches!(
            self,
            TurnPhase::Introducing
                | TurnPhase::AskingQuestion
                | TurnPhase::Acknowledging
                | TurnPhase::Closing
        )
    }
}

/// Cloneable view of the controller's phase, for live UI while the
/// controller runs.
#[derive(Clone, Debug, Default)]
pub struct PhaseHandle(Arc<Mutex<TurnPhase>>);

impl PhaseHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> TurnPhase {
        *self.0.lock()
    }

    pub fn is_speaking(&self) -> bool {
        self.get().is_speaking()
    }

    fn set(&self, phase: TurnPhase) {
        debug!("Turn phase -> {phase:?}");
        *self.0.lock() = phase;
    }
}

/// Drives one interview call end to end: introduction, question turns,
/// closing. Owns the voice-call adapter for the session's lifetime and
/// appends to the shared transcript as answers arrive.
///
/// Adapter errors are absorbed at each turn boundary: the controller logs,
/// speaks a short apology on a best-effort basis, and moves on. The session
/// trades completeness for resilience; it never hard-aborts on a transient
/// call error.
pub struct TurnController<A: VoiceCallAdapter> {
    adapter: A,
    sequencer: QuestionSequencer,
    script: InterviewScript,
    transcript: SharedTranscript,
    phase: PhaseHandle,
    rng: StdRng,
    ready_timeout: Duration,
    response_timeout: Duration,
    final_question_timeout: Duration,
}

impl<A: VoiceCallAdapter> TurnController<A> {
    pub fn new(
        adapter: A,
        sequencer: QuestionSequencer,
        script: InterviewScript,
        transcript: SharedTranscript,
        config: &SessionConfig,
    ) -> Self {
        Self {
            adapter,
            sequencer,
            script,
            transcript,
            phase: PhaseHandle::new(),
            rng: StdRng::from_entropy(),
            ready_timeout: config.ready_timeout,
            response_timeout: config.response_timeout,
            final_question_timeout: config.final_question_timeout,
        }
    }

    /// Seed the acknowledgment RNG for reproducible phrase selection.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Report phase changes through an externally held handle.
    pub fn with_phase_handle(mut self, handle: PhaseHandle) -> Self {
        self.phase = handle;
        self
    }

    pub fn phase_handle(&self) -> PhaseHandle {
        self.phase.clone()
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase.get()
    }

    pub fn is_speaking(&self) -> bool {
        self.phase.is_speaking()
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Release the underlying call object, e.g. to disconnect it when the
    /// hosting view is torn down.
    pub fn into_adapter(self) -> A {
        self.adapter
    }

    /// Run the interview to completion. Always reaches `Terminated`; call
    /// errors along the way degrade individual turns instead of failing the
    /// session.
    pub async fn run(&mut self) {
        info!(
            "🎬 Starting interview call with {} question(s)",
            self.sequencer.len()
        );

        if let Err(e) = self.introduce().await {
            warn!("Call error during introduction: {e}; continuing");
            self.apologize().await;
        }

        loop {
            let last = self.sequencer.is_last();

            if let Err(e) = self.question_turn().await {
                warn!(
                    "Call error during question {}: {e}; continuing",
                    self.sequencer.position() + 1
                );
                self.apologize().await;
            }

            if last {
                break;
            }
            if self.sequencer.advance().is_err() {
                break;
            }
        }

        if let Err(e) = self.close().await {
            warn!("Call error during closing: {e}");
        }

        self.phase.set(TurnPhase::Terminated);
        info!("🏁 Interview call terminated");
    }

    /// Scripted introduction plus readiness check. Only runs from the first
    /// question; a resumed sequencer skips straight to the question loop.
    async fn introduce(&mut self) -> Result<(), AdapterError> {
        if !self.sequencer.is_first() {
            return Ok(());
        }

        self.phase.set(TurnPhase::Introducing);
        self.adapter.speak(&self.script.introduction).await?;
        self.adapter.speak(&self.script.ready_prompt).await?;

        self.phase.set(TurnPhase::AwaitingConfirmation);
        let outcome = self.adapter.listen(self.ready_timeout).await?;
        // Silence counts as readiness: the interview proceeds regardless of
        // what (if anything) the candidate says here.
        match outcome.text() {
            Some(reply) => debug!("Readiness reply: {reply}"),
            None => debug!("No readiness reply heard; proceeding anyway"),
        }
        Ok(())
    }

    /// One question turn: ask, listen, then either log the answer (with an
    /// acknowledgment when more questions follow) or speak the silence
    /// fallback and move on. No retries either way.
    async fn question_turn(&mut self) -> Result<(), AdapterError> {
        let question = match self.sequencer.current() {
            Ok(question) => question.clone(),
            Err(_) => return Ok(()),
        };

        self.phase.set(TurnPhase::AskingQuestion);
        let line = if self.sequencer.is_first() {
            question.text.clone()
        } else {
            format!("{} {}", self.script.transition, question.text)
        };
        self.adapter.speak(&line).await?;

        self.phase.set(TurnPhase::AwaitingResponse);
        let outcome = self.adapter.listen(self.response_timeout).await?;

        match outcome.text() {
            None => {
                info!(
                    "No answer heard for question {}; moving on",
                    self.sequencer.position() + 1
                );
                self.adapter.speak(&self.script.silence_fallback).await?;
            }
            Some(answer) => {
                let answer = answer.to_string();
                {
                    let mut log = self.transcript.lock();
                    log.append(TranscriptEntry::new(Speaker::Assistant, question.text));
                    log.append(TranscriptEntry::new(Speaker::Candidate, answer));
                }

                if !self.sequencer.is_last() {
                    self.phase.set(TurnPhase::Acknowledging);
                    let ack = self.script.acknowledgment(&mut self.rng).to_string();
                    self.adapter.speak(&ack).await?;
                    self.adapter.sleep(TURN_PAUSE).await?;
                }
            }
        }
        Ok(())
    }

    /// Wrap up, take one final question from the candidate, and say goodbye.
    async fn close(&mut self) -> Result<(), AdapterError> {
        self.phase.set(TurnPhase::Closing);
        self.adapter.speak(&self.script.wrap_up).await?;
        self.adapter.speak(&self.script.final_questions_prompt).await?;

        self.phase.set(TurnPhase::AwaitingFinalQuestion);
        let outcome = self.adapter.listen(self.final_question_timeout).await?;

        self.phase.set(TurnPhase::Closing);
        let closing = if outcome.text().is_some() {
            &self.script.closing_with_question
        } else {
            &self.script.closing_without_question
        };
        self.adapter.speak(closing).await?;
        Ok(())
    }

    async fn apologize(&mut self) {
        if let Err(e) = self.adapter.speak(&self.script.apology).await {
            warn!("Could not deliver apology line either: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use crate::interview::{Question, QuestionKind};
    use crate::transcript::TranscriptLog;
    use crate::voice::ListenOutcome;

    /// Fake call: records everything spoken, replays queued listen results.
    /// An exhausted queue hears silence, like a timed-out listen.
    struct ScriptedCall {
        spoken: Vec<String>,
        replies: VecDeque<Result<ListenOutcome, AdapterError>>,
    }

    impl ScriptedCall {
        fn with_replies(
            replies: impl IntoIterator<Item = Result<ListenOutcome, AdapterError>>,
        ) -> Self {
            Self {
                spoken: Vec::new(),
                replies: replies.into_iter().collect(),
            }
        }
    }

    impl VoiceCallAdapter for ScriptedCall {
        async fn speak(&mut self, text: &str) -> Result<(), AdapterError> {
            self.spoken.push(text.to_string());
            Ok(())
        }

        async fn listen(&mut self, _timeout: Duration) -> Result<ListenOutcome, AdapterError> {
            self.replies
                .pop_front()
                .unwrap_or_else(|| Ok(ListenOutcome::silence()))
        }

        async fn sleep(&mut self, _duration: Duration) -> Result<(), AdapterError> {
            Ok(())
        }
    }

    fn controller_for(
        questions: Vec<Question>,
        call: ScriptedCall,
        transcript: SharedTranscript,
    ) -> TurnController<ScriptedCall> {
        let sequencer = QuestionSequencer::new(questions).unwrap();
        let script = InterviewScript::for_role("Software Engineer");
        TurnController::new(call, sequencer, script, transcript, &SessionConfig::default())
            .with_seed(42)
    }

    fn q(text: &str) -> Question {
        Question::new(text, QuestionKind::Behavioral)
    }

    #[tokio::test]
    async fn single_question_interview_skips_acknowledgment() {
        let call = ScriptedCall::with_replies([
            Ok(ListenOutcome::heard("ready")),
            Ok(ListenOutcome::heard("I rebuilt our hiring pipeline.")),
            Ok(ListenOutcome::silence()),
        ]);
        let transcript = TranscriptLog::shared();
        let mut controller =
            controller_for(vec![q("Tell me about a project.")], call, transcript.clone());

        controller.run().await;

        assert_eq!(controller.phase(), TurnPhase::Terminated);
        assert!(!controller.is_speaking());

        let script = InterviewScript::for_role("Software Engineer");
        let spoken = &controller.adapter().spoken;
        assert_eq!(spoken[0], script.introduction);
        assert_eq!(spoken[1], script.ready_prompt);
        assert_eq!(spoken[2], "Tell me about a project.");
        assert_eq!(spoken[3], script.wrap_up);
        assert_eq!(spoken[4], script.final_questions_prompt);
        assert_eq!(spoken[5], script.closing_without_question);
        // Straight to closing: no acknowledgment phrase anywhere.
        assert!(spoken
            .iter()
            .all(|line| !script.acknowledgments.contains(line)));

        let log = transcript.lock();
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].speaker, Speaker::Assistant);
        assert_eq!(log.entries()[1].content, "I rebuilt our hiring pipeline.");
    }

    #[tokio::test]
    async fn three_answered_questions_yield_six_entries_in_order() {
        let call = ScriptedCall::with_replies([
            Ok(ListenOutcome::heard("yes, ready")),
            Ok(ListenOutcome::heard("answer one")),
            Ok(ListenOutcome::heard("answer two")),
            Ok(ListenOutcome::heard("answer three")),
            Ok(ListenOutcome::heard("when do I hear back?")),
        ]);
        let transcript = TranscriptLog::shared();
        let mut controller = controller_for(
            vec![q("Question one?"), q("Question two?"), q("Question three?")],
            call,
            transcript.clone(),
        );

        controller.run().await;

        let log = transcript.lock();
        let flat: Vec<(Speaker, &str)> = log
            .entries()
            .iter()
            .map(|e| (e.speaker, e.content.as_str()))
            .collect();
        assert_eq!(
            flat,
            vec![
                (Speaker::Assistant, "Question one?"),
                (Speaker::Candidate, "answer one"),
                (Speaker::Assistant, "Question two?"),
                (Speaker::Candidate, "answer two"),
                (Speaker::Assistant, "Question three?"),
                (Speaker::Candidate, "answer three"),
            ]
        );

        // The candidate asked something at the end, so the richer closing
        // line is used, and later questions carry the transition prefix.
        let script = InterviewScript::for_role("Software Engineer");
        let spoken = &controller.adapter().spoken;
        assert!(spoken.contains(&script.closing_with_question));
        assert!(spoken
            .iter()
            .any(|line| line.starts_with(&script.transition) && line.ends_with("Question two?")));
        // Two acknowledgments: after answers one and two, none after three.
        let ack_count = spoken
            .iter()
            .filter(|line| script.acknowledgments.contains(*line))
            .count();
        assert_eq!(ack_count, 2);
    }

    #[tokio::test]
    async fn timeout_on_a_middle_question_falls_back_and_advances() {
        let call = ScriptedCall::with_replies([
            Ok(ListenOutcome::heard("ready")),
            Ok(ListenOutcome::heard("answer one")),
            Ok(ListenOutcome::silence()), // question two times out
            Ok(ListenOutcome::heard("answer three")),
            Ok(ListenOutcome::silence()),
        ]);
        let transcript = TranscriptLog::shared();
        let mut controller = controller_for(
            vec![q("Question one?"), q("Question two?"), q("Question three?")],
            call,
            transcript.clone(),
        );

        controller.run().await;

        let script = InterviewScript::for_role("Software Engineer");
        let spoken = &controller.adapter().spoken;
        assert!(spoken.contains(&script.silence_fallback));
        // Question two was asked exactly once: no retry.
        let asked_twice = spoken
            .iter()
            .filter(|line| line.ends_with("Question two?"))
            .count();
        assert_eq!(asked_twice, 1);
        // Question three was still reached and answered.
        let log = transcript.lock();
        assert_eq!(log.len(), 4);
        assert_eq!(log.entries()[2].content, "Question three?");
        assert_eq!(log.entries()[3].content, "answer three");
    }

    #[tokio::test]
    async fn adapter_error_mid_turn_apologizes_and_continues() {
        let call = ScriptedCall::with_replies([
            Ok(ListenOutcome::heard("ready")),
            Err(AdapterError::Transport("stream reset".into())),
            Ok(ListenOutcome::heard("answer two")),
            Ok(ListenOutcome::silence()),
        ]);
        let transcript = TranscriptLog::shared();
        let mut controller = controller_for(
            vec![q("Question one?"), q("Question two?")],
            call,
            transcript.clone(),
        );

        controller.run().await;

        assert_eq!(controller.phase(), TurnPhase::Terminated);
        let script = InterviewScript::for_role("Software Engineer");
        let spoken = &controller.adapter().spoken;
        assert!(spoken.contains(&script.apology));

        // Question one produced no transcript; question two still did.
        let log = transcript.lock();
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].content, "Question two?");
    }

    #[tokio::test]
    async fn silent_readiness_check_still_starts_the_interview() {
        let call = ScriptedCall::with_replies([
            Ok(ListenOutcome::silence()), // readiness listen times out
            Ok(ListenOutcome::heard("my answer")),
            Ok(ListenOutcome::silence()),
        ]);
        let transcript = TranscriptLog::shared();
        let mut controller = controller_for(vec![q("Only question?")], call, transcript.clone());

        controller.run().await;

        assert_eq!(transcript.lock().len(), 2);
        assert_eq!(controller.phase(), TurnPhase::Terminated);
    }

    #[test]
    fn speaking_phases_are_exactly_the_speech_producing_ones() {
        assert!(TurnPhase::Introducing.is_speaking());
        assert!(TurnPhase::AskingQuestion.is_speaking());
        assert!(TurnPhase::Acknowledging.is_speaking());
        assert!(TurnPhase::Closing.is_speaking());
        assert!(!TurnPhase::NotStarted.is_speaking());
        assert!(!TurnPhase::AwaitingConfirmation.is_speaking());
        assert!(!TurnPhase::AwaitingResponse.is_speaking());
        assert!(!TurnPhase::AwaitingFinalQuestion.is_speaking());
        assert!(!TurnPhase::Terminated.is_speaking());
    }
}
