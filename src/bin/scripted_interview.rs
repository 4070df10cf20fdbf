//! Hand-run a mock interview in the terminal: the interviewer's speech is
//! printed, and your typed lines play the candidate. Useful for exercising
//! the turn flow without a live voice call.
//!
//! Set `INTERVOX_BACKEND_URL` to also submit the finished transcript.

use std::time::Duration;

use anyhow::Result;
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use intervox::{
    AdapterError, InterviewScript, InterviewSession, ListenOutcome, Question, QuestionKind,
    SessionConfig, VoiceCallAdapter,
};

/// Voice call stand-in backed by the terminal.
struct ConsoleCall {
    input: Lines<BufReader<Stdin>>,
}

impl ConsoleCall {
    fn new() -> Self {
        Self {
            input: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl VoiceCallAdapter for ConsoleCall {
    async fn speak(&mut self, text: &str) -> Result<(), AdapterError> {
        println!("interviewer> {text}");
        Ok(())
    }

    async fn listen(&mut self, timeout: Duration) -> Result<ListenOutcome, AdapterError> {
        match tokio::time::timeout(timeout, self.input.next_line()).await {
            Err(_) => Ok(ListenOutcome::silence()),
            Ok(Ok(Some(line))) => Ok(ListenOutcome::heard(line)),
            Ok(Ok(None)) => Ok(ListenOutcome::silence()),
            Ok(Err(e)) => Err(AdapterError::Transport(e.to_string())),
        }
    }

    async fn sleep(&mut self, duration: Duration) -> Result<(), AdapterError> {
        tokio::time::sleep(duration).await;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let job_title =
        std::env::var("INTERVOX_JOB_TITLE").unwrap_or_else(|_| "Software Engineer".to_string());
    let mut config = SessionConfig::from_env();
    // Terminal answers arrive slowly; keep the demo forgiving.
    config.response_timeout = config.response_timeout.max(Duration::from_secs(300));

    let questions = vec![
        Question::new(
            "Tell me about a challenging project you worked on recently.",
            QuestionKind::Experience,
        ),
        Question::new(
            "How do you handle tight deadlines and pressure?",
            QuestionKind::Behavioral,
        ),
        Question::new(
            "How would you design the backend for a job application tracker?",
            QuestionKind::Technical,
        ),
    ];

    let mut session = InterviewSession::new(config);
    info!("Session {} ready ({})", session.session_id, job_title);

    let receipt = session
        .run(
            ConsoleCall::new(),
            questions,
            InterviewScript::for_role(&job_title),
        )
        .await?;

    println!("\n--- transcript ---");
    print!("{}", session.transcript().lock().serialize());

    match receipt {
        Some(receipt) => println!("--- submitted (HTTP {}) ---", receipt.status),
        None => println!("--- not submitted (no backend configured) ---"),
    }

    Ok(())
}
