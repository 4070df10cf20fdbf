use rand::Rng;

/// Everything the assistant says that is not a question: the scripted
/// introduction, turn-to-turn connective tissue, and the closing lines.
///
/// The whole struct is plain data so a product team can swap any line or the
/// acknowledgment set without touching the controller.
#[derive(Debug, Clone)]
pub struct InterviewScript {
    /// Spoken once, before the first question.
    pub introduction: String,
    /// Asked right after the introduction; the candidate's reply (or
    /// silence) is treated as readiness either way.
    pub ready_prompt: String,
    /// Prefixed to every question after the first.
    pub transition: String,
    /// Spoken when the response listen times out or hears nothing.
    pub silence_fallback: String,
    /// Spoken after a call error before moving on.
    pub apology: String,
    /// Pool of phrases acknowledging an answer between questions.
    pub acknowledgments: Vec<String>,
    /// Spoken after the last answered question.
    pub wrap_up: String,
    /// Invitation for the candidate's own questions.
    pub final_questions_prompt: String,
    /// Closing when the candidate did ask something.
    pub closing_with_question: String,
    /// Closing when the final listen heard nothing.
    pub closing_without_question: String,
}

impl InterviewScript {
    /// The stock script, personalized with the job title.
    pub fn for_role(job_title: &str) -> Self {
        Self {
            introduction: format!(
                "Hello, and welcome! I'll be conducting your mock interview \
                 for the {job_title} position today. We'll go through a few \
                 questions, and you can answer each one in your own words."
            ),
            ready_prompt: "Are you ready to begin?".to_string(),
            transition: "Alright, next question.".to_string(),
            silence_fallback: "No worries, we can come back to that. Let's keep going."
                .to_string(),
            apology: "Apologies, I had a brief technical hiccup. Let's continue.".to_string(),
            acknowledgments: vec![
                "Thank you, that's helpful context.".to_string(),
                "Got it, thanks for sharing.".to_string(),
                "Interesting, I appreciate the detail.".to_string(),
                "Great, thank you.".to_string(),
            ],
            wrap_up: "That was the last question. Thanks for walking me through your answers."
                .to_string(),
            final_questions_prompt: "Before we finish, do you have any questions for me?"
                .to_string(),
            closing_with_question:
                "That's a good question. The recruiting team will follow up with details. \
                 Thanks again for your time, and good luck!"
                    .to_string(),
            closing_without_question:
                "Alright then. Thanks again for your time, and good luck with the process!"
                    .to_string(),
        }
    }

    /// Pick an acknowledgment phrase uniformly at random. The RNG is injected
    /// so tests can seed it; production uses an entropy-seeded generator.
    pub fn acknowledgment(&self, rng: &mut impl Rng) -> &str {
        if self.acknowledgments.is_empty() {
            return "";
        }
        let index = rng.gen_range(0..self.acknowledgments.len());
        &self.acknowledgments[index]
    }
}

impl Default for InterviewScript {
    fn default() -> Self {
        Self::for_role("open")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn acknowledgment_is_deterministic_under_a_fixed_seed() {
        let script = InterviewScript::for_role("Backend Engineer");

        let picks_a: Vec<String> = {
            let mut rng = StdRng::seed_from_u64(7);
            (0..8)
                .map(|_| script.acknowledgment(&mut rng).to_string())
                .collect()
        };
        let picks_b: Vec<String> = {
            let mut rng = StdRng::seed_from_u64(7);
            (0..8)
                .map(|_| script.acknowledgment(&mut rng).to_string())
                .collect()
        };

        assert_eq!(picks_a, picks_b);
        assert!(picks_a
            .iter()
            .all(|pick| script.acknowledgments.contains(pick)));
    }

    #[test]
    fn empty_acknowledgment_pool_yields_silence() {
        let mut script = InterviewScript::default();
        script.acknowledgments.clear();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(script.acknowledgment(&mut rng), "");
    }

    #[test]
    fn introduction_mentions_the_role() {
        let script = InterviewScript::for_role("Data Analyst");
        assert!(script.introduction.contains("Data Analyst"));
    }
}
