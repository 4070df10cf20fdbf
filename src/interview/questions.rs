use serde::{Deserialize, Serialize};

use crate::error::SequencerError;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Technical,
    Behavioral,
    Experience,
    Situational,
}

/// One interview question. Immutable once the interview starts; authored by
/// the upstream question-generation workflow.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Question {
    pub text: String,
    pub kind: QuestionKind,
}

impl Question {
    pub fn new(text: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Tracks which question is currently active. The index only ever moves
/// forward and never passes the last question.
#[derive(Debug)]
pub struct QuestionSequencer {
    questions: Vec<Question>,
    index: usize,
}

impl QuestionSequencer {
    pub fn new(questions: Vec<Question>) -> Result<Self, SequencerError> {
        if questions.is_empty() {
            return Err(SequencerError::EmptyQuestionSet);
        }
        Ok(Self {
            questions,
            index: 0,
        })
    }

    pub fn current(&self) -> Result<&Question, SequencerError> {
        self.questions
            .get(self.index)
            .ok_or(SequencerError::OutOfRange {
                index: self.index,
                len: self.questions.len(),
            })
    }

    /// Move to the next question. Signals `AlreadyComplete` (leaving the
    /// index untouched) when already on the last one.
    pub fn advance(&mut self) -> Result<(), SequencerError> {
        if self.is_last() {
            return Err(SequencerError::AlreadyComplete);
        }
        self.index += 1;
        Ok(())
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index == self.questions.len() - 1
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
