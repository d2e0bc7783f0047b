// src/quiz.rs
//! Self-quiz state machine

use anyhow::Result;
use serde::Serialize;

use crate::types::QuizItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuizState {
    Answering { index: usize },
    Revealed { index: usize, chosen: usize },
    Finished { percentage: u32 },
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizItem>,
    state: QuizState,
    correct_count: usize,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizItem>) -> Self {
        let state = Self::initial_state(&questions);
        Self {
            questions,
            state,
            correct_count: 0,
        }
    }

    fn initial_state(questions: &[QuizItem]) -> QuizState {
        if questions.is_empty() {
            QuizState::Finished { percentage: 0 }
        } else {
            QuizState::Answering { index: 0 }
        }
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, QuizState::Finished { .. })
    }

    /// Question being answered or revealed
    pub fn current_question(&self) -> Option<&QuizItem> {
        match self.state {
            QuizState::Answering { index } | QuizState::Revealed { index, .. } => {
                self.questions.get(index)
            }
            QuizState::Finished { .. } => None,
        }
    }

    /// (answered, total)
    pub fn progress(&self) -> (usize, usize) {
        let answered = match self.state {
            QuizState::Answering { index } => index,
            QuizState::Revealed { index, .. } => index + 1,
            QuizState::Finished { .. } => self.total(),
        };
        (answered, self.total())
    }

    /// Answer the current question, returns whether `option` was correct
    pub fn select(&mut self, option: usize) -> Result<bool> {
        let QuizState::Answering { index } = self.state else {
            anyhow::bail!("No question is awaiting an answer");
        };

        let question = &self.questions[index];
        if option >= question.options.len() {
            anyhow::bail!(
                "Option {} out of range for question {} ({} options)",
                option,
                question.id,
                question.options.len()
            );
        }

        let correct = option == question.correct_index;
        if correct {
            self.correct_count += 1;
        }
        self.state = QuizState::Revealed {
            index,
            chosen: option,
        };
        Ok(correct)
    }

    /// Move past a revealed answer
    pub fn advance(&mut self) -> Result<QuizState> {
        let QuizState::Revealed { index, .. } = self.state else {
            anyhow::bail!("Current question has not been answered");
        };

        self.state = if index + 1 >= self.total() {
            QuizState::Finished {
                percentage: self.percentage(),
            }
        } else {
            QuizState::Answering { index: index + 1 }
        };
        Ok(self.state)
    }

    pub fn restart(&mut self) {
        self.correct_count = 0;
        self.state = Self::initial_state(&self.questions);
    }

    fn percentage(&self) -> u32 {
        if self.questions.is_empty() {
            return 0;
        }
        (self.correct_count as f64 / self.total() as f64 * 100.0).round() as u32
    }
}
