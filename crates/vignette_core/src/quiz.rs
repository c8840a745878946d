//! Quiz gate in front of the intro screen
//!
//! Questions are answered in order. One wrong answer fails the whole quiz,
//! which then waits for an explicit restart.

use serde::{Deserialize, Serialize};

/// A multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options` of the only correct answer
    pub answer: usize,
}

/// Where the quiz stands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizPhase {
    /// Waiting for an answer to the question at this index
    Asking(usize),
    Passed,
    /// Dead end until [`Quiz::restart`]
    Failed,
}

/// Result of answering a question
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizOutcome {
    /// Right answer, moved on to the question at this index
    Correct { next: usize },
    /// Right answer to the last question
    Passed,
    /// Wrong answer
    Failed,
    /// Not currently asking anything
    Ignored,
}

/// The quiz sub-machine
#[derive(Debug, Clone)]
pub struct Quiz {
    questions: Vec<QuizQuestion>,
    phase: QuizPhase,
}

impl Quiz {
    /// A quiz without questions starts out passed
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        let phase = Self::first_phase(&questions);
        Self { questions, phase }
    }

    fn first_phase(questions: &[QuizQuestion]) -> QuizPhase {
        if questions.is_empty() {
            QuizPhase::Passed
        } else {
            QuizPhase::Asking(0)
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// The question being asked, if any
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            QuizPhase::Asking(i) => self.questions.get(i),
            _ => None,
        }
    }

    /// Answer the current question with the option at `option`
    ///
    /// An option index outside the question's options counts as wrong.
    pub fn answer(&mut self, option: usize) -> QuizOutcome {
        let QuizPhase::Asking(index) = self.phase else {
            return QuizOutcome::Ignored;
        };
        let Some(question) = self.questions.get(index) else {
            return QuizOutcome::Ignored;
        };

        if option != question.answer {
            self.phase = QuizPhase::Failed;
            return QuizOutcome::Failed;
        }

        let next = index + 1;
        if next < self.questions.len() {
            self.phase = QuizPhase::Asking(next);
            QuizOutcome::Correct { next }
        } else {
            self.phase = QuizPhase::Passed;
            QuizOutcome::Passed
        }
    }

    /// Back to the first question, from any phase
    pub fn restart(&mut self) {
        self.phase = Self::first_phase(&self.questions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(n: usize) -> Vec<QuizQuestion> {
        (0..n)
            .map(|i| QuizQuestion {
                prompt: format!("question {}", i),
                options: vec!["a".into(), "b".into(), "c".into()],
                answer: i % 3,
            })
            .collect()
    }

    #[test]
    fn test_all_correct_passes() {
        let mut quiz = Quiz::new(questions(3));
        assert_eq!(quiz.answer(0), QuizOutcome::Correct { next: 1 });
        assert_eq!(quiz.answer(1), QuizOutcome::Correct { next: 2 });
        assert_eq!(quiz.answer(2), QuizOutcome::Passed);
        assert_eq!(quiz.phase(), QuizPhase::Passed);
        assert!(quiz.current_question().is_none());
    }

    #[test]
    fn test_wrong_answer_at_any_index_fails() {
        for k in 0..4 {
            let mut quiz = Quiz::new(questions(4));
            for i in 0..k {
                quiz.answer(i % 3);
            }
            assert_eq!(quiz.answer((k % 3) + 1), QuizOutcome::Failed, "k = {}", k);
            assert_eq!(quiz.phase(), QuizPhase::Failed);
        }
    }

    #[test]
    fn test_failed_is_dead_end_until_restart() {
        let mut quiz = Quiz::new(questions(2));
        quiz.answer(2);
        assert_eq!(quiz.answer(0), QuizOutcome::Ignored);
        assert_eq!(quiz.phase(), QuizPhase::Failed);

        quiz.restart();
        assert_eq!(quiz.phase(), QuizPhase::Asking(0));
        assert_eq!(quiz.current_question().unwrap().prompt, "question 0");
    }

    #[test]
    fn test_out_of_range_option_is_wrong() {
        let mut quiz = Quiz::new(questions(1));
        assert_eq!(quiz.answer(99), QuizOutcome::Failed);
    }

    #[test]
    fn test_empty_quiz_is_passed() {
        let mut quiz = Quiz::new(Vec::new());
        assert_eq!(quiz.phase(), QuizPhase::Passed);
        assert_eq!(quiz.answer(0), QuizOutcome::Ignored);
        quiz.restart();
        assert_eq!(quiz.phase(), QuizPhase::Passed);
    }

    #[test]
    fn test_passed_ignores_answers() {
        let mut quiz = Quiz::new(questions(1));
        quiz.answer(0);
        assert_eq!(quiz.answer(0), QuizOutcome::Ignored);
        assert_eq!(quiz.phase(), QuizPhase::Passed);
    }
}
