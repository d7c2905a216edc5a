//! Revive gate
//!
//! A fatal move either ends the run or, while chances remain, opens a
//! quiz. A correct answer revives; a wrong one ends the run. Only the
//! decision lives here: the session applies the reset and the engine
//! talks to the question provider.

use crate::quiz::QuizQuestion;

/// What happens right after a fatal move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviveEntry {
    /// A question is waiting for an answer
    Prompt,
    /// No chances left
    GameOver,
}

/// Result of answering the revive question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviveVerdict {
    Revived,
    GameOver,
}

/// Holds the question while an answer is pending
#[derive(Debug, Clone, Default)]
pub struct ReviveGate {
    question: Option<QuizQuestion>,
}

impl ReviveGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the gate after a fatal move
    ///
    /// Uses `ready` when the provider has a question, otherwise `fallback`.
    /// Never waits.
    pub fn enter<F>(
        &mut self,
        chances_remaining: u8,
        ready: Option<QuizQuestion>,
        fallback: F,
    ) -> ReviveEntry
    where
        F: FnOnce() -> QuizQuestion,
    {
        if chances_remaining == 0 {
            self.question = None;
            return ReviveEntry::GameOver;
        }
        self.question = Some(ready.unwrap_or_else(fallback));
        ReviveEntry::Prompt
    }

    /// Whether an answer is pending
    pub fn awaiting_answer(&self) -> bool {
        self.question.is_some()
    }

    pub fn question(&self) -> Option<&QuizQuestion> {
        self.question.as_ref()
    }

    /// Judge the selected option and close the gate
    pub fn answer(&mut self, selected: usize) -> ReviveVerdict {
        match self.question.take() {
            Some(q) if q.is_correct(selected) => ReviveVerdict::Revived,
            _ => ReviveVerdict::GameOver,
        }
    }

    /// Drop any pending question (restart)
    pub fn clear(&mut self) {
        self.question = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> QuizQuestion {
        QuizQuestion::new("2 + 2?", vec!["A. 3".into(), "B. 4".into()], 1)
    }

    #[test]
    fn test_no_chances_goes_straight_to_game_over() {
        let mut gate = ReviveGate::new();
        let entry = gate.enter(0, Some(question()), || unreachable!());
        assert_eq!(entry, ReviveEntry::GameOver);
        assert!(!gate.awaiting_answer());
    }

    #[test]
    fn test_fallback_when_not_ready() {
        let mut gate = ReviveGate::new();
        let entry = gate.enter(2, None, question);
        assert_eq!(entry, ReviveEntry::Prompt);
        assert_eq!(gate.question().map(|q| q.text.as_str()), Some("2 + 2?"));
    }

    #[test]
    fn test_ready_question_preferred() {
        let mut gate = ReviveGate::new();
        let ready = QuizQuestion::new("ready?", vec!["A. yes".into(), "B. no".into()], 0);
        gate.enter(1, Some(ready), question);
        assert_eq!(gate.question().map(|q| q.text.as_str()), Some("ready?"));
    }

    #[test]
    fn test_answers() {
        let mut gate = ReviveGate::new();
        gate.enter(3, None, question);
        assert_eq!(gate.answer(1), ReviveVerdict::Revived);
        assert!(!gate.awaiting_answer());

        gate.enter(3, None, question);
        assert_eq!(gate.answer(0), ReviveVerdict::GameOver);

        // No pending question
        assert_eq!(gate.answer(1), ReviveVerdict::GameOver);
    }
}
