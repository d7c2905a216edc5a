//! Revive questions
//!
//! Questions come from a `QuestionSource` run on a background worker. The
//! engine never waits on it: it polls the provider and falls back to the
//! local bank when nothing is ready. The worker writes its result once
//! into a shared cell; the engine only reads it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(alias = "question")]
    pub text: String,
    pub options: Vec<String>,
    /// Index into `options`
    #[serde(alias = "correct_answer")]
    pub correct: usize,
}

impl QuizQuestion {
    pub fn new(text: impl Into<String>, options: Vec<String>, correct: usize) -> Self {
        Self {
            text: text.into(),
            options,
            correct,
        }
    }

    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct
    }
}

/// Why an external reply could not be turned into a question
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("reply is empty")]
    Empty,
    #[error("expected at least two options, found {0}")]
    TooFewOptions(usize),
    #[error("answer {0:?} does not name an option")]
    BadAnswer(String),
    #[error("question source unavailable: {0}")]
    Unavailable(String),
}

/// Parse a plain-text reply into a question
///
/// Layout: the question on the first line, one option per line, and the
/// answer letter (`A` = first option) on the last line. Blank lines are
/// ignored.
pub fn parse_reply(reply: &str) -> Result<QuizQuestion, QuizError> {
    let lines: Vec<&str> = reply
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let (text, rest) = lines.split_first().ok_or(QuizError::Empty)?;
    let (answer, options) = rest.split_last().ok_or(QuizError::TooFewOptions(0))?;
    if options.len() < 2 {
        return Err(QuizError::TooFewOptions(options.len()));
    }

    let letter = answer
        .chars()
        .next()
        .filter(|c| c.is_ascii_alphabetic())
        .ok_or_else(|| QuizError::BadAnswer(answer.to_string()))?;
    let correct = (letter.to_ascii_uppercase() as u8 - b'A') as usize;
    if correct >= options.len() {
        return Err(QuizError::BadAnswer(answer.to_string()));
    }

    Ok(QuizQuestion {
        text: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct,
    })
}

/// Local question bank, always available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    questions: Vec<QuizQuestion>,
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::builtin()
    }
}

impl QuestionBank {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self { questions }
    }

    /// The bundled programming questions
    pub fn builtin() -> Self {
        fn q(text: &str, options: [&str; 4], correct: usize) -> QuizQuestion {
            QuizQuestion::new(text, options.iter().map(|o| o.to_string()).collect(), correct)
        }

        Self::new(vec![
            q(
                "Which Python keyword defines a function?",
                ["A. def", "B. function", "C. define", "D. func"],
                0,
            ),
            q(
                "Which of these is not a basic Python data type?",
                ["A. int", "B. str", "C. array", "D. float"],
                2,
            ),
            q(
                "How does a comment start in Python?",
                ["A. //", "B. /* */", "C. #", "D. --"],
                2,
            ),
            q(
                "Which brackets create a dictionary?",
                ["A. {}", "B. []", "C. ()", "D. <>"],
                0,
            ),
            q(
                "Where do Python list indexes start?",
                ["A. 0", "B. 1", "C. -1", "D. Anywhere"],
                0,
            ),
            q(
                "Which function returns the length of a list?",
                ["A. size()", "B. length()", "C. len()", "D. count()"],
                2,
            ),
            q(
                "Which keywords start a loop in Python?",
                ["A. for", "B. loop", "C. while", "D. A and C"],
                3,
            ),
            q(
                "Which standard modules deal with dates and times?",
                ["A. time", "B. datetime", "C. calendar", "D. All of the above"],
                3,
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn push(&mut self, question: QuizQuestion) {
        self.questions.push(question);
    }

    /// A random question (from the builtin set if this bank is empty)
    pub fn pick<R: Rng>(&self, rng: &mut R) -> QuizQuestion {
        match self.questions.choose(rng) {
            Some(q) => q.clone(),
            None => Self::builtin().questions[0].clone(),
        }
    }

    /// Load a bank from a JSON file, falling back to the builtin set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<QuestionBank>(&json) {
                Ok(bank) if !bank.is_empty() => {
                    log::info!("Loaded {} questions from {}", bank.len(), path.display());
                    bank
                }
                Ok(_) => {
                    log::warn!("Question bank {} is empty, using builtin", path.display());
                    Self::builtin()
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt question bank {}: {}", path.display(), e);
                    Self::builtin()
                }
            },
            Err(_) => Self::builtin(),
        }
    }

    /// Write the bank as pretty JSON; returns whether it was written
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> bool {
        let written = serde_json::to_string_pretty(self)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Could not save question bank: {}", e);
                false
            }
        }
    }
}

/// Something that can produce a question, possibly slowly
pub trait QuestionSource: Send + Sync + 'static {
    fn fetch(&self) -> Result<QuizQuestion, QuizError>;
}

impl QuestionSource for QuestionBank {
    fn fetch(&self) -> Result<QuizQuestion, QuizError> {
        Ok(self.pick(&mut rand::rng()))
    }
}

/// Wraps a function returning raw reply text (e.g. a chat-completion call)
pub struct ReplySource<F> {
    fetch_reply: F,
}

impl<F> ReplySource<F>
where
    F: Fn() -> Result<String, String> + Send + Sync + 'static,
{
    pub fn new(fetch_reply: F) -> Self {
        Self { fetch_reply }
    }
}

impl<F> QuestionSource for ReplySource<F>
where
    F: Fn() -> Result<String, String> + Send + Sync + 'static,
{
    fn fetch(&self) -> Result<QuizQuestion, QuizError> {
        let reply = (self.fetch_reply)().map_err(QuizError::Unavailable)?;
        parse_reply(&reply)
    }
}

/// A background fetch in flight
struct Pending {
    cell: Arc<OnceLock<QuizQuestion>>,
    cancelled: Arc<AtomicBool>,
    #[cfg(not(target_arch = "wasm32"))]
    worker: std::thread::JoinHandle<()>,
}

impl Pending {
    fn is_dead(&self) -> bool {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.worker.is_finished() && self.cell.get().is_none()
        }
        #[cfg(target_arch = "wasm32")]
        {
            self.cell.get().is_none()
        }
    }
}

/// Fire-and-forget question fetching with a synchronous fallback
pub struct QuestionProvider {
    source: Arc<dyn QuestionSource>,
    fallback: QuestionBank,
    pending: Option<Pending>,
}

impl QuestionProvider {
    pub fn new(source: Arc<dyn QuestionSource>, fallback: QuestionBank) -> Self {
        Self {
            source,
            fallback,
            pending: None,
        }
    }

    /// Provider that only ever serves the local bank
    pub fn local(bank: QuestionBank) -> Self {
        Self::new(Arc::new(bank.clone()), bank)
    }

    /// Start fetching a question unless one is already in flight
    pub fn request(&mut self) {
        if self.pending.is_some() {
            return;
        }

        let cell = Arc::new(OnceLock::new());
        let cancelled = Arc::new(AtomicBool::new(false));

        #[cfg(not(target_arch = "wasm32"))]
        {
            let source = Arc::clone(&self.source);
            let worker_cell = Arc::clone(&cell);
            let worker_cancelled = Arc::clone(&cancelled);
            let spawned = std::thread::Builder::new()
                .name("quiz-fetch".into())
                .spawn(move || publish(source.as_ref(), &worker_cell, &worker_cancelled));
            match spawned {
                Ok(worker) => {
                    self.pending = Some(Pending {
                        cell,
                        cancelled,
                        worker,
                    })
                }
                Err(e) => log::warn!("Could not start question fetch: {}", e),
            }
        }

        // No threads on the web; the source runs inline
        #[cfg(target_arch = "wasm32")]
        {
            publish(self.source.as_ref(), &cell, &cancelled);
            self.pending = Some(Pending { cell, cancelled });
        }
    }

    /// Take the fetched question if it has arrived
    pub fn poll(&mut self) -> Option<QuizQuestion> {
        let pending = self.pending.as_ref()?;
        if let Some(q) = pending.cell.get() {
            let q = q.clone();
            self.pending = None;
            return Some(q);
        }
        if pending.is_dead() {
            // Fetch failed; let the next request retry
            self.pending = None;
        }
        None
    }

    /// Whether a fetch is in flight
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Abandon the in-flight fetch; its result will never be published
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancelled.store(true, Ordering::Release);
        }
    }

    /// A question from the local bank
    pub fn fallback(&self) -> QuizQuestion {
        self.fallback.pick(&mut rand::rng())
    }
}

impl Drop for QuestionProvider {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn publish(source: &dyn QuestionSource, cell: &OnceLock<QuizQuestion>, cancelled: &AtomicBool) {
    match source.fetch() {
        Ok(q) => {
            if !cancelled.load(Ordering::Acquire) {
                let _ = cell.set(q);
            }
        }
        Err(e) => log::warn!("Question fetch failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::mpsc::{Receiver, channel};
    use std::time::{Duration, Instant};

    /// Source that blocks until the test releases it
    struct GatedSource {
        gate: Mutex<Receiver<()>>,
    }

    impl QuestionSource for GatedSource {
        fn fetch(&self) -> Result<QuizQuestion, QuizError> {
            let _ = self.gate.lock().map(|rx| rx.recv());
            Ok(QuizQuestion::new(
                "gated",
                vec!["A. x".into(), "B. y".into()],
                1,
            ))
        }
    }

    struct FailingSource;

    impl QuestionSource for FailingSource {
        fn fetch(&self) -> Result<QuizQuestion, QuizError> {
            Err(QuizError::Unavailable("offline".into()))
        }
    }

    fn poll_until(provider: &mut QuestionProvider, timeout: Duration) -> Option<QuizQuestion> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if let Some(q) = provider.poll() {
                return Some(q);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn test_parse_reply() {
        let reply = "Which of these is a main goal of AI?\n\
                     A Replace all human jobs\n\
                     B Simulate and extend human intelligence\n\
                     C Build robots with feelings\n\
                     D Make faster hardware\n\
                     \n\
                     B";
        let q = parse_reply(reply).unwrap();
        assert_eq!(q.text, "Which of these is a main goal of AI?");
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.correct, 1);
        assert!(q.is_correct(1));
    }

    #[test]
    fn test_parse_reply_errors() {
        assert_eq!(parse_reply("  \n \n"), Err(QuizError::Empty));
        assert_eq!(parse_reply("Q?\nA one\nA"), Err(QuizError::TooFewOptions(1)));
        assert_eq!(
            parse_reply("Q?\nA one\nB two\nE"),
            Err(QuizError::BadAnswer("E".into()))
        );
        assert_eq!(
            parse_reply("Q?\nA one\nB two\n2"),
            Err(QuizError::BadAnswer("2".into()))
        );
    }

    #[test]
    fn test_builtin_bank_is_well_formed() {
        let bank = QuestionBank::builtin();
        assert_eq!(bank.len(), 8);
        for q in &bank.questions {
            assert!(q.correct < q.options.len());
        }
    }

    #[test]
    fn test_bank_json_accepts_legacy_field_names() {
        let json = r#"[{"question": "Q?", "options": ["A. a", "B. b"], "correct_answer": 1}]"#;
        let bank: QuestionBank = serde_json::from_str(json).unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.pick(&mut rand::rng()).correct, 1);
    }

    #[test]
    fn test_bank_file_round_trip_and_corruption() {
        let path = std::env::temp_dir().join(format!("pinch_snake_bank_{}.json", std::process::id()));
        let bank = QuestionBank::new(vec![QuizQuestion::new(
            "Q?",
            vec!["A. a".into(), "B. b".into()],
            0,
        )]);
        assert!(bank.save_to(&path));
        assert_eq!(QuestionBank::load_from(&path), bank);

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(QuestionBank::load_from(&path), QuestionBank::builtin());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_local_provider_delivers() {
        let mut provider = QuestionProvider::local(QuestionBank::builtin());
        assert!(provider.poll().is_none());
        provider.request();
        let q = poll_until(&mut provider, Duration::from_secs(5));
        assert!(q.is_some());
        assert!(!provider.is_pending());
    }

    #[test]
    fn test_not_ready_until_source_finishes() {
        let (tx, rx) = channel();
        let source = Arc::new(GatedSource { gate: Mutex::new(rx) });
        let mut provider = QuestionProvider::new(source, QuestionBank::builtin());

        provider.request();
        assert!(provider.poll().is_none());
        assert!(provider.is_pending());
        // Fallback is always available without waiting
        assert!(QuestionBank::builtin().questions.contains(&provider.fallback()));

        tx.send(()).unwrap();
        let q = poll_until(&mut provider, Duration::from_secs(5)).unwrap();
        assert_eq!(q.text, "gated");
    }

    #[test]
    fn test_cancelled_fetch_never_publishes() {
        let (tx, rx) = channel();
        let source = Arc::new(GatedSource { gate: Mutex::new(rx) });
        let mut provider = QuestionProvider::new(source, QuestionBank::builtin());

        provider.request();
        let cell = provider.pending.as_ref().map(|p| Arc::clone(&p.cell)).unwrap();
        provider.cancel();
        assert!(!provider.is_pending());
        tx.send(()).unwrap();

        // The worker holds the only other handle; wait for it to finish
        let start = Instant::now();
        while Arc::strong_count(&cell) > 1 && start.elapsed() < Duration::from_secs(5) {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(Arc::strong_count(&cell), 1);
        assert!(cell.get().is_none());
        assert!(provider.poll().is_none());
    }

    #[test]
    fn test_failed_fetch_allows_retry() {
        let mut provider = QuestionProvider::new(Arc::new(FailingSource), QuestionBank::builtin());
        provider.request();
        let start = Instant::now();
        while provider.is_pending() && start.elapsed() < Duration::from_secs(5) {
            let _ = provider.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!provider.is_pending());
    }

    #[test]
    fn test_reply_source() {
        let source = ReplySource::new(|| Ok("Q?\nA. yes\nB. no\nA".to_string()));
        assert_eq!(source.fetch().unwrap().correct, 0);

        let offline = ReplySource::new(|| Err("timeout".to_string()));
        assert_eq!(
            offline.fetch(),
            Err(QuizError::Unavailable("timeout".into()))
        );
    }
}
