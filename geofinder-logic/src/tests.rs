use std::{
    collections::VecDeque,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use tokio::{
    sync::{Mutex, oneshot},
    task::yield_now,
};

use crate::{
    StateUpdateSender,
    location::{LocationFix, LocationService, PositionError},
    settings::PositionOptions,
};

type Answer = Result<LocationFix, PositionError>;

/// Location service where each query waits for an answer the test sends in by hand
pub struct MockLocation {
    supported: AtomicBool,
    calls: AtomicUsize,
    answers: Mutex<VecDeque<oneshot::Receiver<Answer>>>,
}

impl Default for MockLocation {
    fn default() -> Self {
        Self {
            supported: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
            answers: Mutex::new(VecDeque::new()),
        }
    }
}

impl MockLocation {
    pub fn unsupported() -> Self {
        let loc = Self::default();
        loc.set_supported(false);
        loc
    }

    pub fn set_supported(&self, supported: bool) {
        self.supported.store(supported, Ordering::SeqCst);
    }

    /// Number of queries that reached the platform
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Queue up an answer for the next unanswered query, the query resolves when the returned
    /// sender is used
    pub async fn script(&self) -> oneshot::Sender<Answer> {
        let (tx, rx) = oneshot::channel();
        self.answers.lock().await.push_back(rx);
        tx
    }

    /// Queue up an answer that's ready immediately
    pub async fn script_now(&self, answer: Answer) {
        let tx = self.script().await;
        tx.send(answer).expect("Failed to queue answer");
    }
}

impl LocationService for MockLocation {
    fn is_supported(&self) -> bool {
        self.supported.load(Ordering::SeqCst)
    }

    async fn current_position(&self, options: PositionOptions) -> Answer {
        assert_eq!(options, PositionOptions::DEFAULT);
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answer = self.answers.lock().await.pop_front();
        match answer {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(PositionError::Unknown("dropped".to_string()))),
            None => Err(PositionError::Unknown("unscripted".to_string())),
        }
    }
}

#[derive(Default)]
pub struct CountingSender(AtomicUsize);

impl CountingSender {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl StateUpdateSender for CountingSender {
    fn send_update(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Let spawned request tasks run until they block again
pub async fn settle() {
    for _ in 0..16 {
        yield_now().await;
    }
}
