//! Boundary with the external text recognizer
//!
//! The recognizer is swappable behind [`TextRecognizer`]. Calls are wrapped
//! by [`BoundedRecognizer`], which enforces a time budget and honors a
//! cancellation token; in both cases the caller gets an error and nothing of
//! the late answer is used.
//!
//! An abandoned call keeps its worker thread until the engine returns. The
//! number of live workers is capped, so a stuck engine costs at most that many
//! threads; further calls are refused until one of them ends.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Point, Rectangle};

/// Polling step while waiting for the recognizer
const POLL_STEP: Duration = Duration::from_millis(10);

/// Default cap on live recognizer workers
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// A line of text as returned by the recognizer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TextLine {
    pub value: String,
    pub bounds: Rectangle,
    /// Font size of the first word, in working units
    pub font_size: f32,
}

impl TextLine {
    pub fn new(value: impl Into<String>, bounds: Rectangle, font_size: f32) -> Self {
        Self {
            value: value.into(),
            bounds,
            font_size,
        }
    }

    pub fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    /// Char aspect: (height * char count) / width
    pub fn aspect(&self) -> f64 {
        if self.bounds.width == 0 {
            return f64::INFINITY;
        }
        (self.bounds.height as f64 * self.char_count() as f64) / self.bounds.width as f64
    }
}

/// Area and foreground pixels submitted to the recognizer
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PixelRegion {
    pub bounds: Rectangle,
    pub pixels: Vec<Point>,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecognizerError {
    #[error("text recognizer is not available")]
    Unavailable,
    #[error("text recognizer did not answer within {0:?}")]
    Timeout(Duration),
    #[error("text recognition cancelled")]
    Cancelled,
    #[error("{0} text recognizer workers still running")]
    Saturated(usize),
    #[error("text recognizer failure: {0}")]
    Engine(String),
}

/// External text recognition engine
///
/// Zero, one or several lines are all valid answers.
pub trait TextRecognizer: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }

    fn recognize(&self, region: &PixelRegion, language: &str) -> Result<Vec<TextLine>, RecognizerError>;
}

/// Shared flag to abandon pending recognitions
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Slot of a live worker, released when the worker ends
struct WorkerSlot(Arc<AtomicUsize>);

impl WorkerSlot {
    fn acquire(live: &Arc<AtomicUsize>, max: usize) -> Option<Self> {
        if live.fetch_add(1, Ordering::SeqCst) >= max {
            live.fetch_sub(1, Ordering::SeqCst);
            return None;
        }
        Some(Self(Arc::clone(live)))
    }
}

impl Drop for WorkerSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Recognizer call with a time budget and a cancellation token
///
/// Clones share the cap on live workers.
#[derive(Clone)]
pub struct BoundedRecognizer {
    inner: Arc<dyn TextRecognizer>,
    timeout: Duration,
    cancel: CancellationToken,
    max_workers: usize,
    live_workers: Arc<AtomicUsize>,
}

impl BoundedRecognizer {
    pub fn new(inner: Arc<dyn TextRecognizer>, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            cancel: CancellationToken::new(),
            max_workers: DEFAULT_MAX_WORKERS,
            live_workers: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    /// Worker threads currently running, abandoned ones included
    pub fn live_workers(&self) -> usize {
        self.live_workers.load(Ordering::SeqCst)
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_available()
    }

    /// Run the recognizer on a worker thread and wait for its answer
    ///
    /// On timeout or cancellation the worker is abandoned and its answer,
    /// if any, is dropped. When `max_workers` workers are still running the
    /// call is refused with `Saturated`.
    pub fn recognize(&self, region: PixelRegion, language: &str) -> Result<Vec<TextLine>, RecognizerError> {
        if self.cancel.is_cancelled() {
            return Err(RecognizerError::Cancelled);
        }

        let slot = WorkerSlot::acquire(&self.live_workers, self.max_workers)
            .ok_or(RecognizerError::Saturated(self.max_workers))?;

        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let language = language.to_string();

        thread::Builder::new()
            .name("omr-text-recognizer".to_string())
            .spawn(move || {
                let _slot = slot;
                // The receiver may be gone after a timeout
                let _ = tx.send(inner.recognize(&region, &language));
            })
            .map_err(|e| RecognizerError::Engine(e.to_string()))?;

        let deadline = Instant::now() + self.timeout;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Err(RecognizerError::Timeout(self.timeout));
            }

            match rx.recv_timeout(POLL_STEP.min(deadline - now)) {
                Ok(result) => {
                    if self.cancel.is_cancelled() {
                        return Err(RecognizerError::Cancelled);
                    }
                    return result;
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.cancel.is_cancelled() {
                        return Err(RecognizerError::Cancelled);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(RecognizerError::Engine("recognizer worker stopped without answer".to_string()));
                }
            }
        }
    }
}
