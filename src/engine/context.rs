//! Per-call parse state
//!
//! A `ParseContext` lives for exactly one top-level parse. It records:
//! - whether asynchronous steps may be awaited (`Mode`)
//! - whether the walk must stop (configuration error or cancellation)
//! - the caller's cancellation signal, if any
//!
//! Schemas carry no per-call state, so concurrent parses of the same
//! schema never share a context.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Sync,
    Async,
}

impl Mode {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Mode::Sync => "sync",
            Mode::Async => "async",
        }
    }
}

/// Cloneable handle that cancels in-flight asynchronous parses.
///
/// Cancellation is level-triggered: a parse started after `cancel()`
/// stops at its first asynchronous step.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `cancel()` has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            // sender lives as long as self; never reached
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct ParseContext {
    pub(crate) mode: Mode,
    cancel: Option<CancelSignal>,
    halted: AtomicBool,
    cancelled: AtomicBool,
    async_steps: AtomicU64,
}

impl ParseContext {
    pub(crate) fn new(mode: Mode, cancel: Option<CancelSignal>) -> Self {
        Self {
            mode,
            cancel,
            halted: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
            async_steps: AtomicU64::new(0),
        }
    }

    /// Stops the walk: composites return after the current child.
    pub(crate) fn halt(&self) {
        self.halted.store(true, Ordering::Relaxed);
    }

    pub(crate) fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Relaxed)
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn mark_cancelled(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
        self.halt();
    }

    /// Number of asynchronous steps awaited so far.
    pub(crate) fn async_steps(&self) -> u64 {
        self.async_steps.load(Ordering::Relaxed)
    }

    /// Awaits one asynchronous step, racing it against cancellation.
    /// `None` means the call was cancelled and the step abandoned.
    pub(crate) async fn await_step<F, T>(&self, step: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let signal = match &self.cancel {
            None => {
                self.async_steps.fetch_add(1, Ordering::Relaxed);
                return Some(step.await);
            }
            Some(signal) => signal,
        };

        if signal.is_cancelled() {
            self.mark_cancelled();
            return None;
        }

        self.async_steps.fetch_add(1, Ordering::Relaxed);
        tokio::select! {
            biased;
            _ = signal.cancelled() => {
                self.mark_cancelled();
                None
            }
            out = step => Some(out),
        }
    }
}
