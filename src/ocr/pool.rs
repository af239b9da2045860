//! Pooled OCR engine checkout.
//!
//! Engine sessions are an explicit pooled resource with checkout/return
//! semantics rather than a process-wide singleton. A lease grants
//! exclusive use of one engine; dropping the lease returns the engine to
//! the pool.

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::error::{Error, Result};

use super::OcrEngine;

/// A fixed-size pool of OCR engines.
///
/// Checkout blocks until an engine is free, which bounds the number of
/// concurrent recognitions to the pool size.
pub struct EnginePool {
    slots: Receiver<Box<dyn OcrEngine>>,
    returns: Sender<Box<dyn OcrEngine>>,
}

impl EnginePool {
    /// Create a pool of `size` engines produced by `make`.
    pub fn new<F>(size: usize, mut make: F) -> Self
    where
        F: FnMut() -> Box<dyn OcrEngine>,
    {
        let size = size.max(1);
        let (returns, slots) = bounded(size);
        for _ in 0..size {
            // Channel has exactly `size` capacity; this cannot block.
            let _ = returns.send(make());
        }
        Self { slots, returns }
    }

    /// Check out an engine, blocking until one is free.
    pub fn checkout(&self) -> Result<EngineLease> {
        let engine = self
            .slots
            .recv()
            .map_err(|_| Error::EngineUnavailable("engine pool is closed".to_string()))?;
        Ok(EngineLease {
            engine: Some(engine),
            returns: self.returns.clone(),
        })
    }

    /// Number of engines currently idle in the pool.
    pub fn idle(&self) -> usize {
        self.slots.len()
    }
}

/// Exclusive lease on a pooled engine; returns it to the pool on drop.
pub struct EngineLease {
    engine: Option<Box<dyn OcrEngine>>,
    returns: Sender<Box<dyn OcrEngine>>,
}

impl std::ops::Deref for EngineLease {
    type Target = dyn OcrEngine;

    fn deref(&self) -> &Self::Target {
        // Invariant: `engine` is only None after drop.
        self.engine
            .as_deref()
            .unwrap_or_else(|| unreachable!("engine lease already returned"))
    }
}

impl Drop for EngineLease {
    fn drop(&mut self) {
        if let Some(engine) = self.engine.take() {
            // The pool may be gone during shutdown; the engine is then
            // simply dropped.
            let _ = self.returns.send(engine);
        }
    }
}
