//! Shared helpers for unit tests.
#![allow(clippy::unwrap_used)]

use std::sync::Mutex;

use crate::progress::{ProgressReporter, ProgressUpdate};

/// Serializes tests that touch the process-wide hub token.
pub(crate) static TOKEN_LOCK: Mutex<()> = Mutex::new(());

/// Reporter that records every update it receives.
#[derive(Debug, Default)]
pub(crate) struct CollectingReporter {
    pub(crate) updates: Mutex<Vec<ProgressUpdate>>,
}

impl ProgressReporter for CollectingReporter {
    fn report(&self, update: &ProgressUpdate) {
        self.updates.lock().unwrap().push(update.clone());
    }
}

impl CollectingReporter {
    pub(crate) fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates.lock().unwrap().clone()
    }
}
