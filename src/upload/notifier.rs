use crate::upload::validator::Rejection;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Receives the user-facing notice for each rejected file.
pub trait Notifier: Send + Sync {
    fn alert(&self, rejection: &Rejection);
}

/// Pending alerts, shown by the UI one at a time. While any alert is pending
/// the widget takes no other input.
#[derive(Debug, Clone, Default)]
pub struct AlertQueue {
    pending: Arc<Mutex<VecDeque<String>>>,
}

impl AlertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Option<String> {
        self.lock().front().cloned()
    }

    pub fn dismiss(&self) {
        self.lock().pop_front();
    }

    pub fn is_blocking(&self) -> bool {
        !self.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Notifier for AlertQueue {
    fn alert(&self, rejection: &Rejection) {
        self.lock().push_back(rejection.to_string());
    }
}
