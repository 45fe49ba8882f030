use std::sync::Arc;

use futures::lock::Mutex;

use crate::payment_submission::PaymentSubmission;

/// In-memory storage backend.
///
/// Every collection sits behind a single async mutex, which is what makes
/// check-then-insert sequences atomic for callers holding the lock across
/// both steps.
#[derive(Clone, Debug, Default)]
pub struct MockDb {
    pub payment_submissions: Arc<Mutex<Vec<PaymentSubmission>>>,
}

impl MockDb {
    pub fn new() -> Self {
        Self::default()
    }
}
