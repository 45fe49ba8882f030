pub mod payment_submission;

pub use storage_impl::{MockDb, Store};

use self::payment_submission::PaymentSubmissionInterface;

/// Which storage backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageImpl {
    Postgresql,
    Mock,
}

#[async_trait::async_trait]
pub trait StorageInterface:
    Send + Sync + dyn_clone::DynClone + PaymentSubmissionInterface + 'static
{
}

impl StorageInterface for Store {}
impl StorageInterface for MockDb {}

dyn_clone::clone_trait_object!(StorageInterface);
