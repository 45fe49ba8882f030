pub use storage_impl::payment_submission::{PaymentSubmission, PaymentSubmissionNew};
