#![forbid(unsafe_code)]
#![warn(missing_docs)]

//!
//! Personal Identifiable Information protection. Wrapper types and traits for
//! secret management which help ensure secrets aren't accidentally copied,
//! logged, or otherwise exposed.
//!

#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/", "README.md"))]

mod strategy;
pub use strategy::{Strategy, WithType, WithoutType};

mod abs;
pub use abs::{ExposeInterface, ExposeOptionInterface, PeekInterface};

mod secret;
pub use secret::Secret;

mod serde;
pub use crate::serde::{Deserialize, SerializableSecret, Serialize};

/// This module should be included with asterisk.
///
/// `use masking::prelude::*;`
///
pub mod prelude {
    pub use super::{ExposeInterface, ExposeOptionInterface, PeekInterface};
}
