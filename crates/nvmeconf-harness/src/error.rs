use std::panic::Location;

use thiserror::Error;

use nvmeconf_queues::{ExchangeError, QueueError};
use nvmeconf_registers::RegisterError;

/// The one error type a test body is allowed to fail with.
///
/// Component errors already carry their own diagnosis (queue ids, counts,
/// dump paths); free-form setup failures record the raising source location
/// instead.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Register(#[from] RegisterError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error("{location}: {message}")]
    Setup {
        location: &'static Location<'static>,
        message: String,
    },
}

impl HarnessError {
    /// Setup failure tagged with the caller's source location.
    #[track_caller]
    pub fn setup(message: impl Into<String>) -> Self {
        HarnessError::Setup {
            location: Location::caller(),
            message: message.into(),
        }
    }
}
