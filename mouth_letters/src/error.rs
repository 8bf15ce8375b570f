//! Start-up failures.  Once the loop is running nothing is fatal.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The window could not be created.
    #[error("window error: {0}")]
    Window(String),

    /// The face detector could not be started.
    #[error("detector failed to start: {0}")]
    Detector(String),
}

impl From<minifb::Error> for AppError {
    fn from(e: minifb::Error) -> Self {
        AppError::Window(e.to_string())
    }
}
