/// An error type for the io module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum IoError {
    /// The argument of a camera request is not a device index.
    #[error("Invalid camera index: {0:?}")]
    InvalidCameraIndex(String),
}
