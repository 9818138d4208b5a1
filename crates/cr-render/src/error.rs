// SPDX-License-Identifier: MIT
//
// Errors the renderer surfaces to its caller.
//
// Almost nothing is an error here. A full pair cache, malformed text, an
// empty clip intersection, or a clip stack overflow all degrade the picture
// and keep the frame going. What remains is the terminal device itself
// failing, and using a renderer after it was terminated.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The terminal device could not be configured, written, or restored.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// `initialize` was called on a renderer that was already terminated.
    #[error("renderer has been terminated")]
    Terminated,
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts_and_displays() {
        let err: RenderError = std::io::Error::other("tty gone").into();
        assert!(matches!(err, RenderError::Io(_)));
        assert_eq!(err.to_string(), "terminal I/O failed: tty gone");
    }

    #[test]
    fn terminated_displays() {
        assert_eq!(
            RenderError::Terminated.to_string(),
            "renderer has been terminated"
        );
    }
}
