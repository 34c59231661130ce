use std::{fmt, path::Path, sync::Arc};

use crate::error::IoError;

/// The direction and source of a video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoMode {
    /// Read frames from a file.
    ReadFile,
    /// Read frames from a capture device, addressed by index.
    ReadCamera,
    /// Write frames to a file.
    Write,
}

impl fmt::Display for IoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoMode::ReadFile => write!(f, "IoMode::ReadFile"),
            IoMode::ReadCamera => write!(f, "IoMode::ReadCamera"),
            IoMode::Write => write!(f, "IoMode::Write"),
        }
    }
}

/// A video backend that can report what it supports.
///
/// All capability queries default to `false`, so a handler only implements the ones it
/// answers positively for.
pub trait VideoIo: Send + Sync {
    /// A short name used in logs.
    fn name(&self) -> &str;

    /// Returns true if the handler can decode the file at `path`.
    fn can_read_file(&self, _path: &Path) -> bool {
        false
    }

    /// Returns true if the handler can open the capture device `index`.
    fn can_read_camera(&self, _index: usize) -> bool {
        false
    }

    /// Returns true if the handler can encode to the file at `path`.
    fn can_write_file(&self, _path: &Path) -> bool {
        false
    }
}

/// An ordered list of video handlers.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use stencil_io::{IoMode, VideoIo, VideoIoFactory};
///
/// struct Raw;
///
/// impl VideoIo for Raw {
///     fn name(&self) -> &str {
///         "raw"
///     }
///
///     fn can_read_file(&self, path: &Path) -> bool {
///         path.extension().is_some_and(|ext| ext == "raw")
///     }
/// }
///
/// let mut factory = VideoIoFactory::new();
/// factory.register(Raw);
///
/// let io = factory.create_video_io(IoMode::ReadFile, "clip.raw").unwrap();
/// assert_eq!(io.map(|io| io.name().to_string()), Some("raw".to_string()));
/// assert!(factory.create_video_io(IoMode::Write, "clip.raw").unwrap().is_none());
/// ```
#[derive(Default, Clone)]
pub struct VideoIoFactory {
    handlers: Vec<Arc<dyn VideoIo>>,
}

impl VideoIoFactory {
    /// Create a factory with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler. Handlers are probed in registration order.
    pub fn register(&mut self, handler: impl VideoIo + 'static) {
        self.register_shared(Arc::new(handler));
    }

    /// Append a handler that is also held elsewhere.
    pub fn register_shared(&mut self, handler: Arc<dyn VideoIo>) {
        log::debug!("registered video handler {}", handler.name());
        self.handlers.push(handler);
    }

    /// The number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Return the first handler that supports `mode` for `arg`.
    ///
    /// `arg` is a path for [`IoMode::ReadFile`] and [`IoMode::Write`] and a device index for
    /// [`IoMode::ReadCamera`]. Returns `Ok(None)` when no handler claims support.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidCameraIndex`] if `mode` is [`IoMode::ReadCamera`] and `arg`
    /// does not parse as an index.
    pub fn create_video_io(
        &self,
        mode: IoMode,
        arg: &str,
    ) -> Result<Option<Arc<dyn VideoIo>>, IoError> {
        let camera = match mode {
            IoMode::ReadCamera => Some(
                arg.trim()
                    .parse::<usize>()
                    .map_err(|_| IoError::InvalidCameraIndex(arg.to_string()))?,
            ),
            IoMode::ReadFile | IoMode::Write => None,
        };

        let path = Path::new(arg);
        let found = self.handlers.iter().find(|handler| match (mode, camera) {
            (IoMode::ReadCamera, Some(index)) => handler.can_read_camera(index),
            (IoMode::ReadFile, _) => handler.can_read_file(path),
            (IoMode::Write, _) => handler.can_write_file(path),
            (IoMode::ReadCamera, None) => false,
        });

        match found {
            Some(handler) => log::debug!("{mode} {arg:?}: selected {}", handler.name()),
            None => log::warn!("{mode} {arg:?}: no video handler available"),
        }

        Ok(found.cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mock {
        name: &'static str,
        extension: &'static str,
        cameras: usize,
        writes: bool,
    }

    impl VideoIo for Mock {
        fn name(&self) -> &str {
            self.name
        }

        fn can_read_file(&self, path: &Path) -> bool {
            path.extension().is_some_and(|ext| ext == self.extension)
        }

        fn can_read_camera(&self, index: usize) -> bool {
            index < self.cameras
        }

        fn can_write_file(&self, path: &Path) -> bool {
            self.writes && self.can_read_file(path)
        }
    }

    fn factory() -> VideoIoFactory {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut factory = VideoIoFactory::new();
        factory.register(Mock {
            name: "avi-reader",
            extension: "avi",
            cameras: 0,
            writes: false,
        });
        factory.register(Mock {
            name: "avi-codec",
            extension: "avi",
            cameras: 2,
            writes: true,
        });
        factory.register(Mock {
            name: "webcam",
            extension: "",
            cameras: 8,
            writes: false,
        });
        factory
    }

    fn selected(
        factory: &VideoIoFactory,
        mode: IoMode,
        arg: &str,
    ) -> Result<Option<String>, IoError> {
        Ok(factory
            .create_video_io(mode, arg)?
            .map(|io| io.name().to_string()))
    }

    #[test]
    fn first_match_wins() -> Result<(), IoError> {
        let factory = factory();
        assert_eq!(factory.len(), 3);
        assert_eq!(
            selected(&factory, IoMode::ReadFile, "movie.avi")?.as_deref(),
            Some("avi-reader")
        );
        assert_eq!(
            selected(&factory, IoMode::Write, "movie.avi")?.as_deref(),
            Some("avi-codec")
        );
        assert_eq!(
            selected(&factory, IoMode::ReadCamera, "1")?.as_deref(),
            Some("avi-codec")
        );
        assert_eq!(
            selected(&factory, IoMode::ReadCamera, "5")?.as_deref(),
            Some("webcam")
        );
        Ok(())
    }

    #[test]
    fn no_handler() -> Result<(), IoError> {
        let factory = factory();
        assert_eq!(selected(&factory, IoMode::ReadFile, "movie.mp4")?, None);
        assert_eq!(selected(&factory, IoMode::ReadCamera, "8")?, None);
        assert_eq!(selected(&VideoIoFactory::new(), IoMode::Write, "a.avi")?, None);
        Ok(())
    }

    #[test]
    fn invalid_camera_index() {
        let factory = factory();
        for arg in ["", "cam0", "-1"] {
            assert_eq!(
                selected(&factory, IoMode::ReadCamera, arg),
                Err(IoError::InvalidCameraIndex(arg.to_string()))
            );
        }
    }

    #[test]
    fn io_mode_display() {
        assert_eq!(IoMode::ReadFile.to_string(), "IoMode::ReadFile");
        assert_eq!(IoMode::ReadCamera.to_string(), "IoMode::ReadCamera");
        assert_eq!(IoMode::Write.to_string(), "IoMode::Write");
    }
}
