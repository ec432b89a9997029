use thiserror::Error;

/// Failures reported by a [`crate::storage::Storage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Nothing exists at the requested path.
    #[error("not found: {0}")]
    NotFound(String),

    /// The path exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Underlying IO error.
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: &str, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_string()),
            _ => Self::Io {
                path: path.to_string(),
                source,
            },
        }
    }
}

/// Failures reported by a [`crate::codec::ImageCodec`].
#[derive(Debug, Error)]
pub enum CodecError {
    /// Reading the source or writing the destination failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The byte stream is not a decodable image of the expected format.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// The image exceeds the decode budget of the device.
    #[error("image too large: {width}x{height}")]
    TooLarge { width: u32, height: u32 },

    /// Decoding produced no pixels.
    #[error("image has no pixels")]
    Empty,
}

/// Why an image could not be shown. The display text is drawn in place of the
/// image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OpenFailure {
    /// The resolved file could not be opened for reading.
    #[error("Error opening file")]
    CannotOpen,

    /// The file opened but its bitmap header did not parse.
    #[error("Invalid image format")]
    InvalidFormat,
}
