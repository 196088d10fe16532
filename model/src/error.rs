use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for node construction and scheme registration.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Could not open {}: {}", path.display(), source))]
    SkeletonRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Could not parse {}: {}", path.display(), source))]
    SkeletonParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[snafu(display("Could not determine node name: {} is unset or empty", origin))]
    MissingIdentity { origin: String },

    #[snafu(display(
        "Could not determine node name: {} is not valid unicode: '{}'",
        origin,
        value
    ))]
    IdentityNotUnicode { origin: String, value: String },

    #[snafu(display("Kind '{}' is already registered in the scheme", kind))]
    DuplicateKind { kind: String },
}

/// A coarse classification of [`Error`] for callers that decide policy by failure type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorKind {
    /// The node template could not be read.
    Io,
    /// The node template did not strictly match the node schema.
    Parse,
    /// A required identity was missing.
    Configuration,
    /// The scheme rejected a registration.
    Registration,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SkeletonRead { .. } => ErrorKind::Io,
            Error::SkeletonParse { .. } => ErrorKind::Parse,
            Error::MissingIdentity { .. } | Error::IdentityNotUnicode { .. } => {
                ErrorKind::Configuration
            }
            Error::DuplicateKind { .. } => ErrorKind::Registration,
        }
    }
}
