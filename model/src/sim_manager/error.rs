use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// The error type for `SimManager`
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum Error {
    #[snafu(display("Unable to create client: {}", source))]
    ClientCreateKubeconfig {
        source: kube::config::KubeconfigError,
    },

    #[snafu(display("Unable to read kubeconfig: {}", source))]
    ConfigRead {
        source: kube::config::KubeconfigError,
    },

    #[snafu(display("Unable to read file '{}': {}", path.display(), source))]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Unable to {}: {}", action, source))]
    Kube { action: String, source: kube::Error },

    #[snafu(display("Object {} is missing `apiVersion` or `kind`", what))]
    MissingTypeMeta { what: String },

    #[snafu(display("Unable to {}: {}", action, source))]
    SerdeYaml {
        action: String,
        source: serde_yaml::Error,
    },

    #[snafu(display(
        "Kind '{}' in apiVersion '{}' is not registered in the scheme",
        kind,
        api_version
    ))]
    UnknownKind { api_version: String, kind: String },
}
