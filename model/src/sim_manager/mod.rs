pub use error::{Error, Result};
pub use manager::{convert_manifest, read_manifest, SimManager};

mod error;
mod manager;
