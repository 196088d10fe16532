use anyhow::{Context, Result};
use clap::{value_parser, Parser};
use kube::ResourceExt;
use simkube_model::sim_manager::{read_manifest, SimManager};
use std::path::PathBuf;

/// Create the objects stored in a YAML file at `path`. Every object's kind must be one that
/// `skctl` knows about.
#[derive(Debug, Parser)]
pub(crate) struct Apply {
    /// Path to the manifest YAML file.
    #[clap(value_parser = value_parser!(PathBuf))]
    path: PathBuf,
}

impl Apply {
    pub(crate) async fn run(self, client: SimManager<'_>) -> Result<()> {
        let objects =
            read_manifest(&self.path, client.scheme()).context("Unable to read manifest")?;
        for object in objects {
            client
                .create_object(&object)
                .await
                .context("Unable to create object")?;
            println!("Successfully added '{}'.", object.name_any());
        }
        Ok(())
    }
}
