use anyhow::{Context, Result};
use clap::{value_parser, Parser};
use simkube_model::constants::ENV_POD_NAME;
use simkube_model::{make_node, EnvIdentity};
use std::path::PathBuf;

/// Build a simulated node from the node skeleton at `skeleton` and print it as YAML. The node is
/// named after the value of the identity environment variable.
#[derive(Debug, Parser)]
pub(crate) struct MakeNode {
    /// Path to the node skeleton YAML file.
    #[clap(long, short = 's', value_parser = value_parser!(PathBuf))]
    skeleton: PathBuf,

    /// The environment variable that holds the node's name.
    #[clap(long = "identity-env", default_value = ENV_POD_NAME)]
    identity_env: String,
}

impl MakeNode {
    pub(crate) fn run(self) -> Result<()> {
        let node = make_node(&self.skeleton, &EnvIdentity::new(self.identity_env))
            .context("Unable to construct node")?;
        print!(
            "{}",
            serde_yaml::to_string(&node).context("Unable to serialize node")?
        );
        Ok(())
    }
}
