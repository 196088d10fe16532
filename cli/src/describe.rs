use anyhow::{Context, Result};
use clap::Parser;
use simkube_model::sim_manager::SimManager;

/// Retrieve the YAML description of a simulation.
#[derive(Debug, Parser)]
pub(crate) struct Describe {
    /// The name of the simulation we want the description from.
    name: String,
}

impl Describe {
    pub(crate) async fn run(self, client: SimManager<'_>) -> Result<()> {
        let simulation = client
            .get_simulation(&self.name)
            .await
            .context("Unable to get simulation")?;
        print!(
            "{}",
            serde_yaml::to_string(&simulation).context("Unable to serialize simulation")?
        );
        Ok(())
    }
}
