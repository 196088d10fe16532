use anyhow::{Context, Result};
use clap::Parser;
use simkube_model::sim_manager::SimManager;

/// Delete a simulation from the cluster.
#[derive(Debug, Parser)]
pub(crate) struct Delete {
    /// The name of the simulation to delete.
    name: String,
}

impl Delete {
    pub(crate) async fn run(self, client: SimManager<'_>) -> Result<()> {
        client
            .delete_simulation(&self.name)
            .await
            .context(format!("Unable to delete simulation '{}'", self.name))?;
        println!("Deletion of '{}' was requested.", self.name);
        Ok(())
    }
}
