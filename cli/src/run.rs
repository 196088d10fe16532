use anyhow::{Context, Result};
use clap::Parser;
use kube::core::ObjectMeta;
use simkube_model::constants::{APP_MANAGED_BY, DEFAULT_DRIVER_NAMESPACE, SKCTL};
use simkube_model::sim_manager::SimManager;
use simkube_model::{Simulation, SimulationSpec};
use std::collections::BTreeMap;

/// Create a `Simulation` that replays a trace.
#[derive(Debug, Parser)]
pub(crate) struct Run {
    /// Name of the simulation.
    #[clap(long)]
    name: String,

    /// Location of the trace to replay.
    #[clap(long)]
    trace: String,

    /// The namespace the simulation driver runs in.
    #[clap(long, default_value = DEFAULT_DRIVER_NAMESPACE)]
    driver_namespace: String,

    /// How long to run the simulation for, e.g. `30m`.
    #[clap(long)]
    duration: Option<String>,

    /// How many times to replay the trace.
    #[clap(long)]
    repetitions: Option<i32>,
}

impl Run {
    pub(crate) async fn run(self, client: SimManager<'_>) -> Result<()> {
        let simulation = Simulation {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                labels: Some(BTreeMap::from([(
                    APP_MANAGED_BY.to_string(),
                    SKCTL.to_string(),
                )])),
                ..Default::default()
            },
            spec: SimulationSpec {
                driver_namespace: self.driver_namespace,
                trace: self.trace,
                duration: self.duration,
                repetitions: self.repetitions,
            },
            status: None,
        };
        client
            .create_simulation(&simulation)
            .await
            .context("Unable to create simulation")?;
        println!("Successfully added '{}'.", self.name);
        Ok(())
    }
}
