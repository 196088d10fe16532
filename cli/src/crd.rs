use anyhow::{Context, Result};
use clap::Parser;
use kube::CustomResourceExt;
use simkube_model::Simulation;

/// Print the `Simulation` CustomResourceDefinition so it can be applied to a cluster.
#[derive(Debug, Parser)]
pub(crate) struct Crd {}

impl Crd {
    pub(crate) fn run(self) -> Result<()> {
        print!(
            "{}",
            serde_yaml::to_string(&Simulation::crd()).context("Unable to serialize CRD")?
        );
        Ok(())
    }
}
