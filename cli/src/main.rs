/*!

This is the command line interface for running simulations in a SimKube cluster and for building
the simulated nodes that take part in them.

!*/

mod apply;
mod crd;
mod delete;
mod describe;
mod node;
mod run;
mod status;

use anyhow::Context;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use simkube_model::sim_manager::SimManager;
use simkube_model::Scheme;
use std::path::{Path, PathBuf};

/// The command line interface for SimKube.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// Set logging verbosity [trace|debug|info|warn|error]. If the environment variable `RUST_LOG`
    /// is present, it overrides the default logging behavior. See https://docs.rs/env_logger/latest
    #[clap(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
    /// Path to the kubeconfig file. Also can be passed with the KUBECONFIG environment variable.
    #[clap(long = "kubeconfig")]
    kubeconfig: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Parser)]
enum Command {
    /// Start a simulation.
    Run(run::Run),
    /// Create the objects in a manifest file.
    Apply(apply::Apply),
    /// Delete a simulation.
    Delete(delete::Delete),
    /// Get the status of simulations.
    Status(status::Status),
    /// Print a simulation as YAML.
    Describe(describe::Describe),
    /// Print the Simulation custom resource definition.
    Crd(crd::Crd),
    /// Build a simulated node from a node skeleton.
    Node(node::MakeNode),
}

/// Why `skctl` stopped early. Registration and bootstrap failures are reported on stdout, command
/// failures on stderr; all exit with status 1.
#[derive(Debug)]
enum Failure {
    Registration(anyhow::Error),
    Bootstrap(anyhow::Error),
    Command(anyhow::Error),
}

impl Failure {
    fn message(&self) -> String {
        match self {
            Failure::Registration(e) => {
                format!("could not register the simulation scheme: {:#}", e)
            }
            Failure::Bootstrap(e) => format!("could not construct Kubernetes client: {:#}", e),
            Failure::Command(e) => format!("{:#}", e),
        }
    }
}

impl From<anyhow::Error> for Failure {
    fn from(e: anyhow::Error) -> Self {
        Failure::Command(e)
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logger(args.log_level);
    match run(args).await {
        Ok(()) => {}
        Err(failure @ Failure::Command(_)) => {
            eprintln!("{}", failure.message());
            std::process::exit(1);
        }
        Err(failure) => {
            println!("{}", failure.message());
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> Result<(), Failure> {
    let scheme = Scheme::simulation()
        .context("Unable to register the simulation scheme")
        .map_err(Failure::Registration)?;
    let kubeconfig = args.kubeconfig.as_deref();
    match args.command {
        Command::Run(run) => run.run(connect(kubeconfig, &scheme).await?).await?,
        Command::Apply(apply) => apply.run(connect(kubeconfig, &scheme).await?).await?,
        Command::Delete(delete) => delete.run(connect(kubeconfig, &scheme).await?).await?,
        Command::Status(status) => status.run(connect(kubeconfig, &scheme).await?).await?,
        Command::Describe(describe) => describe.run(connect(kubeconfig, &scheme).await?).await?,
        Command::Crd(crd) => crd.run()?,
        Command::Node(node) => node.run()?,
    }
    Ok(())
}

/// Construct the API client for the commands that talk to the cluster.
async fn connect<'a>(
    kubeconfig: Option<&Path>,
    scheme: &'a Scheme,
) -> Result<SimManager<'a>, Failure> {
    match kubeconfig {
        Some(path) => SimManager::new_from_kubeconfig_path(path, scheme)
            .await
            .context(format!(
                "Unable to create simkube client from path '{:?}'",
                path
            )),
        None => SimManager::new(scheme)
            .await
            .context("Unable to create default simkube client"),
    }
    .map_err(Failure::Bootstrap)
}

/// Initialize the logger with the value passed by `--log-level` (or its default) when the
/// `RUST_LOG` environment variable is not present. If present, the `RUST_LOG` environment variable
/// overrides `--log-level`/`level`.
fn init_logger(level: LevelFilter) {
    match std::env::var(env_logger::DEFAULT_FILTER_ENV).ok() {
        Some(_) => {
            // RUST_LOG exists; env_logger will use it.
            Builder::from_default_env().init();
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate and the model only.
            Builder::new()
                .filter(Some(env!("CARGO_CRATE_NAME")), level)
                .filter(Some("simkube_model"), level)
                .init();
        }
    }
}
