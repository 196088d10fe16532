use anyhow::{Context, Result};
use clap::Parser;
use kube::ResourceExt;
use serde::Serialize;
use simkube_model::sim_manager::SimManager;
use simkube_model::Simulation;
use tabled::object::Segment;
use tabled::{Alignment, Modify, Style, Table, Tabled, Width};
use terminal_size::{Height, Width as TerminalWidth};

/// Check the status of the simulations in the cluster.
#[derive(Debug, Parser)]
pub(crate) struct Status {
    /// Output the results in JSON format.
    #[clap(long = "json")]
    json: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct SimulationSummary {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "STATE")]
    state: String,
    #[tabled(rename = "TRACE")]
    trace: String,
}

impl From<&Simulation> for SimulationSummary {
    fn from(simulation: &Simulation) -> Self {
        Self {
            name: simulation.name_any(),
            state: simulation
                .state()
                .map(|state| state.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            trace: simulation.spec.trace.clone(),
        }
    }
}

/// Lay the summaries out as a borderless, left-aligned table no wider than `width`.
fn render(summaries: &[SimulationSummary], width: usize) -> String {
    Table::new(summaries)
        .with(Style::blank())
        .with(Modify::new(Segment::all()).with(Alignment::left()))
        .with(Width::truncate(width))
        .to_string()
}

impl Status {
    pub(crate) async fn run(self, client: SimManager<'_>) -> Result<()> {
        let summaries: Vec<SimulationSummary> = client
            .list_simulations()
            .await
            .context("Unable to get status")?
            .iter()
            .map(SimulationSummary::from)
            .collect();

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summaries)
                    .context("Could not create string from status.")?
            );
        } else {
            let (TerminalWidth(width), _) =
                terminal_size::terminal_size().unwrap_or((TerminalWidth(120), Height(0)));
            println!("{}", render(&summaries, width as usize));
        }
        Ok(())
    }
}
