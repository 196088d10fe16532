use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A SimKube Simulation. The `CustomResource` derive also produces a struct named `Simulation`
/// which represents a simulation CRD object in the k8s API.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    derive = "Default",
    derive = "PartialEq",
    group = "simkube.io",
    kind = "Simulation",
    plural = "simulations",
    singular = "simulation",
    shortname = "sim",
    status = "SimulationStatus",
    version = "v1",
    printcolumn = r#"{"name":"State", "type":"string", "jsonPath":".status.state"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSpec {
    /// The namespace that the simulation driver runs in.
    pub driver_namespace: String,
    /// Location of the trace that the simulation replays.
    pub trace: String,
    /// How long to run the simulation for, e.g. `30m`. Runs the whole trace if absent.
    pub duration: Option<String>,
    /// How many times to replay the trace.
    pub repetitions: Option<i32>,
}

/// The status field of the Simulation CRD.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStatus {
    pub state: Option<SimulationState>,
    /// If the `state` is `Failed` there *may* be an error message here.
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy, JsonSchema)]
pub enum SimulationState {
    Blocked,
    Initializing,
    Running,
    Finished,
    Failed,
    Retrying,
}

impl Display for SimulationState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SimulationState::Blocked => "blocked",
            SimulationState::Initializing => "initializing",
            SimulationState::Running => "running",
            SimulationState::Finished => "finished",
            SimulationState::Failed => "failed",
            SimulationState::Retrying => "retrying",
        };
        write!(f, "{}", s)
    }
}

impl Simulation {
    /// The current state, or `None` if no driver has reported on the simulation yet.
    pub fn state(&self) -> Option<SimulationState> {
        self.status.as_ref().and_then(|status| status.state)
    }
}
