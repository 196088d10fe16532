/// Helper macro to avoid retyping the API group of the simulation types when creating further
/// string constants from it. When given no parameters, this returns the group name. When given a
/// string literal parameter it adds `/parameter` to the end.
macro_rules! simkube {
    () => {
        "simkube.io"
    };
    ($s:literal) => {
        concat!(simkube!(), "/", $s)
    };
}

// System identifiers
pub const API_VERSION: &str = simkube!("v1");
pub const GROUP: &str = simkube!();
pub const VERSION: &str = "v1";

// Namespaces
pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_DRIVER_NAMESPACE: &str = "simkube";

// Environment variables
/// Carries the name the orchestrator assigned to this pod, which a simulated node adopts as its own.
pub const ENV_POD_NAME: &str = "POD_NAME";

// Standard tags https://kubernetes.io/docs/concepts/overview/working-with-objects/common-labels/
pub const APP_MANAGED_BY: &str = "app.kubernetes.io/managed-by";
pub const SKCTL: &str = "skctl";

#[test]
fn simkube_constants_macro_test() {
    assert_eq!("simkube.io", simkube!());
    assert_eq!("simkube.io/v1", API_VERSION);
    assert_eq!("simkube.io/foo", simkube!("foo"));
}
