use super::{error, Result};
use crate::constants::DEFAULT_NAMESPACE;
use crate::scheme::{Scheme, SchemeEntry, Scope};
use crate::Simulation;
use kube::api::{ListParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::core::DynamicObject;
use kube::{Api, Client, Config, ResourceExt};
use log::{debug, info};
use serde::Deserialize;
use snafu::{OptionExt, ResultExt};
use std::path::Path;

/// # Simulation Manager
///
/// The simulation manager is the API client used by `skctl`. It is constructed against a
/// [`Scheme`], which decides which object kinds it is willing to create from manifests.
///
/// Here are some of the things that you can do with the simulation manager:
/// - Create, inspect and delete `Simulation` objects
/// - Create any object whose kind is registered in the scheme
///
pub struct SimManager<'a> {
    pub k8s_client: Client,
    scheme: &'a Scheme,
}

impl<'a> SimManager<'a> {
    /// Create a `SimManager` from the path to a kubeconfig file.
    pub async fn new_from_kubeconfig_path(
        kubeconfig_path: &Path,
        scheme: &'a Scheme,
    ) -> Result<SimManager<'a>> {
        let kubeconfig = Kubeconfig::read_from(kubeconfig_path).context(error::ConfigReadSnafu)?;
        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .context(error::ClientCreateKubeconfigSnafu)?;
        Ok(SimManager {
            k8s_client: config.try_into().context(error::KubeSnafu {
                action: "create client from `Kubeconfig`",
            })?,
            scheme,
        })
    }

    /// Create a `SimManager` using the default `kube::Client`, which discovers in-cluster
    /// configuration or the local kubeconfig.
    pub async fn new(scheme: &'a Scheme) -> Result<SimManager<'a>> {
        Ok(SimManager {
            k8s_client: Client::try_default().await.context(error::KubeSnafu {
                action: "create client from `Kubeconfig`",
            })?,
            scheme,
        })
    }

    pub fn scheme(&self) -> &Scheme {
        self.scheme
    }

    fn simulations(&self) -> Api<Simulation> {
        Api::all(self.k8s_client.clone())
    }

    /// Add a `Simulation` to the cluster.
    pub async fn create_simulation(&self, simulation: &Simulation) -> Result<Simulation> {
        let created = self
            .simulations()
            .create(&PostParams::default(), simulation)
            .await
            .context(error::KubeSnafu {
                action: format!("create simulation '{}'", simulation.name_any()),
            })?;
        info!("created simulation '{}'", created.name_any());
        Ok(created)
    }

    pub async fn get_simulation(&self, name: &str) -> Result<Simulation> {
        self.simulations()
            .get(name)
            .await
            .context(error::KubeSnafu {
                action: format!("get simulation '{}'", name),
            })
    }

    pub async fn list_simulations(&self) -> Result<Vec<Simulation>> {
        Ok(self
            .simulations()
            .list(&ListParams::default())
            .await
            .context(error::KubeSnafu {
                action: "list simulations",
            })?
            .items)
    }

    /// Request deletion of a `Simulation`. This does not wait for the object to be gone.
    pub async fn delete_simulation(&self, name: &str) -> Result<()> {
        self.simulations()
            .delete(name, &Default::default())
            .await
            .context(error::KubeSnafu {
                action: format!("delete simulation '{}'", name),
            })?;
        debug!("requested deletion of simulation '{}'", name);
        Ok(())
    }

    /// Create `object` in the cluster. The object's kind must be registered in the scheme; a
    /// namespaced object without a namespace is created in `default`.
    pub async fn create_object(&self, object: &DynamicObject) -> Result<DynamicObject> {
        let entry = resolve(self.scheme, object, &format!("'{}'", object.name_any()))?;
        let api: Api<DynamicObject> = match entry.scope {
            Scope::Cluster => Api::all_with(self.k8s_client.clone(), &entry.resource),
            Scope::Namespaced => Api::namespaced_with(
                self.k8s_client.clone(),
                object.namespace().as_deref().unwrap_or(DEFAULT_NAMESPACE),
                &entry.resource,
            ),
        };
        api.create(&PostParams::default(), object)
            .await
            .context(error::KubeSnafu {
                action: format!("create {} '{}'", entry.resource.kind, object.name_any()),
            })
    }
}

/// Takes a path to a yaml manifest and creates a set of `DynamicObject`s through deserialization.
/// Every object's kind must be registered in `scheme`. These can be added using
/// `SimManager::create_object`
pub fn read_manifest(path: &Path, scheme: &Scheme) -> Result<Vec<DynamicObject>> {
    let manifest_string = std::fs::read_to_string(path).context(error::FileSnafu { path })?;
    convert_manifest(&manifest_string, scheme)
}

/// Takes a `str` containing a yaml manifest and creates a set of `DynamicObject`s through
/// deserialization. Empty documents are skipped.
pub fn convert_manifest(manifest: &str, scheme: &Scheme) -> Result<Vec<DynamicObject>> {
    let mut objects = Vec::new();
    for (index, doc) in serde_yaml::Deserializer::from_str(manifest).enumerate() {
        let value = serde_yaml::Value::deserialize(doc).context(error::SerdeYamlSnafu {
            action: "deserialize manifest",
        })?;
        if value.is_null() {
            continue;
        }
        let object: DynamicObject =
            serde_yaml::from_value(value).context(error::SerdeYamlSnafu {
                action: "deserialize manifest",
            })?;
        resolve(scheme, &object, &format!("in document {}", index + 1))?;
        objects.push(object);
    }
    Ok(objects)
}

fn resolve<'s>(
    scheme: &'s Scheme,
    object: &DynamicObject,
    what: &str,
) -> Result<&'s SchemeEntry> {
    let types = object
        .types
        .as_ref()
        .filter(|types| !types.api_version.is_empty() && !types.kind.is_empty())
        .context(error::MissingTypeMetaSnafu { what })?;
    scheme.resolve(types).context(error::UnknownKindSnafu {
        api_version: &types.api_version,
        kind: &types.kind,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim_manager::Error;

    const MANIFEST: &str = r#"
apiVersion: simkube.io/v1
kind: Simulation
metadata:
  name: replay-prod
spec:
  driverNamespace: simkube
  trace: file:///data/trace
---
apiVersion: v1
kind: Namespace
metadata:
  name: virtual
---
"#;

    #[test]
    fn manifest_with_registered_kinds() {
        let scheme = Scheme::simulation().unwrap();
        let objects = convert_manifest(MANIFEST, &scheme).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].name_any(), "replay-prod");
        assert_eq!(objects[0].data["spec"]["driverNamespace"], "simkube");
        assert_eq!(objects[1].types.as_ref().unwrap().kind, "Namespace");
    }

    #[test]
    fn manifest_with_unregistered_kind() {
        let scheme = Scheme::simulation().unwrap();
        let manifest = "apiVersion: networking.k8s.io/v1\nkind: Ingress\nmetadata:\n  name: web\n";
        let err = convert_manifest(manifest, &scheme).unwrap_err();
        assert!(matches!(err, Error::UnknownKind { .. }), "{}", err);
    }

    #[test]
    fn manifest_checked_against_given_scheme() {
        let mut scheme = Scheme::new();
        scheme.add_simulation_types().unwrap();
        let err = convert_manifest(MANIFEST, &scheme).unwrap_err();
        assert!(err.to_string().contains("Namespace"), "{}", err);
    }

    #[test]
    fn manifest_without_kind() {
        let scheme = Scheme::simulation().unwrap();
        let manifest = "metadata:\n  name: nameless\n";
        let err = convert_manifest(manifest, &scheme).unwrap_err();
        assert!(matches!(err, Error::MissingTypeMeta { .. }), "{}", err);
    }

    #[test]
    fn missing_manifest_file() {
        let scheme = Scheme::simulation().unwrap();
        let dir = tempfile::TempDir::new().unwrap();
        let err = read_manifest(&dir.path().join("nope.yaml"), &scheme).unwrap_err();
        assert!(matches!(err, Error::File { .. }), "{}", err);
    }
}
