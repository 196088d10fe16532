/*!

The `scheme` module defines the registry of object kinds that SimKube clients understand. A
[`Scheme`] is built once by whoever constructs a client and is passed to it by reference.

!*/

use crate::error::{self, Result};
use crate::Simulation;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::{
    ConfigMap, Namespace, Node, Pod, Secret, Service, ServiceAccount,
};
use kube::core::{ApiResource, GroupVersionKind, TypeMeta};
use log::trace;
use snafu::ensure;
use std::collections::BTreeMap;

/// Whether objects of a kind live in a namespace or at cluster level.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Scope {
    Namespaced,
    Cluster,
}

/// What the scheme knows about a registered kind.
#[derive(Debug, Clone)]
pub struct SchemeEntry {
    pub resource: ApiResource,
    pub scope: Scope,
}

impl SchemeEntry {
    pub fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::gvk(
            &self.resource.group,
            &self.resource.version,
            &self.resource.kind,
        )
    }
}

/// A registry mapping group/version/kind to the API resource that serves it.
#[derive(Debug, Clone, Default)]
pub struct Scheme {
    kinds: BTreeMap<String, SchemeEntry>,
}

impl Scheme {
    /// An empty scheme.
    pub fn new() -> Self {
        Self::default()
    }

    /// A scheme with the Kubernetes kinds and the SimKube kinds registered.
    pub fn simulation() -> Result<Self> {
        let mut scheme = Self::new();
        scheme.add_kubernetes_types()?;
        scheme.add_simulation_types()?;
        Ok(scheme)
    }

    /// Register the kind `K`. Each group/version/kind may only be registered once.
    pub fn register<K>(&mut self, scope: Scope) -> Result<()>
    where
        K: kube::Resource<DynamicType = ()>,
    {
        let resource = ApiResource::erase::<K>(&());
        let key = key(&resource.group, &resource.version, &resource.kind);
        ensure!(
            !self.kinds.contains_key(&key),
            error::DuplicateKindSnafu { kind: key }
        );
        trace!("registering kind '{}'", key);
        self.kinds.insert(key, SchemeEntry { resource, scope });
        Ok(())
    }

    /// Register the built-in Kubernetes kinds that simulations read and write.
    pub fn add_kubernetes_types(&mut self) -> Result<()> {
        self.register::<Namespace>(Scope::Cluster)?;
        self.register::<Node>(Scope::Cluster)?;
        self.register::<Pod>(Scope::Namespaced)?;
        self.register::<ConfigMap>(Scope::Namespaced)?;
        self.register::<Secret>(Scope::Namespaced)?;
        self.register::<Service>(Scope::Namespaced)?;
        self.register::<ServiceAccount>(Scope::Namespaced)?;
        self.register::<Deployment>(Scope::Namespaced)?;
        self.register::<StatefulSet>(Scope::Namespaced)?;
        self.register::<DaemonSet>(Scope::Namespaced)?;
        self.register::<ReplicaSet>(Scope::Namespaced)?;
        self.register::<Job>(Scope::Namespaced)?;
        self.register::<CronJob>(Scope::Namespaced)
    }

    /// Register the `simkube.io` kinds.
    pub fn add_simulation_types(&mut self) -> Result<()> {
        self.register::<Simulation>(Scope::Cluster)
    }

    pub fn recognizes(&self, gvk: &GroupVersionKind) -> bool {
        self.lookup(gvk).is_some()
    }

    pub fn lookup(&self, gvk: &GroupVersionKind) -> Option<&SchemeEntry> {
        self.kinds.get(&key(&gvk.group, &gvk.version, &gvk.kind))
    }

    /// Find the entry for an object's `apiVersion` and `kind`.
    pub fn resolve(&self, types: &TypeMeta) -> Option<&SchemeEntry> {
        self.lookup(&gvk_of(types))
    }

    /// All registered kinds, ordered by group, version and kind.
    pub fn kinds(&self) -> impl Iterator<Item = GroupVersionKind> + '_ {
        self.kinds.values().map(SchemeEntry::gvk)
    }
}

/// Split an object's `apiVersion` into group and version. The core group has no group prefix.
pub fn gvk_of(types: &TypeMeta) -> GroupVersionKind {
    match types.api_version.split_once('/') {
        Some((group, version)) => GroupVersionKind::gvk(group, version, &types.kind),
        None => GroupVersionKind::gvk("", &types.api_version, &types.kind),
    }
}

fn key(group: &str, version: &str, kind: &str) -> String {
    if group.is_empty() {
        format!("{}/{}", version, kind)
    } else {
        format!("{}/{}/{}", group, version, kind)
    }
}
