/*!

The `node` module builds the `Node` object that a simulated node presents to the cluster. The
static attributes come from a node skeleton (a YAML template of a `core/v1 Node`) and the name comes
from an [`IdentityProvider`], which by default reads the `POD_NAME` environment variable so that a
virtual node is named after the pod that hosts it.

!*/

use crate::constants::ENV_POD_NAME;
use crate::error::{self, Result};
use k8s_openapi::api::core::v1::Node;
use log::{debug, trace};
use serde::de::Error as _;
use serde::Deserialize;
use snafu::{OptionExt, ResultExt};
use std::env::VarError;
use std::path::Path;

/// Supplies the name that a constructed node should carry.
pub trait IdentityProvider {
    /// The assigned identity, or `None` if none has been assigned. An identity that exists but
    /// cannot be used is an error.
    fn identity(&self) -> Result<Option<String>>;

    /// A human readable description of where the identity comes from, used in error messages.
    fn origin(&self) -> String;
}

/// Reads the identity from an environment variable, `POD_NAME` unless otherwise specified.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EnvIdentity {
    key: String,
}

impl EnvIdentity {
    pub fn new<S>(key: S) -> Self
    where
        S: Into<String>,
    {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Default for EnvIdentity {
    fn default() -> Self {
        Self::new(ENV_POD_NAME)
    }
}

impl IdentityProvider for EnvIdentity {
    fn identity(&self) -> Result<Option<String>> {
        match std::env::var(&self.key) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(value)) => error::IdentityNotUnicodeSnafu {
                origin: self.origin(),
                value: value.to_string_lossy(),
            }
            .fail(),
        }
    }

    fn origin(&self) -> String {
        format!("environment variable '{}'", self.key)
    }
}

/// An identity that is known up front.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StaticIdentity(String);

impl<S> From<S> for StaticIdentity
where
    S: Into<String>,
{
    fn from(name: S) -> Self {
        Self(name.into())
    }
}

impl IdentityProvider for StaticIdentity {
    fn identity(&self) -> Result<Option<String>> {
        Ok(Some(self.0.clone()))
    }

    fn origin(&self) -> String {
        "the provided identity".to_string()
    }
}

/// A `Node` decoded from a skeleton file. The name is always blank; use [`NodeSkeleton::named`] to
/// obtain a usable `Node`.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSkeleton(Node);

impl NodeSkeleton {
    /// The decoded node attributes.
    pub fn node(&self) -> &Node {
        &self.0
    }

    /// Consume the skeleton, producing a `Node` called `name`.
    pub fn named<S>(self, name: S) -> Node
    where
        S: Into<String>,
    {
        let mut node = self.0;
        node.metadata.name = Some(name.into());
        node
    }
}

/// Read the node skeleton at `path`. Fields that are not part of the `Node` schema are rejected
/// rather than dropped, so a typo in the template fails here instead of silently changing the node.
/// Any name given in the template is discarded.
pub fn parse_skeleton_node(path: &Path) -> Result<NodeSkeleton> {
    trace!("reading node skeleton '{}'", path.display());
    let contents = std::fs::read(path).context(error::SkeletonReadSnafu { path })?;
    let mut node = decode_strict(&contents).context(error::SkeletonParseSnafu { path })?;
    if let Some(name) = node.metadata.name.take() {
        debug!(
            "ignoring name '{}' found in node skeleton '{}'",
            name,
            path.display()
        );
    }
    Ok(NodeSkeleton(node))
}

/// Build a `Node` from the skeleton at `skeleton_path`, named by `identity`. An absent or empty
/// identity is an error; no default name is ever generated.
pub fn make_node<I>(skeleton_path: &Path, identity: &I) -> Result<Node>
where
    I: IdentityProvider + ?Sized,
{
    let skeleton = parse_skeleton_node(skeleton_path)?;
    let name = identity
        .identity()?
        .filter(|name| !name.is_empty())
        .context(error::MissingIdentitySnafu {
            origin: identity.origin(),
        })?;
    debug!("naming node from '{}' as '{}'", skeleton_path.display(), name);
    Ok(skeleton.named(name))
}

fn decode_strict(contents: &[u8]) -> std::result::Result<Node, serde_yaml::Error> {
    // Decoding into a `Value` rejects duplicate mapping keys, which the typed decode would let
    // overwrite each other.
    serde_yaml::Value::deserialize(serde_yaml::Deserializer::from_slice(contents))?;

    let mut unknown_fields = Vec::new();
    let node: Node = serde_ignored::deserialize(
        serde_yaml::Deserializer::from_slice(contents),
        |path| unknown_fields.push(field_path(&path)),
    )?;
    match unknown_fields.first() {
        Some(field) => Err(serde_yaml::Error::custom(format!(
            "unknown field `{}`",
            field
        ))),
        None => Ok(node),
    }
}

/// Renders a path reported by `serde_ignored` as dotted field names and sequence indices, leaving
/// out the `?` segments it adds for `Option` and newtype wrappers.
fn field_path(path: &serde_ignored::Path<'_>) -> String {
    path.to_string()
        .split('.')
        .filter(|segment| !segment.is_empty() && *segment != "?")
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ErrorKind;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const SKELETON: &str = r#"
apiVersion: v1
kind: Node
metadata:
  name: name-from-template
  labels:
    type: virtual
    kubernetes.io/role: agent
  annotations:
    node.alpha.kubernetes.io/ttl: "0"
spec:
  taints:
    - key: simkube.io/virtual-node
      value: "true"
      effect: NoSchedule
status:
  allocatable:
    cpu: "4"
    memory: 16Gi
  capacity:
    cpu: "4"
    memory: 16Gi
"#;

    const UNSET_VARIABLE: &str = "SIMKUBE_TEST_IDENTITY_THAT_IS_NEVER_SET";

    fn write_skeleton(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("node.yml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn expected_node(name: &str) -> Node {
        let mut node: Node = serde_yaml::from_str(SKELETON).unwrap();
        node.metadata.name = Some(name.to_string());
        node
    }

    #[test]
    fn node_takes_name_from_identity() {
        let dir = TempDir::new().unwrap();
        let path = write_skeleton(&dir, SKELETON);

        let node = make_node(&path, &StaticIdentity::from("sk-vnode-abc12")).unwrap();

        assert_eq!(node.metadata.name.as_deref(), Some("sk-vnode-abc12"));
        assert_eq!(node, expected_node("sk-vnode-abc12"));
    }

    #[test]
    fn skeleton_name_is_discarded() {
        let dir = TempDir::new().unwrap();
        let path = write_skeleton(&dir, SKELETON);

        let skeleton = parse_skeleton_node(&path).unwrap();

        assert!(skeleton.node().metadata.name.is_none());
        assert_eq!(
            skeleton.node().metadata.labels.as_ref().unwrap().get("type"),
            Some(&"virtual".to_string())
        );
    }

    #[test]
    fn unknown_top_level_field_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_skeleton(&dir, &format!("{}specc: {{}}\n", SKELETON));

        let err = make_node(&path, &StaticIdentity::from("vnode")).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("specc"), "{}", err);
    }

    #[test]
    fn unknown_nested_field_is_rejected() {
        let dir = TempDir::new().unwrap();
        let contents = SKELETON.replace("  taints:", "  taintz:");
        let path = write_skeleton(&dir, &contents);

        let err = parse_skeleton_node(&path).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("taintz"), "{}", err);
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn unknown_field_path_reads_as_fields() {
        let dir = TempDir::new().unwrap();
        let contents = format!(
            "{}  conditions:\n    - type: Ready\n      status: \"True\"\n      bogus: 1\n",
            SKELETON
        );
        let path = write_skeleton(&dir, &contents);

        let err = parse_skeleton_node(&path).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(
            err.to_string()
                .contains("unknown field `status.conditions.0.bogus`"),
            "{}",
            err
        );
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let contents = r#"
apiVersion: v1
kind: Node
spec:
  taints:
    - key: a
      effect: NoSchedule
spec:
  unschedulable: true
"#;
        let path = write_skeleton(&dir, contents);

        let err = make_node(&path, &StaticIdentity::from("vnode")).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn nested_duplicate_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let contents = SKELETON.replace(
            "    type: virtual\n",
            "    type: virtual\n    type: physical\n",
        );
        let path = write_skeleton(&dir, &contents);

        let err = parse_skeleton_node(&path).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_skeleton(&dir, "apiVersion: v1\nkind: [Node\n");

        let err = parse_skeleton_node(&path).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("does-not-exist.yml");

        let err = make_node(&path, &StaticIdentity::from("vnode")).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("does-not-exist.yml"), "{}", err);
    }

    #[test]
    fn unset_identity_is_a_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = write_skeleton(&dir, SKELETON);

        let err = make_node(&path, &EnvIdentity::new(UNSET_VARIABLE)).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains(UNSET_VARIABLE), "{}", err);
    }

    #[test]
    fn empty_identity_is_a_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = write_skeleton(&dir, SKELETON);

        let err = make_node(&path, &StaticIdentity::from("")).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn parse_errors_win_over_missing_identity() {
        let dir = TempDir::new().unwrap();
        let path = write_skeleton(&dir, "apiVersion: v1\nkind: Node\nbogus: true\n");

        let err = make_node(&path, &EnvIdentity::new(UNSET_VARIABLE)).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn construction_is_repeatable() {
        let dir = TempDir::new().unwrap();
        let path = write_skeleton(&dir, SKELETON);
        let identity = StaticIdentity::from("vnode-1");

        let first = make_node(&path, &identity).unwrap();
        let second = make_node(&path, &identity).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn env_identity_defaults_to_pod_name() {
        let identity = EnvIdentity::default();
        assert_eq!(identity.key(), ENV_POD_NAME);
        assert!(identity.origin().contains(ENV_POD_NAME));
    }
}
