//! Scenario files.
//!
//! A scenario deploys the contracts once and then replays a list of
//! invocations in order:
//!
//! ```toml
//! [deploy]
//! inner_ring = ["02aa...", "03bb..."]
//!
//! [[step]]
//! height = 1
//! signers = ["02aa..."]
//! op = "new_epoch"
//! epoch = 1
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use neofs_primitives::PublicKey;
use serde::Deserialize;

/// Parsed scenario file.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub deploy: Deployment,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid scenario")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read scenario {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }
}

/// Contract state installed before the first step.
#[derive(Debug, Clone, Deserialize)]
pub struct Deployment {
    pub inner_ring: Vec<PublicKey>,

    /// Initial configuration as `[key, value]` pairs.
    #[serde(default)]
    pub config: Vec<[String; 2]>,

    #[serde(default)]
    pub alphabet: Option<AlphabetDeployment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlphabetDeployment {
    pub name: String,
    pub index: u64,
    pub total: u64,

    /// Whether the host accepts validator votes.
    #[serde(default = "default_accept_votes")]
    pub accept_votes: bool,
}

fn default_accept_votes() -> bool {
    true
}

/// One invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub height: u64,

    /// Keys whose witnesses the invocation carries.
    #[serde(default)]
    pub signers: Vec<PublicKey>,

    #[serde(flatten)]
    pub operation: Operation,
}

/// Contract entry point called by a step.
///
/// Byte arguments are hex, configuration keys and values are UTF-8 text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    AddPeer {
        node_info: String,
    },
    UpdateState {
        state: u8,
        public_key: String,
    },
    NewEpoch {
        epoch: u64,
    },
    UpdateInnerRing {
        keys: Vec<PublicKey>,
    },
    SetConfig {
        id: String,
        key: String,
        value: String,
    },
    Register {
        node_info: String,
        voter: PublicKey,
    },
    Deregister {
        public_key: PublicKey,
        voter: PublicKey,
    },
    ProposeAdvance {
        epoch: u64,
        voter: PublicKey,
    },
    PruneBallots,
    Vote {
        epoch: u64,
        candidates: Vec<PublicKey>,
    },
    Epoch,
    Netmap,
    Snapshot {
        diff: i64,
    },
    SnapshotByEpoch {
        epoch: u64,
    },
    InnerRing,
    Config {
        key: String,
    },
    ListConfig,
    WorkingView,
}

impl Operation {
    /// Contract method name, as shown in reports.
    pub fn method(&self) -> &'static str {
        match self {
            Operation::AddPeer { .. } => "addPeer",
            Operation::UpdateState { .. } => "updateState",
            Operation::NewEpoch { .. } => "newEpoch",
            Operation::UpdateInnerRing { .. } => "updateInnerRing",
            Operation::SetConfig { .. } => "setConfig",
            Operation::Register { .. } => "register",
            Operation::Deregister { .. } => "deregister",
            Operation::ProposeAdvance { .. } => "proposeAdvance",
            Operation::PruneBallots => "pruneBallots",
            Operation::Vote { .. } => "vote",
            Operation::Epoch => "epoch",
            Operation::Netmap => "netmap",
            Operation::Snapshot { .. } => "snapshot",
            Operation::SnapshotByEpoch { .. } => "snapshotByEpoch",
            Operation::InnerRing => "innerRingList",
            Operation::Config { .. } => "config",
            Operation::ListConfig => "listConfig",
            Operation::WorkingView => "workingView",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_hex(prefix: &str, fill: &str) -> String {
        format!("{prefix}{}", fill.repeat(32))
    }

    #[test]
    fn parses_steps_in_order() {
        let (key_a, key_b) = (key_hex("02", "aa"), key_hex("03", "bb"));
        let text = format!(
            r#"
            [deploy]
            inner_ring = ["{key_a}", "{key_b}"]
            config = [["MaxObjectSize", "64"]]

            [[step]]
            height = 1
            signers = ["{key_a}"]
            op = "new_epoch"
            epoch = 1

            [[step]]
            height = 2
            op = "snapshot"
            diff = -1

            [[step]]
            height = 3
            op = "list_config"
            "#
        );
        let scenario = Scenario::from_toml_str(&text).unwrap();

        assert_eq!(scenario.deploy.inner_ring.len(), 2);
        assert_eq!(scenario.deploy.config[0][0], "MaxObjectSize");
        assert!(scenario.deploy.alphabet.is_none());
        assert_eq!(scenario.steps.len(), 3);
        assert_eq!(scenario.steps[0].operation, Operation::NewEpoch { epoch: 1 });
        assert_eq!(scenario.steps[0].signers[0], PublicKey::parse(&key_a).unwrap());
        assert_eq!(scenario.steps[1].operation, Operation::Snapshot { diff: -1 });
        assert!(scenario.steps[1].signers.is_empty());
        assert_eq!(scenario.steps[2].operation.method(), "listConfig");
    }

    #[test]
    fn alphabet_accepts_votes_by_default() {
        let key_a = key_hex("02", "aa");
        let text = format!(
            r#"
            [deploy]
            inner_ring = ["{key_a}"]
            alphabet = {{ name = "az", index = 0, total = 1 }}
            "#
        );
        let scenario = Scenario::from_toml_str(&text).unwrap();
        let alphabet = scenario.deploy.alphabet.unwrap();
        assert_eq!(alphabet.name, "az");
        assert!(alphabet.accept_votes);
        assert!(scenario.steps.is_empty());
    }

    #[test]
    fn rejects_unknown_operation() {
        let key_a = key_hex("02", "aa");
        let text = format!(
            r#"
            [deploy]
            inner_ring = ["{key_a}"]

            [[step]]
            height = 1
            op = "transfer"
            "#
        );
        assert!(Scenario::from_toml_str(&text).is_err());
    }

    #[test]
    fn rejects_malformed_key() {
        let text = r#"
            [deploy]
            inner_ring = ["04abcd"]
        "#;
        assert!(Scenario::from_toml_str(text).is_err());
    }
}
