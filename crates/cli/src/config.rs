//! Command-line and topology-file configuration.
//!
//! A topology can come from a JSON file, from repeated `--node` flags, or
//! both; flags override the file.
//!
//! ```json
//! { "replicas": 160, "hasher": "crc32", "nodes": [{ "key": "a", "weight": 2 }] }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, ValueEnum};
use corelib::hasher::{Crc32, KeyHasher, Sip13, Xxh3};
use corelib::node::MAX_SLOTS_PER_NODE;
use corelib::{Node, NodeManager};
use serde::{Deserialize, Serialize};
use tracing::{debug, Level};

use crate::commands::Command;

/// Virtual slots per unit of weight when neither flag nor file sets one.
pub const DEFAULT_REPLICAS: usize = 160;

#[derive(Parser, Debug)]
#[command(name = "hashring", version, about = "Inspect and query a consistent hash ring")]
pub struct CliConfig {
    /// JSON topology file.
    #[arg(long, global = true, value_name = "FILE")]
    pub topology: Option<PathBuf>,

    /// Node to place on the ring; repeatable.
    #[arg(long = "node", global = true, value_name = "KEY[=WEIGHT]")]
    pub nodes: Vec<NodeSpec>,

    /// Virtual slots per unit of node weight.
    #[arg(long, global = true)]
    pub replicas: Option<usize>,

    #[arg(long, global = true, value_enum)]
    pub hasher: Option<HasherKind>,

    /// Print machine-readable JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn run(&self) -> anyhow::Result<()> {
        init_tracing(self.verbose);

        let topology = self.topology()?;
        debug!(
            nodes = topology.nodes.len(),
            replicas = topology.replicas,
            hasher = ?topology.hasher,
            "resolved topology"
        );

        match topology.hasher {
            HasherKind::Crc32 => self.execute::<Crc32>(&topology),
            HasherKind::Xxh3 => self.execute::<Xxh3>(&topology),
            HasherKind::Sip13 => self.execute::<Sip13>(&topology),
        }
    }

    fn execute<H: KeyHasher>(&self, topology: &Topology) -> anyhow::Result<()> {
        let manager = topology.build::<H>()?;
        let result = self.command.execute(&manager)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{result}");
        }
        Ok(())
    }

    /// Merge the topology file (if any) with command-line overrides.
    pub fn topology(&self) -> anyhow::Result<Topology> {
        let mut topology = match &self.topology {
            Some(path) => Topology::load(path)?,
            None => Topology::default(),
        };

        if let Some(replicas) = self.replicas {
            topology.replicas = replicas;
        }
        if let Some(hasher) = self.hasher {
            topology.hasher = hasher;
        }
        for spec in &self.nodes {
            topology.upsert(spec.clone());
        }

        topology.validate()?;
        Ok(topology)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HasherKind {
    #[default]
    Crc32,
    Xxh3,
    Sip13,
}

/// One node of a topology.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub key: String,
    #[serde(default = "default_weight")]
    pub weight: usize,
}

fn default_weight() -> usize {
    1
}

impl FromStr for NodeSpec {
    type Err = String;

    /// Parses `key` or `key=weight`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, weight) = match s.rsplit_once('=') {
            Some((key, weight)) => {
                let weight = weight
                    .parse()
                    .map_err(|e| format!("invalid weight {weight:?}: {e}"))?;
                (key, weight)
            }
            None => (s, 1),
        };
        if key.is_empty() {
            return Err("node key must not be empty".to_string());
        }
        Ok(Self {
            key: key.to_string(),
            weight,
        })
    }
}

/// Ring layout: replica count, hasher and weighted nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Topology {
    pub replicas: usize,
    pub hasher: HasherKind,
    pub nodes: Vec<NodeSpec>,
}

impl Default for Topology {
    fn default() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            hasher: HasherKind::default(),
            nodes: Vec::new(),
        }
    }
}

impl Topology {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading topology file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing topology file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Add `spec`, replacing a node with the same key.
    pub fn upsert(&mut self, spec: NodeSpec) {
        match self.nodes.iter_mut().find(|n| n.key == spec.key) {
            Some(existing) => *existing = spec,
            None => self.nodes.push(spec),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.replicas == 0 {
            bail!("replicas must be at least 1");
        }
        for spec in &self.nodes {
            if spec.weight == 0 {
                bail!("node {:?} has weight 0; weights must be at least 1", spec.key);
            }
            match spec.weight.checked_mul(self.replicas) {
                Some(total) if total <= MAX_SLOTS_PER_NODE => {}
                _ => bail!(
                    "node {:?} needs {} x {} virtual slots, more than the limit of {}",
                    spec.key,
                    spec.weight,
                    self.replicas,
                    MAX_SLOTS_PER_NODE
                ),
            }
        }
        Ok(())
    }

    /// Build a manager whose payload is each node's key.
    pub fn build<H: KeyHasher>(&self) -> anyhow::Result<NodeManager<String, H>> {
        let manager = NodeManager::with_hasher(self.replicas);
        for spec in &self.nodes {
            Node::with_weight(spec.key.clone(), spec.key.clone(), spec.weight)
                .and_then(|node| manager.add(node))
                .with_context(|| format!("adding node {:?}", spec.key))?;
        }
        Ok(manager)
    }
}
