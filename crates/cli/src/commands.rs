//! CLI subcommands and their results.

use std::collections::BTreeMap;
use std::fmt;

use clap::Subcommand;
use corelib::hasher::KeyHasher;
use corelib::{Direction, NodeManager};
use replication::{ReplicationError, ReplicationStrategy, SimpleStrategy};
use serde::Serialize;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Resolve keys to their owning node and the next distinct nodes.
    Lookup {
        #[arg(required = true)]
        keys: Vec<String>,
        /// Distinct nodes to report per key, owner included.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Walk the ring counter-clockwise.
        #[arg(long)]
        reverse: bool,
    },
    /// Show nodes, weights and slot counts.
    Inspect,
    /// Hash sample keys and report how many land on each node.
    Distribution {
        #[arg(long, default_value_t = 100_000)]
        samples: usize,
    },
}

impl Command {
    pub fn execute<H: KeyHasher>(
        &self,
        manager: &NodeManager<String, H>,
    ) -> anyhow::Result<CommandResult> {
        Ok(match self {
            Command::Lookup { keys, count, reverse } => {
                let direction = if *reverse {
                    Direction::CounterClockwise
                } else {
                    Direction::Clockwise
                };
                CommandResult::Lookup(lookup(manager, keys, *count, direction)?)
            }
            Command::Inspect => CommandResult::Inspect(inspect(manager)),
            Command::Distribution { samples } => {
                CommandResult::Distribution(distribution(manager, *samples))
            }
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", content = "result", rename_all = "lowercase")]
pub enum CommandResult {
    Lookup(Vec<LookupResult>),
    Inspect(InspectReport),
    Distribution(DistributionReport),
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupResult {
    pub key: String,
    pub hash: u32,
    /// Owner first; empty when the ring has no slots.
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeReport {
    pub key: String,
    pub weight: usize,
    pub slots: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub hasher: &'static str,
    pub replicas: usize,
    pub slots: usize,
    pub nodes: Vec<NodeReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeShare {
    pub key: String,
    pub keys: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributionReport {
    pub samples: usize,
    pub nodes: Vec<NodeShare>,
}

fn lookup<H: KeyHasher>(
    manager: &NodeManager<String, H>,
    keys: &[String],
    count: usize,
    direction: Direction,
) -> anyhow::Result<Vec<LookupResult>> {
    let strategy = SimpleStrategy::new(count).with_direction(direction);
    keys.iter()
        .map(|key| -> anyhow::Result<LookupResult> {
            let nodes = match strategy.replicas_for_key(manager, key) {
                Ok(placement) => placement.into_replicas().into_iter().map(|r| r.node).collect(),
                Err(ReplicationError::EmptyRing) => Vec::new(),
                Err(e) => return Err(e.into()),
            };
            Ok(LookupResult {
                key: key.clone(),
                hash: H::hash(key.as_bytes()),
                nodes,
            })
        })
        .collect()
}

/// Slots on the ring per node; payloads are node keys.
fn slots_per_node<H: KeyHasher>(manager: &NodeManager<String, H>) -> BTreeMap<String, usize> {
    let mut slots = BTreeMap::new();
    manager.for_each_slot(|_, _, owner| *slots.entry(owner.clone()).or_insert(0) += 1);
    slots
}

fn inspect<H: KeyHasher>(manager: &NodeManager<String, H>) -> InspectReport {
    let slots = slots_per_node(manager);
    let mut nodes: Vec<NodeReport> = manager
        .get_nodes()
        .into_iter()
        .map(|node| NodeReport {
            slots: slots.get(node.key()).copied().unwrap_or(0),
            key: node.key().to_string(),
            weight: node.weight(),
        })
        .collect();
    nodes.sort_by(|a, b| a.key.cmp(&b.key));

    InspectReport {
        hasher: manager.hasher_name(),
        replicas: manager.replicas(),
        slots: manager.slots(),
        nodes,
    }
}

fn distribution<H: KeyHasher>(
    manager: &NodeManager<String, H>,
    samples: usize,
) -> DistributionReport {
    let mut owned: BTreeMap<String, usize> = manager
        .get_nodes()
        .into_iter()
        .map(|node| (node.key().to_string(), 0))
        .collect();

    for i in 0..samples {
        if let Some(slot) = manager.find_one(&format!("sample-{i}")) {
            *owned.entry(slot.owner().to_string()).or_insert(0) += 1;
        }
    }

    let nodes = owned
        .into_iter()
        .map(|(key, keys)| NodeShare {
            percent: if samples == 0 {
                0.0
            } else {
                keys as f64 * 100.0 / samples as f64
            },
            key,
            keys,
        })
        .collect();
    DistributionReport { samples, nodes }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Lookup(results) => {
                for result in results {
                    if result.nodes.is_empty() {
                        writeln!(f, "{} ({:08x}): no nodes", result.key, result.hash)?;
                    } else {
                        writeln!(
                            f,
                            "{} ({:08x}): {}",
                            result.key,
                            result.hash,
                            result.nodes.join(", ")
                        )?;
                    }
                }
                Ok(())
            }
            CommandResult::Inspect(report) => {
                writeln!(
                    f,
                    "hasher={} replicas={} nodes={} slots={}",
                    report.hasher,
                    report.replicas,
                    report.nodes.len(),
                    report.slots
                )?;
                for node in &report.nodes {
                    writeln!(
                        f,
                        "  {:<24} weight={:<4} slots={}",
                        node.key, node.weight, node.slots
                    )?;
                }
                Ok(())
            }
            CommandResult::Distribution(report) => {
                writeln!(f, "samples={}", report.samples)?;
                for node in &report.nodes {
                    writeln!(f, "  {:<24} {:>8} {:>6.2}%", node.key, node.keys, node.percent)?;
                }
                Ok(())
            }
        }
    }
}
