//! Replica placement results.

use corelib::Slot;

/// One copy of a key: the node that holds it and that node's payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replica<T> {
    pub node: String,
    pub value: T,
}

impl<T> From<Slot<T>> for Replica<T> {
    fn from(slot: Slot<T>) -> Self {
        Self {
            node: slot.owner().to_string(),
            value: slot.into_value(),
        }
    }
}

/// Where the copies of one key live, primary first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaPlacement<T> {
    key: String,
    replicas: Vec<Replica<T>>,
}

impl<T> ReplicaPlacement<T> {
    pub fn new(key: impl Into<String>, replicas: Vec<Replica<T>>) -> Self {
        Self {
            key: key.into(),
            replicas,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The node that owns the key, if any replica was placed.
    pub fn primary(&self) -> Option<&Replica<T>> {
        self.replicas.first()
    }

    /// Replicas after the primary.
    pub fn secondaries(&self) -> &[Replica<T>] {
        self.replicas.get(1..).unwrap_or(&[])
    }

    pub fn replicas(&self) -> &[Replica<T>] {
        &self.replicas
    }

    /// Node keys in placement order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.replicas.iter().map(|r| r.node.as_str())
    }

    pub fn len(&self) -> usize {
        self.replicas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replicas.is_empty()
    }

    pub fn into_replicas(self) -> Vec<Replica<T>> {
        self.replicas
    }
}
