//! Core library for consistent hashing.
//!
//! This crate provides the two layers of a consistent-hash ring:
//! - [`HashRing`]: sorted slots with O(log n) successor lookup, wrap-around
//!   and circular next/previous stepping
//! - [`NodeManager`]: logical nodes expanded into weighted virtual slots,
//!   guarded by one reader/writer lock, answering "which node(s) own this key"
//!
//! Hash functions are pluggable through [`KeyHasher`]; CRC-32 is the default.

pub mod error;
pub mod hasher;
pub mod manager;
pub mod node;
pub mod ring;
pub mod slot;

pub use error::{Error, Result};
pub use hasher::{hash, KeyHasher};
pub use manager::{Direction, NodeManager};
pub use node::{virtual_key, Node};
pub use ring::{HashRing, Position, Ring};
pub use slot::Slot;
