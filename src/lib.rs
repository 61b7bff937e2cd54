//! Radial layout engine for a rooted network of people.
//!
//! The root sits at the center; everyone else lands on concentric rings,
//! clustered around the person they are connected through. See
//! [`layout::compute_layout`] for the pure pipeline and [`network::Network`]
//! for the driver that re-runs it on every mutation.

pub mod layout;
pub mod network;
pub mod output;
pub mod store;
mod wasm;

pub use layout::{apply_layout, compute_layout, ring_capacity, LayoutConfig, LayoutResult, LayoutState};
pub use network::{Edge, LayoutPass, Network, Node, PersonData, Point};
pub use store::{ConnectionService, MemoryStore, PersonStore, Session, StoreError};
