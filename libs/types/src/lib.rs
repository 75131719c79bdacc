//! Shared types for the poolview derived state.
//!
//! Everything the engine reads and writes lives here: contract addresses,
//! the entity records held by the host's durable store, and the decoded
//! event payloads the host delivers in canonical order. The records are
//! plain serde-able data with no behavior beyond constructors; all state
//! transitions belong to `poolview-state-market`.

pub mod address;
pub mod entities;
pub mod events;

pub use address::{Address, AddressError};
pub use entities::{
    Bundle, Factory, Pool, Position, PositionSnapshot, Tick, Token,
};
pub use events::{BlockContext, Event};
