//! Application state and the store that owns it.
//!  - [entities] describes the persisted data.
//!  - [store::Store] is the only writer, every change is saved right away.
//!  - [persistence] reads and writes the whole state as one json document.

pub mod entities;
pub mod error;
pub mod persistence;
pub mod store;
