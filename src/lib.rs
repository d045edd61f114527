//! Skyjo table server (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so binaries, integration
//! tests, and benches can reach `skyjo::{types,core,engine,adapter,client}`.
//! The implementation lives in dedicated crates under `crates/`.

pub use skyjo_adapter as adapter;
pub use skyjo_client as client;
pub use skyjo_core as core;
pub use skyjo_engine as engine;
pub use skyjo_types as types;
