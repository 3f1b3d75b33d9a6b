//! Domain logic for the SmartPack booking workflow.
//!
//! This crate is database-free: it defines the module taxonomy, the asset
//! and booking status enumerations, the booking transition table, and the
//! scan payload normalization and validation rules. The `db` crate applies
//! these rules inside transactions; the `api` crate maps their typed
//! rejections onto the wire.

pub mod asset;
pub mod booking;
pub mod error;
pub mod types;
