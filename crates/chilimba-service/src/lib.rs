//! Service layer for savings-group management.
//!
//! ## Module Organization
//!
//! - `aggregate`: pure reductions over transaction lists (savings, loans,
//!   outstanding balances, top savers)
//! - `auth`: authentication gateway contract, sessions, password hashing
//! - `live`: push-based full-snapshot subscriptions with scoped listener
//!   deregistration
//! - `remote`: the remote document store contract plus the in-process
//!   reference implementation and a recording spy
//! - `service`: the role-gated facade in front of the persistence adapter
//! - `sync`: the remote-wins bridge mirroring groups into the local cache
//! - `validate`: input validation applied before any persistence call

pub mod aggregate;
pub mod auth;
pub mod error;
pub mod live;
pub mod remote;
pub mod service;
pub mod sync;
pub mod validate;
