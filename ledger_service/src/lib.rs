//! Wallet Ledger Service Library
//!
//! Transactional accounting core for virtual assets: double-entry ledger,
//! idempotent movements (TOPUP / BONUS / SPEND) and row-locked balances.
//! This library exports the modules used by the application binaries and the
//! integration tests.
//!
//! # Modules
//!
//! * `api` - HTTP boundary: routes, DTOs and error mapping.
//! * `config` - Environment-sourced settings.
//! * `domain` - Entities, typed ids and the error taxonomy.
//! * `infrastructure` - PostgreSQL repositories and store access.
//! * `use_cases` - The transaction engine and the balance query.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod use_cases;
