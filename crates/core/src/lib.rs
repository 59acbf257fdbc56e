//! Core bookkeeping rules for Soquy.
//!
//! This crate contains pure business logic with ZERO storage or web dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `debt` - Receivable/payable ledger and status derivation
//! - `invoice` - Invoice totals and lifecycle state machine
//! - `cash_flow` - Receipts and disbursements
//! - `code` - Document code generation
//! - `common` - Payment methods and counterparties
//! - `error` - Error classification shared by every domain error

pub mod cash_flow;
pub mod code;
pub mod common;
pub mod debt;
pub mod error;
pub mod invoice;
