// src/lib.rs
// Library interface for ct-verify
pub mod cert_parser;
pub mod cli;
pub mod config;
pub mod ct_log;
pub mod error;
pub mod leaf_hash;
pub mod merkle;
pub mod verifier;
