//! Pre-processing for ai-or-not.
//!
//! This crate turns raw text into fixed-width sparse feature rows using
//! token-level n-gram counts over a pre-fitted vocabulary.

pub mod pre_processor;
