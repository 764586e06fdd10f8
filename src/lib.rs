//! # Curator Library
//!
//! Medoid clustering engine for photo tag review. Consumes a per-run
//! inventory snapshot (image paths, embedding vectors, ranked tag
//! candidates) and selects representative images per folder using
//! folder, tag, and embedding clustering passes.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod processing;
pub mod storage;
pub mod ui;
