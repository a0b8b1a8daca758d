//! Document Conversion Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod executor;
pub mod pages;
pub mod pipeline;
