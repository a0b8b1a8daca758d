//! API module
//!
//! Contains HTTP request handlers for the conversion endpoints

pub mod convert;
pub mod pdf;
pub mod security;
