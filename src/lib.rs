// src/lib.rs
// #![allow(dead_code)]

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod error;
pub mod config;
pub mod core;

pub mod model;
pub mod series;
pub mod taxonomy;
pub mod extract;
pub mod classify;
pub mod aggregate;
pub mod document;
pub mod merge;

pub mod store;
pub mod sheets;
pub mod source;
pub mod scrape;
pub mod progress;
pub mod runner;
pub mod cli;

pub use error::{Error, Result};
