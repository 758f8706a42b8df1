//! Tools for radio cell CSV exports: a row filter and an HTML map renderer.

pub mod cli;
pub mod data;
pub mod error;
pub mod render;

pub use error::{Error, Result};
