//! This crate estimates the site percolation threshold by Monte Carlo.

#![cfg_attr(feature = "strict", deny(warnings))]
#![deny(missing_docs)]

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

pub mod atomicfile;
pub mod error;
pub mod mc;
pub mod percolation;
pub mod rng;
pub mod union_find;

pub use crate::error::{Error, Result};
