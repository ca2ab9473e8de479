#![doc = include_str!("../README.md")]

mod error;
mod generator;
mod id;
mod time;
mod worker;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
pub use crate::worker::*;
