#![warn(clippy::cargo)]
#![allow(clippy::comparison_chain)]
#![doc = include_str!("../README.md")]

mod sealed {
    pub trait Seal {}
}

mod error;
#[cfg(feature = "cpu")]
mod threads;

pub mod counter;
pub mod hooks;
pub mod math;
pub mod operator;
pub mod register;

pub use error::{Error, Result};
#[cfg(feature = "cpu")]
pub use threads::num_threads;

#[cfg(test)]
mod tests;

#[doc(hidden)]
pub mod prelude {
    pub use crate::{
        hooks::{Hooks, NoHooks, OpCode},
        operator as op,
        operator::MultiOp,
        register::{matrix_qureg, mvmult, Reg as QReg},
        Error, Result,
    };
}
