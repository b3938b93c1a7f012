use crate::{error::Result, hooks::OpCode, math::*, register::Store};

mod x;
mod y;
mod z;

mod cnot;
mod mcnot;
mod toffoli;

mod cond_phase;
mod cond_phase_shift;
mod phase_kick;
mod phase_scale;
mod rz;

mod h1;
mod rx;
mod ry;
mod u1;
mod u2;

mod swap_leads;

mod dispatch;
pub use self::dispatch::Z;
pub use self::dispatch::*;
