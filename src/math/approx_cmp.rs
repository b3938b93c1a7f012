pub(crate) use float_cmp::*;

use super::types::*;

const ULPS: i64 = 2;

#[inline]
pub(crate) fn approx_cmp(x: R, y: R) -> bool {
    approx_eq!(R, x, y, ulps = ULPS)
}
