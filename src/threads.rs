use std::sync::RwLock;

use lazy_static::*;
use rayon::*;

lazy_static! {
    static ref GLOBAL_POOL: RwLock<Option<ThreadPool>> = RwLock::new(None);
}

/// Pin the data-parallel entry loops to a dedicated pool with the given
/// number of threads. Without a call to this, rayon's default pool is used.
pub fn num_threads(num_threads: usize) {
    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|th_idx| format!("sparq worker #{:?}", th_idx))
        .build()
        .unwrap();
    *GLOBAL_POOL.write().unwrap() = Some(pool);
}

pub(crate) fn install<OP, T>(op: OP) -> T
where
    OP: FnOnce() -> T + Send,
    T: Send,
{
    match &*GLOBAL_POOL.read().unwrap() {
        Some(pool) => pool.install(op),
        None => op(),
    }
}
