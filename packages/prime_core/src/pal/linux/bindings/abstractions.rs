use std::fmt::Debug;
use std::io;

use libc::cpu_set_t;

/// Bindings for FFI calls into the operating system.
///
/// All PAL FFI calls must go through this trait, enabling them to be mocked.
///
/// Both calls pass 0 as the thread identifier, which the kernel resolves to the calling
/// thread - there is no need to look up the thread identifier separately.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Bindings: Debug + Send + Sync + 'static {
    /// `sched_setaffinity()` for the current thread.
    fn sched_setaffinity_current(&self, cpuset: &cpu_set_t) -> Result<(), io::Error>;

    /// `sched_getaffinity()` for the current thread.
    fn sched_getaffinity_current(&self) -> Result<cpu_set_t, io::Error>;
}
