use crate::pal::BUILD_TARGET_PLATFORM;
use crate::{AffinityMask, CoreId};

/// Identifies the core with the highest maximum clock frequency exposed by the platform.
///
/// On big.LITTLE-style systems this is a "big" (prime) core, which is the best candidate
/// for a latency-critical thread. The maximum frequency is the only signal consulted -
/// cache sizes and other microarchitectural properties are not.
///
/// Returns [`None`] when classification is not possible: the topology directory is
/// unreadable, no cores were discovered, or no discovered core exposed a parseable
/// frequency attribute. That is an expected outcome on some devices and containers, not
/// an error - callers should simply proceed unpinned.
///
/// When several cores share the maximum frequency, the one with the lowest identifier is
/// returned. Every call re-reads the platform state; nothing is cached.
#[must_use]
pub fn max_frequency_core() -> Option<CoreId> {
    BUILD_TARGET_PLATFORM.max_frequency_core()
}

/// Restricts the calling thread to the single given core.
///
/// The operating system scheduler will place the calling thread only on `core` for all
/// subsequent scheduling decisions, until a later call changes the affinity again. Other
/// threads are unaffected. The operation is idempotent and may be repeated.
///
/// # Errors
///
/// Returns [`Error::BindRejected`][crate::Error::BindRejected] when the operating system
/// refuses the request (core outside the current topology, core offline, insufficient
/// permissions). The previous affinity mask remains in effect; the caller decides
/// whether to proceed unpinned or abort.
pub fn pin_current_thread_to(core: CoreId) -> crate::Result<()> {
    BUILD_TARGET_PLATFORM.pin_current_thread_to(core)
}

/// Reads back the set of cores the calling thread is currently allowed to execute on.
///
/// Useful to verify the effect of [`pin_current_thread_to()`] or to report scheduling
/// constraints for diagnostics. On a thread that was never pinned this is the full set
/// of cores available to the process.
///
/// # Errors
///
/// Returns [`Error::AffinityReadFailed`][crate::Error::AffinityReadFailed] when the
/// operating system refuses to report the mask. This is deliberately distinct from an
/// empty mask, which cannot occur: the calling thread is always running on some core.
pub fn current_thread_affinity() -> crate::Result<AffinityMask> {
    BUILD_TARGET_PLATFORM
        .current_thread_cores()
        .map(AffinityMask::new)
}
