use std::io;

use nonempty::NonEmpty;

use crate::{CoreId, Error};

/// Singleton instance of `BuildTargetPlatform`, used by the public entry points to hook
/// up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform;

/// Fallback platform for operating systems without a frequency-exposing topology tree
/// or native thread affinity control.
///
/// Discovery degrades to an empty set and the affinity operations report rejection, so
/// callers observe the same failure taxonomy as on Linux and proceed unpinned. We do
/// not simulate pinning: pretending a pin succeeded is exactly the false assumption
/// this crate exists to avoid.
#[derive(Debug)]
pub(crate) struct BuildTargetPlatform;

impl BuildTargetPlatform {
    pub(crate) fn max_frequency_core(&self) -> Option<CoreId> {
        None
    }

    pub(crate) fn pin_current_thread_to(&self, _core: CoreId) -> crate::Result<()> {
        Err(Error::BindRejected {
            source: io::Error::from(io::ErrorKind::Unsupported),
        })
    }

    pub(crate) fn current_thread_cores(&self) -> crate::Result<NonEmpty<CoreId>> {
        Err(Error::AffinityReadFailed {
            source: io::Error::from(io::ErrorKind::Unsupported),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_unknown() {
        assert_eq!(BUILD_TARGET_PLATFORM.max_frequency_core(), None);
    }

    #[test]
    fn affinity_operations_report_rejection() {
        assert!(matches!(
            BUILD_TARGET_PLATFORM.pin_current_thread_to(0),
            Err(Error::BindRejected { .. })
        ));
        assert!(matches!(
            BUILD_TARGET_PLATFORM.current_thread_cores(),
            Err(Error::AffinityReadFailed { .. })
        ));
    }
}
