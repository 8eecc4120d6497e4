use std::fmt::{self, Display};

use nonempty::NonEmpty;

use crate::CoreId;

/// The set of cores the calling thread was eligible to execute on at the time the mask
/// was read.
///
/// A mask always contains at least one core - the thread that read it was necessarily
/// running somewhere. Cores are reported in ascending identifier order.
///
/// The `Display` implementation renders the mask in the kernel cpulist format (e.g.
/// `0-3,7`), the same representation the operating system itself uses under
/// `/sys/devices/system/cpu`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AffinityMask {
    cores: NonEmpty<CoreId>,
}

impl AffinityMask {
    /// `cores` must already be sorted ascending and deduplicated.
    pub(crate) fn new(cores: NonEmpty<CoreId>) -> Self {
        Self { cores }
    }

    /// Iterates the cores in the mask, in ascending identifier order.
    pub fn cores(&self) -> impl Iterator<Item = CoreId> + '_ {
        self.cores.iter().copied()
    }

    /// Whether the mask permits the given core.
    #[must_use]
    pub fn contains(&self, core: CoreId) -> bool {
        self.cores.iter().any(|candidate| *candidate == core)
    }

    /// The number of cores the mask permits. Always at least one.
    #[must_use]
    pub fn core_count(&self) -> usize {
        self.cores.len()
    }
}

impl Display for AffinityMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", cpulist::emit(self.cores()))
    }
}
