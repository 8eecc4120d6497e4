use std::fmt::Debug;
#[cfg(test)]
use std::sync::Arc;

use crate::CoreId;
#[cfg(test)]
use crate::pal::linux::MockFilesystem;
use crate::pal::linux::{BuildTargetFilesystem, Filesystem};

/// Enum to hide the different filesystem implementations behind a single wrapper type.
#[derive(Clone)]
pub(crate) enum FilesystemFacade {
    Real(&'static BuildTargetFilesystem),

    #[cfg(test)]
    Mock(Arc<MockFilesystem>),
}

impl FilesystemFacade {
    pub(crate) const fn real() -> Self {
        Self::Real(&BuildTargetFilesystem)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockFilesystem) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

impl Filesystem for FilesystemFacade {
    fn get_cpu_device_entries(&self) -> Option<Vec<String>> {
        match self {
            Self::Real(filesystem) => filesystem.get_cpu_device_entries(),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_cpu_device_entries(),
        }
    }

    fn get_cpu_max_frequency_contents(&self, core: CoreId) -> Option<String> {
        match self {
            Self::Real(filesystem) => filesystem.get_cpu_max_frequency_contents(core),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_cpu_max_frequency_contents(core),
        }
    }
}

impl Debug for FilesystemFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Real(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Mock(inner) => inner.fmt(f),
        }
    }
}
