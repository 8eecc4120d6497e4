use std::io;

use thiserror::Error;

/// Errors that can occur when manipulating thread affinity.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The operating system rejected the request to restrict the calling thread to a
    /// core.
    ///
    /// Typical causes are a core identifier outside the current topology, a core that is
    /// offline, or insufficient permissions. Nothing was applied: the thread keeps the
    /// affinity mask it had before the call, and the caller must decide whether to
    /// proceed unpinned or abort.
    #[error("the operating system rejected the thread affinity change: {source}")]
    BindRejected {
        /// The underlying operating system error.
        source: io::Error,
    },

    /// The calling thread's affinity mask could not be read back from the operating
    /// system.
    ///
    /// This is a distinct condition from a mask that permits no cores - the latter
    /// cannot be observed because the thread asking is necessarily running on one.
    #[error("failed to read the calling thread's affinity mask: {source}")]
    AffinityReadFailed {
        /// The underlying operating system error.
        source: io::Error,
    },
}

/// A specialized `Result` type for affinity operations, returning the crate's
/// [`Error`][crate::Error] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, crate::Error>;
