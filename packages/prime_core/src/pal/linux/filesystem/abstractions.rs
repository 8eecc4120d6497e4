use std::fmt::Debug;

use crate::CoreId;

/// Linux has this funny notion of exposing various OS APIs as a virtual filesystem. This
/// trait abstracts the parts we consume to allow them to be mocked.
///
/// The scope of this trait is limited to only the virtual filesystem exposed by the OS.
/// We do not expect to do "real" file I/O in this layer. All I/O is synchronous and
/// blocking because we expect it to hit a fast path in the OS, given the data is never
/// on a real storage device.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Filesystem: Debug + Send + Sync + 'static {
    /// Lists the names of the entries directly under `/sys/devices/system/cpu`, or
    /// `None` if the directory cannot be read.
    ///
    /// The listing is raw: per-core directories (`cpu0`, `cpu12`) appear next to sibling
    /// entries that merely share the prefix (`cpufreq`, `cpuidle`, `possible`, ...).
    /// Separating the two is the scanner's job, not this layer's.
    fn get_cpu_device_entries(&self) -> Option<Vec<String>>;

    /// Gets the contents of `/sys/devices/system/cpu/cpu{core}/cpufreq/cpuinfo_max_freq`,
    /// or `None` if the file does not exist or cannot be read.
    ///
    /// This is a single-line file holding the core's maximum attainable frequency in
    /// kHz (+ newline). Cores without frequency scaling support lack this file, as do
    /// hot-removed cores whose directory still lingers.
    fn get_cpu_max_frequency_contents(&self, core: CoreId) -> Option<String>;
}
