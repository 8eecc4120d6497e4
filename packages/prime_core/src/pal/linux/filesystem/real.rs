use std::fmt::Debug;
use std::fs;

use crate::CoreId;
use crate::pal::linux::Filesystem;

/// The directory under which the kernel exposes one entry per possible core.
const CPU_DEVICES_DIR: &str = "/sys/devices/system/cpu";

/// The virtual filesystem for the real operating system that the build is targeting.
///
/// You would only use different filesystems in PAL unit tests that need to use a mock
/// filesystem. Even then, whenever possible, unit tests should use the real filesystem
/// for maximum realism.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetFilesystem;

impl Filesystem for BuildTargetFilesystem {
    fn get_cpu_device_entries(&self) -> Option<Vec<String>> {
        let entries = fs::read_dir(CPU_DEVICES_DIR).ok()?;

        Some(
            entries
                .filter_map(|entry| {
                    entry
                        .ok()
                        .map(|entry| entry.file_name().to_string_lossy().into_owned())
                })
                .collect(),
        )
    }

    fn get_cpu_max_frequency_contents(&self, core: CoreId) -> Option<String> {
        fs::read_to_string(format!(
            "{CPU_DEVICES_DIR}/cpu{core}/cpufreq/cpuinfo_max_freq"
        ))
        .ok()
    }
}
