use std::{io, mem};

use itertools::Itertools;
use nonempty::NonEmpty;
use tracing::{debug, trace};

use crate::pal::linux::{
    Bindings, BindingsFacade, Filesystem, FilesystemFacade,
};
use crate::{CoreFrequency, CoreId, Error};

/// Singleton instance of `BuildTargetPlatform`, used by the public entry points to hook
/// up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform =
    BuildTargetPlatform::new(BindingsFacade::real(), FilesystemFacade::real());

/// How many cores a `cpu_set_t` can represent. Identifiers at or beyond this capacity
/// cannot be expressed in the fixed-size set at all.
#[expect(clippy::cast_sign_loss, reason = "CPU_SETSIZE is a positive constant")]
const CPU_SET_CAPACITY: CoreId = libc::CPU_SETSIZE as CoreId;

/// The platform that matches the crate's build target.
///
/// You would only use a different platform in unit tests that need to mock the platform.
/// Even then, whenever possible, unit tests should use the real platform for maximum
/// realism.
#[derive(Debug)]
pub(crate) struct BuildTargetPlatform {
    bindings: BindingsFacade,
    fs: FilesystemFacade,
}

impl BuildTargetPlatform {
    pub(crate) const fn new(bindings: BindingsFacade, fs: FilesystemFacade) -> Self {
        Self { bindings, fs }
    }

    /// Enumerates the cores the platform exposes, as a sorted set of identifiers.
    ///
    /// Identifiers are taken from the per-core directory names themselves, so gaps from
    /// hot-removed or unusually numbered cores are preserved instead of being collapsed
    /// into a count that would have to be turned back into identifiers by guessing.
    pub(crate) fn discovered_cores(&self) -> Vec<CoreId> {
        let Some(entries) = self.fs.get_cpu_device_entries() else {
            // An unreadable topology directory means no discoverable cores. Downstream
            // classification already treats "no cores" as a valid state.
            debug!("CPU topology directory is not readable; no cores discovered");
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(|name| core_id_from_entry_name(name))
            .sorted_unstable()
            .dedup()
            .collect_vec()
    }

    /// Selects the discovered core with the highest maximum frequency.
    ///
    /// A core whose frequency attribute is absent or unparseable contributes no
    /// candidate and never aborts the scan. Ties resolve to the lowest identifier.
    /// Returns `None` when no core yielded a readable frequency, including when nothing
    /// was discovered at all.
    pub(crate) fn max_frequency_core(&self) -> Option<CoreId> {
        let mut best: Option<(CoreId, CoreFrequency)> = None;

        for core in self.discovered_cores() {
            let Some(contents) = self.fs.get_cpu_max_frequency_contents(core) else {
                trace!(core, "core has no readable frequency attribute; skipped");
                continue;
            };

            let Ok(frequency) = contents.trim().parse::<CoreFrequency>() else {
                trace!(core, "core frequency attribute is not an integer; skipped");
                continue;
            };

            // Strictly greater, so the first (lowest) core holding the maximum wins ties.
            if best.is_none_or(|(_, best_frequency)| frequency > best_frequency) {
                best = Some((core, frequency));
            }
        }

        if let Some((core, frequency)) = best {
            debug!(core, frequency, "classified the maximum-frequency core");
        }

        best.map(|(core, _)| core)
    }

    /// Restricts the calling thread to the given core.
    ///
    /// On rejection the previous mask remains in effect; nothing is partially applied
    /// and nothing is retried.
    pub(crate) fn pin_current_thread_to(&self, core: CoreId) -> crate::Result<()> {
        // The fixed-size set cannot represent such identifiers; reject them the same way
        // the kernel rejects an out-of-topology identifier instead of indexing out of
        // bounds in CPU_SET below.
        if core >= CPU_SET_CAPACITY {
            return Err(Error::BindRejected {
                source: io::Error::from_raw_os_error(libc::EINVAL),
            });
        }

        // SAFETY: Zero-initialized cpu_set_t is a valid value.
        let mut cpu_set: libc::cpu_set_t = unsafe { mem::zeroed() };

        // SAFETY: No safety requirements; the index is bounds-checked above.
        unsafe {
            libc::CPU_SET(core as usize, &mut cpu_set);
        }

        self.bindings
            .sched_setaffinity_current(&cpu_set)
            .map_err(|source| Error::BindRejected { source })
    }

    /// Reads back the set of cores the calling thread may execute on, ascending.
    pub(crate) fn current_thread_cores(&self) -> crate::Result<NonEmpty<CoreId>> {
        let cpu_set = self
            .bindings
            .sched_getaffinity_current()
            .map_err(|source| Error::AffinityReadFailed { source })?;

        // The mask may permit cores the scanner cannot classify (no sysfs entry, no
        // frequency scaling), so we probe every slot of the set, not just discovered
        // cores.
        let cores = (0..CPU_SET_CAPACITY)
            // SAFETY: No safety requirements; the index is always within the set.
            .filter(|core| unsafe { libc::CPU_ISSET(*core as usize, &cpu_set) })
            .collect_vec();

        Ok(NonEmpty::from_vec(cores).expect(
            "current thread has no cores in its affinity mask - impossible because this code is running on one of them",
        ))
    }
}

/// Extracts the core identifier from a `cpu<digits>` directory entry name.
///
/// Sibling entries that merely share the `cpu` prefix (`cpufreq`, `cpuidle`, `cpupower`)
/// carry a non-numeric suffix and yield `None`, as do entries unrelated to cores
/// (`possible`, `online`, `kernel_max`).
fn core_id_from_entry_name(name: &str) -> Option<CoreId> {
    let suffix = name.strip_prefix("cpu")?;

    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    suffix.parse().ok()
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use crate::pal::linux::{MockBindings, MockFilesystem};

    use super::*;

    /// Configures the mock filesystem to expose one `cpuN` entry per listed core, with
    /// the given frequency attribute contents (`None` simulates a core whose attribute
    /// file is missing).
    ///
    /// The simulation is valid for one classification pass.
    fn simulate_topology(fs: &mut MockFilesystem, cores: &[(CoreId, Option<&str>)]) {
        let entries = cores
            .iter()
            .map(|(core, _)| format!("cpu{core}"))
            .collect_vec();

        fs.expect_get_cpu_device_entries()
            .times(1)
            .return_const(Some(entries));

        for &(core, contents) in cores {
            fs.expect_get_cpu_max_frequency_contents()
                .with(eq(core))
                .times(1)
                .return_const(contents.map(ToString::to_string));
        }
    }

    fn platform_with_fs(fs: MockFilesystem) -> BuildTargetPlatform {
        BuildTargetPlatform::new(
            BindingsFacade::from_mock(MockBindings::new()),
            FilesystemFacade::from_mock(fs),
        )
    }

    fn platform_with_bindings(bindings: MockBindings) -> BuildTargetPlatform {
        BuildTargetPlatform::new(
            BindingsFacade::from_mock(bindings),
            FilesystemFacade::from_mock(MockFilesystem::new()),
        )
    }

    fn entry_names(names: &[&str]) -> Option<Vec<String>> {
        Some(names.iter().map(ToString::to_string).collect_vec())
    }

    fn cpuset_from(cores: &[CoreId]) -> libc::cpu_set_t {
        // SAFETY: Zero-initialized cpu_set_t is a valid value.
        let mut cpu_set: libc::cpu_set_t = unsafe { mem::zeroed() };

        for core in cores {
            // SAFETY: No safety requirements; test data stays far below the capacity.
            unsafe {
                libc::CPU_SET(*core as usize, &mut cpu_set);
            }
        }

        cpu_set
    }

    #[test]
    fn discovery_excludes_non_core_entries() {
        let mut fs = MockFilesystem::new();
        fs.expect_get_cpu_device_entries()
            .times(1)
            .return_const(entry_names(&["cpu0", "cpu1", "cpufreq", "cpuidle"]));

        let platform = platform_with_fs(fs);

        assert_eq!(platform.discovered_cores(), vec![0, 1]);
    }

    #[test]
    fn discovery_rejects_prefix_only_and_mixed_suffixes() {
        let mut fs = MockFilesystem::new();
        fs.expect_get_cpu_device_entries()
            .times(1)
            .return_const(entry_names(&[
                "cpu",
                "cpu0",
                "cpupower",
                "cpu1x",
                "possible",
                "kernel_max",
                "cpu12",
            ]));

        let platform = platform_with_fs(fs);

        assert_eq!(platform.discovered_cores(), vec![0, 12]);
    }

    #[test]
    fn discovery_preserves_gaps_and_sorts() {
        // Hot-pluggable and heterogeneous systems may number cores with holes. The
        // discovered identifiers are reported as-is, never renumbered 0..count.
        let mut fs = MockFilesystem::new();
        fs.expect_get_cpu_device_entries()
            .times(1)
            .return_const(entry_names(&["cpu5", "cpu0", "cpu2"]));

        let platform = platform_with_fs(fs);

        assert_eq!(platform.discovered_cores(), vec![0, 2, 5]);
    }

    #[test]
    fn discovery_degrades_to_empty_when_directory_unreadable() {
        let mut fs = MockFilesystem::new();
        fs.expect_get_cpu_device_entries()
            .times(1)
            .return_const(None);

        let platform = platform_with_fs(fs);

        assert_eq!(platform.discovered_cores(), Vec::<CoreId>::new());
    }

    #[test]
    fn classification_picks_highest_frequency() {
        let mut fs = MockFilesystem::new();
        simulate_topology(
            &mut fs,
            &[
                (0, Some("1800000\n")),
                (1, Some("2800000\n")),
                (2, Some("2000000\n")),
            ],
        );

        let platform = platform_with_fs(fs);

        assert_eq!(platform.max_frequency_core(), Some(1));
    }

    #[test]
    fn classification_tie_breaks_to_lowest_core() {
        // The exact layout of a common 4-core big.LITTLE part with one little core
        // lacking frequency scaling: the first core holding the maximum wins.
        let mut fs = MockFilesystem::new();
        simulate_topology(
            &mut fs,
            &[
                (0, Some("1800000")),
                (1, Some("2400000")),
                (2, None),
                (3, Some("2400000")),
            ],
        );

        let platform = platform_with_fs(fs);

        assert_eq!(platform.max_frequency_core(), Some(1));
    }

    #[test]
    fn classification_of_empty_topology_is_unknown() {
        let mut fs = MockFilesystem::new();
        fs.expect_get_cpu_device_entries()
            .times(1)
            .return_const(entry_names(&[]));

        let platform = platform_with_fs(fs);

        assert_eq!(platform.max_frequency_core(), None);
    }

    #[test]
    fn classification_of_unreadable_topology_is_unknown() {
        let mut fs = MockFilesystem::new();
        fs.expect_get_cpu_device_entries()
            .times(1)
            .return_const(None);

        let platform = platform_with_fs(fs);

        assert_eq!(platform.max_frequency_core(), None);
    }

    #[test]
    fn classification_is_unknown_when_no_core_has_readable_frequency() {
        let mut fs = MockFilesystem::new();
        simulate_topology(&mut fs, &[(0, None), (1, None)]);

        let platform = platform_with_fs(fs);

        assert_eq!(platform.max_frequency_core(), None);
    }

    #[test]
    fn classification_skips_unparseable_frequency() {
        let mut fs = MockFilesystem::new();
        simulate_topology(
            &mut fs,
            &[(0, Some("<unavailable>")), (1, Some("1000000"))],
        );

        let platform = platform_with_fs(fs);

        assert_eq!(platform.max_frequency_core(), Some(1));
    }

    #[test]
    fn classification_probes_non_contiguous_identifiers() {
        // Core identifiers come from the discovered set, not from 0..count - with a
        // gap at cpu1, core 4 must still be probed and win.
        let mut fs = MockFilesystem::new();
        simulate_topology(
            &mut fs,
            &[(0, Some("1800000")), (2, Some("2000000")), (4, Some("2600000"))],
        );

        let platform = platform_with_fs(fs);

        assert_eq!(platform.max_frequency_core(), Some(4));
    }

    #[test]
    fn classification_handles_single_core_with_nonzero_id() {
        let mut fs = MockFilesystem::new();
        simulate_topology(&mut fs, &[(7, Some("1000000"))]);

        let platform = platform_with_fs(fs);

        assert_eq!(platform.max_frequency_core(), Some(7));
    }

    #[test]
    fn pin_sets_exactly_the_requested_core() {
        let mut bindings = MockBindings::new();

        let expected_set = cpuset_from(&[3]);

        bindings
            .expect_sched_setaffinity_current()
            .withf(move |cpu_set| {
                // SAFETY: No safety requirements.
                unsafe { libc::CPU_EQUAL(cpu_set, &expected_set) }
            })
            .times(1)
            .returning(|_| Ok(()));

        let platform = platform_with_bindings(bindings);

        platform.pin_current_thread_to(3).unwrap();
    }

    #[test]
    fn pin_surfaces_os_rejection() {
        let mut bindings = MockBindings::new();

        bindings
            .expect_sched_setaffinity_current()
            .times(1)
            .returning(|_| Err(io::Error::from_raw_os_error(libc::EPERM)));

        let platform = platform_with_bindings(bindings);

        let result = platform.pin_current_thread_to(0);

        assert!(matches!(result, Err(Error::BindRejected { .. })));
    }

    #[test]
    fn pin_rejects_identifier_beyond_set_capacity() {
        // No expectation is set on the mock, so reaching the OS call would panic the
        // test - the oversized identifier must be rejected before that.
        let platform = platform_with_bindings(MockBindings::new());

        let result = platform.pin_current_thread_to(CPU_SET_CAPACITY);

        assert!(matches!(result, Err(Error::BindRejected { .. })));
    }

    #[test]
    fn affinity_reads_ascending_cores() {
        let mut bindings = MockBindings::new();

        let os_set = cpuset_from(&[4, 1, 2]);

        bindings
            .expect_sched_getaffinity_current()
            .times(1)
            .returning(move || Ok(os_set));

        let platform = platform_with_bindings(bindings);

        let cores = platform.current_thread_cores().unwrap();

        assert_eq!(cores.into_iter().collect_vec(), vec![1, 2, 4]);
    }

    #[test]
    fn affinity_read_failure_is_distinct_from_empty() {
        let mut bindings = MockBindings::new();

        bindings
            .expect_sched_getaffinity_current()
            .times(1)
            .returning(|| Err(io::Error::from_raw_os_error(libc::EPERM)));

        let platform = platform_with_bindings(bindings);

        let result = platform.current_thread_cores();

        assert!(matches!(result, Err(Error::AffinityReadFailed { .. })));
    }

    #[test]
    fn classify_pin_inspect_round_trip() {
        // The whole startup-path flow against one simulated device: classification
        // picks core 1, the bind applies exactly {1} and the inspector reads {1} back.
        let mut fs = MockFilesystem::new();
        simulate_topology(
            &mut fs,
            &[
                (0, Some("1800000")),
                (1, Some("2400000")),
                (2, None),
                (3, Some("2400000")),
            ],
        );

        let mut bindings = MockBindings::new();

        let expected_set = cpuset_from(&[1]);

        bindings
            .expect_sched_setaffinity_current()
            .withf(move |cpu_set| {
                // SAFETY: No safety requirements.
                unsafe { libc::CPU_EQUAL(cpu_set, &expected_set) }
            })
            .times(1)
            .returning(|_| Ok(()));

        bindings
            .expect_sched_getaffinity_current()
            .times(1)
            .returning(move || Ok(expected_set));

        let platform = BuildTargetPlatform::new(
            BindingsFacade::from_mock(bindings),
            FilesystemFacade::from_mock(fs),
        );

        let fastest = platform.max_frequency_core().unwrap();
        assert_eq!(fastest, 1);

        platform.pin_current_thread_to(fastest).unwrap();

        let cores = platform.current_thread_cores().unwrap();
        assert_eq!(cores.into_iter().collect_vec(), vec![1]);
    }

    #[test]
    fn entry_name_parsing_accepts_only_digit_suffixes() {
        assert_eq!(core_id_from_entry_name("cpu0"), Some(0));
        assert_eq!(core_id_from_entry_name("cpu12"), Some(12));
        assert_eq!(core_id_from_entry_name("cpu"), None);
        assert_eq!(core_id_from_entry_name("cpufreq"), None);
        assert_eq!(core_id_from_entry_name("cpuidle"), None);
        assert_eq!(core_id_from_entry_name("cpu1a"), None);
        assert_eq!(core_id_from_entry_name("cpu-1"), None);
        assert_eq!(core_id_from_entry_name("cpu+1"), None);
        assert_eq!(core_id_from_entry_name("online"), None);
    }
}
