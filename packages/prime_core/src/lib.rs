//! Identify the highest-performance processor core on heterogeneous (big.LITTLE-style)
//! systems and pin the calling thread to it.
//!
//! Mobile and embedded SoCs mix fast "big" cores with power-efficient "little" ones.
//! On latency-sensitive startup paths, letting the scheduler place the critical thread
//! on a little core costs real time-to-ready. This crate reads the topology the kernel
//! exposes under `/sys/devices/system/cpu`, classifies cores by their maximum attainable
//! clock frequency and provides one-shot affinity primitives for the calling thread.
//!
//! Three independent, stateless entry points:
//!
//! - [`max_frequency_core()`] scans the topology and returns the fastest core, if any
//!   core exposes a readable frequency.
//! - [`pin_current_thread_to()`] restricts the calling thread to a single core.
//! - [`current_thread_affinity()`] reads back the set of cores the calling thread is
//!   currently allowed to run on.
//!
//! # Quick start
//!
//! ```rust
//! if let Some(core) = prime_core::max_frequency_core() {
//!     match prime_core::pin_current_thread_to(core) {
//!         Ok(()) => println!("pinned to core {core}"),
//!         Err(error) => println!("continuing unpinned: {error}"),
//!     }
//! }
//!
//! let mask = prime_core::current_thread_affinity()?;
//! println!("the current thread may run on cores {mask}");
//! # Ok::<(), prime_core::Error>(())
//! ```
//!
//! # Degraded environments
//!
//! Topology facts are optional on real devices: the sysfs tree may be unreadable, core
//! numbering may have gaps, and little cores sometimes lack frequency scaling attributes
//! entirely. Classification treats every such gap as "this core contributes no
//! candidate" and only returns [`None`] when no core produced a usable frequency.
//! Binding and inspection surface operating system rejections through [`Error`] so the
//! caller can decide to proceed unpinned instead of assuming the pin took effect.

mod affinity_mask;
mod error;
mod functions;
mod primitive_types;

pub use affinity_mask::*;
pub use error::*;
pub use functions::*;
pub use primitive_types::*;

pub(crate) mod pal;
