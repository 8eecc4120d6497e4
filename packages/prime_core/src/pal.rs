//! Platform Abstraction Layer (PAL). This is private API that the public entry points
//! delegate to, with the operating system surfaces behind mockable provider traits.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub(crate) use linux::*;

#[cfg(not(target_os = "linux"))]
mod fallback;
#[cfg(not(target_os = "linux"))]
pub(crate) use fallback::*;
