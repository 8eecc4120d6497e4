//! The startup-path flow this crate exists for: classify the fastest core once, pin the
//! critical-path thread to it, then read the affinity back for verification.
//!
//! When classification or pinning is not possible we proceed unpinned, which is always
//! safe - just slower.

fn main() {
    match prime_core::max_frequency_core() {
        Some(core) => {
            println!("Maximum-frequency core: {core}");

            match prime_core::pin_current_thread_to(core) {
                Ok(()) => println!("Current thread pinned to core {core}"),
                Err(error) => println!("Continuing unpinned: {error}"),
            }
        }
        None => println!("No core exposed a readable maximum frequency; continuing unpinned"),
    }

    match prime_core::current_thread_affinity() {
        Ok(mask) => println!("Current thread may run on cores {mask}"),
        Err(error) => println!("Could not read thread affinity: {error}"),
    }
}
