//! Prints the set of cores the current thread is allowed to run on.

fn main() {
    match prime_core::current_thread_affinity() {
        Ok(mask) => println!(
            "Current thread may run on cores {mask} ({} in total)",
            mask.core_count()
        ),
        Err(error) => println!("Could not read thread affinity: {error}"),
    }
}
