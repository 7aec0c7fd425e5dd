//! Benchmark profiles for the Reel timeline engine.
//!
//! - [`long_plan`]: the three-minute scene list repeated to stress the
//!   dispatcher with many spans
//! - [`instant_driver`]: driver settings for lockstep simulation runs
//! - [`spread_ticks`]: deterministic pseudo-random trigger ticks

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use reel_engine::DriverConfig;
use reel_video::VideoConfig;

/// The three-minute plan repeated `repeats` times back to back.
///
/// Every scene keeps its duration, so a frame at offset `k` inside any
/// copy renders the same elements.
pub fn long_plan(repeats: usize) -> VideoConfig {
    let mut config = VideoConfig::three_minute();
    let one = config.scenes.clone();
    config.scenes = one.iter().cycle().take(one.len() * repeats).cloned().collect();
    config.total = None;
    config
}

/// Lockstep settings with room for every staged simulation event.
pub fn instant_driver() -> DriverConfig {
    DriverConfig {
        max_pending: 4096,
        ..DriverConfig::default()
    }
}

/// `n` trigger ticks in `0..span`, reproducible from `seed`.
pub fn spread_ticks(n: usize, span: u64, seed: u64) -> Vec<u64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) % span.max(1)
        })
        .collect()
}
