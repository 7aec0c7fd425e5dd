//! Test utilities and fake clocks for Reel development.
//!
//! Provides a settable [`FakeClock`], a [`RecordingSink`] capturing every
//! presented state, and a seeded [`JitteredTimer`] that imitates a host
//! timer firing late by a random amount.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::Cell;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use reel_core::{Clock, PresentationSink, TickId};

/// Clock whose tick is set by the test.
///
/// Uses interior mutability so code under test can hold `&FakeClock`
/// while the test advances it.
#[derive(Debug, Default)]
pub struct FakeClock {
    tick: Cell<u64>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(tick: u64) -> Self {
        Self {
            tick: Cell::new(tick),
        }
    }

    pub fn set(&self, tick: u64) {
        self.tick.set(tick);
    }

    pub fn advance(&self, ticks: u64) -> TickId {
        self.tick.set(self.tick.get().saturating_add(ticks));
        TickId(self.tick.get())
    }
}

impl Clock for FakeClock {
    fn current_tick(&self) -> TickId {
        TickId(self.tick.get())
    }
}

/// Sink recording a clone of every presented state.
#[derive(Debug)]
pub struct RecordingSink<T> {
    pub frames: Vec<(TickId, T)>,
}

impl<T> Default for RecordingSink<T> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<T> RecordingSink<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks of every presentation, in order.
    pub fn ticks(&self) -> Vec<TickId> {
        self.frames.iter().map(|(t, _)| *t).collect()
    }

    pub fn last(&self) -> Option<&T> {
        self.frames.last().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl<T: Clone> PresentationSink<T> for RecordingSink<T> {
    fn present(&mut self, tick: TickId, state: &T) {
        self.frames.push((tick, state.clone()));
    }
}

/// Seeded generator of late, irregular poll instants.
///
/// Each poll lands `period` ticks after the previous one plus a uniform
/// jitter in `0..=max_jitter`. Identical seeds give identical sequences.
#[derive(Debug)]
pub struct JitteredTimer {
    rng: ChaCha8Rng,
    period: u64,
    max_jitter: u64,
}

impl JitteredTimer {
    pub fn new(seed: u64, period: u64, max_jitter: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            period,
            max_jitter,
        }
    }

    /// Next poll instant after `tick`.
    pub fn next_after(&mut self, tick: TickId) -> TickId {
        let jitter = if self.max_jitter == 0 {
            0
        } else {
            self.rng.random_range(0..=self.max_jitter)
        };
        tick.offset(self.period.saturating_add(jitter).max(1))
    }

    /// Poll instants from tick 0 until the first one at or beyond `until`.
    pub fn polls_until(&mut self, until: TickId) -> Vec<TickId> {
        let mut polls = Vec::new();
        let mut at = TickId::ZERO;
        while at < until {
            at = self.next_after(at);
            polls.push(at);
        }
        polls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_clock_moves_through_shared_ref() {
        let clock = FakeClock::new();
        let by_ref: &dyn Clock = &clock;
        clock.advance(30);
        assert_eq!(by_ref.current_tick(), TickId(30));
        clock.set(5);
        assert_eq!(by_ref.current_tick(), TickId(5));
    }

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.present(TickId(1), &"a");
        sink.present(TickId(4), &"b");
        assert_eq!(sink.ticks(), vec![TickId(1), TickId(4)]);
        assert_eq!(sink.last(), Some(&"b"));
    }

    #[test]
    fn jitter_is_reproducible_and_bounded() {
        let a = JitteredTimer::new(7, 100, 40).polls_until(TickId(10_000));
        let b = JitteredTimer::new(7, 100, 40).polls_until(TickId(10_000));
        assert_eq!(a, b);
        let mut prev = TickId::ZERO;
        for p in &a {
            let gap = p.0 - prev.0;
            assert!((100..=140).contains(&gap), "gap {gap}");
            prev = *p;
        }
        assert!(a.last().is_some_and(|t| *t >= TickId(10_000)));
    }
}
