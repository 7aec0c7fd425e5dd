//! Staged text reveal and periodic accents.

use std::f64::consts::TAU;

/// Number of characters of a typewriter reveal visible after `elapsed`
/// ticks at `chars_per_tick`, capped at `total`.
pub fn typewriter_len(elapsed: i64, chars_per_tick: f64, total: usize) -> usize {
    if elapsed <= 0 || !(chars_per_tick > 0.0) {
        return 0;
    }
    let shown = (elapsed as f64 * chars_per_tick).floor();
    if shown >= total as f64 {
        total
    } else {
        shown as usize
    }
}

/// Prefix of `text` visible after `elapsed` ticks.
///
/// Counts characters, not bytes, so a cut never lands inside a
/// multi-byte code point.
///
/// ```
/// use reel_anim::typewriter;
///
/// assert_eq!(typewriter("Redis → down", 0, 1.5), "");
/// assert_eq!(typewriter("Redis → down", 4, 1.5), "Redis ");
/// assert_eq!(typewriter("Redis → down", 5, 1.5), "Redis →");
/// assert_eq!(typewriter("Redis → down", 99, 1.5), "Redis → down");
/// ```
pub fn typewriter(text: &str, elapsed: i64, chars_per_tick: f64) -> &str {
    let n = typewriter_len(elapsed, chars_per_tick, usize::MAX);
    match text.char_indices().nth(n) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Cursor blink: visible for `half_period` ticks, hidden for the next
/// `half_period`, starting visible at tick 0. A zero half-period is
/// always visible.
pub fn blink(elapsed: i64, half_period: u64) -> bool {
    if half_period == 0 {
        return true;
    }
    let half = i64::try_from(half_period).unwrap_or(i64::MAX);
    elapsed.div_euclid(half) % 2 == 0
}

/// Sinusoidal glow intensity in `[0.4, 1.0]` with a `period`-tick cycle.
///
/// Starts at the midpoint 0.7 and rises first. A zero period is held at
/// full intensity.
pub fn pulse(elapsed: i64, period: u64) -> f64 {
    if period == 0 {
        return 1.0;
    }
    let phase = elapsed as f64 / period as f64 * TAU;
    0.7 + 0.3 * phase.sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typewriter_counts_chars() {
        assert_eq!(typewriter("abcdef", 2, 1.5), "abc");
        assert_eq!(typewriter("abcdef", 3, 1.5), "abcd");
        assert_eq!(typewriter("abcdef", -5, 1.5), "");
        assert_eq!(typewriter("héllo", 2, 1.0), "hé");
    }

    #[test]
    fn typewriter_len_caps() {
        assert_eq!(typewriter_len(1_000, 2.0, 29), 29);
        assert_eq!(typewriter_len(10, 2.0, 29), 20);
        assert_eq!(typewriter_len(10, 0.0, 29), 0);
        assert_eq!(typewriter_len(10, f64::NAN, 29), 0);
    }

    #[test]
    fn blink_alternates() {
        let seq: Vec<bool> = (0..32).step_by(8).map(|t| blink(t, 8)).collect();
        assert_eq!(seq, vec![true, false, true, false]);
        assert!(!blink(-1, 8));
        assert!(blink(7, 0));
    }

    #[test]
    fn pulse_stays_in_band() {
        assert!((pulse(0, 30) - 0.7).abs() < 1e-12);
        assert!((pulse(7, 30) - pulse(37, 30)).abs() < 1e-12);
        for t in -60..60 {
            let v = pulse(t, 30);
            assert!((0.4 - 1e-12..=1.0 + 1e-12).contains(&v), "t={t}: {v}");
        }
        assert_eq!(pulse(5, 0), 1.0);
    }
}
