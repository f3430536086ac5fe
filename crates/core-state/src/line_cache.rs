//! Fixed-size line→byte-offset cache for fast `goto line`.
//!
//! Slot 0 always holds `(0, 0)`, slot 1 the cursor's line, slot 2 the last
//! line; the remaining slots are filled under a closest-known-point
//! replacement policy driven by a deterministic LCG, matching the design's
//! stance that cache replacement correctness never depends on the RNG.

use core_text::Buffer;

pub const CACHE_SLOTS: usize = 32;

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    line: usize,
    offset: usize,
    used: bool,
}

pub struct LineCache {
    slots: [Slot; CACHE_SLOTS],
    valid: bool,
    rng_state: u64,
}

impl LineCache {
    pub fn new(seed: u64) -> Self {
        Self {
            slots: [Slot::default(); CACHE_SLOTS],
            valid: false,
            rng_state: seed | 1,
        }
    }

    /// Must be called after every edit primitive (`caches_valid := false`).
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    fn next_rand(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.rng_state >> 33
    }

    /// Resolve line `target` to a byte offset, seeding/reusing the cache.
    pub fn find_line(&mut self, buf: &Buffer, target: usize, tab_stop: usize) -> usize {
        let lines = buf.lines();
        if !self.valid {
            self.slots = [Slot::default(); CACHE_SLOTS];
            let curs_line = buf.curs_line();
            let curs_bol = buf.bol(buf.curs1());
            self.slots[0] = Slot { line: 0, offset: 0, used: true };
            self.slots[1] = Slot { line: curs_line, offset: curs_bol, used: true };
            let last_bol = buf.bol(buf.size());
            self.slots[2] = Slot { line: lines, offset: last_bol, used: true };
            self.valid = true;
        }
        if target >= lines {
            return self.slots[2].offset;
        }
        if target == 0 {
            return 0;
        }

        let mut best_idx = 0usize;
        let mut best_dist = usize::MAX;
        for (i, s) in self.slots.iter().enumerate() {
            if !s.used {
                continue;
            }
            let dist = s.line.abs_diff(target);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }
        if best_dist == 0 {
            return self.slots[best_idx].offset;
        }

        let nearest = self.slots[best_idx];
        let replace_idx = if best_dist <= 1 && best_idx >= 3 {
            best_idx
        } else {
            3 + (self.next_rand() as usize % (CACHE_SLOTS - 3))
        };
        let offset = if target > nearest.line {
            buf.forward_offset(nearest.offset, target - nearest.line, 0, tab_stop)
        } else {
            buf.backward_offset(nearest.offset, nearest.line - target)
        };
        self.slots[replace_idx] = Slot { line: target, offset, used: true };
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big_buffer(lines: usize) -> Buffer {
        let mut s = Vec::new();
        for i in 0..lines {
            s.extend_from_slice(format!("line {i}\n").as_bytes());
        }
        Buffer::from_bytes(&s)
    }

    #[test]
    fn find_line_zero_is_always_zero() {
        let buf = big_buffer(50);
        let mut cache = LineCache::new(1);
        assert_eq!(cache.find_line(&buf, 0, 8), 0);
    }

    #[test]
    fn find_line_at_or_past_last_line_returns_last_bol() {
        let buf = big_buffer(10);
        let mut cache = LineCache::new(1);
        let expected = buf.bol(buf.size());
        assert_eq!(cache.find_line(&buf, buf.lines(), 8), expected);
        assert_eq!(cache.find_line(&buf, buf.lines() + 5, 8), expected);
    }

    #[test]
    fn find_line_matches_manual_scan() {
        let buf = big_buffer(200);
        let mut cache = LineCache::new(42);
        for target in [1usize, 5, 100, 199, 50, 3] {
            let found = cache.find_line(&buf, target, 8);
            let mut expected = 0usize;
            let mut count = 0usize;
            while count < target {
                expected = buf.eol(expected) + 1;
                count += 1;
            }
            assert_eq!(found, expected, "mismatch for line {target}");
        }
    }

    #[test]
    fn invalidate_forces_reseed() {
        let buf = big_buffer(20);
        let mut cache = LineCache::new(7);
        let _ = cache.find_line(&buf, 5, 8);
        cache.invalidate();
        assert_eq!(cache.find_line(&buf, 0, 8), 0);
    }
}
