//! Fixed-capacity circular log of completed lines
//!
//! One writer (the bridge) appends; the display viewport, the scroll
//! cursor and new-subscriber replay read. Appending over an occupied slot
//! discards its old content; that is the bounded-history policy, not an
//! error.

use crate::config::{PAGE_LINES, RING_CAPACITY};
use crate::line::Line;

/// Ring log with the default capacity
pub type DefaultRingLog = RingLog<RING_CAPACITY>;

/// Circular buffer of `N` line slots
#[derive(Debug, Clone)]
pub struct RingLog<const N: usize> {
    slots: [Line; N],
    /// Next slot to fill
    write_index: usize,
    /// Slot shown on the bottom row of the viewport
    read_index: usize,
    /// Whether the read cursor is detached from the tail
    scrolling: bool,
}

impl<const N: usize> Default for RingLog<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingLog<N> {
    /// Create an empty log
    pub const fn new() -> Self {
        Self {
            slots: [const { Line::new() }; N],
            write_index: 0,
            read_index: 0,
            scrolling: false,
        }
    }

    /// Append a line, returning the slot it was written to
    ///
    /// The read cursor follows the new line unless scrolling.
    pub fn append(&mut self, line: Line) -> usize {
        let slot = self.write_index;
        self.slots[slot] = line;
        self.write_index = (slot + 1) % N;

        if !self.scrolling {
            self.read_index = slot;
        }
        slot
    }

    /// Slot holding the most recent line
    pub fn tail(&self) -> usize {
        (self.write_index + N - 1) % N
    }

    /// Line stored in `slot` (wrapped into range)
    pub fn read(&self, slot: usize) -> &Line {
        &self.slots[slot % N]
    }

    /// The most recently appended line
    pub fn last(&self) -> &Line {
        self.read(self.tail())
    }

    pub fn write_index(&self) -> usize {
        self.write_index
    }

    pub fn read_index(&self) -> usize {
        self.read_index
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Detach the read cursor, starting at the tail
    pub fn begin_scroll(&mut self) -> usize {
        self.scrolling = true;
        self.read_index = self.tail();
        self.read_index
    }

    /// Reattach the read cursor to the tail
    pub fn end_scroll(&mut self) -> usize {
        self.scrolling = false;
        self.read_index = self.tail();
        self.read_index
    }

    /// Number of contiguous non-empty lines ending at the tail
    pub fn history_len(&self) -> usize {
        let tail = self.tail();
        (0..N)
            .take_while(|back| !self.slots[(tail + N - back) % N].is_empty())
            .count()
    }

    /// Move the read cursor by whole pages, negative is back in time
    ///
    /// Paging back stops once the oldest line reaches the top of the
    /// viewport; paging forward stops at the tail. Returns the new cursor.
    pub fn scroll_by(&mut self, pages: i32) -> usize {
        self.scrolling = true;

        let tail = self.tail();
        let depth = (tail + N - self.read_index) % N;
        let step = (pages.unsigned_abs() as usize).saturating_mul(PAGE_LINES);

        let new_depth = if pages < 0 {
            let max_depth = self.history_len().saturating_sub(PAGE_LINES);
            if depth >= max_depth {
                depth
            } else {
                depth.saturating_add(step).min(max_depth)
            }
        } else {
            depth.saturating_sub(step)
        };

        self.read_index = (tail + N - new_depth) % N;
        self.read_index
    }

    /// Lines of the viewport ending at the read cursor, oldest first
    ///
    /// Slots before the start of history come back empty.
    pub fn window(&self, rows: usize) -> impl Iterator<Item = &Line> + '_ {
        let rows = rows.min(N);
        let end = self.read_index;
        (0..rows)
            .rev()
            .map(move |back| &self.slots[(end + N - back) % N])
    }

    /// All stored history, oldest first
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &Line> + '_ {
        let len = self.history_len();
        let tail = self.tail();
        (0..len)
            .rev()
            .map(move |back| &self.slots[(tail + N - back) % N])
    }

    /// Empty every slot and return both cursors to the start
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
        self.write_index = 0;
        self.read_index = 0;
        self.scrolling = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;
    use heapless::String;
    use proptest::prelude::*;

    fn numbered(i: usize) -> Line {
        let mut s: String<16> = String::new();
        let _ = write!(s, "line {}", i);
        Line::from_text(&s)
    }

    fn filled(count: usize) -> RingLog<RING_CAPACITY> {
        let mut log = RingLog::new();
        for i in 0..count {
            log.append(numbered(i));
        }
        log
    }

    #[test]
    fn test_wraparound_scenario() {
        let log = filled(45);
        assert_eq!(log.read(0).as_str(), "line 40");
        assert_eq!(log.tail(), 4);
        assert_eq!(log.write_index(), 5);
        assert_eq!(log.last().as_str(), "line 44");
        assert_eq!(log.history_len(), RING_CAPACITY);
    }

    #[test]
    fn test_auto_tail_follows_writes() {
        let mut log = RingLog::<RING_CAPACITY>::new();
        let slot = log.append(numbered(0));
        assert_eq!(slot, 0);
        assert_eq!(log.read_index(), 0);
        log.append(numbered(1));
        assert_eq!(log.read_index(), 1);
    }

    #[test]
    fn test_scrolling_freezes_read_cursor() {
        let mut log = filled(10);
        log.begin_scroll();
        assert_eq!(log.read_index(), 9);
        log.append(numbered(10));
        assert_eq!(log.read_index(), 9);
        assert_eq!(log.end_scroll(), 10);
    }

    #[test]
    fn test_scroll_back_clamps_at_oldest_page() {
        let mut log = filled(20);
        log.begin_scroll();

        // 20 lines, viewport 8: deepest cursor is 12 lines behind the tail
        assert_eq!(log.scroll_by(-1), 19 - 8);
        assert_eq!(log.scroll_by(-1), 19 - 12);
        assert_eq!(log.scroll_by(-1), 19 - 12);

        let first: Option<&Line> = log.window(PAGE_LINES).next();
        assert_eq!(first.map(Line::as_str), Some("line 0"));
    }

    #[test]
    fn test_scroll_forward_clamps_at_tail() {
        let mut log = filled(30);
        log.begin_scroll();
        log.scroll_by(-2);
        assert_eq!(log.scroll_by(1), 29 - 8);
        assert_eq!(log.scroll_by(1), 29);
        assert_eq!(log.scroll_by(1), 29);
    }

    #[test]
    fn test_short_history_does_not_scroll() {
        let mut log = filled(5);
        log.begin_scroll();
        assert_eq!(log.scroll_by(-1), 4);
    }

    #[test]
    fn test_scroll_back_across_wrap() {
        let mut log = filled(45);
        log.begin_scroll();
        // tail is slot 4; 40 lines of history allow 32 lines of depth
        assert_eq!(log.scroll_by(-1), (4 + RING_CAPACITY - 8) % RING_CAPACITY);
        for _ in 0..10 {
            log.scroll_by(-1);
        }
        assert_eq!(log.read_index(), (4 + RING_CAPACITY - 32) % RING_CAPACITY);
        let oldest: Option<&Line> = log.window(PAGE_LINES).next();
        assert_eq!(oldest.map(Line::as_str), Some("line 5"));
    }

    #[test]
    fn test_window_pads_with_empty_before_history() {
        let log = filled(3);
        let rows: heapless::Vec<&str, 8> = log.window(PAGE_LINES).map(Line::as_str).collect();
        assert_eq!(&rows[..5], &["", "", "", "", ""]);
        assert_eq!(&rows[5..], &["line 0", "line 1", "line 2"]);
    }

    #[test]
    fn test_iter_oldest_first() {
        let log = filled(42);
        let mut iter = log.iter_oldest_first();
        assert_eq!(iter.next().map(Line::as_str), Some("line 2"));
        assert_eq!(iter.last().map(Line::as_str), Some("line 41"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut log = filled(12);
        log.begin_scroll();
        log.reset();
        assert_eq!(log.write_index(), 0);
        assert_eq!(log.read_index(), 0);
        assert!(!log.is_scrolling());
        assert_eq!(log.history_len(), 0);
        assert_eq!(log.iter_oldest_first().count(), 0);
    }

    proptest! {
        #[test]
        fn prop_write_index_is_count_mod_capacity(count in 0usize..200) {
            let log = filled(count);
            prop_assert_eq!(log.write_index(), count % RING_CAPACITY);
            if count > 0 {
                let expected = numbered(count - 1);
                prop_assert_eq!(log.read((log.write_index() + RING_CAPACITY - 1) % RING_CAPACITY), &expected);
            }
        }

        #[test]
        fn prop_scroll_stays_within_history(count in 1usize..120, moves in proptest::collection::vec(-3i32..=3, 0..20)) {
            let mut log = filled(count);
            log.begin_scroll();
            let tail = log.tail();
            let max_depth = log.history_len().saturating_sub(PAGE_LINES);
            for pages in moves {
                let cursor = log.scroll_by(pages);
                let depth = (tail + RING_CAPACITY - cursor) % RING_CAPACITY;
                prop_assert!(depth <= max_depth);
                prop_assert!(!log.read(cursor).is_empty());
            }
        }
    }
}
