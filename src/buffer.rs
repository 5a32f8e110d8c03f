//! Bounded line containers backing the inbound queue and the displayed set.

use std::collections::VecDeque;
use std::rc::Rc;

/// A single received log line. The text is kept verbatim, escape codes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    seq: u64,
    text: Rc<str>,
}

impl LogLine {
    pub fn new(seq: u64, text: impl Into<Rc<str>>) -> Self {
        Self {
            seq,
            text: text.into(),
        }
    }

    /// Arrival order, unique for the lifetime of a viewer.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }
}

/// FIFO of log lines. The cap is passed on each mutation rather than stored,
/// so a new limit only takes effect on the next push or merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: VecDeque<LogLine>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }

    /// Appends `line` and evicts from the front until at most `limit` remain.
    pub fn push(&mut self, line: LogLine, limit: usize) {
        self.lines.push_back(line);
        self.truncate_front(limit);
    }

    /// Moves every line of `other` onto the end of this buffer, leaving
    /// `other` empty, then trims the oldest lines down to `limit`.
    pub fn merge_from(&mut self, other: &mut LineBuffer, limit: usize) {
        self.lines.append(&mut other.lines);
        self.truncate_front(limit);
    }

    /// Drops the oldest lines until `len() <= limit`.
    pub fn truncate_front(&mut self, limit: usize) {
        let excess = self.lines.len().saturating_sub(limit);
        self.lines.drain(..excess);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(buffer: &LineBuffer) -> Vec<&str> {
        buffer.iter().map(LogLine::text).collect()
    }

    fn fill(lines: &[&str], limit: usize) -> LineBuffer {
        let mut buffer = LineBuffer::new();
        for (seq, text) in lines.iter().enumerate() {
            buffer.push(LogLine::new(seq as u64, *text), limit);
        }
        buffer
    }

    #[test]
    fn push_evicts_oldest_first() {
        let buffer = fill(&["a", "b", "c", "d"], 3);
        assert_eq!(texts(&buffer), vec!["b", "c", "d"]);
    }

    #[test]
    fn push_with_zero_limit_keeps_nothing() {
        let buffer = fill(&["a", "b"], 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn lowered_limit_trims_down_on_next_push() {
        let mut buffer = fill(&["a", "b", "c", "d", "e"], 10);
        buffer.push(LogLine::new(5, "f"), 2);
        assert_eq!(texts(&buffer), vec!["e", "f"]);
    }

    #[test]
    fn merge_drains_source_and_preserves_order() {
        let mut shown = fill(&["a", "b"], 10);
        let mut queued = fill(&["c", "d", "e"], 10);

        shown.merge_from(&mut queued, 4);

        assert_eq!(texts(&shown), vec!["b", "c", "d", "e"]);
        assert!(queued.is_empty());
    }

    #[test]
    fn truncate_front_is_noop_under_limit() {
        let mut buffer = fill(&["a", "b"], 10);
        buffer.truncate_front(5);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn contains_is_case_sensitive() {
        let line = LogLine::new(0, "ERR: disk full");
        assert!(line.contains("ERR"));
        assert!(!line.contains("err"));
    }
}
