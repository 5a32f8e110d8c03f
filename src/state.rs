//! The viewer's single owned state and its reducer.
//!
//! Socket callbacks and UI controls never mutate anything directly. They
//! dispatch a [`ViewerAction`], and [`ViewerState::apply`] produces the next
//! snapshot.

use std::rc::Rc;

use yew::Reducible;

use crate::buffer::{LineBuffer, LogLine};
use crate::reconnect::{ConnectionId, ConnectionState, ConnectionTracker, ReconnectPolicy};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerAction {
    /// A socket was created for `id` at `at_ms`.
    ConnectStarted { id: ConnectionId, at_ms: f64 },
    /// The transport refused to create a socket at `at_ms`.
    ConnectFailed { at_ms: f64 },
    Opened(ConnectionId),
    Received { id: ConnectionId, text: String },
    Closed(ConnectionId),
    /// Move queued lines into the displayed set.
    Reconcile,
    TogglePause,
    SetFilter(String),
    /// Raw contents of the max-lines input.
    SetMaxLines(String),
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    inbound: LineBuffer,
    displayed: LineBuffer,
    filter_text: String,
    is_paused: bool,
    max_log_lines: usize,
    connection: ConnectionTracker,
    policy: ReconnectPolicy,
    next_seq: u64,
    scroll_epoch: u64,
}

impl ViewerState {
    pub fn new(max_log_lines: usize, policy: ReconnectPolicy) -> Self {
        Self {
            inbound: LineBuffer::new(),
            displayed: LineBuffer::new(),
            filter_text: String::new(),
            is_paused: false,
            max_log_lines,
            connection: ConnectionTracker::default(),
            policy,
            next_seq: 0,
            scroll_epoch: 0,
        }
    }

    pub fn inbound(&self) -> &LineBuffer {
        &self.inbound
    }

    pub fn displayed(&self) -> &LineBuffer {
        &self.displayed
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn max_log_lines(&self) -> usize {
        self.max_log_lines
    }

    pub fn connection(&self) -> &ConnectionTracker {
        &self.connection
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Total lines received so far, including evicted ones.
    pub fn received_total(&self) -> u64 {
        self.next_seq
    }

    /// Bumped by every reconciliation that moved lines.
    pub fn scroll_epoch(&self) -> u64 {
        self.scroll_epoch
    }

    pub fn should_connect(&self, now_ms: f64) -> bool {
        self.connection.should_attempt(now_ms, &self.policy)
    }

    pub fn retry_in(&self, now_ms: f64) -> Option<f64> {
        self.connection.retry_in(now_ms, &self.policy)
    }

    pub fn needs_reconcile(&self) -> bool {
        !self.is_paused && !self.inbound.is_empty()
    }

    /// Displayed lines containing the filter text. Does not touch the buffer.
    pub fn filtered(&self) -> impl Iterator<Item = &LogLine> {
        let needle = self.filter_text.as_str();
        self.displayed.iter().filter(move |line| line.contains(needle))
    }

    pub fn apply(&mut self, action: ViewerAction) {
        match action {
            ViewerAction::ConnectStarted { id, at_ms } => self.connection.begin(id, at_ms),
            ViewerAction::ConnectFailed { at_ms } => self.connection.fail(at_ms),
            ViewerAction::Opened(id) => {
                if !self.connection.opened(id) {
                    log::debug!("ignoring open event from stale connection {id}");
                }
            }
            ViewerAction::Received { id, text } => {
                if !self.connection.is_current(id) {
                    log::debug!("dropping message from stale connection {id}");
                    return;
                }
                let line = LogLine::new(self.next_seq, text);
                self.next_seq += 1;
                self.inbound.push(line, self.max_log_lines);
            }
            ViewerAction::Closed(id) => {
                if !self.connection.closed(id) {
                    log::debug!("ignoring close event from stale connection {id}");
                }
            }
            ViewerAction::Reconcile => self.reconcile(),
            ViewerAction::TogglePause => self.is_paused = !self.is_paused,
            ViewerAction::SetFilter(text) => self.filter_text = text,
            ViewerAction::SetMaxLines(raw) => self.max_log_lines = parse_max_lines(&raw),
            ViewerAction::Clear => {
                self.inbound.clear();
                self.displayed.clear();
            }
        }
    }

    fn reconcile(&mut self) {
        if !self.needs_reconcile() {
            return;
        }
        let moved = self.inbound.len();
        self.displayed
            .merge_from(&mut self.inbound, self.max_log_lines);
        self.scroll_epoch += 1;
        log::debug!(
            "reconciled {moved} lines, {} displayed",
            self.displayed.len()
        );
    }
}

impl Reducible for ViewerState {
    type Action = ViewerAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

/// Reads the max-lines input the way a lenient integer parse would: leading
/// whitespace and an optional sign, then the longest run of digits. Anything
/// unparsable becomes 0, negatives clamp to 0 and overflow saturates.
pub fn parse_max_lines(raw: &str) -> usize {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if negative || digits.is_empty() {
        return 0;
    }
    digits.parse::<usize>().unwrap_or(usize::MAX)
}
