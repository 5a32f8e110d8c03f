use log_streamer::{ConnectionId, ReconnectPolicy, ViewerAction, ViewerState};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Receive(String),
    Reconcile,
    TogglePause,
    SetMaxLines(u8),
    Clear,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => "[a-z ]{0,8}".prop_map(Step::Receive),
        2 => Just(Step::Reconcile),
        1 => Just(Step::TogglePause),
        1 => (0u8..8).prop_map(Step::SetMaxLines),
        1 => Just(Step::Clear),
    ]
}

fn connected(max_log_lines: usize) -> (ViewerState, ConnectionId) {
    let mut state = ViewerState::new(max_log_lines, ReconnectPolicy::default());
    let id = state.connection().next_id();
    state.apply(ViewerAction::ConnectStarted { id, at_ms: 0.0 });
    state.apply(ViewerAction::Opened(id));
    (state, id)
}

fn seqs(lines: impl Iterator<Item = u64>) -> Vec<u64> {
    lines.collect()
}

fn displayed_seqs(state: &ViewerState) -> Vec<u64> {
    seqs(state.displayed().iter().map(|line| line.seq()))
}

fn inbound_seqs(state: &ViewerState) -> Vec<u64> {
    seqs(state.inbound().iter().map(|line| line.seq()))
}

proptest! {
    #[test]
    fn buffers_stay_bounded_ordered_and_fifo(
        max_log_lines in 0usize..6,
        steps in prop::collection::vec(step(), 0..60),
    ) {
        let (mut state, id) = connected(max_log_lines);

        for step in steps {
            let before_displayed = displayed_seqs(&state);
            let before_inbound = inbound_seqs(&state);
            let was_paused = state.is_paused();

            let action = match step.clone() {
                Step::Receive(text) => ViewerAction::Received { id, text },
                Step::Reconcile => ViewerAction::Reconcile,
                Step::TogglePause => ViewerAction::TogglePause,
                Step::SetMaxLines(n) => ViewerAction::SetMaxLines(n.to_string()),
                Step::Clear => ViewerAction::Clear,
            };
            state.apply(action);
            let max = state.max_log_lines();
            let displayed = displayed_seqs(&state);

            match step {
                Step::Receive(_) => {
                    prop_assert!(state.inbound().len() <= max);
                }
                Step::Reconcile if !was_paused && !before_inbound.is_empty() => {
                    prop_assert!(displayed.len() <= max);
                    prop_assert!(state.inbound().is_empty());
                    let mut expected = before_displayed.clone();
                    expected.extend(&before_inbound);
                    let keep_from = expected.len().saturating_sub(max);
                    prop_assert_eq!(&displayed, &expected[keep_from..].to_vec());
                }
                Step::Clear => {
                    prop_assert!(state.displayed().is_empty());
                    prop_assert!(state.inbound().is_empty());
                }
                _ => {}
            }

            if was_paused && !matches!(step, Step::Clear | Step::TogglePause) {
                prop_assert_eq!(&displayed, &before_displayed);
            }
            prop_assert!(displayed.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn filter_only_narrows_the_view(
        texts in prop::collection::vec("[a-c]{0,4}", 0..12),
        needle in "[a-c]{0,2}",
    ) {
        let (mut state, id) = connected(8);
        for text in texts {
            state.apply(ViewerAction::Received { id, text });
        }
        state.apply(ViewerAction::Reconcile);
        let before = displayed_seqs(&state);

        state.apply(ViewerAction::SetFilter(needle.clone()));
        prop_assert_eq!(displayed_seqs(&state), before.clone());
        for line in state.filtered() {
            prop_assert!(line.text().contains(needle.as_str()));
        }

        state.apply(ViewerAction::SetFilter(String::new()));
        prop_assert_eq!(displayed_seqs(&state), before.clone());
        prop_assert_eq!(seqs(state.filtered().map(|line| line.seq())), before);
    }
}
