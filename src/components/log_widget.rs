use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use web_sys::{Element, ScrollBehavior, ScrollIntoViewOptions};
use yew::prelude::*;

use super::{LogLineView, StatusIndicator, Toolbar};
use crate::config::ViewerConfig;
use crate::connection::{LogSocket, SocketEvent};
use crate::reconnect::{timer_delay_ms, ConnectionId};
use crate::state::{ViewerAction, ViewerState};

#[derive(Properties, PartialEq)]
pub struct LogViewerProps {
    pub config: ViewerConfig,
}

#[function_component(LogViewer)]
pub fn log_viewer(props: &LogViewerProps) -> Html {
    let config = &props.config;
    let state = {
        let max_log_lines = config.max_log_lines;
        let policy = config.reconnect.clone();
        use_reducer(move || ViewerState::new(max_log_lines, policy))
    };
    let socket: Rc<RefCell<Option<LogSocket>>> = use_mut_ref(|| None);
    let retry_tick = use_state(|| 0u32);
    let bottom = use_node_ref();

    let on_socket_event = {
        let dispatcher = state.dispatcher();
        Callback::from(move |(id, event): (ConnectionId, SocketEvent)| {
            dispatcher.dispatch(match event {
                SocketEvent::Opened => ViewerAction::Opened(id),
                SocketEvent::Message(text) => ViewerAction::Received { id, text },
                SocketEvent::Closed => ViewerAction::Closed(id),
            });
        })
    };

    // Re-evaluate the connection whenever the handle changes, the line cap
    // changes, or the retry timer fires.
    {
        let handle = state.connection().handle();
        let deps = (handle, state.max_log_lines(), *retry_tick);
        let state = state.clone();
        let socket = socket.clone();
        let url = config.backend_url.clone();
        use_effect_with_deps(
            move |_| {
                let stale = socket
                    .borrow()
                    .as_ref()
                    .is_some_and(|open| Some(open.id()) != handle);
                if stale {
                    socket.borrow_mut().take();
                }

                let now = js_sys::Date::now();
                if state.should_connect(now) {
                    let id = state.connection().next_id();
                    match LogSocket::open(&url, id, on_socket_event) {
                        Ok(opened) => {
                            *socket.borrow_mut() = Some(opened);
                            state.dispatch(ViewerAction::ConnectStarted { id, at_ms: now });
                        }
                        Err(err) => {
                            log::error!("{err}");
                            state.dispatch(ViewerAction::ConnectFailed { at_ms: now });
                        }
                    }
                }
                || ()
            },
            deps,
        );
    }

    // Guarantees another evaluation once the cooldown runs out.
    {
        let delay = state.retry_in(js_sys::Date::now());
        let deps = (
            state.connection().handle(),
            state.connection().last_attempt_ms(),
            *retry_tick,
        );
        let retry_tick = retry_tick.clone();
        use_effect_with_deps(
            move |_| {
                let timeout = delay.map(|wait| {
                    let next = retry_tick.wrapping_add(1);
                    Timeout::new(timer_delay_ms(wait), move || retry_tick.set(next))
                });
                move || drop(timeout)
            },
            deps,
        );
    }

    {
        let socket = socket.clone();
        use_effect_with_deps(
            move |_| {
                move || {
                    socket.borrow_mut().take();
                }
            },
            (),
        );
    }

    {
        let needs_reconcile = state.needs_reconcile();
        let dispatcher = state.dispatcher();
        use_effect_with_deps(
            move |_| {
                if needs_reconcile {
                    dispatcher.dispatch(ViewerAction::Reconcile);
                }
                || ()
            },
            (state.received_total(), state.is_paused()),
        );
    }

    {
        let bottom = bottom.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(element) = bottom.cast::<Element>() {
                    let mut options = ScrollIntoViewOptions::new();
                    options.behavior(ScrollBehavior::Smooth);
                    element.scroll_into_view_with_scroll_into_view_options(&options);
                }
                || ()
            },
            state.scroll_epoch(),
        );
    }

    let on_filter = {
        let dispatcher = state.dispatcher();
        Callback::from(move |text: String| dispatcher.dispatch(ViewerAction::SetFilter(text)))
    };
    let on_max_lines = {
        let dispatcher = state.dispatcher();
        Callback::from(move |raw: String| dispatcher.dispatch(ViewerAction::SetMaxLines(raw)))
    };
    let on_clear = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: ()| dispatcher.dispatch(ViewerAction::Clear))
    };
    let on_toggle_pause = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: ()| dispatcher.dispatch(ViewerAction::TogglePause))
    };

    html! {
        <div class="log-viewer">
            <h1 class="log-viewer-title">
                { config.title.clone() }
                <StatusIndicator state={state.connection_state()} />
            </h1>
            <Toolbar
                filter={state.filter_text().to_string()}
                max_log_lines={state.max_log_lines()}
                paused={state.is_paused()}
                on_filter={on_filter}
                on_max_lines={on_max_lines}
                on_clear={on_clear}
                on_toggle_pause={on_toggle_pause}
            />
            <div id="log-container" class="log-viewer-scroll">
                <ul id="logs" class="log-viewer-lines">
                    { for state.filtered().map(|line| html! {
                        <LogLineView key={line.seq()} line={line.clone()} />
                    }) }
                </ul>
                <div class="log-viewer-bottom" ref={bottom} />
            </div>
        </div>
    }
}
