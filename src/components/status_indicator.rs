use yew::prelude::*;

use crate::reconnect::ConnectionState;

#[derive(Properties, PartialEq)]
pub struct StatusIndicatorProps {
    pub state: ConnectionState,
}

#[function_component(StatusIndicator)]
pub fn status_indicator(props: &StatusIndicatorProps) -> Html {
    let (class, label) = match props.state {
        ConnectionState::Connected => ("connected", "Connected"),
        ConnectionState::Disconnected => ("disconnected", "Disconnected"),
    };
    html! {
        <span class={classes!("status-indicator", class)} title={label} aria-label={label} />
    }
}
