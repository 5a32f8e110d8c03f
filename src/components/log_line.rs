use yew::prelude::*;

use crate::ansi::{self, Span};
use crate::buffer::LogLine;

#[derive(Properties, PartialEq)]
pub struct LogLineProps {
    pub line: LogLine,
}

/// One log entry. Escape codes become inline styles on text nodes, so the
/// line's content is never interpreted as markup.
#[function_component(LogLineView)]
pub fn log_line_view(props: &LogLineProps) -> Html {
    let spans = use_memo(|line: &LogLine| ansi::parse(line.text()), props.line.clone());

    html! {
        <li class="log-line">
            { for spans.iter().map(render_span) }
        </li>
    }
}

fn render_span(span: &Span) -> Html {
    if span.style.is_plain() {
        return html! { <>{ span.text.clone() }</> };
    }
    html! {
        <span style={span.style.to_css()}>{ span.text.clone() }</span>
    }
}
