use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ToolbarProps {
    pub filter: String,
    pub max_log_lines: usize,
    pub paused: bool,
    pub on_filter: Callback<String>,
    /// Receives the raw input text; parsing happens in the reducer.
    pub on_max_lines: Callback<String>,
    pub on_clear: Callback<()>,
    pub on_toggle_pause: Callback<()>,
}

#[function_component(Toolbar)]
pub fn toolbar(props: &ToolbarProps) -> Html {
    let on_filter_input = {
        let on_filter = props.on_filter.clone();
        Callback::from(move |e: InputEvent| {
            on_filter.emit(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let on_max_lines_input = {
        let on_max_lines = props.on_max_lines.clone();
        Callback::from(move |e: InputEvent| {
            on_max_lines.emit(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let (pause_icon, pause_label) = if props.paused {
        ("\u{25B6}", "Resume")
    } else {
        ("\u{23F8}", "Pause")
    };

    html! {
        <div class="log-viewer-toolbar">
            <input
                type="text"
                class="filter-input"
                placeholder="Filter logs"
                value={props.filter.clone()}
                oninput={on_filter_input}
            />
            <label class="max-lines">
                { "Max log lines" }
                <input
                    type="number"
                    min="0"
                    value={props.max_log_lines.to_string()}
                    oninput={on_max_lines_input}
                />
            </label>
            <button class="clear-button" onclick={props.on_clear.reform(|_| ())}>
                { "Clear" }
            </button>
            <button
                class="pause-toggle"
                title={pause_label}
                aria-label={pause_label}
                onclick={props.on_toggle_pause.reform(|_| ())}
            >
                { pause_icon }
            </button>
        </div>
    }
}
