use yew::prelude::*;

use crate::components::LogViewer;
use crate::config::ViewerConfig;

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo(|_| ViewerConfig::load(), ());

    html! {
        <main class="app">
            <LogViewer config={(*config).clone()} />
        </main>
    }
}
