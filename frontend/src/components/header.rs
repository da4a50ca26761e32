use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-flask"></i> {" Live Image Label Analyzer"}</h1>
            <p class="subtitle">{"Paste an image URL or upload a file to see what the vision service detects"}</p>
        </header>
    }
}
