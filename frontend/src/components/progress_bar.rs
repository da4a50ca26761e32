use super::super::Model;
use yew::prelude::*;

pub fn render_progress(model: &Model) -> Html {
    let progress = model.state.progress;
    let percent = progress.percent();

    html! {
        <div class="status-row">
            <div class="progress-bar-outer" aria-hidden="true">
                <div class="progress-bar-inner" style={format!("width: {}%", percent)}></div>
            </div>
            {
                if model.state.is_loading() {
                    html! {
                        <div class="loading-text">
                            { format!("Analyzing… {}% ({})", percent, progress.phase()) }
                        </div>
                    }
                } else if model.state.is_busy() {
                    html! { <div class="loading-text">{ progress.phase().to_string() }</div> }
                } else {
                    html! { <div class="idle-text">{"Ready"}</div> }
                }
            }
        </div>
    }
}
