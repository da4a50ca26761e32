use super::super::{Model, Msg};
use super::utils::first_image_file;
use shared::analysis::Event as AnalysisEvent;
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub fn render_input_form(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let busy = model.state.is_busy();

    let handle_submit = link.callback(|e: SubmitEvent| {
        e.prevent_default();
        Msg::Analysis(AnalysisEvent::Submit)
    });

    let handle_url_input = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::Analysis(AnalysisEvent::UrlChanged(input.value().trim().to_string()))
    });

    let handle_file_change = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().as_ref().and_then(first_image_file);
        input.set_value("");
        file.map(Msg::FileChosen)
    });

    html! {
        <form class="controls" onsubmit={handle_submit}>
            <div class="input-row">
                <input
                    class="url-input"
                    type="text"
                    placeholder="Enter image URL..."
                    value={model.state.url_text().to_string()}
                    oninput={handle_url_input}
                    disabled={busy}
                />
                <button class="analyze-btn" type="submit" disabled={busy}>
                    <i class="fa-solid fa-magnifying-glass"></i> {" Analyze"}
                </button>
            </div>

            <div class="or-row">{"or upload an image"}</div>

            <div class="upload-row">
                <input
                    type="file"
                    id="file-input"
                    accept="image/*"
                    onchange={handle_file_change}
                    disabled={busy}
                />
            </div>
        </form>
    }
}
