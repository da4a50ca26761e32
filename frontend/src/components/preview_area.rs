use super::super::Model;
use yew::prelude::*;

pub fn render_preview_area(model: &Model) -> Html {
    html! {
        <div class="preview-wrap">
            {
                match model.state.preview() {
                    Some(src) => html! { <img src={src.to_string()} alt="preview" class="preview-img" /> },
                    None => html! { <div class="preview-placeholder">{"Image preview"}</div> },
                }
            }
        </div>
    }
}
