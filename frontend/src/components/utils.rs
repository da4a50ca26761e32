use super::super::Model;
use gloo_file::File as GlooFile;
use web_sys::FileList;
use yew::prelude::*;

pub fn first_image_file(file_list: &FileList) -> Option<GlooFile> {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .find(|file| file.type_().starts_with("image/"))
        .map(GlooFile::from)
}

pub fn render_error_message(model: &Model) -> Html {
    if let Some(error_msg) = &model.state.error {
        html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ error_msg }</p>
            </div>
        }
    } else {
        html! {}
    }
}
