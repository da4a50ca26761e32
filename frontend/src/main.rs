mod api;
mod components;

use api::PendingRequest;
use components::header::render_header;
use components::input_form::render_input_form;
use components::preview_area::render_preview_area;
use components::progress_bar::render_progress;
use components::results::render_results;
use components::utils::render_error_message;
use gloo_file::File as GlooFile;
use gloo_file::callbacks::{FileReader, read_as_data_url};
use gloo_timers::callback::Timeout;
use shared::analysis::{self, Effect, Event, SETTLE_DELAY_MS, State};
use yew::prelude::*;

pub enum Msg {
    FileChosen(GlooFile),
    Analysis(Event),
}

pub struct Model {
    state: State,
    selected_file: Option<GlooFile>,
    file_reader: Option<FileReader>,
    pending_request: Option<PendingRequest>,
    settle_timeout: Option<Timeout>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let (state, effects) = analysis::init();
        let mut model = Self {
            state,
            selected_file: None,
            file_reader: None,
            pending_request: None,
            settle_timeout: None,
        };
        for effect in effects {
            model.run_effect(ctx, effect);
        }
        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let event = match msg {
            Msg::FileChosen(_) if self.state.is_busy() => return false,
            Msg::FileChosen(file) => {
                let name = file.name();
                self.selected_file = Some(file);
                Event::FileSelected { name }
            }
            Msg::Analysis(event) => event,
        };

        match &event {
            Event::UrlChanged(_) if !self.state.is_busy() => self.release_file(),
            Event::FileLoaded { .. } => self.file_reader = None,
            Event::Settled => {
                self.pending_request = None;
                self.settle_timeout = None;
            }
            _ => {}
        }

        let (state, effects) = analysis::transition(std::mem::take(&mut self.state), event);
        self.state = state;

        for effect in effects {
            self.run_effect(ctx, effect);
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }

                <main class="main-content">
                    { render_input_form(self, ctx) }
                    { render_preview_area(self) }
                    { render_progress(self) }
                    { render_error_message(self) }
                    { render_results(self) }
                </main>

                <footer class="app-footer">
                    <p>{"Live Image Label Analyzer | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }
}

impl Model {
    fn run_effect(&mut self, ctx: &Context<Self>, effect: Effect) {
        match effect {
            Effect::ReadFile { read_id } => {
                let Some(file) = &self.selected_file else {
                    log::warn!("File read requested with no file selected");
                    return;
                };
                let link = ctx.link().clone();
                self.file_reader = Some(read_as_data_url(file, move |result| {
                    let result = result.map_err(|e| e.to_string());
                    link.send_message(Msg::Analysis(Event::FileLoaded { read_id, result }));
                }));
            }
            Effect::SendRequest(request) => {
                log::info!(
                    "Submitting {} for labeling",
                    if request.image_base64.is_some() { "uploaded file" } else { "image URL" }
                );
                let on_event = ctx.link().callback(Msg::Analysis);
                match api::send_label_request(&request, on_event) {
                    Ok(pending) => self.pending_request = Some(pending),
                    Err(e) => {
                        log::error!("Failed to send label request: {}", e);
                        ctx.link().send_message(Msg::Analysis(Event::RequestFailed(e)));
                    }
                }
            }
            Effect::ScheduleSettle => {
                if let Some(error) = &self.state.error {
                    log::error!("Analysis failed: {}", error);
                }
                let link = ctx.link().clone();
                self.settle_timeout = Some(Timeout::new(SETTLE_DELAY_MS, move || {
                    link.send_message(Msg::Analysis(Event::Settled));
                }));
            }
        }
    }

    fn release_file(&mut self) {
        self.selected_file = None;
        self.file_reader = None;
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
