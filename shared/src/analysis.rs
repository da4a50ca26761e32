//! Client-side analysis cycle as a pure state machine.
//!
//! `transition` never performs I/O. It returns the effects the UI shell must
//! run (reading a file, sending the request, scheduling the settle delay),
//! and the shell feeds the outcomes back in as events.

use crate::normalize::normalize_response;
use crate::progress::{ProgressEvent, ProgressState};
use crate::{Label, LabelRequest};

pub const VALIDATION_MESSAGE: &str = "Provide an image URL or upload a file.";
pub const FILE_NOT_READY_MESSAGE: &str = "The selected file is still being read.";

/// Delay between an outcome and the controls unlocking again.
pub const SETTLE_DELAY_MS: u32 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageSelection {
    #[default]
    Empty,
    Url(String),
    File {
        name: String,
        data_url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct State {
    pub selection: ImageSelection,
    pub labels: Vec<Label>,
    pub error: Option<String>,
    pub progress: ProgressState,
    pub status: Status,
    read_id: u64,
}

impl State {
    /// True from submission until the settle delay has passed.
    pub fn is_busy(&self) -> bool {
        self.status != Status::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn url_text(&self) -> &str {
        match &self.selection {
            ImageSelection::Url(url) => url,
            _ => "",
        }
    }

    pub fn preview(&self) -> Option<&str> {
        match &self.selection {
            ImageSelection::Empty => None,
            ImageSelection::Url(url) => Some(url),
            ImageSelection::File { data_url, .. } => data_url.as_deref(),
        }
    }

    pub fn current_read(&self) -> u64 {
        self.read_id
    }

    fn fail(mut self, message: String) -> (Self, Vec<Effect>) {
        self.error = Some(message);
        self.progress = self.progress.apply(ProgressEvent::Failed);
        self.status = Status::Failed;
        (self, vec![Effect::ScheduleSettle])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    UrlChanged(String),
    FileSelected { name: String },
    FileLoaded { read_id: u64, result: Result<String, String> },
    Submit,
    Progress(ProgressEvent),
    ResponseReceived { status: u16, body: String },
    RequestFailed(String),
    Settled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ReadFile { read_id: u64 },
    SendRequest(LabelRequest),
    ScheduleSettle,
}

pub fn init() -> (State, Vec<Effect>) {
    (State::default(), vec![])
}

pub fn transition(state: State, event: Event) -> (State, Vec<Effect>) {
    let mut state = state;

    match event {
        Event::UrlChanged(_) | Event::FileSelected { .. } if state.is_busy() => (state, vec![]),

        Event::UrlChanged(url) => {
            state.selection = if url.is_empty() {
                ImageSelection::Empty
            } else {
                ImageSelection::Url(url)
            };
            (state, vec![])
        }

        Event::FileSelected { name } => {
            state.read_id += 1;
            state.selection = ImageSelection::File {
                name,
                data_url: None,
            };
            let read_id = state.read_id;
            (state, vec![Effect::ReadFile { read_id }])
        }

        Event::FileLoaded { read_id, result } => {
            if read_id != state.read_id {
                return (state, vec![]);
            }
            let ImageSelection::File { data_url, .. } = &mut state.selection else {
                return (state, vec![]);
            };
            match result {
                Ok(loaded) => *data_url = Some(loaded),
                Err(reason) => {
                    state.selection = ImageSelection::Empty;
                    state.error = Some(format!("Failed to read file: {}", reason));
                }
            }
            (state, vec![])
        }

        Event::Submit if state.is_busy() => (state, vec![]),

        Event::Submit => {
            state.labels.clear();
            state.error = None;
            state.progress = ProgressState::default();

            let request = match &state.selection {
                ImageSelection::Empty => None,
                ImageSelection::Url(url) => Some(Ok(LabelRequest::from_url(url.clone()))),
                ImageSelection::File { data_url: None, .. } => Some(Err(FILE_NOT_READY_MESSAGE)),
                ImageSelection::File {
                    data_url: Some(data),
                    ..
                } => Some(Ok(LabelRequest::from_base64(data.clone()))),
            };

            match request {
                Some(Ok(request)) => {
                    state.status = Status::Loading;
                    state.progress = state
                        .progress
                        .apply(ProgressEvent::Started)
                        .apply(ProgressEvent::PayloadReady);
                    (state, vec![Effect::SendRequest(request)])
                }
                Some(Err(message)) => {
                    state.error = Some(message.to_string());
                    (state, vec![])
                }
                None => {
                    state.error = Some(VALIDATION_MESSAGE.to_string());
                    (state, vec![])
                }
            }
        }

        Event::Progress(progress) => {
            if state.is_loading() {
                state.progress = state.progress.apply(progress);
            }
            (state, vec![])
        }

        Event::ResponseReceived { .. } | Event::RequestFailed(_) if !state.is_loading() => {
            (state, vec![])
        }

        Event::ResponseReceived { status, body } => {
            state.progress = state.progress.apply(ProgressEvent::ResponseReceived);

            if !(200..300).contains(&status) {
                return state.fail(format!("API error: {} {}", status, body));
            }

            let payload = match serde_json::from_str::<serde_json::Value>(&body) {
                Ok(payload) => payload,
                Err(e) => return state.fail(format!("Failed to parse response: {}", e)),
            };

            state.labels = normalize_response(&payload);
            state.progress = state
                .progress
                .apply(ProgressEvent::ResponseParsed)
                .apply(ProgressEvent::Rendered);
            state.status = Status::Succeeded;
            (state, vec![Effect::ScheduleSettle])
        }

        Event::RequestFailed(reason) => state.fail(format!("Network error: {}", reason)),

        Event::Settled => {
            if matches!(state.status, Status::Succeeded | Status::Failed) {
                state.status = Status::Idle;
            }
            (state, vec![])
        }
    }
}
