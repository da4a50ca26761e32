use gloo_events::EventListener;
use shared::LabelRequest;
use shared::analysis::Event;
use shared::progress::ProgressEvent;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{ProgressEvent as DomProgressEvent, XmlHttpRequest};
use yew::Callback;

pub const LABEL_ENDPOINT: &str = match option_env!("LABEL_ENDPOINT") {
    Some(endpoint) => endpoint,
    None => "/label",
};

/// Keeps the request and its listeners alive until the cycle settles.
pub struct PendingRequest {
    _xhr: XmlHttpRequest,
    _listeners: Vec<EventListener>,
}

/// Posts the request through `XMLHttpRequest` so upload progress is reported
/// from real bytes-sent events. Every outcome comes back through `on_event`.
pub fn send_label_request(
    request: &LabelRequest,
    on_event: Callback<Event>,
) -> Result<PendingRequest, String> {
    let body = serde_json::to_string(request).map_err(|e| e.to_string())?;

    let xhr = XmlHttpRequest::new().map_err(js_error)?;
    xhr.open("POST", LABEL_ENDPOINT).map_err(js_error)?;
    xhr.set_request_header("Content-Type", "application/json")
        .map_err(js_error)?;
    let upload = xhr.upload().map_err(js_error)?;

    let mut listeners = Vec::with_capacity(4);

    listeners.push({
        let on_event = on_event.clone();
        EventListener::new(&upload, "progress", move |event| {
            let Some(progress) = event.dyn_ref::<DomProgressEvent>() else {
                return;
            };
            if progress.length_computable() {
                let (sent, total) = (progress.loaded() as u64, progress.total() as u64);
                log::debug!("Uploaded {} of {} bytes", sent, total);
                on_event.emit(Event::Progress(ProgressEvent::UploadProgress { sent, total }));
            }
        })
    });

    listeners.push({
        let on_event = on_event.clone();
        EventListener::new(&upload, "load", move |_| {
            on_event.emit(Event::Progress(ProgressEvent::UploadComplete));
        })
    });

    listeners.push({
        let on_event = on_event.clone();
        let response = xhr.clone();
        EventListener::new(&xhr, "load", move |_| {
            let status = response.status().unwrap_or(0);
            let body = response.response_text().ok().flatten().unwrap_or_default();
            on_event.emit(Event::ResponseReceived { status, body });
        })
    });

    listeners.push({
        let on_event = on_event.clone();
        EventListener::new(&xhr, "error", move |_| {
            on_event.emit(Event::RequestFailed(
                "the label service could not be reached".to_string(),
            ));
        })
    });

    log::info!("Sending label request to {}", LABEL_ENDPOINT);
    on_event.emit(Event::Progress(ProgressEvent::RequestOpened));
    xhr.send_with_opt_str(Some(&body)).map_err(js_error)?;

    Ok(PendingRequest {
        _xhr: xhr,
        _listeners: listeners,
    })
}

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
