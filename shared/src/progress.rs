//! Progress shown while one analysis is in flight.
//!
//! The percentage is driven by request lifecycle events reported by the
//! transport, never by timers. Within a cycle neither the percentage nor the
//! phase moves backwards. Only `Started` resets them.

use strum::Display;

pub const PREPARING: u8 = 5;
pub const PAYLOAD_READY: u8 = 10;
pub const UPLOAD_START: u8 = 20;
pub const UPLOAD_CEILING: u8 = 80;
pub const WAITING_ON_SERVICE: u8 = 85;
pub const RESPONSE_RECEIVED: u8 = 90;
pub const RESPONSE_PARSED: u8 = 95;
pub const COMPLETE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Display)]
pub enum Phase {
    #[default]
    #[strum(serialize = "Ready")]
    Idle,
    #[strum(serialize = "Preparing image")]
    PreparingImage,
    #[strum(serialize = "Uploading image")]
    Uploading,
    #[strum(serialize = "Waiting for labels")]
    WaitingOnService,
    #[strum(serialize = "Finalizing results")]
    Finalizing,
    #[strum(serialize = "Done")]
    Done,
    #[strum(serialize = "Failed")]
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Started,
    PayloadReady,
    RequestOpened,
    UploadProgress { sent: u64, total: u64 },
    UploadComplete,
    ResponseReceived,
    ResponseParsed,
    Rendered,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressState {
    percent: u8,
    phase: Phase,
}

impl ProgressState {
    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn apply(self, event: ProgressEvent) -> Self {
        let (phase, target) = match event {
            ProgressEvent::Started => {
                return Self {
                    percent: PREPARING,
                    phase: Phase::PreparingImage,
                };
            }
            _ if self.phase.is_terminal() => return self,
            ProgressEvent::PayloadReady => (Phase::PreparingImage, PAYLOAD_READY),
            ProgressEvent::RequestOpened => (Phase::Uploading, UPLOAD_START),
            ProgressEvent::UploadProgress { sent, total } => {
                (Phase::Uploading, upload_percent(sent, total))
            }
            ProgressEvent::UploadComplete => (Phase::WaitingOnService, WAITING_ON_SERVICE),
            ProgressEvent::ResponseReceived => (Phase::Finalizing, RESPONSE_RECEIVED),
            ProgressEvent::ResponseParsed => (Phase::Finalizing, RESPONSE_PARSED),
            ProgressEvent::Rendered => (Phase::Done, COMPLETE),
            ProgressEvent::Failed => {
                return Self {
                    percent: self.percent,
                    phase: Phase::Failed,
                };
            }
        };

        Self {
            percent: self.percent.max(target),
            phase: self.phase.max(phase),
        }
    }
}

/// Rescales bytes sent into the upload sub-range. An empty body counts as
/// fully uploaded.
pub fn upload_percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return UPLOAD_CEILING;
    }
    let fraction = sent.min(total) as f64 / total as f64;
    let span = f64::from(UPLOAD_CEILING - UPLOAD_START);
    UPLOAD_START + (fraction * span).round() as u8
}
