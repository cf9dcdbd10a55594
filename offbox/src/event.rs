//! Host events and their outcomes.

use offbox_core::{FetchRequest, FetchResponse};
use serde_json::Value;

use crate::control::{ControlMessage, ReplyPort};
use crate::error::EngineError;
use crate::lifecycle::{ActivationReport, InstallReport};
use crate::notification::Notification;

/// An event delivered by the host runtime.
#[derive(Debug)]
pub enum Event {
    /// A new engine version was registered.
    Install,
    /// The engine version takes over.
    Activate,
    /// A client issued a request.
    Fetch(FetchRequest),
    /// A client posted a control message.
    Message {
        /// Raw message payload.
        data: Value,
        /// Reply port, when the client expects an answer.
        reply: Option<ReplyPort>,
    },
    /// A background sync fired.
    Sync(String),
    /// A push message arrived, with its text payload if any.
    Push(Option<String>),
    /// A notification was clicked, with the clicked action if any.
    NotificationClick(Option<String>),
}

impl Event {
    /// Event name as the host reports it.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Install => "install",
            Event::Activate => "activate",
            Event::Fetch(_) => "fetch",
            Event::Message { .. } => "message",
            Event::Sync(_) => "sync",
            Event::Push(_) => "push",
            Event::NotificationClick(_) => "notificationclick",
        }
    }
}

/// What handling an [`Event`] produced.
#[derive(Debug)]
pub enum EventOutcome {
    /// Install finished.
    Installed(InstallReport),
    /// Activation finished.
    Activated(ActivationReport),
    /// Respond to the fetch with this response.
    Response(FetchResponse),
    /// Let the request go to the network untouched.
    Passthrough,
    /// A control message was handled.
    Control(ControlMessage),
    /// Background sync ran.
    Synced,
    /// A notification was shown.
    Notified(Notification),
    /// A client window was opened at this URL.
    WindowOpened(String),
    /// The notification was dismissed without further action.
    NotificationClosed,
    /// The event was not relevant to the engine.
    Ignored,
    /// Handling failed.
    Failed(EngineError),
}
