use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use offbox::{Host, HostError, Notification};

/// A call made by the engine to its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    SkipWaiting,
    ClaimClients,
    ShowNotification(Notification),
    OpenWindow(String),
}

/// Host that records every call and reports a fixed number of clients.
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
    clients: AtomicUsize,
}

impl RecordingHost {
    pub fn with_clients(clients: usize) -> Self {
        Self {
            calls: Mutex::default(),
            clients: AtomicUsize::new(clients),
        }
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &HostCall) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|recorded| *recorded == call)
            .count()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Host for RecordingHost {
    async fn skip_waiting(&self) -> Result<(), HostError> {
        self.record(HostCall::SkipWaiting);
        Ok(())
    }

    async fn claim_clients(&self) -> Result<usize, HostError> {
        self.record(HostCall::ClaimClients);
        Ok(self.clients.load(Ordering::SeqCst))
    }

    async fn show_notification(&self, notification: Notification) -> Result<(), HostError> {
        self.record(HostCall::ShowNotification(notification));
        Ok(())
    }

    async fn open_window(&self, url: &str) -> Result<(), HostError> {
        self.record(HostCall::OpenWindow(url.to_owned()));
        Ok(())
    }
}
