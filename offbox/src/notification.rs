//! Push notifications and notification clicks.
//!
//! A push event becomes a [`Notification`] handed to the host; a click on the
//! `explore` action opens [`NotificationConfig::explore_url`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Action that opens the explore URL.
pub const EXPLORE_ACTION: &str = "explore";
/// Action that only dismisses the notification.
pub const CLOSE_ACTION: &str = "close";

/// How push payloads are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Notification title.
    pub title: String,
    /// Body used when the push carries no payload.
    pub default_body: String,
    /// Icon URL, also used for both actions.
    pub icon: String,
    /// Badge URL.
    pub badge: String,
    /// Vibration pattern in milliseconds.
    pub vibrate: Vec<u32>,
    /// Title of the `explore` action.
    pub explore_title: String,
    /// Title of the `close` action.
    pub close_title: String,
    /// URL opened when the `explore` action is clicked.
    pub explore_url: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            title: "CERRADØ INTERBOX 2025".to_owned(),
            default_body: "Nova notificação do CERRADØ!".to_owned(),
            icon: "/logos/logo_circulo.png".to_owned(),
            badge: "/logos/logo_circulo.png".to_owned(),
            vibrate: vec![100, 50, 100],
            explore_title: "Ver mais".to_owned(),
            close_title: "Fechar".to_owned(),
            explore_url: "/hub".to_owned(),
        }
    }
}

impl NotificationConfig {
    /// Renders the notification for a push with an optional text payload.
    pub fn render(&self, payload: Option<&str>, arrived_at: DateTime<Utc>) -> Notification {
        let action = |action: &'static str, title: &str| NotificationAction {
            action: SmolStr::new_static(action),
            title: title.to_owned(),
            icon: Some(self.icon.clone()),
        };
        Notification {
            title: self.title.clone(),
            body: payload.unwrap_or(&self.default_body).to_owned(),
            icon: self.icon.clone(),
            badge: self.badge.clone(),
            vibrate: self.vibrate.clone(),
            data: NotificationData {
                date_of_arrival: arrived_at.timestamp_millis(),
                primary_key: 1,
            },
            actions: vec![
                action(EXPLORE_ACTION, &self.explore_title),
                action(CLOSE_ACTION, &self.close_title),
            ],
        }
    }
}

/// A notification the host is asked to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Title.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Icon URL.
    pub icon: String,
    /// Badge URL.
    pub badge: String,
    /// Vibration pattern in milliseconds.
    pub vibrate: Vec<u32>,
    /// Data attached to the notification.
    pub data: NotificationData,
    /// Action buttons.
    pub actions: Vec<NotificationAction>,
}

/// Data attached to a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    /// Arrival time, milliseconds since the Unix epoch.
    pub date_of_arrival: i64,
    /// Fixed primary key.
    pub primary_key: u32,
}

/// An action button of a [`Notification`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    /// Action identifier reported back on click.
    pub action: SmolStr,
    /// Button title.
    pub title: String,
    /// Button icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}
