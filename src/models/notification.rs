use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A notification record as returned by `GET /notifications`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteNotification {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(deserialize_with = "lenient_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub shop_name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// `GET /notifications` answers either with a bare array or wrapped in an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NotificationsResponse {
    List(Vec<RemoteNotification>),
    Wrapped {
        notifications: Vec<RemoteNotification>,
    },
}

impl NotificationsResponse {
    pub fn into_vec(self) -> Vec<RemoteNotification> {
        match self {
            NotificationsResponse::List(items) => items,
            NotificationsResponse::Wrapped { notifications } => notifications,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKind {
    Payment,
    Received,
    Credit,
    Reminder,
}

impl IconKind {
    /// Unknown or missing kinds render as a payment request.
    pub fn from_kind(kind: Option<&str>) -> Self {
        match kind.map(|k| k.trim().to_lowercase()).as_deref() {
            Some("payment_received") | Some("received") => IconKind::Received,
            Some("credit") | Some("credit_added") => IconKind::Credit,
            Some("reminder") | Some("payment_reminder") => IconKind::Reminder,
            _ => IconKind::Payment,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IconKind::Payment => "payment",
            IconKind::Received => "received",
            IconKind::Credit => "credit",
            IconKind::Reminder => "reminder",
        }
    }
}

/// View-friendly notification held by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationItem {
    pub id: String,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub shop_name: String,
    pub icon: IconKind,
    /// Never toggled by any operation; every mapped item is read.
    pub read: bool,
}

impl NotificationItem {
    pub fn from_remote(remote: RemoteNotification, lang: Option<&str>) -> Self {
        let title = remote
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| crate::i18n::tr(lang, "notifications.default_title", None));

        Self {
            id: remote.id,
            title,
            message: remote.message,
            created_at: remote.created_at,
            shop_name: remote.shop_name.unwrap_or_default(),
            icon: IconKind::from_kind(remote.kind.as_deref()),
            read: true,
        }
    }
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    })
}

/// Accepts RFC 3339 timestamps and offset-less ISO timestamps (taken as UTC).
fn lenient_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
