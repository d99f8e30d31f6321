use serde::{Deserialize, Serialize};

use super::NotificationPreferences;

/// The subset of `GET /me` the client reads. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub push_enabled: Option<bool>,
    #[serde(default)]
    pub payment_alerts_enabled: Option<bool>,
    #[serde(default)]
    pub promotions_enabled: Option<bool>,
}

impl UserProfile {
    /// Flags absent from the profile default to enabled.
    pub fn notification_preferences(&self) -> NotificationPreferences {
        NotificationPreferences {
            push_enabled: self.push_enabled.unwrap_or(true),
            payment_alerts: self.payment_alerts_enabled.unwrap_or(true),
            promotions: self.promotions_enabled.unwrap_or(true),
        }
    }
}

/// Body of `PATCH /profile`. All three flags are always sent together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub push_enabled: bool,
    pub payment_alerts_enabled: bool,
    pub promotions_enabled: bool,
}

impl From<NotificationPreferences> for UpdateProfile {
    fn from(prefs: NotificationPreferences) -> Self {
        Self {
            push_enabled: prefs.push_enabled,
            payment_alerts_enabled: prefs.payment_alerts,
            promotions_enabled: prefs.promotions,
        }
    }
}
