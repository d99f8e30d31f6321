use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three independent notification switches of a user.
///
/// There is deliberately no stored "all enabled" field: the aggregate is
/// derived from the three flags by [`NotificationPreferences::all_enabled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub push_enabled: bool,
    pub payment_alerts: bool,
    pub promotions: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            push_enabled: true,
            payment_alerts: true,
            promotions: true,
        }
    }
}

impl NotificationPreferences {
    pub fn all_enabled(&self) -> bool {
        self.push_enabled && self.payment_alerts && self.promotions
    }

    pub fn get(&self, key: PreferenceKey) -> bool {
        match key {
            PreferenceKey::Push => self.push_enabled,
            PreferenceKey::PaymentAlerts => self.payment_alerts,
            PreferenceKey::Promotions => self.promotions,
        }
    }

    pub fn set(&mut self, key: PreferenceKey, value: bool) {
        match key {
            PreferenceKey::Push => self.push_enabled = value,
            PreferenceKey::PaymentAlerts => self.payment_alerts = value,
            PreferenceKey::Promotions => self.promotions = value,
        }
    }

    pub fn set_all(&mut self, value: bool) {
        self.push_enabled = value;
        self.payment_alerts = value;
        self.promotions = value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    Push,
    PaymentAlerts,
    Promotions,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 3] = [
        PreferenceKey::Push,
        PreferenceKey::PaymentAlerts,
        PreferenceKey::Promotions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::Push => "push",
            PreferenceKey::PaymentAlerts => "payment_alerts",
            PreferenceKey::Promotions => "promotions",
        }
    }

    /// Translation key of the switch label.
    pub fn label_key(&self) -> &'static str {
        match self {
            PreferenceKey::Push => "preferences.push",
            PreferenceKey::PaymentAlerts => "preferences.payment_alerts",
            PreferenceKey::Promotions => "preferences.promotions",
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferenceKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "push" | "push_enabled" => Ok(PreferenceKey::Push),
            "payment_alerts" | "payments" => Ok(PreferenceKey::PaymentAlerts),
            "promotions" | "promos" => Ok(PreferenceKey::Promotions),
            other => Err(format!("unknown preference: {}", other)),
        }
    }
}
