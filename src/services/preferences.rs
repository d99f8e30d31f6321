use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::error::AppResult;
use crate::models::{NotificationPreferences, PreferenceKey, UpdateProfile};
use crate::services::api::ShopMunimApi;

/// Local copy of the user's notification switches, written back to
/// `PATCH /profile` after every change.
///
/// Writes are optimistic: the local value changes first and the sync runs
/// in the background. A failed sync is logged and the local value is kept;
/// the next successful [`PreferenceStore::load`] replaces it with the
/// server's view.
pub struct PreferenceStore {
    api: Arc<dyn ShopMunimApi>,
    prefs: Arc<RwLock<NotificationPreferences>>,
    in_flight: Arc<AtomicUsize>,
    latest_sync: Arc<AtomicU64>,
}

/// Decrements the in-flight counter when the sync task ends, even on panic.
struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl PreferenceStore {
    pub fn new(api: Arc<dyn ShopMunimApi>) -> Self {
        Self {
            api,
            prefs: Arc::new(RwLock::new(NotificationPreferences::default())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            latest_sync: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fetch the profile and adopt its flags. On failure the current values
    /// (the all-enabled defaults on first load) stay in place.
    pub async fn load(&self) -> AppResult<NotificationPreferences> {
        match self.api.get_me().await {
            Ok(profile) => {
                let loaded = profile.notification_preferences();
                *self.prefs.write().await = loaded;
                tracing::debug!(?loaded, "Loaded notification preferences");
                Ok(loaded)
            }
            Err(e) => {
                tracing::warn!("Failed to load notification preferences: {}", e);
                Err(e)
            }
        }
    }

    pub async fn preferences(&self) -> NotificationPreferences {
        *self.prefs.read().await
    }

    pub async fn all_enabled(&self) -> bool {
        self.prefs.read().await.all_enabled()
    }

    /// True while at least one sync is waiting on the backend.
    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Flip a single switch and start syncing all three flags.
    ///
    /// The returned handle may be dropped; awaiting it only waits for the
    /// sync to settle.
    pub async fn set_one(&self, key: PreferenceKey, value: bool) -> JoinHandle<()> {
        let snapshot = {
            let mut prefs = self.prefs.write().await;
            prefs.set(key, value);
            *prefs
        };
        tracing::debug!(%key, value, "Notification preference changed");
        self.spawn_sync(snapshot)
    }

    /// Force all three switches to `value` and start syncing.
    pub async fn set_all(&self, value: bool) -> JoinHandle<()> {
        let snapshot = {
            let mut prefs = self.prefs.write().await;
            prefs.set_all(value);
            *prefs
        };
        tracing::debug!(value, "All notification preferences changed");
        self.spawn_sync(snapshot)
    }

    fn spawn_sync(&self, prefs: NotificationPreferences) -> JoinHandle<()> {
        let seq = self.latest_sync.fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let guard = InFlight(self.in_flight.clone());

        let api = self.api.clone();
        let latest = self.latest_sync.clone();

        tokio::spawn(async move {
            let _guard = guard;
            match api.update_profile(UpdateProfile::from(prefs)).await {
                Ok(_) => {
                    // Syncs are not sequenced; an older write finishing last
                    // may leave the server behind the local state.
                    let newest = latest.load(Ordering::SeqCst);
                    if seq < newest {
                        tracing::debug!(seq, newest, "Preference sync completed after a newer one was issued");
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        seq,
                        "Failed to sync notification preferences, keeping local values: {}",
                        e
                    );
                }
            }
        })
    }
}
