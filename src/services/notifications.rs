use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::i18n::tr;
use crate::models::{IconKind, NotificationItem};
use crate::services::api::ShopMunimApi;
use crate::services::time::relative_time_for;

/// Collapsed cards show at most this many characters of the message.
pub const PREVIEW_CHARS: usize = 80;

const EMPTY_STATE_ICON: &str = "notifications-off-outline";

/// Result of a fetch that completed without a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The list was replaced with this many items.
    Applied(usize),
    /// A newer fetch had already been applied; this response was dropped.
    Superseded,
}

#[derive(Debug, Default)]
struct FeedState {
    items: Vec<NotificationItem>,
    expanded: Option<String>,
    /// Request id of the response currently shown.
    applied_request: u64,
}

/// Holds one count on a loading flag for as long as a fetch is alive,
/// including when its future is dropped before completing.
struct Pending<'a>(&'a AtomicUsize);

impl<'a> Pending<'a> {
    fn start(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The notification center: the fetched list plus which card is expanded.
///
/// Fetches may overlap (initial load vs. pull-to-refresh). Each fetch takes a
/// monotonically increasing request id and its response is only applied when
/// no newer response has been applied yet.
pub struct NotificationFeed {
    api: Arc<dyn ShopMunimApi>,
    lang: Option<String>,
    state: RwLock<FeedState>,
    next_request: AtomicU64,
    loading: AtomicUsize,
    refreshing: AtomicUsize,
}

impl NotificationFeed {
    pub fn new(api: Arc<dyn ShopMunimApi>, lang: Option<String>) -> Self {
        Self {
            api,
            lang,
            state: RwLock::new(FeedState::default()),
            next_request: AtomicU64::new(0),
            loading: AtomicUsize::new(0),
            refreshing: AtomicUsize::new(0),
        }
    }

    /// Fetch the notification list and replace the held items.
    ///
    /// On error the previous items stay visible.
    pub async fn fetch(&self) -> AppResult<FetchOutcome> {
        let _pending = Pending::start(&self.loading);
        self.fetch_inner().await
    }

    /// Pull-to-refresh. Same as [`fetch`](Self::fetch); the current list is
    /// kept until the new one arrives.
    pub async fn refresh(&self) -> AppResult<FetchOutcome> {
        let _pending = Pending::start(&self.refreshing);
        self.fetch_inner().await
    }

    async fn fetch_inner(&self) -> AppResult<FetchOutcome> {
        let request_id = self.next_request.fetch_add(1, Ordering::SeqCst) + 1;

        let records = match self.api.list_notifications().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(request_id, "Failed to fetch notifications: {}", e);
                return Err(e);
            }
        };

        let items: Vec<NotificationItem> = records
            .into_iter()
            .map(|r| NotificationItem::from_remote(r, self.lang.as_deref()))
            .collect();

        let mut state = self.state.write().await;
        if request_id < state.applied_request {
            tracing::debug!(
                request_id,
                applied = state.applied_request,
                "Dropping stale notifications response"
            );
            return Ok(FetchOutcome::Superseded);
        }

        let count = items.len();
        state.items = items;
        state.applied_request = request_id;
        if let Some(expanded) = &state.expanded {
            if !state.items.iter().any(|item| &item.id == expanded) {
                state.expanded = None;
            }
        }
        tracing::debug!(request_id, count, "Applied notifications");

        Ok(FetchOutcome::Applied(count))
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) > 0
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst) > 0
    }

    /// Accordion toggle: tapping the expanded card collapses it, tapping any
    /// other card expands it and collapses the previous one. Returns the id
    /// expanded afterwards.
    pub async fn toggle_expand(&self, id: &str) -> Option<String> {
        let mut state = self.state.write().await;
        state.expanded = match state.expanded.take() {
            Some(current) if current == id => None,
            _ => Some(id.to_string()),
        };
        state.expanded.clone()
    }

    pub async fn expanded(&self) -> Option<String> {
        self.state.read().await.expanded.clone()
    }

    pub async fn items(&self) -> Vec<NotificationItem> {
        self.state.read().await.items.clone()
    }

    pub async fn unread_count(&self) -> usize {
        self.state
            .read()
            .await
            .items
            .iter()
            .filter(|item| !item.read)
            .count()
    }

    /// Build the view model with time labels relative to `now`.
    pub async fn view(&self, now: DateTime<Utc>) -> FeedView {
        let state = self.state.read().await;
        let lang = self.lang.as_deref();

        if state.items.is_empty() {
            return FeedView::Empty(EmptyState {
                icon: EMPTY_STATE_ICON,
                title: tr(lang, "notifications.empty.title", None),
                subtitle: tr(lang, "notifications.empty.subtitle", None),
            });
        }

        let now_local = now.with_timezone(&Local);
        let cards = state
            .items
            .iter()
            .map(|item| {
                let expanded = state.expanded.as_deref() == Some(item.id.as_str());
                NotificationCard {
                    id: item.id.clone(),
                    title: item.title.clone(),
                    shop_name: item.shop_name.clone(),
                    body: if expanded {
                        item.message.clone()
                    } else {
                        preview(&item.message)
                    },
                    time_label: relative_time_for(
                        lang,
                        &item.created_at.with_timezone(&Local),
                        &now_local,
                    ),
                    icon: item.icon,
                    read: item.read,
                    expanded,
                }
            })
            .collect();

        FeedView::List {
            header: tr(lang, "notifications.header", None),
            cards,
        }
    }
}

fn preview(message: &str) -> String {
    if message.chars().count() <= PREVIEW_CHARS {
        return message.to_string();
    }
    let mut out: String = message.chars().take(PREVIEW_CHARS).collect();
    out.truncate(out.trim_end().len());
    out.push('…');
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedView {
    Empty(EmptyState),
    List {
        header: String,
        cards: Vec<NotificationCard>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub icon: &'static str,
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationCard {
    pub id: String,
    pub title: String,
    pub shop_name: String,
    /// Full message when expanded, otherwise a truncated preview.
    pub body: String,
    pub time_label: String,
    pub icon: IconKind,
    pub read: bool,
    pub expanded: bool,
}
