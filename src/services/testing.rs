//! In-memory stand-in for the backend used by service tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;

use crate::error::{AppError, AppResult};
use crate::models::{CreateShopRequest, RemoteNotification, Shop, UpdateProfile, UserProfile};
use crate::services::api::ShopMunimApi;

struct Batch {
    delay: Duration,
    records: Option<Vec<RemoteNotification>>,
}

#[derive(Default)]
pub struct FakeApi {
    profile: Mutex<Option<UserProfile>>,
    fail_updates: AtomicBool,
    update_delay: Mutex<Duration>,
    updates: Mutex<Vec<UpdateProfile>>,
    batches: Mutex<VecDeque<Batch>>,
    notification_calls: AtomicUsize,
    shop_error: Mutex<Option<(StatusCode, String)>>,
    shop_delay: Mutex<Duration>,
    shop_requests: Mutex<Vec<CreateShopRequest>>,
}

impl FakeApi {
    pub fn with_profile(profile: UserProfile) -> Self {
        let api = Self::default();
        *api.profile.lock().unwrap() = Some(profile);
        api
    }

    pub fn fail_profile_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn delay_profile_updates(&self, delay: Duration) {
        *self.update_delay.lock().unwrap() = delay;
    }

    pub fn profile_updates(&self) -> Vec<UpdateProfile> {
        self.updates.lock().unwrap().clone()
    }

    /// Queue the reply of the next `GET /notifications`; `None` fails it.
    pub fn queue_notifications(&self, delay: Duration, records: Option<Vec<RemoteNotification>>) {
        self.batches
            .lock()
            .unwrap()
            .push_back(Batch { delay, records });
    }

    pub fn notification_calls(&self) -> usize {
        self.notification_calls.load(Ordering::SeqCst)
    }

    pub fn reject_shops(&self, status: StatusCode, body: &str) {
        *self.shop_error.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn delay_shops(&self, delay: Duration) {
        *self.shop_delay.lock().unwrap() = delay;
    }

    pub fn shop_requests(&self) -> Vec<CreateShopRequest> {
        self.shop_requests.lock().unwrap().clone()
    }
}

fn unavailable() -> AppError {
    AppError::Api {
        status: StatusCode::SERVICE_UNAVAILABLE,
        message: None,
    }
}

#[async_trait]
impl ShopMunimApi for FakeApi {
    async fn get_me(&self) -> AppResult<UserProfile> {
        self.profile.lock().unwrap().clone().ok_or_else(unavailable)
    }

    async fn update_profile(&self, update: UpdateProfile) -> AppResult<UserProfile> {
        self.updates.lock().unwrap().push(update);
        let delay = *self.update_delay.lock().unwrap();
        tokio::time::sleep(delay).await;

        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(UserProfile {
            push_enabled: Some(update.push_enabled),
            payment_alerts_enabled: Some(update.payment_alerts_enabled),
            promotions_enabled: Some(update.promotions_enabled),
            ..Default::default()
        })
    }

    async fn list_notifications(&self) -> AppResult<Vec<RemoteNotification>> {
        self.notification_calls.fetch_add(1, Ordering::SeqCst);
        let batch = self.batches.lock().unwrap().pop_front();
        let Some(batch) = batch else {
            return Ok(Vec::new());
        };

        tokio::time::sleep(batch.delay).await;
        batch.records.ok_or_else(unavailable)
    }

    async fn create_shop(&self, request: CreateShopRequest) -> AppResult<Shop> {
        self.shop_requests.lock().unwrap().push(request.clone());
        let delay = *self.shop_delay.lock().unwrap();
        tokio::time::sleep(delay).await;

        if let Some((status, body)) = self.shop_error.lock().unwrap().clone() {
            return Err(AppError::from_response(status, &body));
        }
        Ok(Shop {
            id: format!("shop-{}", self.shop_requests.lock().unwrap().len()),
            name: request.name,
            category: Some(request.category.to_string()),
            location: Some(request.location),
            shop_code: None,
            created_at: None,
        })
    }
}

pub fn remote(
    id: &str,
    title: Option<&str>,
    message: &str,
    created_at: DateTime<Utc>,
) -> RemoteNotification {
    RemoteNotification {
        id: id.to_string(),
        title: title.map(str::to_string),
        message: message.to_string(),
        created_at,
        shop_name: Some("Gupta Stores".to_string()),
        kind: None,
    }
}
