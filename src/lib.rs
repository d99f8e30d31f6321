//! Client core of the ShopMunim ledger app: notification preferences, the
//! notification feed, relative-time labels and the create-shop form, on top
//! of a thin REST client for the ShopMunim backend.

pub mod config;
pub mod error;
pub mod i18n;
pub mod models;
pub mod services;

pub use error::{AppError, AppResult};
pub use services::api::{HttpApiClient, ShopMunimApi};
pub use services::notifications::{FeedView, NotificationFeed};
pub use services::preferences::PreferenceStore;
pub use services::shops::ShopForm;
pub use services::time::relative_time;
