use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::AppError;
use crate::i18n::tr;
use crate::models::{CreateShopRequest, Shop, ShopDraft};
use crate::services::api::ShopMunimApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopField {
    Name,
    Category,
    Location,
}

impl fmt::Display for ShopField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShopField::Name => "name",
            ShopField::Category => "category",
            ShopField::Location => "location",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
}

#[derive(Debug, thiserror::Error)]
pub enum ShopFormError {
    /// A required field is missing; no request was sent.
    #[error("{message}")]
    Invalid { field: ShopField, message: String },

    /// The backend (or the transport) refused the request. `message` is the
    /// backend's own text when it sent one.
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: AppError,
    },

    /// A submission is already waiting on the backend.
    #[error("A submission is already in progress")]
    Busy,
}

impl ShopFormError {
    pub fn field(&self) -> Option<ShopField> {
        match self {
            ShopFormError::Invalid { field, .. } => Some(*field),
            _ => None,
        }
    }
}

impl From<ShopFormError> for AppError {
    fn from(err: ShopFormError) -> Self {
        match err {
            ShopFormError::Invalid { message, .. } => AppError::Validation(message),
            ShopFormError::Rejected { source, .. } => source,
            ShopFormError::Busy => AppError::Validation(ShopFormError::Busy.to_string()),
        }
    }
}

#[derive(Debug)]
struct FormStatus {
    state: FormState,
    error: Option<String>,
}

/// Puts the form back to `Idle` if a submission is dropped mid-request.
struct Submitting<'a>(&'a Mutex<FormStatus>);

impl<'a> Submitting<'a> {
    /// Take the status lock for recording the outcome; the reset on drop
    /// is no longer needed.
    fn finish(self) -> MutexGuard<'a, FormStatus> {
        let mutex = self.0;
        std::mem::forget(self);
        let status = mutex.lock().unwrap_or_else(PoisonError::into_inner);
        status
    }
}

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        let mut status = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if status.state == FormState::Submitting {
            status.state = FormState::Idle;
        }
    }
}

/// The create-shop form: validates a draft and submits it once.
///
/// `idle -> validating -> submitting -> idle`, with the last error kept
/// for display. There is no automatic retry; the user resubmits.
pub struct ShopForm {
    api: Arc<dyn ShopMunimApi>,
    lang: Option<String>,
    status: Mutex<FormStatus>,
}

impl ShopForm {
    pub fn new(api: Arc<dyn ShopMunimApi>, lang: Option<String>) -> Self {
        Self {
            api,
            lang,
            status: Mutex::new(FormStatus {
                state: FormState::Idle,
                error: None,
            }),
        }
    }

    /// Check name, category, location in that order and build the trimmed
    /// request body. The first missing field wins.
    pub fn validate(
        draft: &ShopDraft,
        lang: Option<&str>,
    ) -> Result<CreateShopRequest, ShopFormError> {
        let invalid = |field: ShopField, key: &str| ShopFormError::Invalid {
            field,
            message: tr(lang, key, None),
        };

        let name = draft.name.trim();
        if name.is_empty() {
            return Err(invalid(ShopField::Name, "validation.shop_name_required"));
        }
        let Some(category) = draft.category else {
            return Err(invalid(
                ShopField::Category,
                "validation.shop_category_required",
            ));
        };
        let location = draft.location.trim();
        if location.is_empty() {
            return Err(invalid(
                ShopField::Location,
                "validation.shop_location_required",
            ));
        }

        Ok(CreateShopRequest {
            name: name.to_string(),
            category,
            location: location.to_string(),
        })
    }

    fn status(&self) -> MutexGuard<'_, FormStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> FormState {
        self.status().state
    }

    /// Message of the last failed submission, cleared by a successful one.
    pub fn error_message(&self) -> Option<String> {
        self.status().error.clone()
    }

    /// Validate and, if valid, send exactly one `POST /shops`.
    ///
    /// On success the caller dismisses the form. Dropping the returned
    /// future while the request is pending leaves the form `Idle`.
    pub async fn submit(&self, draft: &ShopDraft) -> Result<Shop, ShopFormError> {
        let request = {
            let mut status = self.status();
            if status.state != FormState::Idle {
                return Err(ShopFormError::Busy);
            }
            status.state = FormState::Validating;

            match Self::validate(draft, self.lang.as_deref()) {
                Ok(request) => {
                    status.state = FormState::Submitting;
                    request
                }
                Err(e) => {
                    tracing::debug!(field = ?e.field(), "Shop draft rejected: {}", e);
                    status.state = FormState::Idle;
                    status.error = Some(e.to_string());
                    return Err(e);
                }
            }
        };

        let submitting = Submitting(&self.status);
        let result = self.api.create_shop(request).await;

        let mut status = submitting.finish();
        status.state = FormState::Idle;
        match result {
            Ok(shop) => {
                tracing::info!(shop_id = %shop.id, name = %shop.name, "Shop created");
                status.error = None;
                Ok(shop)
            }
            Err(e) => {
                let message = e
                    .backend_detail()
                    .map(str::to_string)
                    .unwrap_or_else(|| tr(self.lang.as_deref(), "shop.create_failed", None));
                tracing::warn!("Failed to create shop: {}", e);
                status.error = Some(message.clone());
                Err(ShopFormError::Rejected { message, source: e })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShopCategory;
    use crate::services::testing::FakeApi;
    use reqwest::StatusCode;
    use std::time::Duration;

    fn draft(name: &str, category: Option<ShopCategory>, location: &str) -> ShopDraft {
        ShopDraft {
            name: name.to_string(),
            category,
            location: location.to_string(),
        }
    }

    fn form_with(api: &Arc<FakeApi>) -> ShopForm {
        ShopForm::new(api.clone(), None)
    }

    #[tokio::test]
    async fn valid_draft_sends_one_trimmed_request() {
        let api = Arc::new(FakeApi::default());
        let form = form_with(&api);

        let shop = form
            .submit(&draft(
                "  Gupta Stores ",
                Some(ShopCategory::Grocery),
                " Indore\n",
            ))
            .await
            .unwrap();

        assert_eq!(shop.name, "Gupta Stores");
        assert_eq!(
            api.shop_requests(),
            vec![CreateShopRequest {
                name: "Gupta Stores".to_string(),
                category: ShopCategory::Grocery,
                location: "Indore".to_string(),
            }]
        );
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(form.error_message(), None);
    }

    #[tokio::test]
    async fn missing_fields_fail_in_order_without_network() {
        let api = Arc::new(FakeApi::default());
        let form = form_with(&api);

        let cases = [
            (draft("   ", None, ""), ShopField::Name, "Please enter shop name"),
            (
                draft("Gupta Stores", None, ""),
                ShopField::Category,
                "Please select a category",
            ),
            (
                draft("Gupta Stores", Some(ShopCategory::Medical), " \t"),
                ShopField::Location,
                "Please enter shop location",
            ),
        ];

        for (input, field, message) in cases {
            let err = form.submit(&input).await.unwrap_err();
            assert_eq!(err.field(), Some(field));
            assert_eq!(err.to_string(), message);
            assert_eq!(form.error_message().as_deref(), Some(message));
            assert_eq!(form.state(), FormState::Idle);
        }
        assert!(api.shop_requests().is_empty());
    }

    #[tokio::test]
    async fn backend_detail_is_surfaced_verbatim() {
        let api = Arc::new(FakeApi::default());
        api.reject_shops(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Shop name already taken"}"#,
        );
        let form = form_with(&api);

        let err = form
            .submit(&draft("Gupta Stores", Some(ShopCategory::Other), "Pune"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopFormError::Rejected { .. }));
        assert_eq!(err.to_string(), "Shop name already taken");
        assert_eq!(api.shop_requests().len(), 1);
    }

    #[tokio::test]
    async fn missing_detail_uses_generic_fallback() {
        let api = Arc::new(FakeApi::default());
        api.reject_shops(StatusCode::INTERNAL_SERVER_ERROR, "");
        let form = ShopForm::new(api.clone(), Some("hi".to_string()));

        let err = form
            .submit(&draft("Gupta Stores", Some(ShopCategory::Other), "Pune"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "दुकान नहीं बन सकी। कृपया पुनः प्रयास करें।");
        assert_eq!(form.state(), FormState::Idle);
    }

    #[tokio::test]
    async fn expired_session_detail_is_shown() {
        let api = Arc::new(FakeApi::default());
        api.reject_shops(
            StatusCode::UNAUTHORIZED,
            r#"{"detail": "Session expired, please log in"}"#,
        );
        let form = form_with(&api);

        let err = form
            .submit(&draft("Gupta Stores", Some(ShopCategory::Grocery), "Indore"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Session expired, please log in");
        assert_eq!(
            form.error_message().as_deref(),
            Some("Session expired, please log in")
        );
    }

    #[tokio::test]
    async fn not_found_without_body_uses_generic_fallback() {
        let api = Arc::new(FakeApi::default());
        api.reject_shops(StatusCode::NOT_FOUND, "");
        let form = form_with(&api);

        let err = form
            .submit(&draft("Gupta Stores", Some(ShopCategory::Grocery), "Indore"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to create shop. Please try again.");
    }

    #[tokio::test]
    async fn cancelled_submit_leaves_form_idle() {
        let api = Arc::new(FakeApi::default());
        api.delay_shops(Duration::from_millis(200));
        let form = form_with(&api);
        let input = draft("Gupta Stores", Some(ShopCategory::Grocery), "Indore");

        let cancelled = tokio::time::timeout(Duration::from_millis(20), form.submit(&input)).await;
        assert!(cancelled.is_err());
        assert_eq!(form.state(), FormState::Idle);

        api.delay_shops(Duration::ZERO);
        let shop = form.submit(&input).await.unwrap();
        assert_eq!(shop.name, "Gupta Stores");
        assert_eq!(api.shop_requests().len(), 2);
    }

    #[tokio::test]
    async fn second_submit_while_pending_is_busy() {
        let api = Arc::new(FakeApi::default());
        api.delay_shops(Duration::from_millis(100));
        let form = form_with(&api);
        let input = draft("Gupta Stores", Some(ShopCategory::Grocery), "Indore");

        let (first, second) = tokio::join!(form.submit(&input), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            form.submit(&input).await
        });
        assert!(first.is_ok());
        assert!(matches!(second, Err(ShopFormError::Busy)));
        assert_eq!(api.shop_requests().len(), 1);
    }

    #[tokio::test]
    async fn resubmit_after_failure_clears_error() {
        let api = Arc::new(FakeApi::default());
        let form = form_with(&api);

        assert!(form.submit(&draft("", None, "")).await.is_err());
        assert!(form.error_message().is_some());

        form.submit(&draft("Sharma Medical", Some(ShopCategory::Medical), "Bhopal"))
            .await
            .unwrap();
        assert_eq!(form.error_message(), None);
    }
}
