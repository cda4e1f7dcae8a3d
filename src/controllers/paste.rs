use bytes::Bytes;
use tracing::info;

use crate::error::ApiError;
use crate::keys::generate_key;
use crate::limit::{self, Decision, Limiter};
use crate::models::Paste;
use crate::validate;
use crate::App;

/// Attempts at finding a free key before giving up.
const MAX_KEY_ATTEMPTS: u32 = 4;

/// Admit a new paste: validate, rate-check, assign a key, persist.
///
/// Validation runs first and has no side effects; a limited or malformed
/// request never reaches the store.
pub async fn create(app: &App, content_type: Option<&str>, body: Bytes) -> crate::AppResult<Paste> {
    let content = validate::extract(content_type, &body)?;

    if app.limiter.check(limit::create_identity(&content)).await? == Decision::Limited {
        return Err(ApiError::RateLimited);
    }

    let result = store_with_fresh_key(app, &content).await;
    report_if_internal(app, "create", &result);
    result
}

/// Look up a paste by key.
pub async fn fetch(app: &App, key: &str) -> crate::AppResult<Paste> {
    if app.limiter.check(limit::fetch_identity(key)).await? == Decision::Limited {
        return Err(ApiError::RateLimited);
    }

    let result = match app.database.get_paste(key).await {
        Ok(Some(paste)) => Ok(paste),
        Ok(None) => Err(ApiError::NotFound),
        Err(err) => Err(err),
    };
    report_if_internal(app, "fetch", &result);
    result
}

/// Insert under generated keys until one is free, within the attempt bound.
/// A conflict means the candidate key was already taken; the losing insert
/// retries with a fresh key rather than overwriting.
async fn store_with_fresh_key(app: &App, content: &str) -> crate::AppResult<Paste> {
    for _ in 0..MAX_KEY_ATTEMPTS {
        let key = generate_key(app.config.keys.style);
        match app.database.insert_paste(&key, content).await {
            Ok(paste) => {
                info!(
                    "new paste: key='{key}', size={size}",
                    key = paste.id,
                    size = paste.content.len()
                );
                return Ok(paste);
            }
            Err(ApiError::Conflict) => {
                info!("key collision on '{key}', regenerating");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(ApiError::KeySpaceExhausted {
        attempts: MAX_KEY_ATTEMPTS,
    })
}

fn report_if_internal<T>(app: &App, operation: &'static str, result: &crate::AppResult<T>) {
    if let Err(err) = result {
        if err.is_internal() {
            app.notifier.report(operation, err.detail());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::Config;
    use crate::db::Database;
    use crate::limit::window::WindowLimiter;
    use crate::notify::Notifier;

    async fn test_app(max_requests: u32) -> App {
        App {
            config: Config::default(),
            database: Database::connect_in_memory().await,
            limiter: WindowLimiter::new(max_requests, Duration::from_secs(60)).into(),
            notifier: Notifier::disabled(),
        }
    }

    #[tokio::test]
    async fn create_then_fetch_round_trips() {
        let app = test_app(100).await;

        let paste = create(&app, None, Bytes::from("hello world")).await.unwrap();
        assert!(!paste.id.is_empty());

        let fetched = fetch(&app, &paste.id).await.unwrap();
        assert_eq!(fetched.content, "hello world");
    }

    #[tokio::test]
    async fn validation_rejects_before_any_side_effect() {
        // a zero-allowance limiter would reject anything that got past
        // validation, so reason codes prove validation went first
        let app = test_app(0).await;

        let err = create(&app, None, Bytes::new()).await.unwrap_err();
        assert!(matches!(err, ApiError::EmptyInput));

        let err = create(&app, None, Bytes::from_static(b"\x80")).await.unwrap_err();
        assert!(matches!(err, ApiError::NonPlainText));

        let err = create(&app, Some("application/octet-stream"), Bytes::from("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::WrongType));
    }

    #[tokio::test]
    async fn creations_bucket_by_content_prefix() {
        let app = test_app(2).await;

        // identical leading twenty bytes, different tails
        create(&app, None, Bytes::from("shared prefix shared one"))
            .await
            .unwrap();
        create(&app, None, Bytes::from("shared prefix shared two"))
            .await
            .unwrap();
        let err = create(&app, None, Bytes::from("shared prefix shared three"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::RateLimited));

        // unrelated content is its own bucket
        create(&app, None, Bytes::from("something else entirely"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn fetches_bucket_by_key() {
        let app = test_app(1).await;

        let paste = create(&app, None, Bytes::from("abc")).await.unwrap();
        fetch(&app, &paste.id).await.unwrap();

        let err = fetch(&app, &paste.id).await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimited));
    }

    #[tokio::test]
    async fn fetching_an_unknown_key_is_not_found() {
        let app = test_app(100).await;
        let err = fetch(&app, "doesnotexist").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn accepted_content_survives_verbatim() {
        let app = test_app(100).await;
        let content = "fn main() {\n\tprintln!(\"hi\");\n}\r\n";

        let paste = create(&app, None, Bytes::from(content)).await.unwrap();
        let fetched = fetch(&app, &paste.id).await.unwrap();
        assert_eq!(fetched.content, content);
    }
}
