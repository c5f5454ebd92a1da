mod client;
mod error;

pub use client::AllInOneClient;
pub use error::ApiError;

use async_trait::async_trait;
use serde_json::Value;

use crate::utils::is_empty_or_zero_or_null;

#[async_trait]
pub trait DownloadApi: Send + Sync {
    /// Human-readable name of the upstream service
    fn name(&self) -> &'static str;

    /// Resolve a video page URL into the upstream's raw JSON payload,
    /// already unwrapped from any `data`/`result` envelope.
    async fn fetch(&self, video_url: &str) -> Result<Value, ApiError>;
}

/// Picks `data`, then `result`, then the body itself, skipping values the
/// upstream treats as absent.
pub fn unwrap_envelope(body: Value) -> Result<Value, ApiError> {
    let result = match body {
        Value::Object(mut obj) => {
            let data = obj.shift_remove("data").filter(|v| !is_empty_or_zero_or_null(v));
            let result = obj.shift_remove("result").filter(|v| !is_empty_or_zero_or_null(v));

            match (data, result) {
                (Some(data), _) => data,
                (None, Some(result)) => result,
                (None, None) => Value::Object(obj),
            }
        }
        other => other,
    };

    if is_empty_or_zero_or_null(&result) {
        return Err(ApiError::NoData);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_prefers_data() {
        let body = json!({"status": true, "data": {"title": "a"}, "result": {"title": "b"}});
        assert_eq!(unwrap_envelope(body).unwrap(), json!({"title": "a"}));
    }

    #[test]
    fn test_unwrap_falls_back_to_result() {
        let body = json!({"data": null, "result": {"title": "b"}});
        assert_eq!(unwrap_envelope(body).unwrap(), json!({"title": "b"}));
    }

    #[test]
    fn test_unwrap_uses_body_without_envelope() {
        let body = json!({"title": "c", "url": "https://cdn.test/v.mp4"});
        assert_eq!(unwrap_envelope(body.clone()).unwrap(), body);
    }

    #[test]
    fn test_unwrap_empty_body_is_no_data() {
        assert!(matches!(unwrap_envelope(json!(null)), Err(ApiError::NoData)));
        assert!(matches!(unwrap_envelope(json!("")), Err(ApiError::NoData)));
        assert!(matches!(unwrap_envelope(json!(false)), Err(ApiError::NoData)));
    }

    #[test]
    fn test_unwrap_empty_object_is_kept() {
        assert_eq!(unwrap_envelope(json!({})).unwrap(), json!({}));
    }
}
