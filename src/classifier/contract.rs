//! Wire format of the classification service.
//!
//! `POST /predict` takes `{"text": ...}` and answers
//! `{"prediction": "spam" | "ham", "confidence": <percent>}`. Anything else is
//! malformed. `POST /report` and `GET /` answer `{"message": ...}`.

use reqwest::Response;
use serde::{Deserialize, Serialize};
use url::Url;

use super::ClassifyError;
use crate::domain::{Label, ScanResult};

pub const PREDICT_PATH: &str = "/predict";
pub const REPORT_PATH: &str = "/report";
pub const STATUS_PATH: &str = "/";

#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    pub prediction: Label,
    pub confidence: f64,
}

#[derive(Debug, Serialize)]
pub struct ReportRequest<'a> {
    pub text: &'a str,
    pub label: Label,
}

#[derive(Debug, Deserialize)]
pub struct ServiceMessage {
    pub message: String,
}

/// Appends `path` to `base`, keeping any path prefix the base already has.
pub fn endpoint(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined)
}

pub fn parse_prediction(body: &[u8]) -> Result<ScanResult, ClassifyError> {
    let response: PredictResponse = serde_json::from_slice(body)?;
    ScanResult::new(response.prediction, response.confidence).ok_or_else(|| {
        ClassifyError::Malformed(format!(
            "confidence {} is outside 0..=100",
            response.confidence
        ))
    })
}

pub fn parse_message(body: &[u8]) -> Result<String, ClassifyError> {
    let message: ServiceMessage = serde_json::from_slice(body)?;
    Ok(message.message)
}

/// Rejects non-success statuses, then hands the raw body to `parse`.
pub async fn read_body<T>(
    response: Response,
    parse: fn(&[u8]) -> Result<T, ClassifyError>,
) -> Result<T, ClassifyError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClassifyError::Status(status));
    }
    let body = response.bytes().await?;
    parse(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_to_bare_host() {
        let base = Url::parse("http://127.0.0.1:8000").unwrap();
        assert_eq!(
            endpoint(&base, PREDICT_PATH).unwrap().as_str(),
            "http://127.0.0.1:8000/predict"
        );
        assert_eq!(
            endpoint(&base, STATUS_PATH).unwrap().as_str(),
            "http://127.0.0.1:8000/"
        );
    }

    #[test]
    fn endpoint_keeps_path_prefix() {
        let base = Url::parse("https://example.com/shield/").unwrap();
        assert_eq!(
            endpoint(&base, REPORT_PATH).unwrap().as_str(),
            "https://example.com/shield/report"
        );
        let base = Url::parse("https://example.com/shield").unwrap();
        assert_eq!(
            endpoint(&base, PREDICT_PATH).unwrap().as_str(),
            "https://example.com/shield/predict"
        );
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(PredictRequest { text: "hi" }).unwrap();
        assert_eq!(body, serde_json::json!({ "text": "hi" }));

        let body = serde_json::to_value(ReportRequest {
            text: "hi",
            label: Label::Spam,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "text": "hi", "label": "spam" }));
    }

    #[test]
    fn well_formed_prediction_is_accepted() {
        let result = parse_prediction(br#"{"prediction":"spam","confidence":87}"#).unwrap();
        assert_eq!(result.label, Label::Spam);
        assert_eq!(result.confidence, 87.0);

        let result =
            parse_prediction(br#"{"prediction":"ham","confidence":91.25,"model":"svm"}"#).unwrap();
        assert_eq!(result.label, Label::Ham);
        assert_eq!(result.confidence, 91.25);
    }

    #[test]
    fn missing_fields_are_malformed() {
        let err = parse_prediction(br#"{"foo":1}"#).unwrap_err();
        assert!(matches!(err, ClassifyError::Malformed(_)));

        let err = parse_prediction(br#"{"prediction":"spam"}"#).unwrap_err();
        assert!(matches!(err, ClassifyError::Malformed(_)));
    }

    #[test]
    fn ill_typed_fields_are_malformed() {
        for body in [
            &br#"{"prediction":"maybe","confidence":50}"#[..],
            br#"{"prediction":"spam","confidence":"87"}"#,
            br#"{"prediction":1,"confidence":87}"#,
            br#"{"prediction":"ham","confidence":140}"#,
            b"not json",
            b"",
        ] {
            let err = parse_prediction(body).unwrap_err();
            assert!(
                matches!(err, ClassifyError::Malformed(_)),
                "{:?} should be malformed",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn service_message_is_extracted() {
        let message =
            parse_message(br#"{"message":"Inbox Shield Advanced API is running"}"#).unwrap();
        assert_eq!(message, "Inbox Shield Advanced API is running");
    }
}
