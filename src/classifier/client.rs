use futures::{future::BoxFuture, FutureExt};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use url::Url;

use crate::{
    config::ClassifierConfig,
    domain::{Label, ScanResult},
};

use super::{
    contract::{
        endpoint, parse_message, parse_prediction, read_body, PredictRequest, ReportRequest,
        PREDICT_PATH, REPORT_PATH, STATUS_PATH,
    },
    Classifier, ClassifyError,
};

#[derive(Clone)]
pub struct ClassifierClient {
    http: Client,
    config: ClassifierConfig,
}

impl ClassifierClient {
    pub fn new(http: Client, config: ClassifierConfig) -> Self {
        Self { http, config }
    }

    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    pub async fn predict(&self, text: &str) -> Result<ScanResult, ClassifyError> {
        let response = self
            .post(PREDICT_PATH, &PredictRequest { text })?
            .send()
            .await?;
        read_body(response, parse_prediction).await
    }

    /// Posts to `/predict` and hands back the status and body untouched.
    /// Only a missing answer is an error here; any status is returned as is.
    pub async fn predict_raw(&self, text: &str) -> Result<(StatusCode, String), ClassifyError> {
        let response = self
            .post(PREDICT_PATH, &PredictRequest { text })?
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    pub async fn report(&self, text: &str, label: Label) -> Result<String, ClassifyError> {
        let response = self
            .post(REPORT_PATH, &ReportRequest { text, label })?
            .send()
            .await?;
        read_body(response, parse_message).await
    }

    /// Liveness probe against the service root.
    pub async fn status(&self) -> Result<String, ClassifyError> {
        let url = endpoint(&self.config.base_url, STATUS_PATH)?;
        let response = self.with_timeout(self.http.get(url)).send().await?;
        read_body(response, parse_message).await
    }

    fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<RequestBuilder, ClassifyError> {
        let url = endpoint(&self.config.base_url, path)?;
        tracing::debug!(target: "classifier", url = %url, "sending request");
        Ok(self.with_timeout(self.http.post(url).json(body)))
    }

    fn with_timeout(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.request_timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }
}

impl Classifier for ClassifierClient {
    fn classify<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<ScanResult, ClassifyError>> {
        self.predict(text).boxed()
    }

    fn report<'a>(
        &'a self,
        text: &'a str,
        label: Label,
    ) -> BoxFuture<'a, Result<String, ClassifyError>> {
        ClassifierClient::report(self, text, label).boxed()
    }

    fn status(&self) -> BoxFuture<'_, Result<String, ClassifyError>> {
        ClassifierClient::status(self).boxed()
    }
}
