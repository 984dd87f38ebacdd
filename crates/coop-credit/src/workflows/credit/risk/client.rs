use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::{RiskCentralError, RiskEvaluator};
use crate::config::RiskCentralConfig;
use crate::workflows::credit::domain::RiskEvaluation;

const EVALUATION_PATH: &str = "risk-evaluation";

/// HTTP adapter for the risk central `POST /risk-evaluation` endpoint.
#[derive(Debug, Clone)]
pub struct RiskCentralClient {
    http: Client,
    endpoint: Url,
    timeout: Duration,
}

impl RiskCentralClient {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, RiskCentralError> {
        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join(EVALUATION_PATH)
            .map_err(|err| RiskCentralError::Transport(err.to_string()))?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RiskCentralError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            timeout,
        })
    }

    pub fn from_config(config: &RiskCentralConfig) -> Result<Self, RiskCentralError> {
        Self::new(&config.base_url, config.timeout)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn transport_error(&self, err: reqwest::Error) -> RiskCentralError {
        if err.is_timeout() {
            RiskCentralError::Timeout(self.timeout)
        } else {
            RiskCentralError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl RiskEvaluator for RiskCentralClient {
    async fn evaluate_risk(
        &self,
        document: &str,
        amount: Decimal,
        term_months: u32,
    ) -> Result<RiskEvaluation, RiskCentralError> {
        let request = EvaluationRequest {
            document,
            amount,
            term: term_months,
        };
        debug!(endpoint = %self.endpoint, document, %amount, term_months, "calling risk central");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RiskCentralError::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .json::<Option<EvaluationResponse>>()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    RiskCentralError::Timeout(self.timeout)
                } else {
                    RiskCentralError::MalformedPayload(err.to_string())
                }
            })?
            .ok_or_else(|| RiskCentralError::MalformedPayload("empty response".to_string()))?;

        body.into_evaluation()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluationRequest<'a> {
    document: &'a str,
    amount: Decimal,
    term: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluationResponse {
    #[serde(default)]
    #[allow(dead_code)]
    document: Option<String>,
    score: i64,
    risk_level: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    evaluated_at: Option<String>,
}

impl EvaluationResponse {
    fn into_evaluation(self) -> Result<RiskEvaluation, RiskCentralError> {
        let score = u32::try_from(self.score).map_err(|_| {
            RiskCentralError::MalformedPayload(format!("score {} is out of range", self.score))
        })?;
        let level = self
            .risk_level
            .ok_or_else(|| RiskCentralError::MalformedPayload("missing riskLevel".to_string()))?;

        RiskEvaluation::new(score, level, self.detail)
            .map_err(|err| RiskCentralError::MalformedPayload(err.to_string()))
    }
}
