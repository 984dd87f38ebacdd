use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    Affiliate, AffiliateId, CreditApplication, CreditApplicationId, DomainError,
};
use super::repository::{AffiliateStore, CreditApplicationStore, RepositoryError};
use super::risk::RiskEvaluator;
use super::service::{
    AffiliateRegistration, AffiliateService, AffiliateServiceError, CreditApplicationService,
};
use super::views::{AffiliateView, CreditApplicationView};
use super::workflow::{CreditApplicationError, CreditRequest};

/// Services shared by every credit route.
pub struct CreditApi<A, S, E> {
    pub affiliates: Arc<AffiliateService<A, E>>,
    pub applications: Arc<CreditApplicationService<A, S, E>>,
}

impl<A, S, E> Clone for CreditApi<A, S, E> {
    fn clone(&self) -> Self {
        Self {
            affiliates: Arc::clone(&self.affiliates),
            applications: Arc::clone(&self.applications),
        }
    }
}

/// Router builder exposing affiliate and credit application endpoints.
pub fn credit_router<A, S, E>(api: CreditApi<A, S, E>) -> Router
where
    A: AffiliateStore + 'static,
    S: CreditApplicationStore + 'static,
    E: RiskEvaluator + 'static,
{
    Router::new()
        .route(
            "/api/v1/affiliates",
            post(register_affiliate_handler::<A, S, E>)
                .get(affiliate_by_document_handler::<A, S, E>),
        )
        .route(
            "/api/v1/affiliates/:affiliate_id",
            get(affiliate_handler::<A, S, E>),
        )
        .route(
            "/api/v1/affiliates/:affiliate_id/deactivate",
            post(deactivate_affiliate_handler::<A, S, E>),
        )
        .route(
            "/api/v1/affiliates/:affiliate_id/reactivate",
            post(reactivate_affiliate_handler::<A, S, E>),
        )
        .route(
            "/api/v1/affiliates/:affiliate_id/salary",
            put(update_salary_handler::<A, S, E>),
        )
        .route(
            "/api/v1/credit-applications",
            post(submit_application_handler::<A, S, E>),
        )
        .route(
            "/api/v1/credit-applications/:application_id",
            get(application_handler::<A, S, E>),
        )
        .route(
            "/api/v1/credit-applications/by-affiliate/:document",
            get(applications_by_affiliate_handler::<A, S, E>),
        )
        .with_state(api)
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentQuery {
    document: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SalaryUpdate {
    salary: Decimal,
}

pub(crate) async fn register_affiliate_handler<A, S, E>(
    State(api): State<CreditApi<A, S, E>>,
    payload: Result<Json<AffiliateRegistration>, JsonRejection>,
) -> Response
where
    A: AffiliateStore + 'static,
    S: CreditApplicationStore + 'static,
    E: RiskEvaluator + 'static,
{
    let Json(registration) = match payload {
        Ok(body) => body,
        Err(rejection) => return malformed_body(rejection),
    };

    match api.affiliates.register(registration).await {
        Ok(affiliate) => affiliate_response(StatusCode::CREATED, &affiliate),
        Err(err) => affiliate_failure(err),
    }
}

pub(crate) async fn affiliate_handler<A, S, E>(
    State(api): State<CreditApi<A, S, E>>,
    Path(affiliate_id): Path<u64>,
) -> Response
where
    A: AffiliateStore + 'static,
    S: CreditApplicationStore + 'static,
    E: RiskEvaluator + 'static,
{
    match api.affiliates.get(AffiliateId(affiliate_id)) {
        Ok(affiliate) => affiliate_response(StatusCode::OK, &affiliate),
        Err(err) => affiliate_failure(err),
    }
}

pub(crate) async fn affiliate_by_document_handler<A, S, E>(
    State(api): State<CreditApi<A, S, E>>,
    Query(query): Query<DocumentQuery>,
) -> Response
where
    A: AffiliateStore + 'static,
    S: CreditApplicationStore + 'static,
    E: RiskEvaluator + 'static,
{
    let Some(document) = query.document.filter(|document| !document.trim().is_empty()) else {
        return affiliate_failure(
            DomainError::validation("document", "query parameter is required").into(),
        );
    };

    match api.affiliates.find_by_document(&document) {
        Ok(affiliate) => affiliate_response(StatusCode::OK, &affiliate),
        Err(err) => affiliate_failure(err),
    }
}

pub(crate) async fn deactivate_affiliate_handler<A, S, E>(
    State(api): State<CreditApi<A, S, E>>,
    Path(affiliate_id): Path<u64>,
) -> Response
where
    A: AffiliateStore + 'static,
    S: CreditApplicationStore + 'static,
    E: RiskEvaluator + 'static,
{
    match api.affiliates.deactivate(AffiliateId(affiliate_id)) {
        Ok(affiliate) => affiliate_response(StatusCode::OK, &affiliate),
        Err(err) => affiliate_failure(err),
    }
}

pub(crate) async fn reactivate_affiliate_handler<A, S, E>(
    State(api): State<CreditApi<A, S, E>>,
    Path(affiliate_id): Path<u64>,
) -> Response
where
    A: AffiliateStore + 'static,
    S: CreditApplicationStore + 'static,
    E: RiskEvaluator + 'static,
{
    match api.affiliates.reactivate(AffiliateId(affiliate_id)) {
        Ok(affiliate) => affiliate_response(StatusCode::OK, &affiliate),
        Err(err) => affiliate_failure(err),
    }
}

pub(crate) async fn update_salary_handler<A, S, E>(
    State(api): State<CreditApi<A, S, E>>,
    Path(affiliate_id): Path<u64>,
    payload: Result<Json<SalaryUpdate>, JsonRejection>,
) -> Response
where
    A: AffiliateStore + 'static,
    S: CreditApplicationStore + 'static,
    E: RiskEvaluator + 'static,
{
    let Json(update) = match payload {
        Ok(body) => body,
        Err(rejection) => return malformed_body(rejection),
    };

    match api
        .affiliates
        .update_salary(AffiliateId(affiliate_id), update.salary)
    {
        Ok(affiliate) => affiliate_response(StatusCode::OK, &affiliate),
        Err(err) => affiliate_failure(err),
    }
}

pub(crate) async fn submit_application_handler<A, S, E>(
    State(api): State<CreditApi<A, S, E>>,
    payload: Result<Json<CreditRequest>, JsonRejection>,
) -> Response
where
    A: AffiliateStore + 'static,
    S: CreditApplicationStore + 'static,
    E: RiskEvaluator + 'static,
{
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return malformed_body(rejection),
    };

    match api.applications.submit(request).await {
        Ok(application) => application_response(StatusCode::CREATED, &application),
        Err(err) => credit_failure(err),
    }
}

pub(crate) async fn application_handler<A, S, E>(
    State(api): State<CreditApi<A, S, E>>,
    Path(application_id): Path<u64>,
) -> Response
where
    A: AffiliateStore + 'static,
    S: CreditApplicationStore + 'static,
    E: RiskEvaluator + 'static,
{
    match api.applications.get(CreditApplicationId(application_id)) {
        Ok(application) => application_response(StatusCode::OK, &application),
        Err(err) => credit_failure(err),
    }
}

pub(crate) async fn applications_by_affiliate_handler<A, S, E>(
    State(api): State<CreditApi<A, S, E>>,
    Path(document): Path<String>,
) -> Response
where
    A: AffiliateStore + 'static,
    S: CreditApplicationStore + 'static,
    E: RiskEvaluator + 'static,
{
    match api.applications.list_for_affiliate_document(&document) {
        Ok(applications) => {
            let views: Vec<CreditApplicationView> =
                applications.iter().map(CreditApplicationView::from).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => credit_failure(err),
    }
}

fn affiliate_response(status: StatusCode, affiliate: &Affiliate) -> Response {
    (status, Json(AffiliateView::from(affiliate))).into_response()
}

fn application_response(status: StatusCode, application: &CreditApplication) -> Response {
    (status, Json(CreditApplicationView::from(application))).into_response()
}

fn domain_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::IllegalTransition { .. } => StatusCode::CONFLICT,
    }
}

fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict | RepositoryError::Unavailable(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn affiliate_failure(err: AffiliateServiceError) -> Response {
    let status = match &err {
        AffiliateServiceError::Domain(domain) => domain_status(domain),
        AffiliateServiceError::Duplicate(_) => StatusCode::CONFLICT,
        AffiliateServiceError::NotFound(_) | AffiliateServiceError::UnknownDocument(_) => {
            StatusCode::NOT_FOUND
        }
        AffiliateServiceError::Repository(repository) => repository_status(repository),
    };
    failure(status, err.to_string(), err.code())
}

fn credit_failure(err: CreditApplicationError) -> Response {
    let status = match &err {
        CreditApplicationError::Domain(domain) => domain_status(domain),
        CreditApplicationError::AffiliateNotFound(_)
        | CreditApplicationError::UnknownDocument(_)
        | CreditApplicationError::NotFound(_) => StatusCode::NOT_FOUND,
        CreditApplicationError::RiskCentral(risk) if risk.is_timeout() => {
            StatusCode::GATEWAY_TIMEOUT
        }
        CreditApplicationError::RiskCentral(_) => StatusCode::BAD_GATEWAY,
        CreditApplicationError::Repository(repository) => repository_status(repository),
    };
    failure(status, err.to_string(), err.code())
}

fn malformed_body(rejection: JsonRejection) -> Response {
    failure(
        StatusCode::UNPROCESSABLE_ENTITY,
        rejection.body_text(),
        "VALIDATION_ERROR",
    )
}

fn failure(status: StatusCode, message: String, code: &'static str) -> Response {
    let payload = json!({
        "error": message,
        "code": code,
    });
    (status, Json(payload)).into_response()
}
