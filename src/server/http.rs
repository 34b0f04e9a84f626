//! HTTP API
//!
//! JSON endpoints over a shared [`PollStore`]. Every response uses the
//! [`ApiResponse`] envelope.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::polls::{
    Ballot, OptionId, Poll, PollDraft, PollError, PollFilter, PollId, PollStore, PollStoreStats,
    PollTally, VoteDelta,
};

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<PollStore>,
}

/// API response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        })
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub stats: PollStoreStats,
}

/// Body of `POST /api/polls`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    #[serde(flatten)]
    pub draft: PollDraft,
    pub created_by: String,
}

/// Body of `POST /api/polls/{poll_id}/votes`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub voter_id: String,
    pub option_id: OptionId,
}

/// Handler errors, rendered in the [`ApiResponse`] envelope
#[derive(Debug)]
pub enum ApiError {
    /// Domain error from the poll core
    Poll(PollError),
    /// Request that could not be extracted (bad id, body or query)
    Rejected {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Poll(PollError::PollNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Poll(PollError::UnknownOption(_)) => StatusCode::BAD_REQUEST,
            Self::Poll(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Rejected { status, .. } => *status,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Poll(err) => err.code(),
            Self::Rejected { code, .. } => *code,
        }
    }
}

impl From<PollError> for ApiError {
    fn from(err: PollError) -> Self {
        Self::Poll(err)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected {
            status: StatusCode::BAD_REQUEST,
            code: "invalid_id",
            message: rejection.body_text(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            code: "invalid_body",
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected {
            status: StatusCode::BAD_REQUEST,
            code: "invalid_query",
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match self {
            Self::Poll(err) => err.to_string(),
            Self::Rejected { message, .. } => message,
        };
        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message),
            code: Some(code.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

/// `Path` whose rejection uses the API envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// `Query` whose rejection uses the API envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// `Json` body whose rejection uses the API envelope
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Create the API router with shared state
pub fn create_router(store: Arc<PollStore>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/polls", post(create_poll_handler).get(list_polls_handler))
        .route(
            "/api/polls/{poll_id}",
            get(get_poll_handler).delete(delete_poll_handler),
        )
        .route("/api/polls/{poll_id}/votes", post(vote_handler))
        .route("/api/polls/{poll_id}/tally", get(tally_handler))
        .route(
            "/api/polls/{poll_id}/ballots/{voter_id}",
            get(ballot_handler),
        )
        .route(
            "/api/polls/{poll_id}/options/{option_id}/voters",
            get(voters_handler),
        )
        .with_state(AppState { store })
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        stats: state.store.stats(),
    })
}

async fn create_poll_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreatePollRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Poll>>), ApiError> {
    let poll = state
        .store
        .create_poll(&request.draft, request.created_by)?;
    Ok((StatusCode::CREATED, ApiResponse::ok(poll)))
}

async fn list_polls_handler(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<PollFilter>,
) -> Json<ApiResponse<Vec<Poll>>> {
    ApiResponse::ok(state.store.list_polls(Some(&filter)))
}

async fn get_poll_handler(
    State(state): State<AppState>,
    ApiPath(poll_id): ApiPath<PollId>,
) -> ApiResult<Poll> {
    let poll = state
        .store
        .get_poll(poll_id)
        .ok_or(PollError::PollNotFound(poll_id))?;
    Ok(ApiResponse::ok(poll))
}

async fn delete_poll_handler(
    State(state): State<AppState>,
    ApiPath(poll_id): ApiPath<PollId>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_poll(poll_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(PollError::PollNotFound(poll_id).into())
    }
}

async fn vote_handler(
    State(state): State<AppState>,
    ApiPath(poll_id): ApiPath<PollId>,
    ApiJson(request): ApiJson<VoteRequest>,
) -> ApiResult<VoteDelta> {
    let delta = state
        .store
        .apply_vote(poll_id, &request.voter_id, request.option_id)?;
    Ok(ApiResponse::ok(delta))
}

async fn tally_handler(
    State(state): State<AppState>,
    ApiPath(poll_id): ApiPath<PollId>,
) -> ApiResult<PollTally> {
    Ok(ApiResponse::ok(state.store.tally(poll_id)?))
}

async fn ballot_handler(
    State(state): State<AppState>,
    ApiPath((poll_id, voter_id)): ApiPath<(PollId, String)>,
) -> ApiResult<Ballot> {
    Ok(ApiResponse::ok(state.store.ballot(poll_id, &voter_id)?))
}

async fn voters_handler(
    State(state): State<AppState>,
    ApiPath((poll_id, option_id)): ApiPath<(PollId, OptionId)>,
) -> ApiResult<Vec<String>> {
    Ok(ApiResponse::ok(state.store.voters_for(poll_id, option_id)?))
}
