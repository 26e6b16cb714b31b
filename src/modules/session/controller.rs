use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::modules::session::{
    manager::SendOutcome,
    model::{ChatSession, Message},
    schema::{
        ApiMessage, MessageResponse, QuickQuestionsResponse, RenameSessionRequest,
        SelectSessionRequest, SendMessageRequest, SendResponse, SessionListResponse,
        SessionResponse, SessionSummary, StatusResponse,
    },
    store::SendRejection,
};
use crate::AppState;

pub const QUICK_QUESTIONS: &[&str] = &[
    "How many vehicles are there in total?",
    "How many allocated vehicles?",
    "Show me spare vehicles",
    "List all drivers",
    "What vehicles need maintenance?",
];

type ApiError = (StatusCode, Json<ApiMessage>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ApiMessage { message: message.into() }))
}

fn not_found() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "Session not found")
}

fn to_message_response(m: &Message) -> MessageResponse {
    MessageResponse {
        id: m.id.clone(),
        role: m.role.as_str().to_string(),
        content: m.content.clone(),
        message_type: m.kind.as_str().to_string(),
        time: m.time_label(),
        created_at: m.created_at.to_rfc3339(),
    }
}

fn to_session_response(s: &ChatSession, active: bool) -> SessionResponse {
    SessionResponse {
        id: s.id.clone(),
        title: s.title.clone(),
        messages: s.messages.iter().map(to_message_response).collect(),
        message_count: s.messages.len(),
        active,
        created_at: s.created_at.to_rfc3339(),
    }
}

fn to_session_summary(s: &ChatSession, active: bool) -> SessionSummary {
    SessionSummary {
        id: s.id.clone(),
        title: s.title.clone(),
        message_count: s.messages.len(),
        active,
        created_at: s.created_at.to_rfc3339(),
    }
}

pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionListResponse> {
    let snapshot = state.sessions.snapshot().await;
    let active = snapshot.active_session_id.as_deref();

    Json(SessionListResponse {
        data: snapshot
            .sessions
            .iter()
            .map(|s| to_session_summary(s, active == Some(s.id.as_str())))
            .collect(),
        total: snapshot.sessions.len(),
        active_session_id: snapshot.active_session_id.clone(),
    })
}

pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let session = state.sessions.create().await;
    (StatusCode::CREATED, Json(to_session_response(&session, true)))
}

pub async fn clear_sessions(State(state): State<AppState>) -> Json<ApiMessage> {
    state.sessions.clear().await;
    Json(ApiMessage { message: "All sessions cleared".to_string() })
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.sessions.session(&id).await.ok_or_else(not_found)?;
    let active = state.sessions.active_session_id().await.as_deref() == Some(id.as_str());

    Ok(Json(to_session_response(&session, active)))
}

pub async fn rename_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RenameSessionRequest>,
) -> Result<Json<SessionSummary>, ApiError> {
    if let Err(e) = payload.validate() {
        return Err(api_error(StatusCode::BAD_REQUEST, e.to_string()));
    }

    if !state.sessions.rename(&id, payload.title).await {
        return Err(not_found());
    }

    let session = state.sessions.session(&id).await.ok_or_else(not_found)?;
    let active = state.sessions.active_session_id().await.as_deref() == Some(id.as_str());

    Ok(Json(to_session_summary(&session, active)))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiMessage>, ApiError> {
    if state.sessions.delete(&id).await {
        Ok(Json(ApiMessage { message: "Deleted successfully".to_string() }))
    } else {
        Err(not_found())
    }
}

pub async fn select_session(
    State(state): State<AppState>,
    Json(payload): Json<SelectSessionRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    if let Err(e) = payload.validate() {
        return Err(api_error(StatusCode::BAD_REQUEST, e.to_string()));
    }

    if !state.sessions.select(&payload.session_id).await {
        return Err(not_found());
    }

    Ok(Json(StatusResponse {
        processing: state.sessions.is_processing().await,
        active_session_id: Some(payload.session_id),
    }))
}

pub async fn send_message(
    State(state): State<AppState>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<SendResponse>, ApiError> {
    if let Err(e) = payload.validate() {
        return Err(api_error(StatusCode::BAD_REQUEST, e.to_string()));
    }

    match state.sessions.send(&payload.text).await {
        SendOutcome::Sent {
            session_id,
            message,
            reply,
        } => Ok(Json(SendResponse {
            session_id,
            message: to_message_response(&message),
            response: to_message_response(&reply),
        })),
        SendOutcome::Rejected(rejection) => {
            let status = match rejection {
                SendRejection::EmptyMessage => StatusCode::BAD_REQUEST,
                SendRejection::Busy | SendRejection::NoActiveSession => StatusCode::CONFLICT,
            };
            Err(api_error(status, rejection.describe()))
        }
    }
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        processing: state.sessions.is_processing().await,
        active_session_id: state.sessions.active_session_id().await,
    })
}

pub async fn quick_questions() -> Json<QuickQuestionsResponse> {
    Json(QuickQuestionsResponse {
        data: QUICK_QUESTIONS.iter().map(|q| q.to_string()).collect(),
    })
}
