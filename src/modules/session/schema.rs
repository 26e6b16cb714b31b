use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RenameSessionRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SelectSessionRequest {
    #[validate(length(min = 1, message = "Session ID cannot be empty"))]
    pub session_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub text: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct MessageResponse {
    pub id: String,
    pub role: String,
    pub content: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub time: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub title: String,
    pub messages: Vec<MessageResponse>,
    pub message_count: usize,
    pub active: bool,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub message_count: usize,
    pub active: bool,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub data: Vec<SessionSummary>,
    pub active_session_id: Option<String>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub session_id: String,
    pub message: MessageResponse,
    pub response: MessageResponse,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub processing: bool,
    pub active_session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuickQuestionsResponse {
    pub data: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub message: String,
}
