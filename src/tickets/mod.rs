pub mod export;
pub mod filter;
pub mod service;
pub mod store;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::directory::UserRole;
use crate::security::Viewer;
use crate::shared::state::AppState;

use filter::{DateRange, TicketFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// File metadata captured at submission. The retrieval URL points at wherever
/// the client put the bytes; no storage backend sits behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub size: u64,
    pub media_type: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketComment {
    pub id: Uuid,
    pub author: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_internal: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub ticket_number: String,
    pub title: String,
    pub description: String,
    pub priority: TicketPriority,
    pub category: String,
    pub status: TicketStatus,
    pub submitted_by: String,
    pub assigned_to: Option<String>,
    pub equipment_number: Option<String>,
    pub location: Option<String>,
    pub attachments: Vec<Attachment>,
    pub comments: Vec<TicketComment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Copy of the record as the given role may see it: internal comments are
    /// stripped for clients, it-staff get the record as stored.
    pub fn redacted_for(&self, role: UserRole) -> Ticket {
        match role {
            UserRole::ItStaff => self.clone(),
            UserRole::Client => {
                let mut ticket = self.clone();
                ticket.comments.retain(|c| !c.is_internal);
                ticket
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub title: String,
    pub description: String,
    pub priority: Option<TicketPriority>,
    pub category: String,
    pub equipment_number: Option<String>,
    pub location: Option<String>,
    pub attachments: Option<Vec<Attachment>>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: TicketStatus,
}

#[derive(Debug, Deserialize)]
pub struct AssignTicketRequest {
    pub assignee: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub is_internal: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub category: Option<String>,
    pub assigned_to: Option<String>,
    pub date_range: Option<DateRange>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ListQuery {
    fn into_filter(self) -> (TicketFilter, Option<usize>, Option<usize>) {
        let filter = TicketFilter {
            status: self.status,
            priority: self.priority,
            category: self.category,
            assigned_to: self.assigned_to,
            search: self.search,
            date_range: self.date_range,
        };
        (filter, self.limit, self.offset)
    }
}

#[derive(Debug, Serialize)]
pub struct TicketStats {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub closed: usize,
    pub mine: usize,
}

pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Json(req): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<Ticket>), (StatusCode, String)> {
    let ticket = state.tickets.submit_ticket(&viewer, req).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Ticket>>, (StatusCode, String)> {
    let (filter, limit, offset) = query.into_filter();
    let tickets = state.tickets.list_for(&viewer, &filter, limit, offset).await;
    Ok(Json(tickets))
}

pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
) -> Result<Json<Ticket>, (StatusCode, String)> {
    let ticket = state.tickets.get_ticket_for(&viewer, id).await?;
    Ok(Json(ticket))
}

pub async fn change_status(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<Ticket>, (StatusCode, String)> {
    let ticket = state.tickets.change_status(&viewer, id, req.status).await?;
    Ok(Json(ticket))
}

pub async fn assign_ticket(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignTicketRequest>,
) -> Result<Json<Ticket>, (StatusCode, String)> {
    let ticket = state.tickets.assign_ticket(&viewer, id, &req.assignee).await?;
    Ok(Json(ticket))
}

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<TicketComment>), (StatusCode, String)> {
    let comment = state
        .tickets
        .add_comment(&viewer, id, &req.content, req.is_internal.unwrap_or(false))
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TicketComment>>, (StatusCode, String)> {
    let comments = state.tickets.list_comments_for(&viewer, id).await?;
    Ok(Json(comments))
}

pub async fn get_ticket_stats(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
) -> Result<Json<TicketStats>, (StatusCode, String)> {
    let stats = state.tickets.stats_for(&viewer).await;
    Ok(Json(stats))
}

pub async fn export_tickets(
    State(state): State<Arc<AppState>>,
    viewer: Viewer,
    Query(query): Query<ListQuery>,
) -> Result<Response, (StatusCode, String)> {
    let (filter, _, _) = query.into_filter();
    let bytes = state.tickets.export_for(&viewer, &filter).await?;
    let filename = export::export_filename(Utc::now());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from(bytes))
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Response error: {e}")))
}

pub fn configure_tickets_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tickets", get(list_tickets).post(create_ticket))
        .route("/api/tickets/stats", get(get_ticket_stats))
        .route("/api/tickets/export", get(export_tickets))
        .route("/api/tickets/:id", get(get_ticket))
        .route("/api/tickets/:id/status", put(change_status))
        .route("/api/tickets/:id/assign", put(assign_ticket))
        .route("/api/tickets/:id/comments", get(list_comments).post(add_comment))
}
