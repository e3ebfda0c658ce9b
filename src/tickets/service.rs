use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::export;
use super::filter::{visible_tickets, TicketFilter};
use super::store::TicketStore;
use super::{CreateTicketRequest, Ticket, TicketComment, TicketStats, TicketStatus};
use crate::directory::UserRole;
use crate::security::Viewer;
use crate::shared::error::TicketError;

/// Ticket lifecycle controller: the sole mutator of the ticket store. Every
/// operation validates its input, applies a single-record patch and logs a
/// confirmation. Reads go through the filter engine so role gating is
/// enforced uniformly no matter which endpoint asks.
#[derive(Clone, Default)]
pub struct TicketService {
    store: TicketStore,
}

impl TicketService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &TicketStore {
        &self.store
    }

    pub async fn submit_ticket(
        &self,
        viewer: &Viewer,
        req: CreateTicketRequest,
    ) -> Result<Ticket, TicketError> {
        let title = req.title.trim();
        let description = req.description.trim();
        let category = req.category.trim();
        if title.is_empty() {
            return Err(TicketError::Validation("title is required".into()));
        }
        if description.is_empty() {
            return Err(TicketError::Validation("description is required".into()));
        }
        if category.is_empty() {
            return Err(TicketError::Validation("category is required".into()));
        }

        let now = Utc::now();
        let ticket = Ticket {
            id: Uuid::new_v4(),
            ticket_number: String::new(),
            title: title.to_string(),
            description: description.to_string(),
            priority: req.priority.unwrap_or_default(),
            category: category.to_string(),
            status: TicketStatus::Open,
            submitted_by: viewer.identity.clone(),
            assigned_to: None,
            equipment_number: req.equipment_number,
            location: req.location,
            attachments: req.attachments.unwrap_or_default(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let ticket = self.store.insert(ticket).await;
        info!(
            "ticket {} submitted by {}",
            ticket.ticket_number, ticket.submitted_by
        );

        Ok(ticket)
    }

    /// Sets the status label. Any enumerated status is accepted from any
    /// prior status; triage here is labeling, not a workflow gate.
    pub async fn change_status(
        &self,
        viewer: &Viewer,
        id: Uuid,
        status: TicketStatus,
    ) -> Result<Ticket, TicketError> {
        viewer.require_staff()?;

        let ticket = self.store.update(id, |t| t.status = status).await?;
        info!(
            "ticket {} status set to {} by {}",
            ticket.ticket_number,
            status.as_str(),
            viewer.identity
        );

        Ok(ticket)
    }

    /// Assigns the ticket, overwriting any prior assignee (last write wins).
    /// The assignee is not checked against the directory.
    pub async fn assign_ticket(
        &self,
        viewer: &Viewer,
        id: Uuid,
        assignee: &str,
    ) -> Result<Ticket, TicketError> {
        viewer.require_staff()?;

        let assignee = assignee.trim();
        if assignee.is_empty() {
            return Err(TicketError::Validation("assignee is required".into()));
        }

        let assignee = assignee.to_string();
        let ticket = self
            .store
            .update(id, |t| t.assigned_to = Some(assignee.clone()))
            .await?;
        info!(
            "ticket {} assigned to {} by {}",
            ticket.ticket_number,
            ticket.assigned_to.as_deref().unwrap_or_default(),
            viewer.identity
        );

        Ok(ticket)
    }

    /// Appends a comment. The internal flag is re-checked against the caller
    /// role rather than trusted: client callers always produce visible
    /// comments.
    pub async fn add_comment(
        &self,
        viewer: &Viewer,
        id: Uuid,
        content: &str,
        is_internal: bool,
    ) -> Result<TicketComment, TicketError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(TicketError::Validation("content is required".into()));
        }

        let comment = TicketComment {
            id: Uuid::new_v4(),
            author: viewer.identity.clone(),
            content: content.to_string(),
            timestamp: Utc::now(),
            is_internal: is_internal && viewer.is_staff(),
        };

        let appended = comment.clone();
        let ticket = self
            .store
            .update(id, move |t| t.comments.push(appended))
            .await?;
        info!(
            "comment added to ticket {} by {}",
            ticket.ticket_number, viewer.identity
        );

        Ok(comment)
    }

    /// Fetches one ticket for the viewer. Clients can only reach their own
    /// submissions, and internal comments are stripped from what they get;
    /// an off-limits ticket is indistinguishable from a missing one.
    pub async fn get_ticket_for(&self, viewer: &Viewer, id: Uuid) -> Result<Ticket, TicketError> {
        let ticket = self.store.get(id).await.ok_or(TicketError::NotFound(id))?;

        if viewer.role == UserRole::Client && ticket.submitted_by != viewer.identity {
            return Err(TicketError::NotFound(id));
        }

        Ok(ticket.redacted_for(viewer.role))
    }

    pub async fn list_comments_for(
        &self,
        viewer: &Viewer,
        id: Uuid,
    ) -> Result<Vec<TicketComment>, TicketError> {
        let ticket = self.get_ticket_for(viewer, id).await?;
        Ok(ticket.comments)
    }

    /// Lists the viewer's visible subset through the filter engine, in store
    /// order, with internal comments redacted for clients.
    pub async fn list_for(
        &self,
        viewer: &Viewer,
        filter: &TicketFilter,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Vec<Ticket> {
        let snapshot = self.store.snapshot().await;
        let visible = visible_tickets(&snapshot, viewer, filter, Utc::now());

        visible
            .into_iter()
            .skip(offset.unwrap_or(0))
            .take(limit.unwrap_or(usize::MAX))
            .map(|t| t.redacted_for(viewer.role))
            .collect()
    }

    /// Dashboard counters over the viewer's visible set. "mine" counts own
    /// submissions for clients and own assignments for it-staff.
    pub async fn stats_for(&self, viewer: &Viewer) -> TicketStats {
        let visible = self
            .list_for(viewer, &TicketFilter::default(), None, None)
            .await;

        let count = |status: TicketStatus| visible.iter().filter(|t| t.status == status).count();

        TicketStats {
            total: visible.len(),
            open: count(TicketStatus::Open),
            in_progress: count(TicketStatus::InProgress),
            resolved: count(TicketStatus::Resolved),
            closed: count(TicketStatus::Closed),
            mine: match viewer.role {
                UserRole::Client => visible
                    .iter()
                    .filter(|t| t.submitted_by == viewer.identity)
                    .count(),
                UserRole::ItStaff => visible
                    .iter()
                    .filter(|t| t.assigned_to.as_deref() == Some(viewer.identity.as_str()))
                    .count(),
            },
        }
    }

    /// Serializes the viewer's filtered subset as CSV. An empty subset is
    /// refused so no empty file is ever produced.
    pub async fn export_for(
        &self,
        viewer: &Viewer,
        filter: &TicketFilter,
    ) -> Result<Vec<u8>, TicketError> {
        let visible = self.list_for(viewer, filter, None, None).await;
        if visible.is_empty() {
            return Err(TicketError::NothingToExport);
        }

        export::write_csv(&visible).map_err(TicketError::Export)
    }
}
