use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use super::{Ticket, TicketPriority, TicketStatus};
use crate::directory::UserRole;
use crate::security::Viewer;

/// Creation-date window, evaluated against `created_at` relative to the
/// evaluation time passed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRange {
    /// Same UTC calendar date as the evaluation time.
    Today,
    /// Created within the last 7 days.
    Week,
    /// Created within the last 30 days.
    Month,
}

/// Field-level predicates narrowing the ticket collection for display. Unset
/// fields always match; set fields are combined with logical AND.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub category: Option<String>,
    pub assigned_to: Option<String>,
    pub search: Option<String>,
    pub date_range: Option<DateRange>,
}

impl TicketFilter {
    pub fn matches(&self, ticket: &Ticket, now: DateTime<Utc>) -> bool {
        if let Some(status) = self.status {
            if ticket.status != status {
                return false;
            }
        }

        if let Some(priority) = self.priority {
            if ticket.priority != priority {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if ticket.category != *category {
                return false;
            }
        }

        if let Some(assigned_to) = &self.assigned_to {
            if ticket.assigned_to.as_deref() != Some(assigned_to.as_str()) {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = ticket.title.to_lowercase().contains(&needle)
                || ticket.description.to_lowercase().contains(&needle)
                || ticket.id.to_string().contains(search.as_str())
                || ticket.ticket_number.contains(search.as_str());
            if !hit {
                return false;
            }
        }

        if let Some(range) = self.date_range {
            let created = ticket.created_at;
            let hit = match range {
                DateRange::Today => created.date_naive() == now.date_naive(),
                DateRange::Week => created >= now - Duration::days(7),
                DateRange::Month => created >= now - Duration::days(30),
            };
            if !hit {
                return false;
            }
        }

        true
    }
}

/// Produces the viewer's visible subset. Role gating runs before the field
/// predicates: clients only ever see their own submissions, it-staff see the
/// unrestricted set. Preserves store order (most-recent-first) and never
/// mutates the input.
pub fn visible_tickets(
    tickets: &[Ticket],
    viewer: &Viewer,
    filter: &TicketFilter,
    now: DateTime<Utc>,
) -> Vec<Ticket> {
    tickets
        .iter()
        .filter(|t| viewer.role == UserRole::ItStaff || t.submitted_by == viewer.identity)
        .filter(|t| filter.matches(t, now))
        .cloned()
        .collect()
}
