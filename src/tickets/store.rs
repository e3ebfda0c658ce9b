use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Ticket;
use crate::shared::error::TicketError;

/// Authoritative in-memory ticket collection, most-recent-first. The store
/// lives for the process lifetime; there is no delete operation, records only
/// ever accumulate and mutate in place.
#[derive(Clone, Default)]
pub struct TicketStore {
    tickets: Arc<RwLock<Vec<Ticket>>>,
}

impl TicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends the ticket and assigns its sequential ticket number under the
    /// same write lock. The caller guarantees id uniqueness via generated
    /// identifiers; no duplicate check is performed here.
    pub async fn insert(&self, mut ticket: Ticket) -> Ticket {
        let mut tickets = self.tickets.write().await;
        ticket.ticket_number = format!("TKT-{:06}", tickets.len() + 1);
        tickets.insert(0, ticket.clone());
        ticket
    }

    pub async fn get(&self, id: Uuid) -> Option<Ticket> {
        let tickets = self.tickets.read().await;
        tickets.iter().find(|t| t.id == id).cloned()
    }

    /// Applies a single-record patch and stamps `updated_at`. The stamp never
    /// moves backwards, so `updated_at >= created_at` holds across mutations.
    pub async fn update<F>(&self, id: Uuid, patch: F) -> Result<Ticket, TicketError>
    where
        F: FnOnce(&mut Ticket),
    {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TicketError::NotFound(id))?;

        patch(ticket);
        ticket.updated_at = Utc::now().max(ticket.updated_at);

        Ok(ticket.clone())
    }

    pub async fn snapshot(&self) -> Vec<Ticket> {
        let tickets = self.tickets.read().await;
        tickets.clone()
    }

    pub async fn len(&self) -> usize {
        let tickets = self.tickets.read().await;
        tickets.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tickets::test_support::sample_ticket;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_insert_prepends() {
        let store = TicketStore::new();
        let first = store.insert(sample_ticket("First", "a@example.com")).await;
        let second = store.insert(sample_ticket("Second", "a@example.com")).await;

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id, second.id);
        assert_eq!(snapshot[1].id, first.id);
    }

    #[tokio::test]
    async fn test_ticket_numbers_are_sequential() {
        let store = TicketStore::new();
        let first = store.insert(sample_ticket("First", "a@example.com")).await;
        let second = store.insert(sample_ticket("Second", "a@example.com")).await;

        assert_eq!(first.ticket_number, "TKT-000001");
        assert_eq!(second.ticket_number, "TKT-000002");
    }

    #[tokio::test]
    async fn test_ids_stay_unique() {
        let store = TicketStore::new();
        for i in 0..50 {
            store
                .insert(sample_ticket(&format!("Ticket {i}"), "a@example.com"))
                .await;
        }

        let snapshot = store.snapshot().await;
        let ids: HashSet<_> = snapshot.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 50);
    }

    #[tokio::test]
    async fn test_update_stamps_updated_at() {
        let store = TicketStore::new();
        let ticket = store.insert(sample_ticket("Ticket", "a@example.com")).await;
        let before = ticket.updated_at;

        let updated = store
            .update(ticket.id, |t| t.assigned_to = Some("tech@example.com".into()))
            .await
            .expect("Update failed");

        assert_eq!(updated.assigned_to.as_deref(), Some("tech@example.com"));
        assert!(updated.updated_at >= before);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = TicketStore::new();
        let result = store.update(Uuid::new_v4(), |t| t.title = "changed".into()).await;
        assert!(matches!(result, Err(TicketError::NotFound(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_returns_record() {
        let store = TicketStore::new();
        let ticket = store.insert(sample_ticket("Ticket", "a@example.com")).await;

        let fetched = store.get(ticket.id).await.expect("Ticket not found");
        assert_eq!(fetched.id, ticket.id);
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }
}
