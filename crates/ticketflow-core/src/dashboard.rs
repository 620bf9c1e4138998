//! Aggregates shown on the dashboard page.

use crate::model::{Status, Ticket};
use serde::Serialize;

/// Default number of tickets listed under "Recent Activity".
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Ticket counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TicketStats {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub closed: usize,
}

impl TicketStats {
    #[must_use]
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        tickets.iter().fold(
            Self {
                total: tickets.len(),
                ..Self::default()
            },
            |mut stats, ticket| {
                match ticket.status {
                    Status::Open => stats.open += 1,
                    Status::InProgress => stats.in_progress += 1,
                    Status::Closed => stats.closed += 1,
                }
                stats
            },
        )
    }
}

/// The newest `limit` tickets (the collection is kept newest first).
#[must_use]
pub fn recent(tickets: &[Ticket], limit: usize) -> &[Ticket] {
    &tickets[..tickets.len().min(limit)]
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub stats: TicketStats,
    pub recent: Vec<Ticket>,
}

impl DashboardSummary {
    #[must_use]
    pub fn build(tickets: &[Ticket], recent_limit: usize) -> Self {
        Self {
            stats: TicketStats::from_tickets(tickets),
            recent: recent(tickets, recent_limit).to_vec(),
        }
    }
}
