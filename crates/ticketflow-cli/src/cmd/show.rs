//! `tf show`: one ticket card.

use clap::Args;
use std::path::Path;
use ticketflow_core::{KeyValueStore, Ticket, TicketStore, TicketflowError};

use crate::cmd::{open_app, report};
use crate::output::{OutputMode, render_item};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Ticket ID.
    pub id: String,
}

/// Look up `id`, or the not-found error for it.
pub fn find_ticket<'a, S: KeyValueStore>(
    store: &'a TicketStore<S>,
    id: &str,
) -> Result<&'a Ticket, TicketflowError> {
    store
        .get(id.trim())
        .ok_or_else(|| TicketflowError::TicketNotFound { id: id.to_string() })
}

pub fn run_show(args: &ShowArgs, output: OutputMode, project_dir: &Path) -> anyhow::Result<()> {
    let mut app = open_app(project_dir, output)?;
    let store = match app.authorized_tickets() {
        Ok(store) => store,
        Err(err) => return report(output, &err),
    };
    match find_ticket(store, &args.id) {
        Ok(ticket) => Ok(render_item(ticket, output)?),
        Err(err) => report(output, &err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketflow_core::MemoryStorage;

    #[test]
    fn finds_seed_ticket_ignoring_whitespace() {
        let store = TicketStore::load(MemoryStorage::new(), true).expect("load");
        let ticket = find_ticket(&store, " 2 ").expect("found");
        assert_eq!(ticket.title, "Update dashboard UI");
    }

    #[test]
    fn missing_ticket_is_not_found() {
        let store = TicketStore::load(MemoryStorage::new(), true).expect("load");
        let err = find_ticket(&store, "999").expect_err("missing");
        assert!(matches!(err, TicketflowError::TicketNotFound { ref id } if id == "999"));
    }
}
