//! `tf update`: edit a ticket.
//!
//! Flags left out keep the ticket's current value. The merged ticket goes
//! through the same title check as the edit dialog and replaces every field
//! but the id. Unlike `tf create`, values are stored as given.

use clap::Args;
use std::path::Path;
use ticketflow_core::validate::{ValidationError, parse_priority, parse_status, validate_ticket};
use ticketflow_core::{Ticket, TicketDraft, TicketflowError};

use crate::cmd::show::find_ticket;
use crate::cmd::{open_app, reject_form, reject_value, report};
use crate::output::{CliError, OutputMode, fail, render_item, render_success};

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Ticket ID to update.
    pub id: String,

    /// New title.
    #[arg(short, long)]
    pub title: Option<String>,

    /// New description (pass an empty string to clear).
    #[arg(short, long)]
    pub description: Option<String>,

    /// New status: open, in_progress, closed.
    #[arg(short, long)]
    pub status: Option<String>,

    /// New priority: low, medium, high.
    #[arg(short, long)]
    pub priority: Option<String>,
}

impl UpdateArgs {
    const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }

    /// Overlay the given flags on `current`.
    fn merge(&self, current: &Ticket) -> Result<TicketDraft, ValidationError> {
        let mut draft = current.to_draft();
        if let Some(title) = &self.title {
            draft.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            draft.description.clone_from(description);
        }
        if let Some(status) = &self.status {
            draft.status = parse_status(status)?;
        }
        if let Some(priority) = &self.priority {
            draft.priority = parse_priority(priority)?;
        }
        Ok(draft)
    }
}

pub fn run_update(args: &UpdateArgs, output: OutputMode, project_dir: &Path) -> anyhow::Result<()> {
    if args.is_empty() {
        return fail(
            output,
            &CliError::with_details(
                "no fields specified",
                "use --title, --description, --status, or --priority",
                "no_fields",
            ),
        );
    }

    let mut app = open_app(project_dir, output)?;
    let store = match app.authorized_tickets() {
        Ok(store) => store,
        Err(err) => return report(output, &err),
    };
    let (id, merged) = match find_ticket(store, &args.id) {
        Ok(ticket) => (ticket.id.clone(), args.merge(ticket)),
        Err(err) => return report(output, &err),
    };
    let draft = match merged {
        Ok(draft) => draft,
        Err(err) => return reject_value(output, &err),
    };
    if let Err(errors) = validate_ticket(&draft) {
        return reject_form(output, &errors);
    }

    if let Err(err) = store.update(&id, draft) {
        return report(output, &TicketflowError::from(err));
    }
    let Some(ticket) = store.get(&id) else {
        return report(output, &TicketflowError::TicketNotFound { id });
    };

    if !output.is_json() {
        render_success(output, "Ticket updated successfully!")?;
    }
    render_item(ticket, output)?;
    Ok(())
}
