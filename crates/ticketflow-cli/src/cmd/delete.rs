//! `tf delete`: remove a ticket after confirmation.

use clap::Args;
use serde::Serialize;
use std::io::{IsTerminal, Write};
use std::path::Path;
use ticketflow_core::TicketflowError;

use crate::cmd::show::find_ticket;
use crate::cmd::{open_app, report};
use crate::output::{CliError, OutputMode, fail, render, render_success};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Ticket ID to delete.
    pub id: String,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct DeleteOutput {
    id: String,
    deleted: bool,
}

/// Ask on the terminal; non-interactive runs are treated as confirmed.
fn confirm_delete(id: &str, title: &str) -> anyhow::Result<bool> {
    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        return Ok(true);
    }

    eprint!("Are you sure you want to delete ticket {id} '{title}'? [y/N] ");
    std::io::stderr().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(is_yes(&input))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub fn run_delete(args: &DeleteArgs, output: OutputMode, project_dir: &Path) -> anyhow::Result<()> {
    let mut app = open_app(project_dir, output)?;
    let store = match app.authorized_tickets() {
        Ok(store) => store,
        Err(err) => return report(output, &err),
    };
    let (id, title) = match find_ticket(store, &args.id) {
        Ok(ticket) => (ticket.id.clone(), ticket.title.clone()),
        Err(err) => return report(output, &err),
    };

    if !args.force && !confirm_delete(&id, &title)? {
        return fail(output, &CliError::new(format!("deletion of '{id}' cancelled")));
    }

    let deleted = match store.delete(&id) {
        Ok(deleted) => deleted,
        Err(err) => return report(output, &TicketflowError::from(err)),
    };

    if output.is_json() {
        render(output, &DeleteOutput { id, deleted }, |_, _| Ok(()))
    } else {
        render_success(output, "Ticket deleted successfully!")
    }
}
