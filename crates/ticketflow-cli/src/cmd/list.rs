//! `tf list`: all tickets, newest first.

use serde::Serialize;
use std::path::Path;
use ticketflow_core::Ticket;

use crate::cmd::{open_app, report};
use crate::output::{OutputMode, render, render_list_to};

#[derive(Debug, Serialize)]
struct ListOutput<'a> {
    tickets: &'a [Ticket],
    total: usize,
}

pub fn run_list(output: OutputMode, project_dir: &Path) -> anyhow::Result<()> {
    let mut app = open_app(project_dir, output)?;
    let tickets = match app.authorized_tickets() {
        Ok(store) => store.list(),
        Err(err) => return report(output, &err),
    };

    let result = ListOutput {
        tickets,
        total: tickets.len(),
    };
    render(output, &result, |r, w| {
        if r.tickets.is_empty() {
            return writeln!(w, "No tickets found. Create your first ticket to get started!");
        }
        render_list_to(r.tickets, output, w)
    })
}
