//! `tf status`: session state and the page currently shown.

use serde::Serialize;
use std::io::Write;
use std::path::Path;
use ticketflow_core::Page;

use crate::cmd::open_app;
use crate::output::{OutputMode, pretty_kv, pretty_section, render};

#[derive(Debug, Serialize)]
struct StatusOutput {
    authenticated: bool,
    current_page: Page,
    showing: Page,
    tickets: usize,
    storage: String,
}

pub fn run_status(output: OutputMode, project_dir: &Path) -> anyhow::Result<()> {
    let app = open_app(project_dir, output)?;
    let session = app.session();
    let result = StatusOutput {
        authenticated: session.is_authenticated(),
        current_page: session.current_page(),
        showing: session.view(),
        tickets: app.tickets().len(),
        storage: app.tickets().storage().path().display().to_string(),
    };

    render(output, &result, |r, w| match output {
        OutputMode::Pretty => write_pretty(r, w),
        _ => write_text(r, w),
    })
}

fn write_pretty(result: &StatusOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Session")?;
    pretty_kv(
        w,
        "Logged in",
        if result.authenticated { "yes" } else { "no" },
    )?;
    pretty_kv(w, "Page", result.current_page.as_str())?;
    if result.showing != result.current_page {
        pretty_kv(w, "Showing", result.showing.as_str())?;
    }
    pretty_kv(w, "Tickets", result.tickets.to_string())?;
    pretty_kv(w, "Storage", &result.storage)
}

fn write_text(result: &StatusOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "authenticated={} page={} showing={} tickets={}",
        result.authenticated, result.current_page, result.showing, result.tickets
    )
}
