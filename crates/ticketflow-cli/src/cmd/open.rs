//! `tf open`: navigate to a page.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use ticketflow_core::validate::parse_page;
use ticketflow_core::{Page, TicketflowError};

use crate::cmd::{open_app, reject_value, report};
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct OpenArgs {
    /// Page to open: landing, login, signup, dashboard, tickets.
    pub page: String,
}

#[derive(Debug, Serialize)]
struct OpenOutput {
    requested: Page,
    showing: Page,
}

pub fn run_open(args: &OpenArgs, output: OutputMode, project_dir: &Path) -> anyhow::Result<()> {
    let page = match parse_page(&args.page) {
        Ok(page) => page,
        Err(err) => return reject_value(output, &err),
    };

    let mut app = open_app(project_dir, output)?;
    let showing = match app.open_page(page) {
        Ok(showing) => showing,
        Err(err) => return report(output, &TicketflowError::from(err)),
    };

    let result = OpenOutput {
        requested: page,
        showing,
    };
    render(output, &result, write_open)
}

fn write_open(result: &OpenOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if result.requested == result.showing {
        writeln!(w, "Showing {}", result.showing)
    } else {
        writeln!(
            w,
            "{} requires login; showing {}",
            result.requested, result.showing
        )
    }
}
