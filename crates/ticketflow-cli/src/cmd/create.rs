//! `tf create`: create a new ticket.

use clap::Args;
use std::path::Path;
use ticketflow_core::validate::{ValidationError, parse_priority, parse_status, validate_ticket};
use ticketflow_core::{Priority, Status, TicketDraft, TicketflowError};

use crate::cmd::{open_app, reject_form, reject_value, report};
use crate::output::{OutputMode, render_item, render_success};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Title of the new ticket.
    #[arg(short, long, default_value = "")]
    pub title: String,

    /// Description text.
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Status: open, in_progress, closed.
    #[arg(short, long, default_value = "open")]
    pub status: String,

    /// Priority: low, medium, high.
    #[arg(short, long, default_value = "medium")]
    pub priority: String,
}

impl CreateArgs {
    /// Build the trimmed draft, or the first rejected enum value.
    fn draft(&self) -> Result<TicketDraft, ValidationError> {
        let status: Status = parse_status(&self.status)?;
        let priority: Priority = parse_priority(&self.priority)?;
        Ok(TicketDraft::new(self.title.as_str())
            .with_description(self.description.as_str())
            .with_status(status)
            .with_priority(priority)
            .trimmed())
    }
}

pub fn run_create(args: &CreateArgs, output: OutputMode, project_dir: &Path) -> anyhow::Result<()> {
    let draft = match args.draft() {
        Ok(draft) => draft,
        Err(err) => return reject_value(output, &err),
    };
    if let Err(errors) = validate_ticket(&draft) {
        return reject_form(output, &errors);
    }

    let mut app = open_app(project_dir, output)?;
    let store = match app.authorized_tickets() {
        Ok(store) => store,
        Err(err) => return report(output, &err),
    };
    let ticket = match store.add(draft) {
        Ok(ticket) => ticket,
        Err(err) => return report(output, &TicketflowError::from(err)),
    };

    if output.is_json() {
        render_item(&ticket, output)?;
    } else {
        render_success(output, "Ticket created successfully!")?;
        render_item(&ticket, output)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: CreateArgs,
    }

    #[test]
    fn create_args_defaults() {
        let w = Wrapper::parse_from(["test", "--title", "  Fix it  "]);
        let draft = w.args.draft().expect("draft");
        assert_eq!(draft.title, "Fix it");
        assert_eq!(draft.status, Status::Open);
        assert_eq!(draft.priority, Priority::Medium);
        assert!(draft.description.is_empty());
    }

    #[test]
    fn create_args_accept_human_spellings() {
        let w = Wrapper::parse_from([
            "test",
            "-t",
            "Fix it",
            "--status",
            "In Progress",
            "--priority",
            "HIGH",
        ]);
        let draft = w.args.draft().expect("draft");
        assert_eq!(draft.status, Status::InProgress);
        assert_eq!(draft.priority, Priority::High);
    }

    #[test]
    fn unknown_priority_is_rejected() {
        let w = Wrapper::parse_from(["test", "-t", "x", "--priority", "urgent"]);
        let err = w.args.draft().expect_err("invalid priority");
        assert_eq!(err.code, "invalid_priority");
    }

    #[test]
    fn blank_title_fails_before_storage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let w = Wrapper::parse_from(["test", "-t", "   "]);
        assert!(run_create(&w.args, OutputMode::Json, dir.path()).is_err());
        assert!(!dir.path().join("storage.json").exists());
    }
}
