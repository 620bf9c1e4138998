//! `tf dashboard`: ticket counts and recent activity.

use std::io::Write;
use std::path::Path;
use ticketflow_core::dashboard::DashboardSummary;

use crate::cmd::{open_app, report};
use crate::output::{OutputMode, pretty_kv, pretty_section, render, render_item_to};

pub fn run_dashboard(output: OutputMode, project_dir: &Path) -> anyhow::Result<()> {
    let app = open_app(project_dir, output)?;
    let summary = match app.dashboard() {
        Ok(summary) => summary,
        Err(err) => return report(output, &err),
    };

    render(output, &summary, |s, w| match output {
        OutputMode::Pretty => write_pretty(s, w),
        _ => write_text(s, w),
    })
}

fn write_pretty(summary: &DashboardSummary, w: &mut dyn Write) -> std::io::Result<()> {
    let stats = &summary.stats;
    pretty_section(w, "Dashboard")?;
    pretty_kv(w, "Total", stats.total.to_string())?;
    pretty_kv(w, "Open", stats.open.to_string())?;
    pretty_kv(w, "In progress", stats.in_progress.to_string())?;
    pretty_kv(w, "Closed", stats.closed.to_string())?;
    writeln!(w)?;

    pretty_section(w, "Recent activity")?;
    if summary.recent.is_empty() {
        return writeln!(w, "No tickets yet.");
    }
    for ticket in &summary.recent {
        render_item_to(ticket, OutputMode::Pretty, w)?;
    }
    Ok(())
}

fn write_text(summary: &DashboardSummary, w: &mut dyn Write) -> std::io::Result<()> {
    let stats = &summary.stats;
    writeln!(
        w,
        "total={} open={} in_progress={} closed={}",
        stats.total, stats.open, stats.in_progress, stats.closed
    )?;
    for ticket in &summary.recent {
        render_item_to(ticket, OutputMode::Text, w)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketflow_core::store::seed_tickets;

    type Writer = fn(&DashboardSummary, &mut dyn Write) -> std::io::Result<()>;

    fn rendered(f: Writer, s: &DashboardSummary) -> String {
        let mut buf = Vec::new();
        f(s, &mut buf).expect("write");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn text_starts_with_counts() {
        let summary = DashboardSummary::build(&seed_tickets(), 2);
        let out = rendered(write_text, &summary);
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("total=3 open=1 in_progress=1 closed=1")
        );
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn pretty_empty_state() {
        let summary = DashboardSummary::build(&[], 5);
        let out = rendered(write_pretty, &summary);
        assert!(out.contains("Total:"));
        assert!(out.contains("No tickets yet."));
    }
}
