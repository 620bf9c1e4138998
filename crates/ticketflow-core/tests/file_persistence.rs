//! Reload behaviour against the on-disk backend.

use tempfile::TempDir;
use ticketflow_core::config::ProjectConfig;
use ticketflow_core::storage::keys;
use ticketflow_core::store::seed_tickets;
use ticketflow_core::{App, FileStorage, KeyValueStore, Page, Priority, Status, TicketDraft};

fn open(dir: &TempDir) -> App<FileStorage> {
    App::open(FileStorage::in_dir(dir.path()), &ProjectConfig::default()).expect("open app")
}

#[test]
fn fresh_directory_starts_seeded_and_logged_out() {
    let dir = TempDir::new().expect("tempdir");
    let app = open(&dir);
    assert_eq!(app.tickets().list(), seed_tickets().as_slice());
    assert!(!app.session().is_authenticated());
    assert_eq!(app.session().current_page(), Page::Landing);
}

#[test]
fn state_survives_a_restart() {
    let dir = TempDir::new().expect("tempdir");
    let created = {
        let mut app = open(&dir);
        app.session_mut().log_in().expect("log in");
        app.open_page(Page::Tickets).expect("navigate");
        let created = app
            .authorized_tickets()
            .expect("authorized")
            .add(
                TicketDraft::new("Printer on fire")
                    .with_status(Status::InProgress)
                    .with_priority(Priority::High),
            )
            .expect("add");
        app.tickets_mut().delete("3").expect("delete");
        created
    };

    let app = open(&dir);
    assert!(app.session().is_authenticated());
    assert_eq!(app.session().current_page(), Page::Tickets);
    let ids: Vec<_> = app.tickets().list().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, [created.id.as_str(), "1", "2"]);
}

#[test]
fn logout_survives_a_restart() {
    let dir = TempDir::new().expect("tempdir");
    {
        let mut app = open(&dir);
        app.session_mut().log_in().expect("log in");
        app.session_mut().log_out().expect("log out");
    }

    let app = open(&dir);
    assert!(!app.session().is_authenticated());
    assert_eq!(app.session().current_page(), Page::Landing);
    let storage = FileStorage::in_dir(dir.path());
    assert_eq!(storage.get(keys::IS_AUTHENTICATED).expect("get"), None);
    assert_eq!(
        storage.get(keys::CURRENT_PAGE).expect("get").as_deref(),
        Some("login")
    );
}

#[test]
fn corrupt_ticket_value_falls_back_to_seed() {
    let dir = TempDir::new().expect("tempdir");
    let mut storage = FileStorage::in_dir(dir.path());
    storage
        .set(keys::TICKETS, r#"[{"id":"1","title":"x"}]"#)
        .expect("set");

    let app = open(&dir);
    assert_eq!(app.tickets().list(), seed_tickets().as_slice());
}

#[test]
fn stored_json_uses_the_documented_shape() {
    let dir = TempDir::new().expect("tempdir");
    let mut app = open(&dir);
    app.tickets_mut().delete("2").expect("delete");

    let raw = FileStorage::in_dir(dir.path())
        .get(keys::TICKETS)
        .expect("get")
        .expect("tickets written");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json array");
    let first = &value[0];
    assert_eq!(first["id"], "1");
    assert_eq!(first["status"], "open");
    assert_eq!(first["priority"], "high");
    assert_eq!(value[1]["status"], "closed");
}
