//! `tf login`, `tf signup`, `tf logout`: the authentication forms.
//!
//! There is no credential check. A form that passes validation logs the
//! session in and lands on the dashboard.

use clap::Args;
use std::path::Path;
use ticketflow_core::TicketflowError;
use ticketflow_core::validate::{LoginForm, SignupForm};

use crate::cmd::{open_app, reject_form, report};
use crate::output::{OutputMode, render_success};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email.
    #[arg(long, default_value = "")]
    pub email: String,

    /// Account password.
    #[arg(long, default_value = "")]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct SignupArgs {
    /// Account email.
    #[arg(long, default_value = "")]
    pub email: String,

    /// Password, at least 6 characters.
    #[arg(long, default_value = "")]
    pub password: String,

    /// Password again.
    #[arg(long = "confirm", default_value = "")]
    pub confirm_password: String,
}

pub fn run_login(args: &LoginArgs, output: OutputMode, project_dir: &Path) -> anyhow::Result<()> {
    let form = LoginForm {
        email: args.email.clone(),
        password: args.password.clone(),
    };
    if let Err(errors) = form.validate() {
        return reject_form(output, &errors);
    }

    let mut app = open_app(project_dir, output)?;
    if let Err(err) = app.session_mut().log_in() {
        return report(output, &TicketflowError::from(err));
    }
    render_success(output, "Login successful!")
}

pub fn run_signup(
    args: &SignupArgs,
    output: OutputMode,
    project_dir: &Path,
) -> anyhow::Result<()> {
    let form = SignupForm {
        email: args.email.clone(),
        password: args.password.clone(),
        confirm_password: args.confirm_password.clone(),
    };
    if let Err(errors) = form.validate() {
        return reject_form(output, &errors);
    }

    let mut app = open_app(project_dir, output)?;
    if let Err(err) = app.session_mut().log_in() {
        return report(output, &TicketflowError::from(err));
    }
    render_success(output, "Account created successfully!")
}

pub fn run_logout(output: OutputMode, project_dir: &Path) -> anyhow::Result<()> {
    let mut app = open_app(project_dir, output)?;
    if let Err(err) = app.session_mut().log_out() {
        return report(output, &TicketflowError::from(err));
    }
    render_success(output, "Logged out")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: SignupArgs,
    }

    #[test]
    fn signup_confirm_flag_maps_to_confirmation() {
        let w = Wrapper::parse_from([
            "test",
            "--email",
            "a@b.co",
            "--password",
            "secret1",
            "--confirm",
            "secret1",
        ]);
        assert_eq!(w.args.confirm_password, "secret1");
    }

    #[test]
    fn missing_fields_default_to_empty_for_form_validation() {
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.email.is_empty());
        assert!(w.args.password.is_empty());
    }

    #[test]
    fn invalid_login_does_not_touch_storage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = LoginArgs {
            email: "foo".into(),
            password: "abc12".into(),
        };
        assert!(run_login(&args, OutputMode::Json, dir.path()).is_err());
        assert!(!dir.path().join("storage.json").exists());
    }

    #[test]
    fn valid_login_persists_the_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = LoginArgs {
            email: "foo@bar.com".into(),
            password: "abc123".into(),
        };
        run_login(&args, OutputMode::Json, dir.path()).expect("login");

        let app = open_app(dir.path(), OutputMode::Json).expect("open");
        assert!(app.session().is_authenticated());
    }
}
