//! Form validation: presence and format checks only.
//!
//! Field checks return the same messages the forms show inline. Form checks
//! collect every field error at once so the user can fix them together.

use crate::model::{Page, Priority, Status, TicketDraft};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Notification shown alongside inline errors when a form is rejected.
pub const FORM_SUMMARY: &str = "Please fix the errors in the form";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
    pub suggestion: String,
    pub code: &'static str,
}

impl ValidationError {
    pub fn new(
        field: &'static str,
        message: impl Into<String>,
        suggestion: impl Into<String>,
        code: &'static str,
    ) -> Self {
        Self {
            field,
            message: message.into(),
            suggestion: suggestion.into(),
            code,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Every field error from one form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors {
    pub errors: Vec<ValidationError>,
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(FORM_SUMMARY)
    }
}

impl std::error::Error for FormErrors {}

impl FormErrors {
    /// The error reported for `field`, if any.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field == field)
    }

    fn collect(results: impl IntoIterator<Item = Result<(), ValidationError>>) -> Result<(), Self> {
        let errors: Vec<_> = results.into_iter().filter_map(Result::err).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self { errors })
        }
    }
}

/// # Errors
///
/// "Email is required" or "Please enter a valid email".
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new(
            "email",
            "Email is required",
            "pass --email you@example.com",
            "missing_email",
        ));
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(ValidationError::new(
            "email",
            "Please enter a valid email",
            "use an address like you@example.com",
            "invalid_email",
        ));
    }
    Ok(())
}

/// # Errors
///
/// Empty, or shorter than [`MIN_PASSWORD_LEN`] characters.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::new(
            "password",
            "Password is required",
            "pass --password",
            "missing_password",
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            "choose a longer password",
            "password_too_short",
        ));
    }
    Ok(())
}

/// # Errors
///
/// Empty confirmation, or one that differs from `password`.
pub fn validate_password_confirmation(
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationError> {
    if confirmation.is_empty() {
        return Err(ValidationError::new(
            "confirm_password",
            "Please confirm your password",
            "pass --confirm with the same password",
            "missing_confirmation",
        ));
    }
    if password != confirmation {
        return Err(ValidationError::new(
            "confirm_password",
            "Passwords do not match",
            "retype the same password in --confirm",
            "password_mismatch",
        ));
    }
    Ok(())
}

/// # Errors
///
/// Blank after trimming.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new(
            "title",
            "Title is required",
            "provide a non-empty --title",
            "missing_title",
        ));
    }
    Ok(())
}

/// Parse a `--status` value.
///
/// # Errors
///
/// Returns an `invalid_status` error naming the accepted values.
pub fn parse_status(s: &str) -> Result<Status, ValidationError> {
    s.parse().map_err(|_| {
        ValidationError::new(
            "status",
            format!("unknown status '{s}'"),
            "use --status open|in_progress|closed",
            "invalid_status",
        )
    })
}

/// Parse a `--priority` value.
///
/// # Errors
///
/// Returns an `invalid_priority` error naming the accepted values.
pub fn parse_priority(s: &str) -> Result<Priority, ValidationError> {
    s.parse().map_err(|_| {
        ValidationError::new(
            "priority",
            format!("unknown priority '{s}'"),
            "use --priority low|medium|high",
            "invalid_priority",
        )
    })
}

/// Parse a page name.
///
/// # Errors
///
/// Returns an `invalid_page` error listing the known pages.
pub fn parse_page(s: &str) -> Result<Page, ValidationError> {
    s.parse().map_err(|_| {
        let names = Page::ALL.map(Page::as_str);
        ValidationError::new(
            "page",
            format!("unknown page '{s}'"),
            format!("use one of {}", names.join("|")),
            "invalid_page",
        )
    })
}

/// Sign-in form.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Every failing field, email first.
    pub fn validate(&self) -> Result<(), FormErrors> {
        FormErrors::collect([
            validate_email(&self.email),
            validate_password(&self.password),
        ])
    }
}

/// Account creation form.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// # Errors
    ///
    /// Every failing field, in form order.
    pub fn validate(&self) -> Result<(), FormErrors> {
        FormErrors::collect([
            validate_email(&self.email),
            validate_password(&self.password),
            validate_password_confirmation(&self.password, &self.confirm_password),
        ])
    }
}

/// Create/edit ticket form: only the title is checked.
///
/// # Errors
///
/// A missing title.
pub fn validate_ticket(draft: &TicketDraft) -> Result<(), FormErrors> {
    FormErrors::collect([validate_title(&draft.title)])
}
