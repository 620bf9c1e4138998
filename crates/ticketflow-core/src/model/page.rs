use super::ticket::{ParseEnumError, normalize};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The closed set of screens the app can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Landing,
    Login,
    Signup,
    Dashboard,
    Tickets,
}

impl Page {
    pub const ALL: [Self; 5] = [
        Self::Landing,
        Self::Login,
        Self::Signup,
        Self::Dashboard,
        Self::Tickets,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Dashboard => "dashboard",
            Self::Tickets => "tickets",
        }
    }

    /// Pages behind the login wall.
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        matches!(self, Self::Dashboard | Self::Tickets)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        Self::ALL
            .into_iter()
            .find(|page| page.as_str() == normalized)
            .ok_or_else(|| ParseEnumError {
                expected: "page",
                got: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::Page;
    use std::str::FromStr;

    #[test]
    fn display_parse_roundtrips() {
        for page in Page::ALL {
            assert_eq!(Page::from_str(&page.to_string()).expect("parse"), page);
        }
    }

    #[test]
    fn unknown_page_is_rejected() {
        let err = Page::from_str("settings").expect_err("not a page");
        assert_eq!(err.expected, "page");
        assert_eq!(err.got, "settings");
    }

    #[test]
    fn only_ticket_pages_require_auth() {
        assert!(Page::Dashboard.requires_auth());
        assert!(Page::Tickets.requires_auth());
        assert!(!Page::Landing.requires_auth());
        assert!(!Page::Login.requires_auth());
        assert!(!Page::Signup.requires_auth());
    }
}
