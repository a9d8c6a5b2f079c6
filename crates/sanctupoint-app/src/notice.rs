// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blocking user notices.

use std::fmt;

use sanctupoint_core::{ErrorKind, SanctuError};

/// A titled message the front end shows and the user dismisses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new("Success", message)
    }

    /// Notice for a failed action. The error's own message is shown as is.
    pub fn from_error(err: &SanctuError) -> Self {
        let title = match err.kind() {
            ErrorKind::Validation => "Missing Data",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Navigation => "Not Allowed",
            ErrorKind::NetworkOrService | ErrorKind::Internal => "Error",
        };
        Self::new(title, err.to_string())
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_keep_their_raw_message() {
        let notice = Notice::from_error(&SanctuError::service("UNIQUE constraint failed: users.email"));
        assert_eq!(notice.title, "Error");
        assert_eq!(notice.message, "UNIQUE constraint failed: users.email");

        let notice = Notice::from_error(&SanctuError::validation("Please select a service."));
        assert_eq!(notice.to_string(), "Missing Data: Please select a service.");
    }
}
