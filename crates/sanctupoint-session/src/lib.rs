// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session and role authority.
//!
//! Holds who is signed in and which role they have. The role is always
//! derived from the identity, so the two cannot disagree, and logging out
//! clears both at once. Consumers read the current state directly or
//! subscribe to a [`watch`] channel to react to changes.

use std::fmt;
use std::sync::Arc;

use sanctupoint_core::{Identity, Role};
use tokio::sync::watch;
use tracing::{debug, info};

/// An authenticated session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    identity: Identity,
}

impl Session {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn user_id(&self) -> i64 {
        self.identity.id
    }

    /// Role parsed from the identity; `None` when absent or unrecognized.
    pub fn role(&self) -> Option<Role> {
        self.identity.role()
    }
}

/// Where the authority currently stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionPhase {
    /// Nobody signed in.
    #[default]
    Anonymous,
    /// An identity lookup is in flight.
    Loading,
    Authenticated(Session),
}

impl SessionPhase {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionPhase::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionPhase::Authenticated(_))
    }

    pub fn role(&self) -> Option<Role> {
        self.session().and_then(Session::role)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Anonymous => write!(f, "anonymous"),
            SessionPhase::Loading => write!(f, "loading"),
            SessionPhase::Authenticated(_) => write!(f, "authenticated"),
        }
    }
}

/// Single source of truth for the signed-in identity.
///
/// Cheap to clone; clones share state. There are no error conditions and
/// no credential checks here: callers authenticate first and hand over the
/// resulting identity.
#[derive(Debug, Clone)]
pub struct SessionAuthority {
    tx: Arc<watch::Sender<SessionPhase>>,
}

impl Default for SessionAuthority {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionAuthority {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionPhase::Anonymous);
        Self { tx: Arc::new(tx) }
    }

    /// Sign `identity` in, replacing any current session.
    pub fn login(&self, identity: Identity) {
        info!(user_id = identity.id, role = ?identity.role, "session started");
        self.tx
            .send_replace(SessionPhase::Authenticated(Session::new(identity)));
    }

    /// Clear the session. Returns `false` if nobody was signed in.
    pub fn logout(&self) -> bool {
        let changed = self.tx.send_if_modified(|phase| {
            if matches!(phase, SessionPhase::Anonymous) {
                false
            } else {
                *phase = SessionPhase::Anonymous;
                true
            }
        });
        if changed {
            info!("session cleared");
        }
        changed
    }

    /// Mark an identity lookup as in flight. Only valid while anonymous.
    pub fn begin_loading(&self) -> bool {
        let changed = self.tx.send_if_modified(|phase| {
            if matches!(phase, SessionPhase::Anonymous) {
                *phase = SessionPhase::Loading;
                true
            } else {
                false
            }
        });
        if changed {
            debug!("session loading");
        }
        changed
    }

    /// Abandon an in-flight lookup and return to anonymous.
    pub fn cancel_loading(&self) -> bool {
        self.tx.send_if_modified(|phase| {
            if matches!(phase, SessionPhase::Loading) {
                *phase = SessionPhase::Anonymous;
                true
            } else {
                false
            }
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.tx.borrow().clone()
    }

    pub fn current_role(&self) -> Option<Role> {
        self.tx.borrow().role()
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.tx.borrow().session().map(|s| s.identity().clone())
    }

    pub fn current_session(&self) -> Option<Session> {
        self.tx.borrow().session().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_authenticated()
    }

    /// Receiver notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<SessionPhase> {
        self.tx.subscribe()
    }
}
