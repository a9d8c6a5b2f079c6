// SPDX-FileCopyrightText: 2026 SanctuPoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The navigation state machine.

use sanctupoint_core::{Role, SanctuError};
use sanctupoint_session::{SessionAuthority, SessionPhase};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::screen::{Route, RouteKey, Screen, ScreenKind};
use crate::tabs::{RoleTier, Tab};

/// Which screen graph is currently mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenSet {
    /// Session is loading; nothing is rendered.
    Blank,
    Unauthenticated,
    Authenticated { tier: RoleTier },
}

impl ScreenSet {
    pub fn tabs(self) -> &'static [Tab] {
        match self {
            ScreenSet::Authenticated { tier } => tier.tabs(),
            ScreenSet::Blank | ScreenSet::Unauthenticated => &[],
        }
    }
}

/// Stack rewrite caused by a session change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Stack replaced by `MainTabs`; there is no way back to `Login`.
    SignedIn { tier: RoleTier },
    /// Stack reset to `Login`.
    SignedOut,
    /// Stack cleared while the session loads.
    Blanked,
}

/// Resolves and mutates the navigation stack for one session authority.
///
/// Every query first folds in any pending session change, so a caller that
/// logs out and immediately asks for the current screen already sees
/// `Login`. [`Navigator::changed`] lets an event loop wait for the next
/// session change instead.
pub struct Navigator {
    session: watch::Receiver<SessionPhase>,
    seen: SessionPhase,
    set: ScreenSet,
    stack: Vec<Route>,
    next_key: u64,
}

impl Navigator {
    pub fn new(authority: &SessionAuthority) -> Self {
        let mut session = authority.subscribe();
        let initial = session.borrow_and_update().clone();
        let mut nav = Self {
            session,
            seen: SessionPhase::Anonymous,
            set: ScreenSet::Unauthenticated,
            stack: Vec::new(),
            next_key: 0,
        };
        let root = nav.route(Screen::Login);
        nav.stack = vec![root];
        nav.apply(initial);
        nav
    }

    fn route(&mut self, screen: Screen) -> Route {
        let key = RouteKey(self.next_key);
        self.next_key += 1;
        Route { key, screen }
    }

    /// Folds in a pending session change, if any.
    fn sync(&mut self) -> Option<Transition> {
        if !self.session.has_changed().unwrap_or(false) {
            return None;
        }
        let phase = self.session.borrow_and_update().clone();
        self.apply(phase)
    }

    fn apply(&mut self, phase: SessionPhase) -> Option<Transition> {
        let previous_user = self.seen.session().map(|s| s.user_id());
        let transition = match &phase {
            SessionPhase::Loading => {
                if self.set == ScreenSet::Blank {
                    None
                } else {
                    self.set = ScreenSet::Blank;
                    self.stack.clear();
                    Some(Transition::Blanked)
                }
            }
            SessionPhase::Anonymous => {
                if self.set == ScreenSet::Unauthenticated {
                    None
                } else {
                    self.set = ScreenSet::Unauthenticated;
                    let root = self.route(Screen::Login);
                    self.stack = vec![root];
                    Some(Transition::SignedOut)
                }
            }
            SessionPhase::Authenticated(session) => {
                let tier = tier_for(session.identity().role.as_deref(), session.role());
                let unchanged = previous_user == Some(session.user_id())
                    && self.set == (ScreenSet::Authenticated { tier });
                if unchanged {
                    None
                } else {
                    self.set = ScreenSet::Authenticated { tier };
                    let root = self.route(Screen::MainTabs {
                        active: tier.default_tab(),
                    });
                    self.stack = vec![root];
                    Some(Transition::SignedIn { tier })
                }
            }
        };
        self.seen = phase;
        if let Some(t) = transition {
            info!(transition = ?t, "navigation reset");
        }
        transition
    }

    /// Waits for the next session change that rewrites the stack.
    ///
    /// Returns `None` once the session authority is gone.
    pub async fn changed(&mut self) -> Option<Transition> {
        loop {
            self.session.changed().await.ok()?;
            let phase = self.session.borrow_and_update().clone();
            if let Some(t) = self.apply(phase) {
                return Some(t);
            }
        }
    }

    pub fn screen_set(&mut self) -> ScreenSet {
        self.sync();
        self.set
    }

    /// Tab set of the current role; empty when signed out or loading.
    pub fn tabs(&mut self) -> &'static [Tab] {
        self.screen_set().tabs()
    }

    /// Top of the stack; `None` while blank.
    pub fn current(&mut self) -> Option<&Route> {
        self.sync();
        self.stack.last()
    }

    pub fn stack(&mut self) -> &[Route] {
        self.sync();
        &self.stack
    }

    /// Active tab when `MainTabs` is anywhere on the stack.
    pub fn active_tab(&mut self) -> Option<Tab> {
        self.sync();
        self.stack.first().and_then(|r| match r.screen {
            Screen::MainTabs { active } => Some(active),
            _ => None,
        })
    }

    fn role(&self) -> Option<Role> {
        self.seen.role()
    }

    /// Whether `kind` may be pushed right now.
    pub fn can_push(&mut self, kind: ScreenKind) -> bool {
        match self.screen_set() {
            ScreenSet::Blank => false,
            ScreenSet::Unauthenticated => {
                kind == ScreenKind::Register
                    && self.stack.last().map(|r| r.screen.kind()) == Some(ScreenKind::Login)
            }
            ScreenSet::Authenticated { .. } => kind.allowed_for(self.role()),
        }
    }

    /// Push a screen with its parameters.
    pub fn push(&mut self, screen: Screen) -> Result<&Route, SanctuError> {
        let kind = screen.kind();
        if !self.can_push(kind) {
            return Err(SanctuError::Navigation(format!(
                "{kind} is not reachable from here"
            )));
        }
        let route = self.route(screen);
        debug!(screen = %kind, key = route.key.0, "push");
        self.stack.push(route);
        Ok(&self.stack[self.stack.len() - 1])
    }

    /// Go back one screen. Returns the route that is now on top, which is
    /// the same instance that was there before the popped one was pushed.
    pub fn pop(&mut self) -> Result<&Route, SanctuError> {
        self.sync();
        if self.stack.len() <= 1 {
            return Err(SanctuError::Navigation(
                "already at the first screen".to_string(),
            ));
        }
        if let Some(popped) = self.stack.pop() {
            debug!(screen = %popped.screen.kind(), key = popped.key.0, "pop");
        }
        self.stack
            .last()
            .ok_or_else(|| SanctuError::Internal("navigation stack emptied".to_string()))
    }

    /// Switch the active tab, closing any stack screens above `MainTabs`.
    pub fn select_tab(&mut self, tab: Tab) -> Result<(), SanctuError> {
        let ScreenSet::Authenticated { tier } = self.screen_set() else {
            return Err(SanctuError::Navigation(
                "tabs are only available when signed in".to_string(),
            ));
        };
        if !tier.has_tab(tab) {
            return Err(SanctuError::Navigation(format!(
                "the {} tab is not available to this account",
                tab.title()
            )));
        }
        self.stack.truncate(1);
        if let Some(Route {
            screen: Screen::MainTabs { active },
            ..
        }) = self.stack.first_mut()
        {
            *active = tab;
        }
        Ok(())
    }

    /// Replace the whole stack with a fresh `MainTabs` on `tab`.
    pub fn reset_to_tab(&mut self, tab: Tab) -> Result<(), SanctuError> {
        let ScreenSet::Authenticated { tier } = self.screen_set() else {
            return Err(SanctuError::Navigation(
                "tabs are only available when signed in".to_string(),
            ));
        };
        if !tier.has_tab(tab) {
            return Err(SanctuError::Navigation(format!(
                "the {} tab is not available to this account",
                tab.title()
            )));
        }
        let root = self.route(Screen::MainTabs { active: tab });
        self.stack = vec![root];
        Ok(())
    }
}

fn tier_for(raw: Option<&str>, parsed: Option<Role>) -> RoleTier {
    if let (Some(raw), None) = (raw, parsed) {
        warn!(role = raw, "unrecognized role; using customer tabs");
    }
    RoleTier::for_role(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanctupoint_core::{Identity, Service};

    fn identity(id: i64, role: Option<&str>) -> Identity {
        Identity {
            id,
            username: Some(format!("user{id}")),
            first_name: None,
            last_name: None,
            email: None,
            phone_number: None,
            role: role.map(String::from),
        }
    }

    fn baptism() -> Service {
        Service {
            id: 1,
            name: "Baptism".into(),
            description: Some("Rite of initiation".into()),
            price: Some(0.0),
            duration: None,
        }
    }

    #[test]
    fn starts_on_login() {
        let auth = SessionAuthority::new();
        let mut nav = Navigator::new(&auth);
        assert_eq!(nav.screen_set(), ScreenSet::Unauthenticated);
        assert_eq!(nav.current().unwrap().screen, Screen::Login);
        assert!(nav.tabs().is_empty());
    }

    #[test]
    fn login_replaces_stack_with_main_tabs() {
        let auth = SessionAuthority::new();
        let mut nav = Navigator::new(&auth);
        nav.push(Screen::Register).unwrap();

        auth.login(identity(1, Some("User")));

        assert_eq!(
            nav.screen_set(),
            ScreenSet::Authenticated {
                tier: RoleTier::Customer
            }
        );
        let stack = nav.stack();
        assert_eq!(stack.len(), 1);
        assert_eq!(
            stack[0].screen,
            Screen::MainTabs {
                active: Tab::Appointments
            }
        );
        assert!(nav.pop().is_err(), "back must not return to Login");
    }

    #[test]
    fn logout_then_any_query_is_unauthenticated() {
        let auth = SessionAuthority::new();
        let mut nav = Navigator::new(&auth);
        auth.login(identity(1, Some("Admin")));
        nav.push(Screen::ServiceDashboard).unwrap();

        auth.logout();

        assert_eq!(nav.current().unwrap().screen, Screen::Login);
        assert_eq!(nav.screen_set(), ScreenSet::Unauthenticated);
        assert_eq!(nav.stack().len(), 1);
    }

    #[test]
    fn navigator_created_after_login_starts_in_main_tabs() {
        let auth = SessionAuthority::new();
        auth.login(identity(3, Some("Cashier")));
        let mut nav = Navigator::new(&auth);
        assert_eq!(nav.active_tab(), Some(Tab::ManageAppointments));
    }

    #[test]
    fn loading_renders_blank() {
        let auth = SessionAuthority::new();
        let mut nav = Navigator::new(&auth);
        auth.begin_loading();
        assert_eq!(nav.screen_set(), ScreenSet::Blank);
        assert!(nav.current().is_none());
        assert!(!nav.can_push(ScreenKind::Register));

        auth.cancel_loading();
        assert_eq!(nav.current().unwrap().screen, Screen::Login);
    }

    #[test]
    fn back_returns_the_exact_prior_instance() {
        let auth = SessionAuthority::new();
        let mut nav = Navigator::new(&auth);
        auth.login(identity(1, Some("Client")));

        let details = nav
            .push(Screen::ServiceDetails { service: baptism() })
            .unwrap()
            .clone();
        nav.push(Screen::BookAppointment {
            preselected: Some(baptism()),
        })
        .unwrap();

        let back = nav.pop().unwrap();
        assert_eq!(*back, details);
    }

    #[test]
    fn parameters_pass_through_unmodified() {
        let auth = SessionAuthority::new();
        let mut nav = Navigator::new(&auth);
        auth.login(identity(1, None));
        nav.push(Screen::BookAppointment {
            preselected: Some(baptism()),
        })
        .unwrap();
        match &nav.current().unwrap().screen {
            Screen::BookAppointment { preselected } => {
                assert_eq!(preselected.as_ref(), Some(&baptism()));
            }
            other => panic!("unexpected screen {other:?}"),
        }
    }

    #[test]
    fn service_editing_is_role_gated() {
        let auth = SessionAuthority::new();
        let mut nav = Navigator::new(&auth);

        auth.login(identity(1, Some("Cashier")));
        let err = nav
            .push(Screen::EditService { service: baptism() })
            .unwrap_err();
        assert!(matches!(err, SanctuError::Navigation(_)));
        assert_eq!(nav.stack().len(), 1, "failed push leaves the stack alone");

        auth.login(identity(2, Some("Priest")));
        assert!(nav.push(Screen::EditService { service: baptism() }).is_ok());
    }

    #[test]
    fn relogin_as_other_user_rebuilds_tabs() {
        let auth = SessionAuthority::new();
        let mut nav = Navigator::new(&auth);
        auth.login(identity(1, Some("User")));
        nav.push(Screen::ServiceDetails { service: baptism() }).unwrap();

        auth.login(identity(2, Some("Admin")));
        assert_eq!(nav.tabs(), RoleTier::Admin.tabs());
        assert_eq!(nav.stack().len(), 1);
    }

    #[test]
    fn register_only_from_login() {
        let auth = SessionAuthority::new();
        let mut nav = Navigator::new(&auth);
        nav.push(Screen::Register).unwrap();
        assert!(nav.push(Screen::Register).is_err());
        assert_eq!(nav.pop().unwrap().screen, Screen::Login);

        auth.login(identity(1, Some("User")));
        assert!(nav.push(Screen::Register).is_err());
    }

    #[test]
    fn select_tab_respects_tier_and_closes_stack_screens() {
        let auth = SessionAuthority::new();
        let mut nav = Navigator::new(&auth);
        assert!(nav.select_tab(Tab::Services).is_err());

        auth.login(identity(1, Some("Client")));
        nav.push(Screen::ServiceDetails { service: baptism() }).unwrap();
        nav.select_tab(Tab::History).unwrap();
        assert_eq!(nav.active_tab(), Some(Tab::History));
        assert_eq!(nav.stack().len(), 1);

        assert!(nav.select_tab(Tab::Dashboard).is_err());
        assert_eq!(nav.active_tab(), Some(Tab::History));
    }

    #[test]
    fn reset_to_tab_creates_fresh_root() {
        let auth = SessionAuthority::new();
        let mut nav = Navigator::new(&auth);
        auth.login(identity(1, Some("User")));
        let old_root = nav.current().unwrap().key;
        nav.push(Screen::BookAppointment { preselected: None }).unwrap();

        nav.reset_to_tab(Tab::Appointments).unwrap();
        let root = nav.current().unwrap();
        assert_ne!(root.key, old_root);
        assert_eq!(
            root.screen,
            Screen::MainTabs {
                active: Tab::Appointments
            }
        );
    }

    #[test]
    #[tracing_test::traced_test]
    fn unknown_role_falls_back_to_customer_tabs_with_warning() {
        let auth = SessionAuthority::new();
        let mut nav = Navigator::new(&auth);
        auth.login(identity(1, Some("Sexton")));
        assert_eq!(nav.tabs(), RoleTier::Customer.tabs());
        assert!(logs_contain("unrecognized role"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn role_names_must_match_exactly() {
        let auth = SessionAuthority::new();
        let mut nav = Navigator::new(&auth);
        for raw in ["admin", " ADMIN ", "priest", "Admin "] {
            auth.login(identity(9, Some(raw)));
            assert_eq!(
                nav.screen_set(),
                ScreenSet::Authenticated {
                    tier: RoleTier::Customer
                },
                "{raw:?}"
            );
            assert!(!nav.can_push(ScreenKind::ServiceDashboard));
        }
        assert!(logs_contain("unrecognized role"));
    }

    #[tokio::test]
    async fn changed_wakes_on_session_change() {
        let auth = SessionAuthority::new();
        let mut nav = Navigator::new(&auth);

        let waiter = {
            let auth = auth.clone();
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                auth.login(identity(5, Some("Secretary")));
            })
        };

        let transition = nav.changed().await;
        waiter.await.unwrap();
        assert_eq!(
            transition,
            Some(Transition::SignedIn {
                tier: RoleTier::Staff
            })
        );
        assert_eq!(nav.active_tab(), Some(Tab::ManageAppointments));
    }
}
