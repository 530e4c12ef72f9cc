//! Protected-view gating.
//!
//! Each guarded navigation runs the same state machine:
//! `Checking → { DeniedNoSession, DeniedWrongRole, Allowed }`. While
//! checking, the shell renders a neutral placeholder and does not navigate;
//! both denial states redirect with history replacement so the back button
//! cannot loop into the guard.

use tokio::sync::mpsc;

use supplyline_auth::{ProfileResolver, Role, SessionStore};
use supplyline_backend::Identity;

use crate::route::{Route, default_route};

/// A protected view and the roles allowed into it.
///
/// An empty role list means "any authenticated identity".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedView {
    pub route: Route,
    pub allowed_roles: Vec<Role>,
}

impl GuardedView {
    /// Guard requiring only a session.
    pub fn any_signed_in(route: Route) -> Self {
        Self {
            route,
            allowed_roles: Vec::new(),
        }
    }

    /// Guard restricted to the given roles.
    pub fn allowing(route: Route, allowed_roles: impl Into<Vec<Role>>) -> Self {
        Self {
            route,
            allowed_roles: allowed_roles.into(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    DeniedNoSession,
    DeniedWrongRole,
    Allowed,
}

/// What the shell does with a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Still checking: neutral placeholder, no navigation.
    Hold,
    /// Render the guarded content unchanged.
    Render,
    /// Navigate away, replacing the history entry.
    Redirect(Route),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardDecision {
    pub state: GuardState,
    pub outcome: GuardOutcome,
}

impl GuardDecision {
    /// The state a guarded view starts in, before its first evaluation
    /// settles.
    pub fn pending() -> Self {
        Self {
            state: GuardState::Checking,
            outcome: GuardOutcome::Hold,
        }
    }
}

/// Pure policy: one settled decision from session + role + view.
pub fn evaluate(identity: Option<&Identity>, role: Role, view: &GuardedView) -> GuardDecision {
    if identity.is_none() {
        return GuardDecision {
            state: GuardState::DeniedNoSession,
            outcome: GuardOutcome::Redirect(Route::Auth),
        };
    }
    if !view.allowed_roles.is_empty() && !view.allowed_roles.contains(&role) {
        return GuardDecision {
            state: GuardState::DeniedWrongRole,
            outcome: GuardOutcome::Redirect(default_route(role)),
        };
    }
    GuardDecision {
        state: GuardState::Allowed,
        outcome: GuardOutcome::Render,
    }
}

/// Evaluates guarded views against the live session.
///
/// `check` is the once-per-navigation evaluation; `subscribe` re-runs it on
/// every identity change (a logout while the view is open redirects
/// immediately). Dropping the receiver tears the re-evaluation down.
#[derive(Clone)]
pub struct RouteGuard {
    session: SessionStore,
    resolver: ProfileResolver,
}

impl RouteGuard {
    pub fn new(session: SessionStore, resolver: ProfileResolver) -> Self {
        Self { session, resolver }
    }

    pub async fn check(&self, view: &GuardedView) -> GuardDecision {
        match self.session.current() {
            None => evaluate(None, Role::Unknown, view),
            Some(identity) => {
                let profile = self.resolver.resolve(identity.id).await;
                evaluate(Some(&identity), profile.role, view)
            }
        }
    }

    /// Settled decisions for `view`: one for the current session state, then
    /// one per identity change.
    pub fn subscribe(&self, view: GuardedView) -> mpsc::UnboundedReceiver<GuardDecision> {
        let (tx, decisions) = mpsc::unbounded_channel();
        let mut identities = self.session.watch();
        let resolver = self.resolver.clone();

        tokio::spawn(async move {
            loop {
                let identity = identities.borrow_and_update().clone();
                let decision = match &identity {
                    None => evaluate(None, Role::Unknown, &view),
                    Some(identity) => {
                        let profile = resolver.resolve(identity.id).await;
                        evaluate(Some(identity), profile.role, &view)
                    }
                };
                if tx.send(decision).is_err() {
                    // View discarded; stop watching.
                    break;
                }
                if identities.changed().await.is_err() {
                    break;
                }
            }
        });

        decisions
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use supplyline_backend::{AuthApi, MemoryBackend};
    use supplyline_core::IdentityId;

    use super::*;

    fn identity() -> Identity {
        Identity {
            id: IdentityId::new(),
            email: "ops@example.com".to_string(),
        }
    }

    #[test]
    fn no_session_redirects_to_login() {
        let view = GuardedView::allowing(Route::Admin, [Role::Admin]);
        let decision = evaluate(None, Role::Admin, &view);
        assert_eq!(decision.state, GuardState::DeniedNoSession);
        assert_eq!(decision.outcome, GuardOutcome::Redirect(Route::Auth));
    }

    #[test]
    fn unrestricted_view_admits_any_authenticated_identity() {
        let view = GuardedView::any_signed_in(Route::Logistics);
        for role in [Role::Staff, Role::Manager, Role::Admin, Role::Unknown] {
            let decision = evaluate(Some(&identity()), role, &view);
            assert_eq!(decision.state, GuardState::Allowed);
            assert_eq!(decision.outcome, GuardOutcome::Render);
        }
    }

    #[test]
    fn wrong_role_lands_on_its_own_default_view() {
        let view = GuardedView::allowing(Route::Admin, [Role::Admin]);

        let staff = evaluate(Some(&identity()), Role::Staff, &view);
        assert_eq!(staff.state, GuardState::DeniedWrongRole);
        assert_eq!(staff.outcome, GuardOutcome::Redirect(Route::Warehousing));

        let manager = evaluate(Some(&identity()), Role::Manager, &view);
        assert_eq!(manager.outcome, GuardOutcome::Redirect(Route::Procurement));

        let unknown = evaluate(Some(&identity()), Role::Unknown, &view);
        assert_eq!(unknown.outcome, GuardOutcome::Redirect(Route::Home));
    }

    #[test]
    fn allowed_role_renders() {
        let view = GuardedView::allowing(Route::Procurement, [Role::Manager, Role::Admin]);
        let decision = evaluate(Some(&identity()), Role::Manager, &view);
        assert_eq!(decision.state, GuardState::Allowed);
        assert_eq!(decision.outcome, GuardOutcome::Render);
    }

    async fn guard_with_user(role: &str) -> (Arc<MemoryBackend>, RouteGuard) {
        let backend = Arc::new(MemoryBackend::new());
        let identity = backend.register_user("ops@example.com", "hunter2");
        backend.seed(
            "profiles",
            json!({ "id": identity.id, "full_name": "Ops", "role": role }),
        );
        backend.sign_in("ops@example.com", "hunter2").await.unwrap();

        let session = SessionStore::connect(backend.clone()).await;
        let resolver = ProfileResolver::new(backend.clone());
        (backend, RouteGuard::new(session, resolver))
    }

    #[tokio::test]
    async fn signed_in_manager_is_redirected_from_admin_to_procurement() {
        let (_backend, guard) = guard_with_user("manager").await;
        let view = GuardedView::allowing(Route::Admin, [Role::Admin]);
        let decision = guard.check(&view).await;
        assert_eq!(decision.state, GuardState::DeniedWrongRole);
        assert_eq!(decision.outcome, GuardOutcome::Redirect(Route::Procurement));
    }

    #[tokio::test]
    async fn logout_while_viewing_redirects_immediately() {
        let (backend, guard) = guard_with_user("admin").await;
        let view = GuardedView::allowing(Route::Admin, [Role::Admin]);
        let mut decisions = guard.subscribe(view);

        let first = decisions.recv().await.unwrap();
        assert_eq!(first.state, GuardState::Allowed);

        backend.sign_out().await.unwrap();
        let second = decisions.recv().await.unwrap();
        assert_eq!(second.state, GuardState::DeniedNoSession);
        assert_eq!(second.outcome, GuardOutcome::Redirect(Route::Auth));
    }

    #[test]
    fn pending_state_holds_navigation() {
        let pending = GuardDecision::pending();
        assert_eq!(pending.state, GuardState::Checking);
        assert_eq!(pending.outcome, GuardOutcome::Hold);
    }
}
