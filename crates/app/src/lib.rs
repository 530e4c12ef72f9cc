//! `supplyline-app` — composition root.
//!
//! Wires the backend, session, profile resolution, route guarding and the
//! record screens together. The rendering shell (whatever hosts the UI)
//! talks to [`AppContext`] and nothing below it.

use std::sync::Arc;

use supplyline_assets::AssetsScreen;
use supplyline_auth::{AuthForm, Profile, ProfileResolver, SessionStore};
use supplyline_backend::{AuthApi, BackendConfig, RestBackend, StorageApi, TableApi};
use supplyline_logistics::ShipmentsScreen;
use supplyline_messages::{ContactForm, InboxScreen};
use supplyline_procurement::{PurchaseOrdersScreen, SuppliersScreen};
use supplyline_records::DocumentsScreen;
use supplyline_routing::{MenuItem, RouteGuard, menu_for_role};
use supplyline_warehousing::{ProductsScreen, WarehousesScreen};

/// Everything a shell needs, built once at startup.
pub struct AppContext {
    auth: Arc<dyn AuthApi>,
    tables: Arc<dyn TableApi>,
    storage: Arc<dyn StorageApi>,
    session: SessionStore,
    resolver: ProfileResolver,
    guard: RouteGuard,
}

impl AppContext {
    /// Wire a context over explicit backend handles (tests inject the
    /// in-memory backend here).
    pub async fn new(
        auth: Arc<dyn AuthApi>,
        tables: Arc<dyn TableApi>,
        storage: Arc<dyn StorageApi>,
    ) -> Self {
        let session = SessionStore::connect(auth.clone()).await;
        let resolver = ProfileResolver::new(tables.clone());
        let guard = RouteGuard::new(session.clone(), resolver.clone());
        Self {
            auth,
            tables,
            storage,
            session,
            resolver,
            guard,
        }
    }

    /// Wire a context over the hosted backend.
    pub async fn bootstrap(config: BackendConfig) -> Self {
        let backend = Arc::new(RestBackend::new(config));
        Self::new(backend.clone(), backend.clone(), backend).await
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// The signed-in user's profile, if any.
    pub async fn profile(&self) -> Option<Profile> {
        let identity = self.session.current()?;
        Some(self.resolver.resolve(identity.id).await)
    }

    /// The navigation menu for the current session.
    pub async fn menu(&self) -> Vec<&'static MenuItem> {
        let role = self.profile().await.map(|profile| profile.role);
        menu_for_role(role)
    }

    pub fn auth_form(&self) -> AuthForm {
        AuthForm::new(self.auth.clone())
    }

    pub fn products_screen(&self) -> ProductsScreen {
        ProductsScreen::new(self.tables.clone())
    }

    pub fn warehouses_screen(&self) -> WarehousesScreen {
        WarehousesScreen::new(self.tables.clone())
    }

    pub fn suppliers_screen(&self) -> SuppliersScreen {
        SuppliersScreen::new(self.tables.clone())
    }

    pub fn purchase_orders_screen(&self) -> PurchaseOrdersScreen {
        PurchaseOrdersScreen::new(self.tables.clone())
    }

    pub fn shipments_screen(&self) -> ShipmentsScreen {
        ShipmentsScreen::new(self.tables.clone())
    }

    pub fn assets_screen(&self) -> AssetsScreen {
        AssetsScreen::new(self.tables.clone())
    }

    pub fn documents_screen(&self) -> DocumentsScreen {
        DocumentsScreen::new(self.tables.clone(), self.storage.clone())
    }

    pub fn inbox_screen(&self) -> InboxScreen {
        InboxScreen::new(self.tables.clone())
    }

    pub fn contact_form(&self) -> ContactForm {
        ContactForm::new(self.tables.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use supplyline_auth::{AuthOutcome, Role};
    use supplyline_backend::MemoryBackend;
    use supplyline_routing::{GuardOutcome, GuardState, GuardedView, Route};

    use super::*;

    async fn context_with(backend: &Arc<MemoryBackend>) -> AppContext {
        AppContext::new(backend.clone(), backend.clone(), backend.clone()).await
    }

    #[tokio::test]
    async fn login_resolves_role_and_gates_the_admin_view() {
        let backend = Arc::new(MemoryBackend::new());
        let identity = backend.register_user("lead@example.com", "hunter2");
        backend.seed(
            "profiles",
            json!({ "id": identity.id, "full_name": "Jess Cruz", "role": "manager" }),
        );

        let app = context_with(&backend).await;
        assert!(app.session().current().is_none());
        assert!(app.menu().await.is_empty());

        let mut form = app.auth_form();
        form.email = "lead@example.com".into();
        form.password = "hunter2".into();
        assert!(matches!(form.submit().await, AuthOutcome::SignedIn(_)));

        assert!(app.session().current().is_some());
        let profile = app.profile().await.unwrap();
        assert_eq!(profile.role, Role::Manager);

        // A manager landing on /admin is sent to the procurement home.
        let view = GuardedView::allowing(Route::Admin, [Role::Admin]);
        let decision = app.guard().check(&view).await;
        assert_eq!(decision.state, GuardState::DeniedWrongRole);
        assert_eq!(decision.outcome, GuardOutcome::Redirect(Route::Procurement));

        // The menu shows managerial entries but not the admin panel.
        let labels: Vec<&str> = app.menu().await.iter().map(|item| item.label).collect();
        assert!(labels.contains(&"Purchase Orders"));
        assert!(!labels.contains(&"Admin Panel"));
    }

    #[tokio::test]
    async fn sign_out_empties_menu_and_guards() {
        let backend = Arc::new(MemoryBackend::new());
        let identity = backend.register_user("root@example.com", "hunter2");
        backend.seed(
            "profiles",
            json!({ "id": identity.id, "full_name": "Root", "role": "admin" }),
        );
        backend.sign_in("root@example.com", "hunter2").await.unwrap();

        let app = context_with(&backend).await;
        assert_eq!(app.menu().await.len(), 8);

        app.session().sign_out().await.unwrap();
        assert!(app.menu().await.is_empty());

        let view = GuardedView::any_signed_in(Route::Logistics);
        let decision = app.guard().check(&view).await;
        assert_eq!(decision.outcome, GuardOutcome::Redirect(Route::Auth));
    }
}
