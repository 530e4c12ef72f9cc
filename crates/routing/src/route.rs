//! The application's route table.

use supplyline_auth::Role;

/// Every navigable view, by path.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Auth,
    GetInTouch,
    Admin,
    AdminMessages,
    Warehousing,
    Products,
    Warehouses,
    Procurement,
    PurchaseOrders,
    Logistics,
    Assets,
    Documents,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Auth => "/auth",
            Route::GetInTouch => "/get-in-touch",
            Route::Admin => "/admin",
            Route::AdminMessages => "/admin/messages",
            Route::Warehousing => "/sws",
            Route::Products => "/sws/products",
            Route::Warehouses => "/sws/warehouses",
            Route::Procurement => "/psm",
            Route::PurchaseOrders => "/psm/purchase-orders",
            Route::Logistics => "/logistics",
            Route::Assets => "/assets",
            Route::Documents => "/dtrs",
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Route::Home),
            "/auth" => Some(Route::Auth),
            "/get-in-touch" => Some(Route::GetInTouch),
            "/admin" => Some(Route::Admin),
            "/admin/messages" => Some(Route::AdminMessages),
            "/sws" => Some(Route::Warehousing),
            "/sws/products" => Some(Route::Products),
            "/sws/warehouses" => Some(Route::Warehouses),
            "/psm" => Some(Route::Procurement),
            "/psm/purchase-orders" => Some(Route::PurchaseOrders),
            "/logistics" => Some(Route::Logistics),
            "/assets" => Some(Route::Assets),
            "/dtrs" => Some(Route::Documents),
            _ => None,
        }
    }
}

impl core::fmt::Display for Route {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.path())
    }
}

/// The view a role lands on when turned away from somewhere it cannot be.
///
/// This mapping is the only per-role routing rule in the system; keep the
/// match exhaustive so a new role cannot silently fall through.
pub fn default_route(role: Role) -> Route {
    match role {
        Role::Admin => Route::Admin,
        Role::Manager => Route::Procurement,
        Role::Staff => Route::Warehousing,
        Role::Unknown => Route::Home,
    }
}
