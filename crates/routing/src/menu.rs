//! Role-filtered navigation menu.

use supplyline_auth::Role;

use crate::route::Route;

/// One entry in the services menu.
#[derive(Debug, PartialEq, Eq)]
pub struct MenuItem {
    pub route: Route,
    pub label: &'static str,
    pub allowed_roles: &'static [Role],
}

const EVERYONE: &[Role] = &[Role::Staff, Role::Manager, Role::Admin];
const MANAGERIAL: &[Role] = &[Role::Manager, Role::Admin];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// The full menu, in display order. The order is a UX contract: items are
/// filtered per role but never reordered.
pub static NAV_ITEMS: &[MenuItem] = &[
    MenuItem {
        route: Route::Home,
        label: "Home",
        allowed_roles: EVERYONE,
    },
    MenuItem {
        route: Route::Warehousing,
        label: "Warehousing",
        allowed_roles: EVERYONE,
    },
    MenuItem {
        route: Route::Logistics,
        label: "Logistics",
        allowed_roles: EVERYONE,
    },
    MenuItem {
        route: Route::Assets,
        label: "Assets",
        allowed_roles: EVERYONE,
    },
    MenuItem {
        route: Route::Documents,
        label: "Documents",
        allowed_roles: EVERYONE,
    },
    MenuItem {
        route: Route::Procurement,
        label: "Suppliers",
        allowed_roles: MANAGERIAL,
    },
    MenuItem {
        route: Route::PurchaseOrders,
        label: "Purchase Orders",
        allowed_roles: MANAGERIAL,
    },
    MenuItem {
        route: Route::Admin,
        label: "Admin Panel",
        allowed_roles: ADMIN_ONLY,
    },
];

/// Filter the menu for a resolved role. No role (signed out) gets nothing.
pub fn menu_for_role(role: Option<Role>) -> Vec<&'static MenuItem> {
    let Some(role) = role else {
        return Vec::new();
    };
    NAV_ITEMS
        .iter()
        .filter(|item| item.allowed_roles.contains(&role))
        .collect()
}
