//! Admin panel module cards.

use crate::route::Route;

/// One card on the admin panel, linking into a management view.
#[derive(Debug, PartialEq, Eq)]
pub struct AdminModule {
    pub title: &'static str,
    pub description: &'static str,
    pub route: Route,
}

/// The admin panel's modules, in display order.
pub static ADMIN_MODULES: &[AdminModule] = &[
    AdminModule {
        title: "Suppliers",
        description: "Manage supplier records",
        route: Route::Procurement,
    },
    AdminModule {
        title: "Purchase Orders",
        description: "Create & track orders",
        route: Route::PurchaseOrders,
    },
    AdminModule {
        title: "Products",
        description: "Manage product catalog",
        route: Route::Products,
    },
    AdminModule {
        title: "Warehouses",
        description: "Track warehouse stock",
        route: Route::Warehouses,
    },
    AdminModule {
        title: "Logistics",
        description: "Shipments & deliveries",
        route: Route::Logistics,
    },
    AdminModule {
        title: "Assets",
        description: "Manage company assets lifecycle",
        route: Route::Assets,
    },
    AdminModule {
        title: "Admin Messages",
        description: "View & manage messages from the contact page",
        route: Route::AdminMessages,
    },
];
