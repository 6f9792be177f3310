//! Static admin pages under `/admin`, behind [`admin_guard`].

use std::path::Path;

use axum::{Router, middleware::from_fn_with_state};
use tower_http::services::{ServeDir, ServeFile};

use crate::middleware::admin_guard;
use crate::state::AppState;

/// Page routes and the HTML file each one serves.
const PAGES: &[(&str, &str)] = &[
    ("/admin", "index.html"),
    ("/admin/", "index.html"),
    ("/admin/login", "login.html"),
    ("/admin/orders", "orders.html"),
    ("/admin/products", "products.html"),
    ("/admin/settings", "settings.html"),
    ("/admin/users", "users.html"),
];

/// Build the admin pages router.
pub fn router(admin_dir: &Path, state: AppState) -> Router<AppState> {
    let mut router = Router::new();
    for (path, file) in PAGES {
        router = router.route_service(path, ServeFile::new(admin_dir.join(file)));
    }

    router
        .nest_service("/admin/assets", ServeDir::new(admin_dir.join("assets")))
        .route_layer(from_fn_with_state(state, admin_guard))
}
