//! Defines routes for the pocket pharmacist API.
//!
//! ## Structure
//! - **Login endpoints**
//!   - `GET    /oauth2/login` — redirect to the provider consent screen
//!   - `GET    /oauth2/callback` — provider redirect target, sets the cookie
//!   - `GET    /oauth2/login-success` — login confirmation
//!   - `GET    /oauth2/logout` — drop the session, clear the cookie
//!   - `GET    /oauth2/logout-success` — logout confirmation
//!
//! - **Member endpoints**
//!   - `DELETE /members` — soft-delete the logged-in member
//!   - `GET    /my-page/info` — name plus favorite/history counts
//!
//! - **Medicine endpoints**
//!   - `GET    /medicines/id/{id}` — full detail by row id
//!   - `GET    /medicines/code/{code}` — full detail by product code
//!   - `GET    /medicines/search` — paged name search (?keyword=&page=)
//!   - `GET    /medicines/search/related` — name suggestions (?name=)
//!
//! - **Search log endpoints**
//!   - `GET    /search-logs` — recent searches, newest first
//!   - `DELETE /search-logs` — delete one entry (?name=&createdAt=)
//!   - `DELETE /search-logs/all` — clear the list
//!
//! - **Favorite endpoints**
//!   - `POST   /favorites` — save (?medicineId=)
//!   - `GET    /favorites/id/{id}` — raw identifiers of one favorite
//!   - `GET    /favorites/page/{page}` — paged listing (?sort=asc|desc)
//!   - `DELETE /favorites` — delete one (?favoriteId=)
//!   - `DELETE /favorites/all` — empty the drawer
//!
//! - **Detection endpoints**
//!   - `POST   /detection` — detect a pill photo (multipart `image`)
//!   - `POST   /detection-logs` — append a history entry (?medicineId=)
//!   - `GET    /detection-logs/page/{page}` — paged history
//!   - `DELETE /detection-logs` — delete one entry (?detectionLogId=)
//!   - `DELETE /detection-logs/all` — clear the history

use crate::{
    handlers::{
        auth_handlers::{callback, login, login_success, logout, logout_success},
        detection_handlers::detect,
        detection_log_handlers::{
            delete_detection_log, delete_detection_logs, detection_log_page, save_detection_log,
        },
        favorite_handlers::{
            delete_favorite, delete_favorites, favorite_by_id, favorite_page, save_favorite,
        },
        health_handlers::{healthz, readyz},
        medicine_handlers::{
            medicine_by_code, medicine_by_id, related_medicine_names, search_medicines,
        },
        member_handlers::{delete_member, my_page},
        search_log_handlers::{delete_search_log, delete_search_logs, recent_search_logs},
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Build and return the router for every endpoint.
///
/// The router carries shared state (`AppState`) to all handlers.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // login endpoints
        .route("/oauth2/login", get(login))
        .route("/oauth2/callback", get(callback))
        .route("/oauth2/login-success", get(login_success))
        .route("/oauth2/logout", get(logout))
        .route("/oauth2/logout-success", get(logout_success))
        // member endpoints
        .route("/members", delete(delete_member))
        .route("/my-page/info", get(my_page))
        // medicine endpoints
        .route("/medicines/id/{id}", get(medicine_by_id))
        .route("/medicines/code/{code}", get(medicine_by_code))
        .route("/medicines/search", get(search_medicines))
        .route("/medicines/search/related", get(related_medicine_names))
        // search log endpoints
        .route(
            "/search-logs",
            get(recent_search_logs).delete(delete_search_log),
        )
        .route("/search-logs/all", delete(delete_search_logs))
        // favorite endpoints
        .route("/favorites", post(save_favorite).delete(delete_favorite))
        .route("/favorites/id/{id}", get(favorite_by_id))
        .route("/favorites/page/{page}", get(favorite_page))
        .route("/favorites/all", delete(delete_favorites))
        // detection endpoints
        .route("/detection", post(detect))
        .route(
            "/detection-logs",
            post(save_detection_log).delete(delete_detection_log),
        )
        .route("/detection-logs/page/{page}", get(detection_log_page))
        .route("/detection-logs/all", delete(delete_detection_logs))
}
