pub mod auth_handlers;
pub mod detection_handlers;
pub mod detection_log_handlers;
pub mod favorite_handlers;
pub mod health_handlers;
pub mod medicine_handlers;
pub mod member_handlers;
pub mod search_log_handlers;
