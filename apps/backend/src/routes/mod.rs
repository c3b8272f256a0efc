pub mod chat;
pub mod health;
pub mod rooms;
pub mod wallet;

use actix_web::web;

/// Register every route group on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    health::configure_routes(cfg);
    rooms::configure_routes(cfg);
    chat::configure_routes(cfg);
    wallet::configure_routes(cfg);
}
