pub mod error;
pub mod messages;
pub mod service;

use axum::{
    Router,
    routing::{get, MethodRouter},
};

pub use service::{MessageService, ServiceError};

/// Routes for the messenger HTTP surface. Layers (CORS, tracing) are added
/// by the binary.
pub fn router(service: MessageService) -> Router {
    Router::new()
        .route("/messenger", collection())
        .route("/messenger/", collection())
        .route(
            "/messenger/{id}",
            get(messages::get_messages).patch(messages::patch_message),
        )
        .with_state(service)
}

fn collection() -> MethodRouter<MessageService> {
    get(messages::get_all)
        .post(messages::post_message)
        .delete(messages::delete_messages)
}
