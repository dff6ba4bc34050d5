pub mod auth;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod types;

pub use auth::{AuthUser, Claims, JwtKeys};
pub use extract::{ApiJson, ApiQuery};
pub use routes::create_router;
pub use state::AppState;
