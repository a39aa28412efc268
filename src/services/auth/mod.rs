pub mod access_jwt;
pub mod error;
pub mod factory;
pub mod gate;
pub mod role;

pub use access_jwt::{AccessClaims, AuthService};
pub use error::AuthError;
pub use factory::build_auth_service;
pub use gate::AccessGate;
pub use role::{Role, RolePolicy};
