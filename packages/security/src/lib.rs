// ABOUTME: Authentication and authorization primitives
// ABOUTME: Roles, user accounts, Argon2 password hashing and HMAC-signed access tokens

pub mod password;
pub mod roles;
pub mod tokens;
pub mod users;

// Re-export main types for convenience
pub use password::{hash_password, verify_password, PasswordError};
pub use roles::Role;
pub use tokens::{Claims, IssuedToken, TokenError, TokenService};
pub use users::storage::UserStorage;
pub use users::{NewUser, User, UserError};
