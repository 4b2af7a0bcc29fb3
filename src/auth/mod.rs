//! Token issuance and credential hashing
//!
//! - `token`: signed bearer token construction and verification
//! - `password`: bcrypt password hashing

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{issue_token, verify_token, AccessClaims, IssuedToken, TokenSettings};
