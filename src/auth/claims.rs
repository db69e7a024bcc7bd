use serde::{Deserialize, Serialize};

/// JWT payload carried in the `Authorization` header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64, // admin user ID
    pub iss: String,  // issuer
    pub nbf: i64,     // not valid before (unix timestamp)
    pub exp: i64,     // expires at (unix timestamp)
}
