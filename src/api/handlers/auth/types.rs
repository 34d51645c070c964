//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TokenData {
    pub token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RefreshUser {
    pub username: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RefreshData {
    pub token: String,
    pub user: RefreshUser,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ProfileData {
    pub id: String,
    pub username: String,
}
