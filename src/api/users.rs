use crate::models::User;
use crate::pipeline::{ApiClient, RequestError};

pub async fn list(client: &ApiClient) -> Result<Vec<User>, RequestError> {
    client.get("/api/v1/users").await
}

pub async fn get(client: &ApiClient, id: &str) -> Result<User, RequestError> {
    client.get(&format!("/api/v1/users/{}", id)).await
}

/// Looks a user up by username rather than id.
pub async fn get_by_username(client: &ApiClient, username: &str) -> Result<User, RequestError> {
    client.get(&format!("/api/v1/usernames/{}", username)).await
}

pub async fn create(client: &ApiClient, user: &User) -> Result<(), RequestError> {
    client.post_unit("/api/v1/users", user).await
}

pub async fn update(client: &ApiClient, id: &str, user: &User) -> Result<(), RequestError> {
    client.put_unit(&format!("/api/v1/users/{}", id), user).await
}

pub async fn delete(client: &ApiClient, id: &str) -> Result<(), RequestError> {
    client.delete_unit(&format!("/api/v1/users/{}", id)).await
}

/// Asks the backend to reset the user's password.
pub async fn reset_password(client: &ApiClient, id: &str) -> Result<(), RequestError> {
    client.get_unit(&format!("/api/v1/users/{}/reset", id)).await
}
