use crate::models::{Role, RoleName};
use crate::pipeline::{ApiClient, RequestError};

pub async fn list(client: &ApiClient) -> Result<Vec<Role>, RequestError> {
    client.get("/api/v1/roles").await
}

/// Id/name pairs only, for pickers.
pub async fn names(client: &ApiClient) -> Result<Vec<RoleName>, RequestError> {
    client.get("/api/v1/rolenames").await
}

pub async fn create(client: &ApiClient, role: &Role) -> Result<(), RequestError> {
    client.post_unit("/api/v1/roles", role).await
}

pub async fn update(client: &ApiClient, id: &str, role: &Role) -> Result<(), RequestError> {
    client.put_unit(&format!("/api/v1/roles/{}", id), role).await
}

pub async fn delete(client: &ApiClient, id: &str) -> Result<(), RequestError> {
    client.delete_unit(&format!("/api/v1/roles/{}", id)).await
}
