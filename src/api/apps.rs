use crate::models::App;
use crate::pipeline::{ApiClient, RequestError};

pub async fn list(client: &ApiClient) -> Result<Vec<App>, RequestError> {
    client.get("/api/v1/apps").await
}

pub async fn create(client: &ApiClient, app: &App) -> Result<(), RequestError> {
    client.post_unit("/api/v1/apps", app).await
}

pub async fn update(client: &ApiClient, id: &str, app: &App) -> Result<(), RequestError> {
    client.put_unit(&format!("/api/v1/apps/{}", id), app).await
}

pub async fn delete(client: &ApiClient, id: &str) -> Result<(), RequestError> {
    client.delete_unit(&format!("/api/v1/apps/{}", id)).await
}
