use crate::{ServiceError, ServiceResult};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

/// Post a JSON body and require a 200 OK. The response body is discarded.
pub async fn post_json<T: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    data: &T,
) -> ServiceResult<()> {
    let response = client.post(url).json(data).send().await?;
    ensure_ok(response).await?;
    Ok(())
}

/// Issue a GET, require a 200 OK and parse the JSON body.
pub async fn get_json<R: DeserializeOwned>(client: &Client, url: &str) -> ServiceResult<R> {
    let response = client.get(url).send().await?;
    let response = ensure_ok(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice::<R>(&bytes)
        .map_err(|e| ServiceError::Decode(format!("Failed to parse response from {url}: {e}")))
}

async fn ensure_ok(response: Response) -> ServiceResult<Response> {
    if response.status() == StatusCode::OK {
        Ok(response)
    } else {
        Err(ServiceError::StatusCode(
            response.status(),
            response.text().await.unwrap_or_default(),
        ))
    }
}
