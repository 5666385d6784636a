// REST call helpers shared by every endpoint wrapper

use crate::error::{ApiError, AppError, Result};
use crate::port::{HttpRequest, HttpResponse, Transport, TransportError};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Issue a request and decode a 2xx JSON body into `T`
pub async fn send<T: DeserializeOwned>(transport: &dyn Transport, request: HttpRequest) -> Result<T> {
    let response = issue_checked(transport, request).await?;
    let body = response.body.ok_or_else(|| {
        AppError::Transport(TransportError::InvalidResponse(format!(
            "expected a JSON body with status {}",
            response.status
        )))
    })?;
    Ok(serde_json::from_value(body)?)
}

/// Issue a request whose successful response carries no useful body
pub async fn send_no_content(transport: &dyn Transport, request: HttpRequest) -> Result<()> {
    issue_checked(transport, request).await.map(|_| ())
}

async fn issue_checked(transport: &dyn Transport, request: HttpRequest) -> Result<HttpResponse> {
    let method = request.method;
    let path = request.path.clone();
    let response = transport.issue(request).await?;

    debug!(method = %method, path = %path, status = response.status, "API call completed");

    if response.is_success() {
        Ok(response)
    } else {
        Err(AppError::Api(api_error(response)))
    }
}

/// Build an ApiError from a non-2xx response
///
/// Bodies that are not the server's error shape are kept verbatim in
/// `message`.
pub fn api_error(response: HttpResponse) -> ApiError {
    let status = response.status;
    let mut error = match response.body {
        Some(body) => serde_json::from_value::<ApiError>(body.clone()).unwrap_or_else(|_| ApiError {
            message: body.to_string(),
            ..ApiError::default()
        }),
        None => ApiError::default(),
    };
    error.status = status;
    error
}
