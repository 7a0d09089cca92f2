use gloo_console::error;
use gloo_file::File as GlooFile;
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared::{
    BatchResults, BatchStatus, Catalog, CatalogItem, TryAllRequest, TryAllResponse, TryOnRequest,
    TryOnResponse, UploadResponse,
};
use thiserror::Error;

/// Attempts made by [`with_retry`] before giving up.
pub const MAX_ATTEMPTS: u32 = 3;
const RETRY_BASE_MS: u32 = 1000;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error: {status} - {message}")]
    Http { status: u16, message: String },
    /// Application-level failure: `success:false` or an `error` field in an
    /// otherwise well-formed response.
    #[error("{0}")]
    Rejected(String),
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Transport and server errors are worth retrying; an application-level
    /// rejection will not change on a second attempt.
    fn is_transient(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Http { .. })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

async fn send(request: Request) -> Result<Response, ApiError> {
    request.send().await.map_err(|err| {
        error!(format!("Fetch error: {err:?}"));
        ApiError::Network(err.to_string())
    })
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.ok() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.error)
            .unwrap_or(text);
        return Err(ApiError::Http { status, message });
    }
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

/// Wraps a mutating call with up to [`MAX_ATTEMPTS`] tries and linearly
/// increasing backoff. `on_retry` fires before each re-attempt so the UI can
/// surface a warning. Reads and the poll loop never go through here.
pub async fn with_retry<T, F, Fut>(mut op: F, on_retry: impl Fn(u32)) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < MAX_ATTEMPTS => {
                log::warn!("request failed (attempt {attempt}/{MAX_ATTEMPTS}): {err}");
                on_retry(attempt);
                TimeoutFuture::new(RETRY_BASE_MS * attempt).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

pub async fn fetch_catalog() -> Result<Vec<CatalogItem>, ApiError> {
    let response = send(Request::get("/catalog").build().map_err(into_network)?).await?;
    let catalog: Catalog = parse_json(response).await?;
    Ok(catalog.items)
}

/// `POST /upload`: multipart form with the photo under `user_image`.
/// Resolves to the session identifier.
pub async fn upload_photo(file: GlooFile, on_retry: impl Fn(u32)) -> Result<String, ApiError> {
    with_retry(
        || {
            let file = file.clone();
            async move {
                let form = web_sys::FormData::new()
                    .map_err(|_| ApiError::Network("form construction failed".into()))?;
                form.append_with_blob("user_image", file.as_ref())
                    .map_err(|_| ApiError::Network("form construction failed".into()))?;
                let request = Request::post("/upload").body(form).map_err(into_network)?;
                let body: UploadResponse = parse_json(send(request).await?).await?;
                if body.success {
                    body.session_id
                        .filter(|id| !id.is_empty())
                        .ok_or_else(|| ApiError::Decode("response carried no session_id".into()))
                } else {
                    Err(ApiError::Rejected(
                        body.error.unwrap_or_else(|| "Upload failed".into()),
                    ))
                }
            }
        },
        on_retry,
    )
    .await
}

/// `POST /try-on`: resolves to the produced result filename.
pub async fn try_on(
    session_id: String,
    clothing_item: String,
    on_retry: impl Fn(u32),
) -> Result<String, ApiError> {
    let payload = TryOnRequest {
        session_id,
        clothing_item,
    };
    with_retry(
        || {
            let payload = payload.clone();
            async move {
                let request = Request::post("/try-on")
                    .json(&payload)
                    .map_err(into_network)?;
                let body: TryOnResponse = parse_json(send(request).await?).await?;
                if body.success {
                    body.result_filename
                        .filter(|name| !name.is_empty())
                        .ok_or_else(|| ApiError::Decode("response carried no result".into()))
                } else {
                    Err(ApiError::Rejected(
                        body.error.unwrap_or_else(|| "Try-on failed".into()),
                    ))
                }
            }
        },
        on_retry,
    )
    .await
}

/// `POST /try-all`: resolves to the number of items the batch will process.
pub async fn try_all(session_id: String, on_retry: impl Fn(u32)) -> Result<u32, ApiError> {
    let payload = TryAllRequest { session_id };
    with_retry(
        || {
            let payload = payload.clone();
            async move {
                let request = Request::post("/try-all")
                    .json(&payload)
                    .map_err(into_network)?;
                let body: TryAllResponse = parse_json(send(request).await?).await?;
                if body.success {
                    Ok(body.total_items)
                } else {
                    Err(ApiError::Rejected(body.error.unwrap_or_else(|| {
                        "Failed to start batch processing".into()
                    })))
                }
            }
        },
        on_retry,
    )
    .await
}

/// `GET /try-all-status/{session_id}`. Fails fast: the poll loop stops on
/// the first error instead of retrying.
pub async fn batch_status(session_id: &str) -> Result<BatchStatus, ApiError> {
    let url = format!("/try-all-status/{session_id}");
    let request = Request::get(&url).build().map_err(into_network)?;
    let mut status: BatchStatus = parse_json(send(request).await?).await?;
    if let Some(message) = status.error.take() {
        return Err(ApiError::Rejected(message));
    }
    Ok(status)
}

/// `GET /try-all-results/{session_id}`: the document backing the results page.
pub async fn batch_results(session_id: &str) -> Result<BatchResults, ApiError> {
    let url = format!("/try-all-results/{session_id}");
    let request = Request::get(&url).build().map_err(into_network)?;
    let mut results: BatchResults = parse_json(send(request).await?).await?;
    if let Some(message) = results.error.take() {
        return Err(ApiError::Rejected(message));
    }
    Ok(results)
}

fn into_network(err: gloo_net::Error) -> ApiError {
    ApiError::Network(err.to_string())
}
