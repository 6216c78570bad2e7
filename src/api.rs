//! Remote solver client: one stateless HTTP POST per call, JSON in/out,
//! license key as a query parameter. Retry policy lives with the callers.

use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::core::config::SolverConfig;
use crate::core::error::SolverError;
use crate::core::types::{
    ArcedSlideRequest, ArcedSlideResponse, MultiPointResponse, PuzzleRequest, PuzzleResponse,
    SemanticShapesRequest, SwapTwoRequest, ThreeByThreeRequest, ThreeByThreeResponse,
    TwoImageRequest,
};

/// Capability interface over the remote solving service. Strategies hold a
/// `&dyn SolverClient` so they are testable without a network.
#[async_trait]
pub trait SolverClient: Send + Sync {
    async fn puzzle(&self, request: &PuzzleRequest) -> Result<PuzzleResponse, SolverError>;

    /// The slide where the piece travels an unpredictable arc and the handle
    /// position is not linearly correlated with the piece position.
    async fn arced_slide(
        &self,
        request: &ArcedSlideRequest,
    ) -> Result<ArcedSlideResponse, SolverError>;

    async fn semantic_shapes(
        &self,
        request: &SemanticShapesRequest,
    ) -> Result<MultiPointResponse, SolverError>;

    /// Indices correspond to the panels laid out row-major:
    /// ```text
    /// 0 1 2
    /// 3 4 5
    /// 6 7 8
    /// ```
    async fn three_by_three(
        &self,
        request: &ThreeByThreeRequest,
    ) -> Result<ThreeByThreeResponse, SolverError>;

    /// First point is where the drag starts, second where it releases.
    async fn swap_two(&self, request: &SwapTwoRequest) -> Result<MultiPointResponse, SolverError>;

    async fn two_image(&self, request: &TwoImageRequest)
        -> Result<MultiPointResponse, SolverError>;
}

/// HTTP implementation of [`SolverClient`]. Holds no per-session state; a
/// single instance may be shared across sessions.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(config: &SolverConfig) -> Result<Self, SolverError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}?licenseKey={}", self.base_url, path, self.api_key)
    }

    async fn post<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, SolverError> {
        let url = self.endpoint(path);
        let resp = self.http.post(&url).json(body).send().await?;
        let status = resp.status().as_u16();
        if !matches!(status, 200 | 201) {
            let body = resp.text().await.unwrap_or_default();
            return Err(map_status(status, body));
        }
        debug!(path, "solver request succeeded");
        // A 2xx with an undecodable body is a broken answer, not a broken
        // connection: it counts against the retry budget like any other
        // contract violation instead of aborting the whole solve.
        resp.json().await.map_err(|e| {
            SolverError::Contract(format!("solver response did not match the expected shape: {e}"))
        })
    }
}

/// Translate a non-2xx solver status into the crate's error taxonomy.
pub fn map_status(status: u16, body: String) -> SolverError {
    match status {
        400 => SolverError::BadRequest(body),
        401 => SolverError::Unauthorized,
        502 => SolverError::ServiceUnavailable,
        _ => SolverError::Api { status, body },
    }
}

#[async_trait]
impl SolverClient for ApiClient {
    async fn puzzle(&self, request: &PuzzleRequest) -> Result<PuzzleResponse, SolverError> {
        self.post("puzzle", request).await
    }

    async fn arced_slide(
        &self,
        request: &ArcedSlideRequest,
    ) -> Result<ArcedSlideResponse, SolverError> {
        self.post("temu-arced-slide", request).await
    }

    async fn semantic_shapes(
        &self,
        request: &SemanticShapesRequest,
    ) -> Result<MultiPointResponse, SolverError> {
        self.post("semantic-shapes", request).await
    }

    async fn three_by_three(
        &self,
        request: &ThreeByThreeRequest,
    ) -> Result<ThreeByThreeResponse, SolverError> {
        self.post("temu-three-by-three", request).await
    }

    async fn swap_two(&self, request: &SwapTwoRequest) -> Result<MultiPointResponse, SolverError> {
        self.post("temu-swap-two", request).await
    }

    async fn two_image(
        &self,
        request: &TwoImageRequest,
    ) -> Result<MultiPointResponse, SolverError> {
        self.post("temu-two-image", request).await
    }
}

/// Turn an `<img src>` value into a raw base64 payload.
///
/// Challenge images are usually inlined as `data:image/png;base64,...`; the
/// part after the comma is the payload. Plain URLs are fetched and encoded.
pub async fn image_src_to_b64(src: &str) -> Result<String, SolverError> {
    if src.starts_with("data:") {
        let (_, data) = src.split_once(',').ok_or_else(|| {
            SolverError::Evidence(format!("malformed data url in image src: {src}"))
        })?;
        return Ok(data.to_string());
    }
    debug!(url = src, "image src is a plain url, downloading");
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let bytes = http.get(src).send().await?.bytes().await?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_matches_taxonomy() {
        assert!(matches!(
            map_status(400, "bad".into()),
            SolverError::BadRequest(_)
        ));
        assert!(matches!(map_status(401, String::new()), SolverError::Unauthorized));
        assert!(matches!(
            map_status(502, String::new()),
            SolverError::ServiceUnavailable
        ));
        assert!(matches!(
            map_status(500, "oops".into()),
            SolverError::Api { status: 500, .. }
        ));
        assert!(matches!(
            map_status(403, String::new()),
            SolverError::Api { status: 403, .. }
        ));
    }

    #[tokio::test]
    async fn data_url_splits_without_network() {
        let b64 = image_src_to_b64("data:image/png;base64,aGVsbG8=").await.unwrap();
        assert_eq!(b64, "aGVsbG8=");
    }

    #[tokio::test]
    async fn malformed_data_url_is_evidence_error() {
        let err = image_src_to_b64("data:image/png;base64").await.unwrap_err();
        assert!(matches!(err, SolverError::Evidence(_)));
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_contract_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = sock.read(&mut buf).await;
            let body = "not json at all";
            let resp = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            sock.write_all(resp.as_bytes()).await.unwrap();
            sock.shutdown().await.ok();
        });

        let mut cfg = crate::core::config::SolverConfig::new("k3y");
        cfg.api_base_url = format!("http://{addr}");
        let client = ApiClient::new(&cfg).unwrap();
        let err = client
            .puzzle(&PuzzleRequest {
                puzzle_image_b64: String::new(),
                piece_image_b64: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SolverError::Contract(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn endpoint_includes_license_key() {
        let mut cfg = crate::core::config::SolverConfig::new("k3y");
        cfg.api_base_url = "https://example.test/api/v1/".into();
        let client = ApiClient::new(&cfg).unwrap();
        assert_eq!(
            client.endpoint("puzzle"),
            "https://example.test/api/v1/puzzle?licenseKey=k3y"
        );
    }
}
