//! TTS HTTP Client
//!
//! Posts `{"text", "format"}` to the configured endpoint and writes the
//! audio body to disk as it arrives.

use super::error::ConversionError;
use super::job::{ConversionJob, JobState};
use crate::utils::preview;
use async_trait::async_trait;
use futures::stream::StreamExt;
use reqwest::Client;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Audio format requested from the endpoint; also the scratch file extension.
pub const AUDIO_FORMAT: &str = "wav";

/// Longest error body kept for logs.
const MAX_ERROR_BODY: usize = 512;

/// Turns a job's text into an audio file at the job's destination.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Run the job to a terminal state. On success returns the path of the
    /// completed file.
    async fn convert(&self, job: &mut ConversionJob) -> Result<PathBuf, ConversionError>;
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    format: &'a str,
}

#[derive(Debug, Clone)]
pub struct TtsClient {
    client: Client,
    api_url: String,
}

impl TtsClient {
    /// Build a client for `api_url`. Without a timeout a stalled endpoint
    /// holds the job until the connection drops.
    pub fn new(
        api_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ConversionError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(api_url, builder.build()?))
    }

    pub fn with_client(api_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn request(&self, text: &str) -> Result<reqwest::Response, ConversionError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .json(&SpeechRequest {
                text,
                format: AUDIO_FORMAT,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConversionError::Status {
                status,
                body: preview(&body, MAX_ERROR_BODY),
            });
        }

        Ok(response)
    }

    /// Copy the body stream into `path`. The file handle is closed when this
    /// returns, whatever the outcome.
    async fn write_stream(
        response: reqwest::Response,
        path: &Path,
    ) -> Result<u64, ConversionError> {
        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(ConversionError::StreamWrite)?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(ConversionError::StreamWrite)?;
            written += chunk.len() as u64;
        }

        file.flush().await.map_err(ConversionError::StreamWrite)?;
        Ok(written)
    }
}

#[async_trait]
impl SpeechSynthesizer for TtsClient {
    async fn convert(&self, job: &mut ConversionJob) -> Result<PathBuf, ConversionError> {
        job.advance(JobState::Requesting);
        let response = match self.request(job.source_text()).await {
            Ok(r) => r,
            Err(e) => {
                job.advance(JobState::Failed);
                return Err(e);
            }
        };

        job.advance(JobState::Writing);
        match Self::write_stream(response, job.destination()).await {
            Ok(bytes) => {
                job.advance(JobState::Complete);
                tracing::info!(
                    "TTS: wrote {} bytes of audio to {}",
                    bytes,
                    job.destination().display()
                );
                Ok(job.destination().to_path_buf())
            }
            Err(e) => {
                job.advance(JobState::Failed);
                Err(e)
            }
        }
    }
}

/// Local endpoint that answers 200 with a `Content-Length` larger than the
/// body it sends, then closes the connection. Returns its URL.
#[cfg(test)]
pub(crate) async fn truncated_audio_endpoint() -> String {
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // Read the whole request so the close is a clean FIN.
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= end + 4 + length {
                    break;
                }
            }
        }

        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: audio/wav\r\nContent-Length: 10000\r\n\r\nRIFF\x24\x00\x00\x00WAVE")
            .await
            .unwrap();
        socket.flush().await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{addr}/tts")
}
