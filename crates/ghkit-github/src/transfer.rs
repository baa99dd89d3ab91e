//! Progress-tracked byte transfers.
//!
//! A [`Transfer`] wraps any chunked byte source (a response body or a file
//! reader) and yields `(chunk, progress)` pairs, where progress is the
//! fraction of the total length transferred so far, or `None` when the total
//! is unknown.
//!
//! The source is owned by the transfer and released exactly once: when it is
//! exhausted, when it fails, or when the transfer is dropped early.

use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use ghkit_core::{Error, Result};
use tokio_util::io::ReaderStream;

/// Bytes read from a file per upload chunk.
pub const UPLOAD_CHUNK_SIZE: usize = 4096;

/// A single-pass stream of `(chunk, progress)` pairs.
pub struct Transfer {
    source: Option<BoxStream<'static, Result<Bytes>>>,
    length: Option<u64>,
    transferred: u64,
    url: String,
}

impl Transfer {
    /// Wrap a chunk source.
    ///
    /// A `length` of zero is treated like an unknown length.
    pub fn new<S>(source: S, length: Option<u64>, url: impl Into<String>) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self {
            source: Some(source.boxed()),
            length: length.filter(|l| *l > 0),
            transferred: 0,
            url: url.into(),
        }
    }

    /// Wrap a streaming response body.
    ///
    /// `known_length` wins over the `content-length` header.
    pub fn from_response(response: reqwest::Response, known_length: Option<u64>) -> Result<Self> {
        if !response.status().is_success() {
            return Err(Error::from_status(
                response.status().as_u16(),
                format!("Download of {} failed", response.url()),
            ));
        }

        let length = known_length.or_else(|| response.content_length());
        let url = response.url().to_string();
        let source = response
            .bytes_stream()
            .map_err(|e| Error::Http(e.to_string()));

        Ok(Self::new(source, length, url))
    }

    /// Total length in bytes, if known.
    pub fn length(&self) -> Option<u64> {
        self.length
    }

    /// Where the bytes come from or go to. Informational only.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Bytes yielded so far.
    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    /// Whether the underlying source has been released.
    pub fn is_finished(&self) -> bool {
        self.source.is_none()
    }

    /// Drop the progress values, leaving a plain byte stream (e.g. a request body).
    pub fn into_bytes_stream(self) -> impl Stream<Item = Result<Bytes>> + Send + 'static {
        self.map_ok(|(chunk, _)| chunk)
    }

    /// Drain the transfer, writing every chunk to `writer`.
    pub async fn write_to<W>(mut self, writer: &mut W) -> Result<u64>
    where
        W: tokio::io::AsyncWrite + Unpin,
    {
        use tokio::io::AsyncWriteExt;

        while let Some((chunk, _)) = self.try_next().await? {
            writer.write_all(&chunk).await?;
        }
        writer.flush().await?;
        Ok(self.transferred)
    }

    fn progress(&self) -> Option<f64> {
        self.length
            .map(|length| self.transferred as f64 / length as f64)
    }
}

impl Stream for Transfer {
    type Item = Result<(Bytes, Option<f64>)>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Some(source) = self.source.as_mut() else {
            return Poll::Ready(None);
        };

        match source.as_mut().poll_next(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(Ok(chunk))) => {
                self.transferred += chunk.len() as u64;
                let progress = self.progress();
                Poll::Ready(Some(Ok((chunk, progress))))
            }
            Poll::Ready(Some(Err(e))) => {
                self.source = None;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                self.source = None;
                Poll::Ready(None)
            }
        }
    }
}

impl std::fmt::Debug for Transfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transfer")
            .field("url", &self.url)
            .field("length", &self.length)
            .field("transferred", &self.transferred)
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Prepare an upload of the file at `path`.
///
/// The file size is read once here. The file itself is opened when the first
/// chunk is requested and read in [`UPLOAD_CHUNK_SIZE`] blocks.
pub async fn upload(path: &Path) -> Result<Transfer> {
    let metadata = tokio::fs::metadata(path).await?;
    if !metadata.is_file() {
        return Err(Error::InvalidData(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    let open_path = path.to_path_buf();
    let source = stream::once(async move { tokio::fs::File::open(open_path).await })
        .map_ok(|file| ReaderStream::with_capacity(file, UPLOAD_CHUNK_SIZE))
        .try_flatten()
        .map_err(Error::from);

    Ok(Transfer::new(
        source,
        Some(metadata.len()),
        path.display().to_string(),
    ))
}
