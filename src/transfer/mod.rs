//! Streaming upload and download bodies.
//!
//! Uploads are read from a [`BodySource`] in chunks of the configured buffer
//! size. A source can be opened any number of times and every open yields a
//! fresh stream, so an upsert never reuses a stream consumed by an earlier
//! attempt. Downloads are copied chunk by chunk into an `AsyncWrite` sink.

use crate::error::{HcpError, TransferError};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{ready, Stream, StreamExt};
use pin_project_lite::pin_project;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};

/// Upload body: a stream of chunks.
pub type BodyStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + Sync>>;

/// Download body: a stream of chunks.
pub type ResponseStream = BoxStream<'static, io::Result<Bytes>>;

pin_project! {
    /// Adapts an async reader into a stream of chunks of at most `chunk_size`
    /// bytes.
    pub struct ChunkedStream<R> {
        #[pin]
        reader: R,
        chunk_size: usize,
        position: u64,
        done: bool,
    }
}

impl<R: AsyncRead> ChunkedStream<R> {
    /// Create a new chunked stream. A zero chunk size is treated as 1.
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk_size: chunk_size.max(1),
            position: 0,
            done: false,
        }
    }

    /// Bytes yielded so far.
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl<R: AsyncRead> Stream for ChunkedStream<R> {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.done {
            return Poll::Ready(None);
        }

        let mut buffer = vec![0u8; *this.chunk_size];
        let read = {
            let mut read_buf = ReadBuf::new(&mut buffer);
            match ready!(this.reader.poll_read(cx, &mut read_buf)) {
                Ok(()) => read_buf.filled().len(),
                Err(e) => {
                    *this.done = true;
                    return Poll::Ready(Some(Err(e)));
                }
            }
        };

        if read == 0 {
            *this.done = true;
            return Poll::Ready(None);
        }

        buffer.truncate(read);
        *this.position += read as u64;
        Poll::Ready(Some(Ok(Bytes::from(buffer))))
    }
}

/// Wrap an in-memory payload as a single-pass upload body.
pub fn bytes_body(data: impl Into<Bytes>, chunk_size: usize) -> BodyStream {
    let data = data.into();
    let chunk_size = chunk_size.max(1);
    let chunks: Vec<io::Result<Bytes>> = (0..data.len())
        .step_by(chunk_size)
        .map(|start| Ok(data.slice(start..(start + chunk_size).min(data.len()))))
        .collect();
    Box::pin(futures::stream::iter(chunks))
}

/// A reopenable upload source.
#[async_trait]
pub trait BodySource: Send + Sync {
    /// Open a fresh stream over the source's bytes.
    async fn open(&self, buffer_size: usize) -> Result<BodyStream, HcpError>;

    /// Short description used in logs and errors.
    fn describe(&self) -> String;
}

/// In-memory upload source.
#[derive(Debug, Clone)]
pub struct BytesSource {
    data: Bytes,
}

impl BytesSource {
    /// Create a source over the given bytes.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

#[async_trait]
impl BodySource for BytesSource {
    async fn open(&self, buffer_size: usize) -> Result<BodyStream, HcpError> {
        Ok(bytes_body(self.data.clone(), buffer_size))
    }

    fn describe(&self) -> String {
        format!("<{} bytes in memory>", self.data.len())
    }
}

/// Local file upload source. The file is reopened on every `open`.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BodySource for FileSource {
    async fn open(&self, buffer_size: usize) -> Result<BodyStream, HcpError> {
        let file = tokio::fs::File::open(&self.path).await.map_err(|e| {
            TransferError::SourceUnavailable {
                source_name: self.describe(),
                source: e,
            }
        })?;
        Ok(Box::pin(ChunkedStream::new(file, buffer_size)))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Copy a download stream into a sink and flush it. Returns the number of
/// bytes written. The sink is not closed.
pub async fn copy_to_sink<W>(mut stream: ResponseStream, sink: &mut W) -> Result<u64, HcpError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| TransferError::StreamInterrupted {
            bytes_transferred: written,
            message: e.to_string(),
        })?;
        sink.write_all(&chunk).await.map_err(TransferError::Sink)?;
        written += chunk.len() as u64;
    }
    sink.flush().await.map_err(TransferError::Sink)?;
    Ok(written)
}
