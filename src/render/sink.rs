//! Destinations for rendered chunks.
//!
//! A [`Sink`] receives text chunks in output order and is finished exactly once, either
//! with [`Sink::complete`] or with [`Sink::fail`]. A failed render never looks like a
//! completed one from the sink's side, so a transport can tell a truncated response from
//! a whole one.

use std::future::Future;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::core::{RenderError, Result};

/// Backpressure signal returned by [`Sink::accept`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep sending.
    Continue,
    /// Send nothing more; the renderer stops pulling fragments.
    Stop,
}

/// Consumer of rendered chunks.
///
/// The renderer calls [`accept`](Self::accept) once before each deferred value it awaits
/// and once at the end, then exactly one of [`complete`](Self::complete) or
/// [`fail`](Self::fail), unless the sink stopped the render first. Chunks can be empty.
pub trait Sink: Send {
    /// Take one chunk. Waiting here is how a sink applies backpressure.
    ///
    /// # Errors
    ///
    /// A sink that cannot deliver the chunk returns an error, usually
    /// [`RenderError::Sink`]. The render then aborts and [`fail`](Self::fail) is called
    /// with that error.
    fn accept(&mut self, chunk: String) -> impl Future<Output = Result<Flow>> + Send;

    /// The render finished; no more chunks follow.
    ///
    /// # Errors
    ///
    /// An error here, such as a failed flush, turns the render into a failed one and
    /// [`fail`](Self::fail) is called with it.
    fn complete(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// The render aborted with `error`; no more chunks follow.
    fn fail(&mut self, error: &RenderError) -> impl Future<Output = ()> + Send;

    /// Resolves once nobody is left to read further chunks.
    ///
    /// The renderer races this against each pending deferred value and cancels the render
    /// when it fires. The default never resolves.
    fn closed(&self) -> impl Future<Output = ()> + Send {
        std::future::pending()
    }
}

/// Terminal state of a [`BufferSink`].
#[derive(Debug, Clone, Default)]
pub enum SinkStatus {
    /// Still receiving, or cancelled.
    #[default]
    Open,
    /// [`Sink::complete`] was called.
    Completed,
    /// [`Sink::fail`] was called.
    Failed(RenderError),
}

/// Collects chunks in memory.
///
/// With a limit set, [`Flow::Stop`] is returned once that many chunks have arrived,
/// which makes it handy for exercising cancellation.
#[derive(Debug, Default)]
pub struct BufferSink {
    chunks: Vec<String>,
    status: SinkStatus,
    limit: Option<usize>,
}

impl BufferSink {
    /// An unlimited buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer that asks the renderer to stop after `limit` chunks.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// The chunks received so far, in order.
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// All chunks joined.
    pub fn concat(&self) -> String {
        self.chunks.concat()
    }

    /// Consume the sink, returning its chunks.
    pub fn into_chunks(self) -> Vec<String> {
        self.chunks
    }

    /// How the sink was finished.
    pub fn status(&self) -> &SinkStatus {
        &self.status
    }

    /// Whether [`Sink::complete`] was called.
    pub fn is_completed(&self) -> bool {
        matches!(self.status, SinkStatus::Completed)
    }

    /// Whether [`Sink::fail`] was called.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, SinkStatus::Failed(_))
    }
}

impl Sink for BufferSink {
    async fn accept(&mut self, chunk: String) -> Result<Flow> {
        self.chunks.push(chunk);
        match self.limit {
            Some(limit) if self.chunks.len() >= limit => Ok(Flow::Stop),
            _ => Ok(Flow::Continue),
        }
    }

    async fn complete(&mut self) -> Result<()> {
        self.status = SinkStatus::Completed;
        Ok(())
    }

    async fn fail(&mut self, error: &RenderError) {
        self.status = SinkStatus::Failed(error.clone());
    }
}

/// Forwards chunks into a bounded tokio channel.
///
/// A full channel makes the renderer wait; a dropped receiver stops it, even while a
/// deferred value is still pending. A failure is
/// delivered as a final `Err` item; completion is signalled by the channel closing
/// after the last `Ok` item.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::Sender<Result<String>>,
}

impl ChannelSink {
    /// Wrap an existing sender.
    pub fn new(tx: mpsc::Sender<Result<String>>) -> Self {
        Self {
            tx,
        }
    }

    /// Create a sink and the receiver for its chunks. A capacity of zero is raised to one.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Result<String>>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

impl Sink for ChannelSink {
    async fn accept(&mut self, chunk: String) -> Result<Flow> {
        match self.tx.send(Ok(chunk)).await {
            Ok(()) => Ok(Flow::Continue),
            Err(_) => Ok(Flow::Stop),
        }
    }

    async fn complete(&mut self) -> Result<()> {
        Ok(())
    }

    async fn fail(&mut self, error: &RenderError) {
        // Nobody left to tell if the receiver is gone.
        let _ = self.tx.send(Err(error.clone())).await;
    }

    async fn closed(&self) {
        self.tx.closed().await;
    }
}

/// Writes chunks to an async byte writer such as a socket or a file.
///
/// Empty chunks are skipped. On completion the writer is flushed and shut down. On
/// failure it is left open and
/// unflushed and the sink reports [`is_failed`](Self::is_failed), so the owner can
/// abort the connection instead of ending it cleanly.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
    bytes_written: u64,
    failed: bool,
}

impl<W> WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            bytes_written: 0,
            failed: false,
        }
    }

    /// Bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Whether the render failed.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> Sink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn accept(&mut self, chunk: String) -> Result<Flow> {
        if chunk.is_empty() {
            return Ok(Flow::Continue);
        }
        self.writer.write_all(chunk.as_bytes()).await?;
        self.bytes_written += chunk.len() as u64;
        Ok(Flow::Continue)
    }

    async fn complete(&mut self) -> Result<()> {
        self.writer.flush().await?;
        self.writer.shutdown().await?;
        Ok(())
    }

    async fn fail(&mut self, _error: &RenderError) {
        self.failed = true;
    }
}
