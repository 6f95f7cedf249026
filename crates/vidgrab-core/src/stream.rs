//! Byte sources for a chosen media stream.
//!
//! A [`StreamHandle`] pushes its bytes into a sink callback in whatever chunk
//! size the source produces. The orchestrator in [`crate::download`] never sees
//! where bytes come from.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::time::Duration;

/// Callback receiving each chunk; returning an error aborts the transfer.
pub type ChunkSink<'a> = dyn FnMut(&[u8]) -> Result<()> + 'a;

/// A specific encoded track that can be streamed once.
pub trait StreamHandle: Send {
    /// Byte size reported upstream, if any. Not trusted.
    fn total_size(&self) -> Option<u64>;

    /// Push all bytes into `sink`, in order. Returns the number of bytes delivered.
    fn pump(&mut self, sink: &mut ChunkSink<'_>) -> Result<u64>;
}

/// libcurl knobs for [`HttpStream`].
#[derive(Debug, Clone, Copy)]
pub struct TransferOptions {
    pub connect_timeout: Duration,
    /// Abort when the rate stays under 1 KiB/s for this long.
    pub low_speed_time: Duration,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            low_speed_time: Duration::from_secs(60),
        }
    }
}

/// Plain HTTP GET of a direct media URL.
#[derive(Debug, Clone)]
pub struct HttpStream {
    url: String,
    headers: HashMap<String, String>,
    size_hint: Option<u64>,
    options: TransferOptions,
}

impl HttpStream {
    pub fn new(
        url: impl Into<String>,
        headers: HashMap<String, String>,
        size_hint: Option<u64>,
        options: TransferOptions,
    ) -> Self {
        Self {
            url: url.into(),
            headers,
            size_hint,
            options,
        }
    }
}

impl StreamHandle for HttpStream {
    fn total_size(&self) -> Option<u64> {
        self.size_hint
    }

    /// Runs on the current thread; use `spawn_blocking` from async code.
    fn pump(&mut self, sink: &mut ChunkSink<'_>) -> Result<u64> {
        let mut easy = curl::easy::Easy::new();
        easy.url(&self.url).context("invalid URL")?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        // Error bodies must not land in the output file.
        easy.fail_on_error(true)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.low_speed_limit(1024)?;
        easy.low_speed_time(self.options.low_speed_time)?;

        let mut list = curl::easy::List::new();
        for (k, v) in &self.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        if !self.headers.is_empty() {
            easy.http_headers(list)?;
        }

        let mut received = 0u64;
        let mut sink_err: Option<anyhow::Error> = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match sink(data) {
                Ok(()) => {
                    received += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    sink_err = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = sink_err {
            return Err(e);
        }
        performed.context("GET request failed")?;

        let code = easy.response_code().context("no response code")?;
        if !(200..300).contains(&code) {
            anyhow::bail!("GET returned HTTP {}", code);
        }
        tracing::debug!(bytes = received, "stream transfer finished");
        Ok(received)
    }
}

/// In-memory byte source delivering fixed-size chunks.
#[derive(Debug, Clone)]
pub struct MemoryStream {
    data: Vec<u8>,
    chunk_size: usize,
    reported_size: Option<u64>,
    fail_after: Option<usize>,
}

impl MemoryStream {
    /// Source whose reported size equals its real length.
    pub fn new(data: Vec<u8>, chunk_size: usize) -> Self {
        let len = data.len() as u64;
        Self {
            data,
            chunk_size: chunk_size.max(1),
            reported_size: Some(len),
            fail_after: None,
        }
    }

    /// Override the reported size (to model a wrong upstream report).
    pub fn with_reported_size(mut self, size: Option<u64>) -> Self {
        self.reported_size = size;
        self
    }

    /// Fail with a read error once `n` chunks have been delivered.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }
}

impl StreamHandle for MemoryStream {
    fn total_size(&self) -> Option<u64> {
        self.reported_size
    }

    fn pump(&mut self, sink: &mut ChunkSink<'_>) -> Result<u64> {
        let mut delivered = 0u64;
        for (i, chunk) in self.data.chunks(self.chunk_size).enumerate() {
            if self.fail_after == Some(i) {
                anyhow::bail!("source closed after {} bytes", delivered);
            }
            sink(chunk)?;
            delivered += chunk.len() as u64;
        }
        Ok(delivered)
    }
}
