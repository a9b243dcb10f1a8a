//! Run log streams.

use super::http::map_http_error;
use crate::error::ApiResult;
use reqwest::Response;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Lazy, possibly unbounded sequence of log lines. Consumers stop at the
/// first `Err`.
pub struct LogStream {
    inner: Box<dyn Iterator<Item = ApiResult<String>>>,
}

impl LogStream {
    pub fn new<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = ApiResult<String>>,
        I::IntoIter: 'static,
    {
        Self {
            inner: Box::new(lines.into_iter()),
        }
    }

    /// Stream over an HTTP body, pulling one chunk per refill.
    pub(crate) fn from_response(runtime: Arc<Runtime>, response: Response) -> Self {
        Self::new(BodyLines {
            runtime,
            response: Some(response),
            buffer: Vec::new(),
            pending: VecDeque::new(),
        })
    }
}

impl Iterator for LogStream {
    type Item = ApiResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl fmt::Debug for LogStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LogStream(..)")
    }
}

struct BodyLines {
    runtime: Arc<Runtime>,
    response: Option<Response>,
    buffer: Vec<u8>,
    pending: VecDeque<String>,
}

impl BodyLines {
    fn split_complete_lines(&mut self) {
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.pending.push_back(decode_line(&line[..line.len() - 1]));
        }
    }
}

impl Iterator for BodyLines {
    type Item = ApiResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(Ok(line));
            }
            let Some(response) = self.response.as_mut() else {
                // Body finished; flush a trailing line without newline.
                if self.buffer.is_empty() {
                    return None;
                }
                let rest = std::mem::take(&mut self.buffer);
                return Some(Ok(decode_line(&rest)));
            };
            match self.runtime.block_on(response.chunk()) {
                Ok(Some(bytes)) => {
                    self.buffer.extend_from_slice(&bytes);
                    self.split_complete_lines();
                }
                Ok(None) => self.response = None,
                Err(e) => {
                    self.response = None;
                    self.buffer.clear();
                    return Some(Err(map_http_error(e)));
                }
            }
        }
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let line = String::from_utf8_lossy(bytes);
    line.strip_suffix('\r').unwrap_or(&line).to_string()
}
