//! Streaming byte substitution.
//!
//! Catalog JSON is served with its canonical preview base URL rewritten to
//! the local endpoint. Files can be large, so the substitution runs as the
//! bytes stream through rather than on a full in-memory copy. The tricky
//! case is a needle split across read chunks: the reader withholds the
//! longest trailing run that could still start a match and carries it into
//! the next chunk.

use futures::io::AsyncRead;
use std::io;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};

const CHUNK_SIZE: usize = 8192;

/// `AsyncRead` adapter replacing every occurrence of `needle` with
/// `replacement` in the wrapped stream.
pub struct RewriteReader<R> {
    inner: R,
    needle: Vec<u8>,
    replacement: Vec<u8>,
    /// Trailing bytes from the previous chunk that may begin a match.
    carry: Vec<u8>,
    /// Transformed bytes not yet handed to the caller.
    pending: Vec<u8>,
    pos: usize,
    eof: bool,
}

impl<R> RewriteReader<R> {
    pub fn new(inner: R, needle: impl Into<Vec<u8>>, replacement: impl Into<Vec<u8>>) -> Self {
        let needle = needle.into();
        assert!(!needle.is_empty(), "substitution needle must not be empty");
        Self {
            inner,
            needle,
            replacement: replacement.into(),
            carry: Vec::new(),
            pending: Vec::new(),
            pos: 0,
            eof: false,
        }
    }

    /// Transform `carry + chunk`, retaining a new carry for a possible match
    /// straddling into the next chunk.
    fn feed(&mut self, chunk: &[u8]) {
        let mut buf = mem::take(&mut self.carry);
        buf.extend_from_slice(chunk);

        let n = self.needle.len();
        let mut out = Vec::with_capacity(buf.len());
        let mut i = 0;
        while i + n <= buf.len() {
            if buf[i..i + n] == self.needle[..] {
                out.extend_from_slice(&self.replacement);
                i += n;
            } else {
                out.push(buf[i]);
                i += 1;
            }
        }

        let tail = &buf[i..];
        let keep = longest_needle_prefix(tail, &self.needle);
        out.extend_from_slice(&tail[..tail.len() - keep]);
        self.carry = tail[tail.len() - keep..].to_vec();
        self.pending = out;
        self.pos = 0;
    }

    /// Flush the carry untransformed; no more input can complete it.
    fn finish(&mut self) {
        self.pending = mem::take(&mut self.carry);
        self.pos = 0;
    }
}

/// Length of the longest suffix of `tail` that is a proper prefix of
/// `needle`. Those bytes cannot be emitted yet.
fn longest_needle_prefix(tail: &[u8], needle: &[u8]) -> usize {
    let max = tail.len().min(needle.len() - 1);
    for keep in (1..=max).rev() {
        if tail[tail.len() - keep..] == needle[..keep] {
            return keep;
        }
    }
    0
}

impl<R: AsyncRead + Unpin> AsyncRead for RewriteReader<R> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        if buf.is_empty() {
            return Poll::Ready(Ok(0));
        }
        let this = &mut *self;
        loop {
            if this.pos < this.pending.len() {
                let n = (this.pending.len() - this.pos).min(buf.len());
                buf[..n].copy_from_slice(&this.pending[this.pos..this.pos + n]);
                this.pos += n;
                return Poll::Ready(Ok(n));
            }
            if this.eof {
                return Poll::Ready(Ok(0));
            }
            let mut chunk = [0u8; CHUNK_SIZE];
            match Pin::new(&mut this.inner).poll_read(cx, &mut chunk) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(err)) => return Poll::Ready(Err(err)),
                Poll::Ready(Ok(0)) => {
                    this.eof = true;
                    this.finish();
                }
                Poll::Ready(Ok(n)) => this.feed(&chunk[..n]),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::AsyncReadExt;
    use std::collections::VecDeque;

    /// Inner reader that yields its input in fixed pieces so chunk-boundary
    /// behavior can be forced.
    struct ChunkedReader {
        chunks: VecDeque<Vec<u8>>,
    }

    impl ChunkedReader {
        fn new(data: &[u8], chunk_len: usize) -> Self {
            Self {
                chunks: data.chunks(chunk_len).map(<[u8]>::to_vec).collect(),
            }
        }
    }

    impl AsyncRead for ChunkedReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut [u8],
        ) -> Poll<io::Result<usize>> {
            match self.chunks.pop_front() {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Poll::Ready(Ok(chunk.len()))
                }
                None => Poll::Ready(Ok(0)),
            }
        }
    }

    async fn rewrite(data: &str, chunk_len: usize, from: &str, to: &str) -> String {
        let reader = ChunkedReader::new(data.as_bytes(), chunk_len);
        let mut out = String::new();
        RewriteReader::new(reader, from.as_bytes().to_vec(), to.as_bytes().to_vec())
            .read_to_string(&mut out)
            .await
            .expect("read");
        out
    }

    #[async_std::test]
    async fn replaces_needles_within_a_chunk() {
        let out = rewrite(
            r#"{"preview":"https://s.w.org/images/fonts/17.6/previews/a.svg"}"#,
            1024,
            "https://s.w.org/images/fonts",
            "http://localhost:9158/images/fonts",
        )
        .await;
        assert_eq!(
            out,
            r#"{"preview":"http://localhost:9158/images/fonts/17.6/previews/a.svg"}"#
        );
    }

    #[async_std::test]
    async fn replaces_needles_straddling_chunk_boundaries() {
        let input = "xx https://s.w.org/images/fonts/a https://s.w.org/images/fonts/b yy";
        // Every split position must yield the same output.
        for chunk_len in 1..=input.len() {
            let out = rewrite(
                input,
                chunk_len,
                "https://s.w.org/images/fonts",
                "http://localhost:9158/images/fonts",
            )
            .await;
            assert_eq!(
                out,
                "xx http://localhost:9158/images/fonts/a http://localhost:9158/images/fonts/b yy",
                "failed at chunk length {chunk_len}"
            );
        }
    }

    #[async_std::test]
    async fn near_misses_pass_through_unchanged() {
        let input = "https://s.w.org/images/fontfaces and https://s.w.org/images/fon";
        let out = rewrite(input, 7, "https://s.w.org/images/fonts", "local").await;
        assert_eq!(out, input);
    }
}
