/// Accumulates raw SSE bytes and hands out complete event blocks.
///
/// Bytes are only decoded once a whole block has arrived, so a multibyte
/// character split across network chunks survives intact.
#[derive(Debug, Default)]
pub struct SseBuffer {
    buffer: Vec<u8>,
}

impl SseBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn push_chunk(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Next complete block, with CRLF line endings folded to LF so the
    /// returned text always ends in `\n\n`.
    pub fn next_event_block(&mut self) -> Option<String> {
        let end = block_end(&self.buffer)?;
        let block: Vec<u8> = self.buffer.drain(..end).collect();
        Some(decode(&block))
    }

    /// Whatever is left once the connection closes, if it is not blank.
    pub fn finish(self) -> Option<String> {
        let tail = decode(&self.buffer);
        (!tail.trim().is_empty()).then_some(tail)
    }
}

/// Index just past the first blank line (`\n\n` or `\n\r\n`).
fn block_end(bytes: &[u8]) -> Option<usize> {
    bytes.iter().enumerate().find_map(|(i, &byte)| {
        if byte != b'\n' {
            return None;
        }
        match bytes.get(i + 1..) {
            Some([b'\n', ..]) => Some(i + 2),
            Some([b'\r', b'\n', ..]) => Some(i + 3),
            _ => None,
        }
    })
}

fn decode(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    if text.contains('\r') {
        text.replace("\r\n", "\n")
    } else {
        text.into_owned()
    }
}

pub fn parse_data_lines(event_block: &str) -> Vec<&str> {
    event_block
        .lines()
        .filter_map(|line| {
            line.strip_prefix("data:")
                .map(|data| data.strip_prefix(' ').unwrap_or(data))
        })
        .collect()
}
