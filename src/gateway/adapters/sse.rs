/// One decoded server-sent-events frame of a chat completion stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    Data(String),
    Done,
}

/// Incremental line decoder. Chunks may split frames, and multi-byte
/// characters, at arbitrary byte positions; only complete lines are decoded.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();

        while let Some(idx) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let raw_line = self.buffer.drain(..=idx).collect::<Vec<_>>();
            let line = String::from_utf8_lossy(&raw_line[..idx]);
            let line = line.trim_end_matches('\r');

            let Some(data) = line.strip_prefix("data:") else {
                continue;
            };
            let data = data.trim();
            if data.is_empty() {
                continue;
            }
            if data == "[DONE]" {
                frames.push(SseFrame::Done);
                continue;
            }
            frames.push(SseFrame::Data(data.to_string()));
        }

        frames
    }

    /// Flushes a trailing frame that arrived without a final newline.
    pub fn finish(&mut self) -> Vec<SseFrame> {
        if self.buffer.iter().all(u8::is_ascii_whitespace) {
            self.buffer.clear();
            return Vec::new();
        }
        self.push(b"\n")
    }
}
