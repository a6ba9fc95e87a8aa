//! Synthetic re-streaming of an already-materialized answer.
//!
//! Every upstream answer is fully buffered before it reaches a client, so a
//! `stream=true` request is served by replaying the text as paced
//! OpenAI-shaped chunks. Kept separate from the providers so a future
//! provider with real incremental output can bypass it.

use std::convert::Infallible;
use std::time::Duration;

use axum::body::Bytes;
use futures_util::Stream;
use serde_json::json;
use uuid::Uuid;

pub const WORDS_PER_CHUNK: usize = 3;
pub const CHUNK_PACING: Duration = Duration::from_millis(50);

pub const DONE_FRAME: &str = "data: [DONE]\n\n";

/// All SSE frames for `content`, in order: one frame per 3-word window, a
/// closing frame with an empty delta and `finish_reason: "stop"`, then the
/// `[DONE]` sentinel. Deterministic for fixed (content, model, id, created).
pub fn chunk_frames(content: &str, model: &str, completion_id: &str, created: i64) -> Vec<String> {
    let words: Vec<&str> = content.split_whitespace().collect();
    let mut frames = Vec::with_capacity(words.len() / WORDS_PER_CHUNK + 3);

    for (index, window) in words.chunks(WORDS_PER_CHUNK).enumerate() {
        let joined = window.join(" ");
        let delta = if index == 0 {
            joined
        } else {
            format!(" {}", joined)
        };
        frames.push(frame(json!({
            "id": completion_id,
            "object": "chat.completion.chunk",
            "created": created,
            "model": model,
            "choices": [{
                "index": 0,
                "delta": {"content": delta},
                "finish_reason": null
            }]
        })));
    }

    frames.push(frame(json!({
        "id": completion_id,
        "object": "chat.completion.chunk",
        "created": created,
        "model": model,
        "choices": [{
            "index": 0,
            "delta": {},
            "finish_reason": "stop"
        }]
    })));
    frames.push(DONE_FRAME.to_string());
    frames
}

fn frame(chunk: serde_json::Value) -> String {
    format!("data: {}\n\n", chunk)
}

/// Replay `content` as a finite, single-pass chunk stream with a fixed pause
/// after each content chunk. Dropping the stream (client disconnect) stops
/// emission at the next yield point.
pub fn stream_completion(
    content: String,
    model: String,
) -> impl Stream<Item = Result<Bytes, Infallible>> {
    async_stream::stream! {
        let completion_id = stream_id();
        let created = chrono::Utc::now().timestamp();
        let mut frames = chunk_frames(&content, &model, &completion_id, created).into_iter();
        // everything before the closing chunk and the sentinel is paced
        let content_frames = frames.len() - 2;

        for _ in 0..content_frames {
            if let Some(frame) = frames.next() {
                yield Ok(Bytes::from(frame));
                tokio::time::sleep(CHUNK_PACING).await;
            }
        }
        for frame in frames {
            yield Ok(Bytes::from(frame));
        }
    }
}

fn stream_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("chatcmpl-{}", &hex[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deltas(frames: &[String]) -> Vec<serde_json::Value> {
        frames
            .iter()
            .filter(|f| f.as_str() != DONE_FRAME)
            .map(|f| {
                let raw = f.strip_prefix("data: ").unwrap().trim_end();
                serde_json::from_str(raw).unwrap()
            })
            .collect()
    }

    #[test]
    fn five_words_make_two_content_chunks_plus_close() {
        let frames = chunk_frames("a b c d e", "gpt-4o", "chatcmpl-test", 1);
        assert_eq!(frames.len(), 4);
        assert_eq!(frames.last().unwrap(), DONE_FRAME);

        let chunks = deltas(&frames);
        assert_eq!(chunks[0]["choices"][0]["delta"]["content"], "a b c");
        assert_eq!(chunks[0]["choices"][0]["finish_reason"], serde_json::Value::Null);
        // windows after the first are space-prefixed
        assert_eq!(chunks[1]["choices"][0]["delta"]["content"], " d e");
        assert_eq!(chunks[2]["choices"][0]["delta"], json!({}));
        assert_eq!(chunks[2]["choices"][0]["finish_reason"], "stop");
        assert_eq!(chunks[2]["object"], "chat.completion.chunk");
    }

    #[test]
    fn empty_text_still_closes_the_stream() {
        let frames = chunk_frames("", "gpt-4o", "chatcmpl-test", 1);
        assert_eq!(frames.len(), 2);
        let chunks = deltas(&frames);
        assert_eq!(chunks[0]["choices"][0]["finish_reason"], "stop");
        assert_eq!(frames[1], DONE_FRAME);
    }

    #[test]
    fn short_text_is_a_single_window() {
        let frames = chunk_frames("word", "gpt-4o", "chatcmpl-test", 1);
        let chunks = deltas(&frames);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0]["choices"][0]["delta"]["content"], "word");
    }

    #[test]
    fn framing_is_idempotent_per_call() {
        let first = chunk_frames("one two three four", "kimi-k2", "chatcmpl-fixed", 42);
        let second = chunk_frames("one two three four", "kimi-k2", "chatcmpl-fixed", 42);
        assert_eq!(first, second);
    }
}
