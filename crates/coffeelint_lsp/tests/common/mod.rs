//! Minimal LSP wire helpers for driving the server over in-memory pipes.

#![allow(dead_code)]

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc::UnboundedReceiver;

pub async fn send_msg<W: AsyncWriteExt + Unpin>(writer: &mut W, msg: &str) {
    let content = format!("Content-Length: {}\r\n\r\n{}", msg.len(), msg);
    writer.write_all(content.as_bytes()).await.unwrap();
    writer.flush().await.unwrap();
}

pub async fn recv_msg<R: AsyncReadExt + Unpin>(reader: &mut R) -> Option<String> {
    let mut buffer = Vec::new();
    let mut content_length = 0;

    loop {
        let byte = reader.read_u8().await.ok()?;
        buffer.push(byte);
        if buffer.ends_with(b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buffer);
            for line in headers.lines() {
                if line.to_lowercase().starts_with("content-length:") {
                    let parts: Vec<&str> = line.split(':').collect();
                    if parts.len() == 2 {
                        content_length = parts[1].trim().parse().unwrap_or_else(|e| {
                            panic!("Failed to parse Content-Length: {e}, header: {line}")
                        });
                    }
                }
            }
            break;
        }
    }

    if content_length == 0 {
        return None;
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await.ok()?;

    Some(String::from_utf8(body).unwrap())
}

/// Collects every message whose `method` matches until `window` elapses.
pub async fn collect_method(
    rx: &mut UnboundedReceiver<serde_json::Value>,
    method: &str,
    window: Duration,
) -> Vec<serde_json::Value> {
    let mut found = Vec::new();
    let deadline = tokio::time::sleep(window);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(msg) if msg["method"] == method => found.push(msg),
                Some(_) => {}
                None => break,
            },
            _ = &mut deadline => break,
        }
    }
    found
}

/// Waits for the first message whose `method` matches.
pub async fn wait_for_method(
    rx: &mut UnboundedReceiver<serde_json::Value>,
    method: &str,
    timeout: Duration,
) -> Option<serde_json::Value> {
    tokio::time::timeout(timeout, async {
        while let Some(msg) = rx.recv().await {
            if msg["method"] == method {
                return Some(msg);
            }
        }
        None
    })
    .await
    .ok()
    .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recv_msg_success() {
        let payload = r#"{"jsonrpc":"2.0","method":"abc","params":{}}"#;
        let data = format!("Content-Length: {}\r\n\r\n{}", payload.len(), payload);
        let mut cursor = std::io::Cursor::new(data.into_bytes());

        let result = recv_msg(&mut cursor).await;
        assert_eq!(result.unwrap(), payload);
    }
}
