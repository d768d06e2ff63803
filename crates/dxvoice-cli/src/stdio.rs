//! JSON-lines transport between a session and the process's stdin/stdout.

use dxvoice_session::{SessionEvent, SessionUpdate};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// Reads one `SessionEvent` per line and forwards it to `events`.
///
/// Blank lines are skipped and undecodable lines are logged and skipped.
/// Returns when the input ends, after an `end` event, or when the session
/// stops listening.
pub async fn read_events<R>(reader: R, events: mpsc::Sender<SessionEvent>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0u64;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event: SessionEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(line = line_no, "skipping invalid event: {}", e);
                continue;
            }
        };

        let is_end = event == SessionEvent::End;
        if events.send(event).await.is_err() || is_end {
            break;
        }
    }
    Ok(())
}

/// Writes each update as one JSON line, flushing after every line.
pub async fn write_updates<W>(
    mut updates: mpsc::Receiver<SessionUpdate>,
    mut writer: W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(update) = updates.recv().await {
        let mut line = serde_json::to_vec(&update)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxvoice_types::AgentState;

    #[tokio::test]
    async fn skips_blank_and_invalid_lines() {
        let input: &[u8] = b"\n{\"type\":\"agent_state\",\"state\":\"listening\"}\nnot json\n{\"type\":\"bogus\"}\n{\"type\":\"end\"}\n{\"type\":\"start\"}\n";
        let (tx, mut rx) = mpsc::channel(8);

        read_events(input, tx).await.unwrap();

        assert_eq!(
            rx.recv().await,
            Some(SessionEvent::AgentState {
                state: AgentState::Listening
            })
        );
        assert_eq!(rx.recv().await, Some(SessionEvent::End));
        assert_eq!(rx.recv().await, None, "nothing is read after end");
    }

    #[tokio::test]
    async fn writes_one_line_per_update() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(SessionUpdate::Disconnect).await.unwrap();
        tx.send(SessionUpdate::Error {
            message: "failed to fetch connection details".to_string(),
        })
        .await
        .unwrap();
        drop(tx);

        let mut out = Vec::new();
        write_updates(rx, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"type":"disconnect"}"#);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["type"], "error");
        assert_eq!(second["message"], "failed to fetch connection details");
    }
}
