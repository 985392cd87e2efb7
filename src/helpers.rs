use crate::Config;
use log::info;
use std::io;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

/// Sends one response line to the client and flushes it.
pub async fn send_line<W>(writer: &mut W, line: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

/// Reads one request line from the client with the line terminator removed.
///
/// Returns `Ok(None)` when the client closed the connection. Bytes that are
/// not valid UTF-8 are replaced, so such a line reaches the dispatcher as an
/// unknown request. When `idle_timeout` is set, waiting longer than that
/// fails with `ErrorKind::TimedOut`.
pub async fn read_line<R>(reader: &mut R, idle_timeout: Option<Duration>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buffer = Vec::new();
    let n = match idle_timeout {
        Some(limit) => timeout(limit, reader.read_until(b'\n', &mut buffer))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "client idle timeout elapsed"))??,
        None => reader.read_until(b'\n', &mut buffer).await?,
    };

    if n == 0 {
        return Ok(None);
    }

    while matches!(buffer.last(), Some(b'\n' | b'\r')) {
        buffer.pop();
    }
    Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
}

/// Appends a client supplied name to `base` as a single join. Leading
/// separators are dropped so the result always stays below `base`.
pub fn join_segment(base: &Path, name: &str) -> PathBuf {
    base.join(name.trim_start_matches(|c: char| c == '/' || c == MAIN_SEPARATOR))
}

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    info!("  Listen Address: {}", config.server.listen_address);
    info!("  Listen Port: {}", config.server.listen_port);
    match &config.server.start_dir {
        Some(dir) => info!("  Start Directory: {}", dir.display()),
        None => info!("  Start Directory: <working directory>"),
    }
    info!(
        "  Download Chunk Size: {} KB",
        config.server.download_chunk_size / 1024
    );
    match config.server.idle_timeout_secs {
        Some(secs) => info!("  Idle Timeout: {}s", secs),
        None => info!("  Idle Timeout: disabled"),
    }
    info!("  Restrict To Root: {}", config.server.restrict_to_root);
}
