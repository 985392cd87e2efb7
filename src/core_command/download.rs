use crate::constants::READY;
use crate::core_command::error::TransferError;
use crate::helpers::{join_segment, read_line, send_line};
use crate::session::Session;
use crate::Config;
use log::{error, info, warn};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// State of a single `DOWNLOAD`, from the open source file to the last chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferContext {
    pub path: PathBuf,
    pub file_size: u64,
    pub bytes_sent: u64,
    pub chunks_sent: u64,
}

impl TransferContext {
    pub fn new(path: PathBuf, file_size: u64) -> Self {
        Self {
            path,
            file_size,
            bytes_sent: 0,
            chunks_sent: 0,
        }
    }

    fn record_chunk(&mut self, len: usize) {
        self.bytes_sent += len as u64;
        self.chunks_sent += 1;
    }

    pub fn is_complete(&self) -> bool {
        self.bytes_sent == self.file_size
    }
}

#[derive(Debug)]
pub enum TransferOutcome {
    /// `FNF` was sent, nothing else happened.
    NotFound(TransferError),
    /// The client answered something other than `READY`.
    Declined(TransferContext),
    /// Every announced byte was written.
    Completed(TransferContext),
    /// The source file failed or shrank after the size was announced.
    Abandoned(TransferContext, Option<TransferError>),
}

/// Opens `path` for a transfer, checking that it is a regular file.
pub async fn open_source(path: &Path) -> Result<(File, u64), TransferError> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        _ => return Err(TransferError::NotAFile(path.to_path_buf())),
    };

    let file = File::open(path).await.map_err(|source| TransferError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    Ok((file, metadata.len()))
}

/// Runs the download handshake for `path` and streams the file.
///
/// `FNF` when the file cannot be opened, otherwise `READY`, one line from
/// the client, and on a `READY` answer the decimal size followed by exactly
/// that many raw bytes. Only failures talking to the client are returned as
/// errors; everything else is reported through the outcome.
pub async fn send_file<R, W>(
    reader: &mut R,
    writer: &mut W,
    path: PathBuf,
    chunk_size: usize,
    idle_timeout: Option<Duration>,
) -> io::Result<TransferOutcome>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (file, file_size) = match open_source(&path).await {
        Ok(source) => source,
        Err(e) => {
            if let Some(response) = e.to_response() {
                send_line(writer, response).await?;
            }
            return Ok(TransferOutcome::NotFound(e));
        }
    };
    let context = TransferContext::new(path, file_size);

    send_line(writer, READY).await?;

    match read_line(reader, idle_timeout).await? {
        Some(reply) if reply == READY => {}
        Some(_) => return Ok(TransferOutcome::Declined(context)),
        None => {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "client closed the connection during the download handshake",
            ))
        }
    }

    send_line(writer, &file_size.to_string()).await?;
    stream_file(file, writer, context, chunk_size).await
}

async fn stream_file<W>(
    file: File,
    writer: &mut W,
    mut context: TransferContext,
    chunk_size: usize,
) -> io::Result<TransferOutcome>
where
    W: AsyncWrite + Unpin,
{
    // Never send more than announced, even if the file grew meanwhile.
    let mut source = file.take(context.file_size);
    let mut buffer = vec![0; chunk_size];

    loop {
        let bytes_read = match source.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(read_error) => {
                writer.flush().await?;
                let e = TransferError::SourceRead {
                    path: context.path.clone(),
                    source: read_error,
                };
                return Ok(TransferOutcome::Abandoned(context, Some(e)));
            }
        };
        writer.write_all(&buffer[..bytes_read]).await?;
        context.record_chunk(bytes_read);
    }

    writer.flush().await?;

    if !context.is_complete() {
        return Ok(TransferOutcome::Abandoned(context, None));
    }
    Ok(TransferOutcome::Completed(context))
}

/// Handles the `DOWNLOAD` command.
///
/// The file name is joined onto the session's current directory and handed
/// to [`send_file`]. With `restrict_to_root` set, files outside the start
/// directory answer `FNF` without touching the file.
///
/// # Arguments
///
/// * `reader` - The buffered read half of the client connection, used for the acknowledgment.
/// * `writer` - The write half of the client connection.
/// * `config` - Server configuration (chunk size, idle timeout, root restriction).
/// * `session` - The session requesting the file.
/// * `filename` - Everything after the `DOWNLOAD` keyword, already trimmed.
///
/// # Returns
///
/// Result<(), std::io::Error>, failing only when talking to the client fails.
pub async fn handle_download_command<R, W>(
    reader: &mut R,
    writer: &mut W,
    config: &Config,
    session: &Session,
    filename: &str,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("{}: DOWNLOAD {}", session.peer, filename);
    let path = join_segment(&session.current_dir, filename);

    if config.server.restrict_to_root {
        let refused = match path.canonicalize() {
            Ok(resolved) if session.is_within_root(&resolved) => None,
            Ok(_) => Some(TransferError::OutsideRoot(path.clone())),
            Err(_) => Some(TransferError::NotAFile(path.clone())),
        };
        if let Some(e) = refused {
            warn!("{}: {}", session.peer, e);
            if let Some(response) = e.to_response() {
                send_line(writer, response).await?;
            }
            return Ok(());
        }
    }

    let outcome = send_file(
        reader,
        writer,
        path,
        config.server.download_chunk_size,
        config.server.idle_timeout(),
    )
    .await?;

    match outcome {
        TransferOutcome::NotFound(e) => warn!("{}: {}", session.peer, e),
        TransferOutcome::Declined(context) => {
            warn!("{}: Client has aborted the download of {:?}", session.peer, context.path)
        }
        TransferOutcome::Completed(context) => info!(
            "{}: {:?} sent to client ({} bytes in {} chunks)",
            session.peer, context.path, context.bytes_sent, context.chunks_sent
        ),
        TransferOutcome::Abandoned(context, Some(e)) => error!(
            "{}: Transfer abandoned after {} of {} bytes: {}",
            session.peer, context.bytes_sent, context.file_size, e
        ),
        TransferOutcome::Abandoned(context, None) => error!(
            "{}: {:?} shrank during transfer, sent {} of {} bytes",
            session.peer, context.path, context.bytes_sent, context.file_size
        ),
    }

    Ok(())
}
