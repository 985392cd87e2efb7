use crate::constants::{GREETING, REQUEST_ERROR};
use crate::core_command::cd::handle_cd_command;
use crate::core_command::command::{BrowseCommand, Request};
use crate::core_command::dir::handle_dir_command;
use crate::core_command::download::handle_download_command;
use crate::core_command::pwd::handle_pwd_command;
use crate::helpers::{read_line, send_line};
use crate::session::Session;
use crate::Config;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

pub async fn start_server(config: Arc<Config>, root_dir: PathBuf) -> Result<()> {
    let address = format!(
        "{}:{}",
        config.server.listen_address, config.server.listen_port
    );
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Server listening on {}", listener.local_addr()?);

    serve(listener, config, root_dir, shutdown_signal()).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for the shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, closing listener");
}

/// Accepts connections until `shutdown` resolves, one task per connection.
pub async fn serve<F>(listener: TcpListener, config: Arc<Config>, root_dir: PathBuf, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => {
                let (socket, addr) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!("Error accepting client connection: {}", e);
                        continue;
                    }
                };
                info!("New connection from {}", addr);

                let config = Arc::clone(&config);
                let session = Session::new(addr.to_string(), root_dir.clone());

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(socket, config, session).await {
                        error!("Connection error for {}: {}", addr, e);
                    }
                    info!("Connection closed for {}", addr);
                });
            }
        }
    }
}

/// Runs the command loop of one session until `BYE`, end of stream or a
/// transport error.
///
/// Failing to read a request ends the session quietly. Failing to write a
/// response is returned to the caller.
pub async fn handle_connection<S>(stream: S, config: Arc<Config>, mut session: Session) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let idle_timeout = config.server.idle_timeout();

    send_line(&mut writer, GREETING).await?;

    while session.is_active {
        let line = match read_line(&mut reader, idle_timeout).await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("{}: Client disconnected", session.peer);
                break;
            }
            Err(e) => {
                warn!("{}: Error reading request, closing connection: {}", session.peer, e);
                break;
            }
        };
        debug!("{}: Received command: {:?}", session.peer, line);
        session.commands_handled += 1;

        let request = Request::parse(&line);
        match request.executable() {
            Some(BrowseCommand::Bye) => {
                info!("{}: BYE received, closing connection", session.peer);
                session.terminate();
            }
            Some(BrowseCommand::Pwd) => handle_pwd_command(&mut writer, &session).await?,
            Some(BrowseCommand::Dir) => handle_dir_command(&mut writer, &session).await?,
            Some(BrowseCommand::Cd) => {
                handle_cd_command(
                    &mut writer,
                    &mut session,
                    request.argument,
                    config.server.restrict_to_root,
                )
                .await?
            }
            Some(BrowseCommand::Download) => {
                handle_download_command(
                    &mut reader,
                    &mut writer,
                    &config,
                    &session,
                    request.argument,
                )
                .await?
            }
            None => {
                warn!("{}: Client sent invalid command: {:?}", session.peer, request.keyword);
                send_line(&mut writer, REQUEST_ERROR).await?;
            }
        }
    }

    session.terminate();
    info!(
        "{}: Session ended after {} commands",
        session.peer, session.commands_handled
    );
    writer.shutdown().await.ok();
    Ok(())
}
