// src/core_command/pwd.rs
use crate::helpers::send_line;
use crate::session::Session;
use log::info;
use tokio::io::AsyncWrite;

/// Handles the `PWD` command by echoing the session's current directory.
///
/// # Arguments
///
/// * `writer` - The write half of the client connection.
/// * `session` - The session whose directory is reported.
pub async fn handle_pwd_command<W>(writer: &mut W, session: &Session) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let response = session.current_dir.display().to_string();
    info!("{}: PWD -> {}", session.peer, response);
    send_line(writer, &response).await
}
