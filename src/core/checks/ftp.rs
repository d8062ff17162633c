//! FTP and SFTP reachability checks
//!
//! The FTP check speaks the minimal control-channel dialogue: greeting,
//! login with anonymous fallback, PWD as the trivial operation, QUIT.
//! The SFTP check reads the SSH identification banner as its proof that
//! the endpoint is a live SSH service.

use super::{elapsed_ms, ProtocolCheck};
use crate::core::types::{HealthCheckResult, MonitoredAdapter, ProtocolType};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

const DEFAULT_FTP_PORT: u64 = 21;
const DEFAULT_SFTP_PORT: u64 = 22;
const ANONYMOUS_USER: &str = "anonymous";
const ANONYMOUS_PASS: &str = "anonymous@bridgehub";

/// Reads one FTP reply, consuming continuation lines of multiline replies
/// until the terminal `<code><space>` line.
async fn read_reply(reader: &mut BufReader<OwnedReadHalf>) -> Result<u16, String> {
    loop {
        let mut line = String::new();
        let n = reader
            .read_line(&mut line)
            .await
            .map_err(|e| format!("read failed: {}", e))?;
        if n == 0 {
            return Err("connection closed by server".to_string());
        }
        let trimmed = line.trim_end();
        if trimmed.len() >= 4 && trimmed.as_bytes()[3] == b' ' {
            if let Ok(code) = trimmed[..3].parse::<u16>() {
                return Ok(code);
            }
        } else if trimmed.len() == 3 {
            if let Ok(code) = trimmed.parse::<u16>() {
                return Ok(code);
            }
        }
    }
}

async fn send_command(writer: &mut OwnedWriteHalf, command: &str) -> Result<(), String> {
    writer
        .write_all(format!("{}\r\n", command).as_bytes())
        .await
        .map_err(|e| format!("write failed: {}", e))
}

/// FTP control-channel login and trivial-operation check
pub struct FtpCheck;

impl FtpCheck {
    async fn dialogue(addr: &str, user: &str, pass: &str) -> Result<(), String> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| format!("ftp connect to {} failed: {}", addr, e))?;
        let (read_half, mut writer) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        let greeting = read_reply(&mut reader).await?;
        if greeting != 220 {
            return Err(format!("unexpected ftp greeting ({})", greeting));
        }

        send_command(&mut writer, &format!("USER {}", user)).await?;
        let mut code = read_reply(&mut reader).await?;
        if code == 331 {
            send_command(&mut writer, &format!("PASS {}", pass)).await?;
            code = read_reply(&mut reader).await?;
        }
        if code != 230 {
            return Err(format!("ftp login rejected ({})", code));
        }

        send_command(&mut writer, "PWD").await?;
        let code = read_reply(&mut reader).await?;
        if code != 257 {
            return Err(format!("ftp PWD failed ({})", code));
        }

        let _ = send_command(&mut writer, "QUIT").await;
        Ok(())
    }
}

#[async_trait]
impl ProtocolCheck for FtpCheck {
    fn protocol(&self) -> ProtocolType {
        ProtocolType::Ftp
    }

    async fn check(&self, adapter: &MonitoredAdapter, timeout: Duration) -> HealthCheckResult {
        let start = Instant::now();

        let host = match adapter.config_str("host") {
            Some(h) => h,
            None => {
                return HealthCheckResult::unhealthy(
                    "ftp adapter has no 'host' configured",
                    elapsed_ms(start),
                );
            }
        };
        let port = adapter.config_u64("port").unwrap_or(DEFAULT_FTP_PORT);
        let addr = format!("{}:{}", host, port);
        let user = adapter.config_str("username").unwrap_or(ANONYMOUS_USER);
        let pass = adapter.config_str("password").unwrap_or(ANONYMOUS_PASS);

        match tokio::time::timeout(timeout, Self::dialogue(&addr, user, pass)).await {
            Ok(Ok(())) => HealthCheckResult::healthy(elapsed_ms(start)),
            Ok(Err(reason)) => HealthCheckResult::unhealthy(reason, elapsed_ms(start)),
            Err(_) => HealthCheckResult::unhealthy(
                format!("ftp handshake timed out after {}ms", timeout.as_millis()),
                elapsed_ms(start),
            ),
        }
    }
}

/// SFTP reachability check through the SSH identification banner
pub struct SftpCheck;

impl SftpCheck {
    async fn read_banner(addr: &str) -> Result<(), String> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| format!("sftp connect to {} failed: {}", addr, e))?;
        let mut reader = BufReader::new(stream);
        let mut banner = String::new();
        reader
            .read_line(&mut banner)
            .await
            .map_err(|e| format!("banner read failed: {}", e))?;
        if banner.starts_with("SSH-") {
            Ok(())
        } else {
            Err(format!(
                "endpoint did not identify as an SSH service (got {:?})",
                banner.trim_end()
            ))
        }
    }
}

#[async_trait]
impl ProtocolCheck for SftpCheck {
    fn protocol(&self) -> ProtocolType {
        ProtocolType::Sftp
    }

    async fn check(&self, adapter: &MonitoredAdapter, timeout: Duration) -> HealthCheckResult {
        let start = Instant::now();

        let host = match adapter.config_str("host") {
            Some(h) => h,
            None => {
                return HealthCheckResult::unhealthy(
                    "sftp adapter has no 'host' configured",
                    elapsed_ms(start),
                );
            }
        };
        let port = adapter.config_u64("port").unwrap_or(DEFAULT_SFTP_PORT);
        let addr = format!("{}:{}", host, port);

        match tokio::time::timeout(timeout, Self::read_banner(&addr)).await {
            Ok(Ok(())) => HealthCheckResult::healthy(elapsed_ms(start)),
            Ok(Err(reason)) => HealthCheckResult::unhealthy(reason, elapsed_ms(start)),
            Err(_) => HealthCheckResult::unhealthy(
                format!("sftp banner read timed out after {}ms", timeout.as_millis()),
                elapsed_ms(start),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Minimal FTP server accepting one session. When `password_required`
    /// is false, USER is answered with 230 directly.
    async fn fake_ftp_server(password_required: bool) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read_half, mut writer) = stream.into_split();
            let mut reader = BufReader::new(read_half);
            writer
                .write_all(b"220-Welcome to the drop zone\r\n220 Service ready\r\n")
                .await
                .unwrap();
            let mut line = String::new();
            loop {
                line.clear();
                if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                    break;
                }
                let cmd = line.trim_end();
                if cmd.starts_with("USER") {
                    if password_required {
                        writer.write_all(b"331 Password required\r\n").await.unwrap();
                    } else {
                        writer.write_all(b"230 Logged in\r\n").await.unwrap();
                    }
                } else if cmd.starts_with("PASS") {
                    writer.write_all(b"230 Logged in\r\n").await.unwrap();
                } else if cmd.starts_with("PWD") {
                    writer.write_all(b"257 \"/\" is current\r\n").await.unwrap();
                } else if cmd.starts_with("QUIT") {
                    writer.write_all(b"221 Bye\r\n").await.unwrap();
                    break;
                } else {
                    writer.write_all(b"502 Not implemented\r\n").await.unwrap();
                }
            }
        });
        addr
    }

    fn ftp_adapter(addr: std::net::SocketAddr) -> MonitoredAdapter {
        MonitoredAdapter::new("partner-ftp", "Partner FTP", ProtocolType::Ftp)
            .with_config("host", addr.ip().to_string())
            .with_config("port", addr.port() as u64)
    }

    #[tokio::test]
    async fn test_ftp_login_and_pwd() {
        let addr = fake_ftp_server(true).await;
        let adapter = ftp_adapter(addr)
            .with_config("username", "partner")
            .with_config("password", "secret");
        let result = FtpCheck.check(&adapter, Duration::from_secs(2)).await;
        assert!(result.healthy, "{:?}", result.error);
    }

    #[tokio::test]
    async fn test_ftp_anonymous_fallback() {
        let addr = fake_ftp_server(false).await;
        let adapter = ftp_adapter(addr);
        let result = FtpCheck.check(&adapter, Duration::from_secs(2)).await;
        assert!(result.healthy, "{:?}", result.error);
    }

    #[tokio::test]
    async fn test_ftp_rejected_login() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read_half, mut writer) = stream.into_split();
            let mut reader = BufReader::new(read_half);
            writer.write_all(b"220 ready\r\n").await.unwrap();
            let mut line = String::new();
            let _ = reader.read_line(&mut line).await;
            writer.write_all(b"530 Not logged in\r\n").await.unwrap();
        });

        let adapter = ftp_adapter(addr);
        let result = FtpCheck.check(&adapter, Duration::from_secs(2)).await;
        assert!(!result.healthy);
        assert!(result.error.as_deref().unwrap().contains("login rejected"));
    }

    #[tokio::test]
    async fn test_ftp_connection_refused() {
        let adapter = MonitoredAdapter::new("partner-ftp", "Partner FTP", ProtocolType::Ftp)
            .with_config("host", "127.0.0.1")
            .with_config("port", 1u64);
        let result = FtpCheck.check(&adapter, Duration::from_secs(2)).await;
        assert!(!result.healthy);
        assert!(result.error.as_deref().unwrap().contains("connect"));
    }

    #[tokio::test]
    async fn test_sftp_banner() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            stream.write_all(b"SSH-2.0-OpenSSH_9.6\r\n").await.unwrap();
        });

        let adapter = MonitoredAdapter::new("partner-sftp", "Partner SFTP", ProtocolType::Sftp)
            .with_config("host", addr.ip().to_string())
            .with_config("port", addr.port() as u64);
        let result = SftpCheck.check(&adapter, Duration::from_secs(2)).await;
        assert!(result.healthy, "{:?}", result.error);
    }

    #[tokio::test]
    async fn test_sftp_wrong_banner() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            stream.write_all(b"220 this is ftp\r\n").await.unwrap();
        });

        let adapter = MonitoredAdapter::new("partner-sftp", "Partner SFTP", ProtocolType::Sftp)
            .with_config("host", addr.ip().to_string())
            .with_config("port", addr.port() as u64);
        let result = SftpCheck.check(&adapter, Duration::from_secs(2)).await;
        assert!(!result.healthy);
    }
}
