//! Loopback server for the OAuth redirect leg.
//!
//! Sign-in opens the hosted authorize URL in the system browser. Once the
//! provider flow completes, the browser is redirected back to
//! `http://127.0.0.1:{port}/auth/callback?code=...`. This module binds an
//! ephemeral loopback port, waits for that single request, shows a small
//! confirmation page, and hands the authorization code back to the caller.

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const CALLBACK_PATH: &str = "/auth/callback";
const MAX_REQUEST_BYTES: usize = 8192;

const SUCCESS_PAGE: &str = "<!DOCTYPE html><html><head><title>Markstash</title></head>\
<body style=\"font-family: system-ui, sans-serif; background: #1a1a2e; color: #eee; \
display: flex; align-items: center; justify-content: center; height: 100vh; margin: 0;\">\
<div style=\"text-align: center;\"><h1 style=\"color: #667eea;\">You're signed in</h1>\
<p>You can close this tab and return to Markstash.</p></div></body></html>";

const FAILURE_PAGE: &str = "<!DOCTYPE html><html><head><title>Markstash</title></head>\
<body style=\"font-family: system-ui, sans-serif; background: #1a1a2e; color: #eee; \
display: flex; align-items: center; justify-content: center; height: 100vh; margin: 0;\">\
<div style=\"text-align: center;\"><h1 style=\"color: #e74c3c;\">Sign-in did not complete</h1>\
<p>You can close this tab and try again from Markstash.</p></div></body></html>";

const NOT_FOUND_PAGE: &str = "<!DOCTYPE html><html><body>Not found</body></html>";

#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("I/O error while waiting for the sign-in redirect: {0}")]
    Io(#[from] std::io::Error),
    #[error("Sign-in was denied: {0}")]
    Denied(String),
    #[error("The sign-in redirect did not include an authorization code")]
    MissingCode,
}

/// One-shot loopback listener for the browser redirect.
#[derive(Debug)]
pub struct OAuthCallbackServer {
    listener: TcpListener,
    port: u16,
}

impl OAuthCallbackServer {
    /// Binds an ephemeral loopback port for the redirect.
    pub async fn bind() -> Result<Self, CallbackError> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let port = listener.local_addr()?.port();
        Ok(Self { listener, port })
    }

    /// The redirect URL to register with the authorize request.
    pub fn redirect_url(&self) -> String {
        format!("http://127.0.0.1:{}{CALLBACK_PATH}", self.port)
    }

    /// Waits for the browser redirect and extracts the authorization code.
    ///
    /// Requests for other paths (favicon probes and the like) receive a 404
    /// and do not end the wait. The wait has no timeout; dropping the future
    /// releases the listener.
    pub async fn wait_for_code(self) -> Result<String, CallbackError> {
        loop {
            let (mut socket, _peer) = self.listener.accept().await?;

            let mut buffer = vec![0u8; MAX_REQUEST_BYTES];
            let read = match socket.read(&mut buffer).await {
                Ok(read) => read,
                Err(error) => {
                    tracing::debug!("Failed to read callback request: {}", error);
                    continue;
                }
            };
            let request = String::from_utf8_lossy(&buffer[..read]);

            let Some(target) = request_target(&request) else {
                let _ = respond(&mut socket, "400 Bad Request", NOT_FOUND_PAGE).await;
                continue;
            };
            if !target.starts_with(CALLBACK_PATH) {
                tracing::debug!("Ignoring request for {} during sign-in", target);
                let _ = respond(&mut socket, "404 Not Found", NOT_FOUND_PAGE).await;
                continue;
            }

            return match parse_callback_query(target) {
                CallbackOutcome::Code(code) => {
                    respond(&mut socket, "200 OK", SUCCESS_PAGE).await?;
                    Ok(code)
                }
                CallbackOutcome::Denied(reason) => {
                    respond(&mut socket, "200 OK", FAILURE_PAGE).await?;
                    Err(CallbackError::Denied(reason))
                }
                CallbackOutcome::Missing => {
                    respond(&mut socket, "200 OK", FAILURE_PAGE).await?;
                    Err(CallbackError::MissingCode)
                }
            };
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum CallbackOutcome {
    Code(String),
    Denied(String),
    Missing,
}

/// Extracts the request target from the first line of an HTTP/1.1 request.
fn request_target(request: &str) -> Option<&str> {
    let first_line = request.lines().next()?;
    let mut parts = first_line.split_whitespace();
    if parts.next()? != "GET" {
        return None;
    }
    parts.next()
}

fn parse_callback_query(target: &str) -> CallbackOutcome {
    let query = target.split_once('?').map(|(_path, query)| query);
    let Some(query) = query else {
        return CallbackOutcome::Missing;
    };

    let mut code = None;
    let mut error_code = None;
    let mut error_description = None;

    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "code" => code = Some(decode_component(value)),
            "error" => error_code = Some(decode_component(value)),
            "error_description" => {
                error_description = Some(decode_component(&value.replace('+', " ")));
            }
            _ => {}
        }
    }

    if let Some(code) = code {
        return CallbackOutcome::Code(code);
    }
    if let Some(reason) = error_description.or(error_code) {
        return CallbackOutcome::Denied(reason);
    }
    CallbackOutcome::Missing
}

fn decode_component(value: &str) -> String {
    urlencoding::decode(value).map_or_else(|_| value.to_string(), |decoded| decoded.into_owned())
}

async fn respond(socket: &mut TcpStream, status: &str, body: &str) -> std::io::Result<()> {
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await
}
