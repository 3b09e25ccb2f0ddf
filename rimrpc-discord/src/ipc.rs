//! Discord local IPC backend.
//!
//! Discord listens on `discord-ipc-{0..9}` under the runtime directory. A
//! session is one HANDSHAKE frame answered by a READY dispatch, followed by
//! command frames matched to their responses by `nonce`.
//!
//! The handshake runs synchronously inside [`IpcConnector::connect`] so the
//! lifecycle can stay a plain function call; publishing is async.
//!
//! After the handshake the socket is owned by two session tasks. The reader
//! decodes whole frames and hands each response to the publish waiting on
//! its nonce. The writer drains a queue of encoded frames. A publish only
//! enqueues its frame and awaits a `oneshot`, so dropping it (a timeout)
//! never leaves a half-read or half-written frame on the socket.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream as StdUnixStream;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::DiscordError;
use crate::sdk::{ActivityFuture, DiscordSdk, SdkConnector};
use crate::types::{Activity, CreateFlags, SdkResult};

/// Frame header size: opcode + length.
pub const HEADER_LEN: usize = 8;

/// Largest payload accepted from the socket.
pub const MAX_FRAME_LEN: u32 = 64 * 1024;

/// IPC frame opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Opcode {
    Handshake = 0,
    Frame = 1,
    Close = 2,
    Ping = 3,
    Pong = 4,
}

impl Opcode {
    /// Decode a raw opcode.
    ///
    /// # Errors
    /// Returns `DiscordError::Protocol` for unknown values.
    pub fn from_u32(raw: u32) -> Result<Self, DiscordError> {
        match raw {
            0 => Ok(Self::Handshake),
            1 => Ok(Self::Frame),
            2 => Ok(Self::Close),
            3 => Ok(Self::Ping),
            4 => Ok(Self::Pong),
            other => Err(DiscordError::Protocol(format!("unknown opcode {other}"))),
        }
    }
}

/// Serialize one frame.
///
/// # Errors
/// Returns an error if the payload cannot be encoded or exceeds `u32::MAX`.
pub fn encode_frame(op: Opcode, payload: &Value) -> Result<Vec<u8>, DiscordError> {
    let body = serde_json::to_vec(payload)?;
    let len = u32::try_from(body.len())
        .map_err(|_| DiscordError::Protocol(format!("payload of {} bytes", body.len())))?;

    let mut buf = Vec::with_capacity(HEADER_LEN + body.len());
    buf.extend_from_slice(&(op as u32).to_le_bytes());
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(&body);
    Ok(buf)
}

/// Split a header into opcode and payload length.
///
/// # Errors
/// Returns `DiscordError::Protocol` for unknown opcodes or oversized frames.
pub fn decode_header(header: [u8; HEADER_LEN]) -> Result<(Opcode, u32), DiscordError> {
    let op = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    if len > MAX_FRAME_LEN {
        return Err(DiscordError::Protocol(format!(
            "frame of {len} bytes exceeds {MAX_FRAME_LEN}"
        )));
    }
    Ok((Opcode::from_u32(op)?, len))
}

fn parse_body(body: &[u8]) -> Result<Value, DiscordError> {
    if body.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(serde_json::from_slice(body)?)
    }
}

fn read_frame_blocking(stream: &mut impl Read) -> Result<(Opcode, Value), DiscordError> {
    let mut header = [0u8; HEADER_LEN];
    stream.read_exact(&mut header)?;
    let (op, len) = decode_header(header)?;
    let mut body = vec![0u8; len as usize];
    stream.read_exact(&mut body)?;
    Ok((op, parse_body(&body)?))
}

async fn read_frame<R: AsyncRead + Unpin>(stream: &mut R) -> Result<(Opcode, Value), DiscordError> {
    let mut header = [0u8; HEADER_LEN];
    stream.read_exact(&mut header).await?;
    let (op, len) = decode_header(header)?;
    let mut body = vec![0u8; len as usize];
    stream.read_exact(&mut body).await?;
    Ok((op, parse_body(&body)?))
}

/// Socket paths Discord may be listening on, in probe order.
#[must_use]
pub fn candidate_socket_paths() -> Vec<PathBuf> {
    let base = ["XDG_RUNTIME_DIR", "TMPDIR", "TMP", "TEMP"]
        .iter()
        .find_map(std::env::var_os)
        .map_or_else(|| PathBuf::from("/tmp"), PathBuf::from);
    (0..10).map(|i| base.join(format!("discord-ipc-{i}"))).collect()
}

// ---------------------------------------------------------------------------
// Connector
// ---------------------------------------------------------------------------

/// Connects to a local Discord client over its IPC socket.
#[derive(Debug, Clone)]
pub struct IpcConnector {
    runtime: Handle,
    socket_path: Option<PathBuf>,
    handshake_timeout: Duration,
}

impl IpcConnector {
    /// Create a connector whose clients publish on `runtime`.
    #[must_use]
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            socket_path: None,
            handshake_timeout: Duration::from_secs(2),
        }
    }

    /// Use one specific socket instead of probing the standard locations.
    #[must_use]
    pub fn with_socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.socket_path = Some(path.into());
        self
    }

    /// How long to wait for READY.
    #[must_use]
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    fn handshake(
        &self,
        mut stream: StdUnixStream,
        client_id: i64,
        path: &Path,
    ) -> Result<IpcSdk, DiscordError> {
        stream.set_read_timeout(Some(self.handshake_timeout))?;
        let hello = json!({ "v": 1, "client_id": client_id.to_string() });
        stream.write_all(&encode_frame(Opcode::Handshake, &hello)?)?;

        let (op, payload) = read_frame_blocking(&mut stream)?;
        match op {
            Opcode::Frame if payload["evt"] == "READY" => {}
            Opcode::Close => {
                let reason = payload["message"].as_str().unwrap_or("connection closed");
                return Err(DiscordError::Handshake(reason.to_string()));
            }
            other => {
                return Err(DiscordError::Handshake(format!(
                    "expected READY, got {other:?} frame"
                )));
            }
        }

        stream.set_read_timeout(None)?;
        stream.set_nonblocking(true)?;

        let session = Arc::new(Session::default());
        let (outbound, queue) = mpsc::unbounded_channel();
        let reader = {
            let _guard = self.runtime.enter();
            let (read_half, write_half) = UnixStream::from_std(stream)?.into_split();
            tokio::spawn(write_loop(write_half, queue, Arc::clone(&session)));
            tokio::spawn(read_loop(read_half, outbound.clone(), Arc::clone(&session)))
        };

        info!(path = %path.display(), client_id, "Connected to Discord IPC");
        Ok(IpcSdk {
            session,
            outbound,
            reader,
            next_nonce: AtomicU64::new(0),
            pid: std::process::id(),
        })
    }
}

impl SdkConnector for IpcConnector {
    type Sdk = IpcSdk;

    fn connect(&self, client_id: i64, flags: CreateFlags) -> Result<IpcSdk, DiscordError> {
        let paths = match &self.socket_path {
            Some(path) => vec![path.clone()],
            None => candidate_socket_paths(),
        };
        debug!(?flags, candidates = paths.len(), "Probing Discord IPC sockets");

        let mut last_error = None;
        for path in paths {
            match StdUnixStream::connect(&path) {
                Ok(stream) => return self.handshake(stream, client_id, &path),
                Err(e) => last_error = Some(e),
            }
        }

        Err(DiscordError::NotRunning(
            last_error.map_or_else(|| "no IPC socket candidates".to_string(), |e| e.to_string()),
        ))
    }
}

// ---------------------------------------------------------------------------
// Session tasks
// ---------------------------------------------------------------------------

/// State shared between publishes and the session tasks.
#[derive(Default)]
struct Session {
    pending: Mutex<HashMap<String, oneshot::Sender<SdkResult>>>,
    closed: AtomicBool,
}

impl Session {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Mark the socket dead and fail every waiting publish.
    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.pending.lock().clear();
    }
}

/// Removes a publish's pending entry when its future is dropped.
struct PendingGuard {
    session: Arc<Session>,
    nonce: String,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.session.pending.lock().remove(&self.nonce);
    }
}

async fn write_loop(
    mut stream: OwnedWriteHalf,
    mut queue: mpsc::UnboundedReceiver<Vec<u8>>,
    session: Arc<Session>,
) {
    while let Some(frame) = queue.recv().await {
        if let Err(e) = stream.write_all(&frame).await {
            debug!(error = %e, "Discord IPC write failed");
            session.close();
            return;
        }
    }
}

async fn read_loop(
    mut stream: OwnedReadHalf,
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    session: Arc<Session>,
) {
    loop {
        let (op, payload) = match read_frame(&mut stream).await {
            Ok(frame) => frame,
            // The body was fully consumed, so framing is still intact.
            Err(DiscordError::Json(e)) => {
                debug!(error = %e, "Skipping undecodable IPC frame");
                continue;
            }
            Err(e) => {
                debug!(error = %e, "Discord IPC read failed");
                break;
            }
        };

        match op {
            Opcode::Ping => match encode_frame(Opcode::Pong, &payload) {
                Ok(pong) => {
                    if outbound.send(pong).is_err() {
                        break;
                    }
                }
                Err(e) => debug!(error = %e, "Failed to encode PONG"),
            },
            Opcode::Close => {
                debug!(message = %payload["message"], "Discord closed the IPC session");
                break;
            }
            Opcode::Frame => {
                let waiter = payload["nonce"]
                    .as_str()
                    .and_then(|nonce| session.pending.lock().remove(nonce));
                let Some(waiter) = waiter else {
                    debug!(nonce = %payload["nonce"], "Skipping unrelated IPC frame");
                    continue;
                };
                let result = if payload["evt"] == "ERROR" {
                    debug!(message = %payload["data"]["message"], "SET_ACTIVITY rejected");
                    SdkResult::InvalidPayload
                } else {
                    SdkResult::Ok
                };
                // The publish may have timed out in the meantime.
                let _ = waiter.send(result);
            }
            other => debug!(op = ?other, "Skipping unexpected IPC frame"),
        }
    }
    session.close();
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// A live IPC session.
///
/// Dropping it stops the session tasks and closes the socket.
pub struct IpcSdk {
    session: Arc<Session>,
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    reader: JoinHandle<()>,
    next_nonce: AtomicU64,
    pid: u32,
}

impl IpcSdk {
    /// Whether the session has seen the socket fail.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }

    /// Queue a `SET_ACTIVITY` frame and register for its response.
    fn send_activity(&self, activity: Activity) -> Result<PendingReply, DiscordError> {
        if self.is_closed() {
            return Err(DiscordError::Disconnected);
        }

        let nonce = self.next_nonce.fetch_add(1, Ordering::Relaxed).to_string();
        let request = json!({
            "cmd": "SET_ACTIVITY",
            "args": { "pid": self.pid, "activity": activity },
            "nonce": nonce,
        });
        let frame = encode_frame(Opcode::Frame, &request)?;

        let (tx, rx) = oneshot::channel();
        self.session.pending.lock().insert(nonce.clone(), tx);
        let guard = PendingGuard {
            session: Arc::clone(&self.session),
            nonce,
        };
        // Re-checked after registering: a concurrent close either dropped
        // our sender or is visible here.
        if self.is_closed() || self.outbound.send(frame).is_err() {
            return Err(DiscordError::Disconnected);
        }
        Ok(PendingReply { rx, _guard: guard })
    }
}

struct PendingReply {
    rx: oneshot::Receiver<SdkResult>,
    _guard: PendingGuard,
}

impl Drop for IpcSdk {
    fn drop(&mut self) {
        // The writer exits once the reader's queue handle is gone too.
        self.reader.abort();
    }
}

impl std::fmt::Debug for IpcSdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpcSdk")
            .field("pid", &self.pid)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl DiscordSdk for IpcSdk {
    fn update_activity(&self, activity: Activity) -> ActivityFuture {
        match self.send_activity(activity) {
            Ok(reply) => Box::pin(async move {
                let PendingReply { rx, _guard } = reply;
                // A dropped sender means the session closed before answering.
                rx.await.unwrap_or(SdkResult::NotRunning)
            }),
            Err(e) => {
                debug!(error = %e, "SET_ACTIVITY not sent");
                let result = if matches!(e, DiscordError::Disconnected) {
                    SdkResult::NotRunning
                } else {
                    SdkResult::InternalError
                };
                Box::pin(std::future::ready(result))
            }
        }
    }

    fn run_callbacks(&self) -> Result<(), DiscordError> {
        // Responses are routed by the reader task, so the only thing left
        // to report here is a dead socket.
        if self.is_closed() {
            Err(DiscordError::Disconnected)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_layout_is_little_endian() {
        let frame = encode_frame(Opcode::Frame, &json!({ "a": 1 })).expect("encodes");
        assert_eq!(&frame[0..4], &[1, 0, 0, 0]);
        assert_eq!(&frame[4..8], &[7, 0, 0, 0]);
        assert_eq!(&frame[8..], br#"{"a":1}"#);
    }

    #[test]
    fn header_round_trip() {
        let frame = encode_frame(Opcode::Ping, &json!("hi")).expect("encodes");
        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&frame[..HEADER_LEN]);
        assert_eq!(decode_header(header).expect("decodes"), (Opcode::Ping, 4));
    }

    #[test]
    fn unknown_opcode_rejected() {
        let mut header = [0u8; HEADER_LEN];
        header[0] = 9;
        assert!(matches!(decode_header(header), Err(DiscordError::Protocol(_))));
    }

    #[test]
    fn oversized_frame_rejected() {
        let mut header = [0u8; HEADER_LEN];
        header[4..8].copy_from_slice(&(MAX_FRAME_LEN + 1).to_le_bytes());
        assert!(matches!(decode_header(header), Err(DiscordError::Protocol(_))));
    }

    #[test]
    fn blocking_reader_parses_frames() {
        let mut bytes = encode_frame(Opcode::Frame, &json!({ "evt": "READY" })).expect("encodes");
        bytes.extend(encode_frame(Opcode::Close, &json!({ "code": 4000 })).expect("encodes"));
        let mut cursor = std::io::Cursor::new(bytes);

        let (op, payload) = read_frame_blocking(&mut cursor).expect("first frame");
        assert_eq!(op, Opcode::Frame);
        assert_eq!(payload["evt"], "READY");
        let (op, payload) = read_frame_blocking(&mut cursor).expect("second frame");
        assert_eq!(op, Opcode::Close);
        assert_eq!(payload["code"], 4000);
    }

    #[test]
    fn candidates_cover_ten_slots() {
        let paths = candidate_socket_paths();
        assert_eq!(paths.len(), 10);
        assert!(paths[0].ends_with("discord-ipc-0"));
        assert!(paths[9].ends_with("discord-ipc-9"));
    }
}
