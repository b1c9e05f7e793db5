//! `mpv` playback device
//!
//! Runs an idle `mpv` process and drives it over its JSON IPC socket.
//! `--keep-open` keeps the finished file loaded so the position stays at the
//! end, which is what completion polling looks for.

use super::ipc::{build_request, parse_reply};
use crate::config::DeviceSettings;
use cadence_playback::{PlaybackDevice, PlaybackError, Result};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const REPLY_TIMEOUT: Duration = Duration::from_secs(2);
const CONNECT_RETRY: Duration = Duration::from_millis(50);

/// Playback device driving an `mpv` child process
pub struct MpvDevice {
    child: Child,
    writer: UnixStream,
    reader: BufReader<UnixStream>,
    socket_path: PathBuf,
    next_request_id: u64,
}

impl MpvDevice {
    /// Start `mpv` and connect to its IPC socket
    pub fn spawn(settings: &DeviceSettings) -> Result<Self> {
        let socket_path = settings.resolved_socket_path();
        // A stale socket from a crashed run would block mpv's listener
        let _ = std::fs::remove_file(&socket_path);

        let mut child = Command::new(&settings.mpv_path)
            .arg("--idle=yes")
            .arg("--no-video")
            .arg("--no-terminal")
            .arg("--keep-open=yes")
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                PlaybackError::Device(format!(
                    "Failed to start {}: {}",
                    settings.mpv_path.display(),
                    e
                ))
            })?;

        let stream = match connect(&socket_path, settings.connect_timeout()) {
            Ok(stream) => stream,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        };

        stream
            .set_read_timeout(Some(REPLY_TIMEOUT))
            .map_err(device_error)?;
        let reader = BufReader::new(stream.try_clone().map_err(device_error)?);

        info!(socket = %socket_path.display(), pid = child.id(), "mpv started");

        Ok(Self {
            child,
            writer: stream,
            reader,
            socket_path,
            next_request_id: 1,
        })
    }

    /// Send a command and wait for its reply
    fn command(&mut self, command: Value) -> Result<Value> {
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        let request = build_request(&command, request_id);
        writeln!(self.writer, "{}", request).map_err(device_error)?;
        self.writer.flush().map_err(device_error)?;

        let mut line = String::new();
        loop {
            line.clear();
            let read = self.reader.read_line(&mut line).map_err(device_error)?;
            if read == 0 {
                return Err(PlaybackError::Device(
                    "mpv closed the IPC connection".to_string(),
                ));
            }
            if let Some(reply) = parse_reply(&line, request_id) {
                return reply;
            }
        }
    }

    fn get_property(&mut self, name: &str) -> Result<Value> {
        self.command(json!(["get_property", name]))
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        self.command(json!(["set_property", name, value]))
            .map(|_| ())
    }

    /// Numeric property in milliseconds, 0 when unavailable
    fn seconds_property_ms(&mut self, name: &str) -> i64 {
        match self.get_property(name) {
            Ok(value) => value
                .as_f64()
                .map(|secs| (secs * 1000.0).round() as i64)
                .unwrap_or(0),
            // Unavailable while nothing is loaded
            Err(_) => 0,
        }
    }
}

fn connect(socket_path: &Path, timeout: Duration) -> Result<UnixStream> {
    let deadline = Instant::now() + timeout;
    loop {
        match UnixStream::connect(socket_path) {
            Ok(stream) => return Ok(stream),
            Err(e) if Instant::now() >= deadline => {
                return Err(PlaybackError::Device(format!(
                    "Could not connect to mpv at {}: {}",
                    socket_path.display(),
                    e
                )));
            }
            Err(_) => thread::sleep(CONNECT_RETRY),
        }
    }
}

fn device_error(err: std::io::Error) -> PlaybackError {
    PlaybackError::Device(err.to_string())
}

impl PlaybackDevice for MpvDevice {
    fn load(&mut self, stream_url: &str) -> Result<()> {
        debug!("Loading stream");
        self.command(json!(["loadfile", stream_url, "replace"]))
            .map(|_| ())
    }

    fn play(&mut self) -> Result<()> {
        self.set_property("pause", json!(false))
    }

    fn set_paused(&mut self, paused: bool) -> Result<()> {
        self.set_property("pause", json!(paused))
    }

    fn position_ms(&mut self) -> i64 {
        self.seconds_property_ms("time-pos")
    }

    fn set_position_ms(&mut self, position_ms: i64) -> Result<()> {
        let secs = position_ms as f64 / 1000.0;
        self.command(json!(["seek", secs, "absolute"])).map(|_| ())
    }

    fn length_ms(&mut self) -> i64 {
        self.seconds_property_ms("duration")
    }

    fn volume(&mut self) -> i32 {
        self.get_property("volume")
            .ok()
            .and_then(|value| value.as_f64())
            .map(|level| level.round() as i32)
            .unwrap_or(0)
    }

    fn set_volume(&mut self, level: i32) -> Result<()> {
        self.set_property("volume", json!(level))
    }
}

impl Drop for MpvDevice {
    fn drop(&mut self) {
        if let Err(e) = self.command(json!(["quit"])) {
            debug!(error = %e, "mpv did not acknowledge quit");
        }
        if let Err(e) = self.child.kill() {
            debug!(error = %e, "mpv already exited");
        }
        if let Err(e) = self.child.wait() {
            warn!(error = %e, "Failed to reap mpv");
        }
        let _ = std::fs::remove_file(&self.socket_path);
    }
}
