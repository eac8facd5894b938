//! Background process management for the watcher.
//!
//! `countjoy watch` re-launches the current executable with `--daemon-run`,
//! detached from the terminal, and records the child's PID in the data
//! directory. `countjoy watch --stop` reads that file and terminates the
//! process. The daemon itself runs [`Watcher::run`] until it receives
//! SIGTERM/SIGINT (or Ctrl-C on Windows).

use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::watcher::Watcher;
use crate::{msg_error, msg_error_anyhow, msg_info, msg_warning};
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const PID_FILE: &str = "countjoy-watch.pid";
/// Argument that makes the executable run as the detached watcher.
pub const DAEMON_FLAG: &str = "--daemon-run";

struct PidFile {
    path: PathBuf,
}

impl PidFile {
    fn locate() -> Result<Self> {
        Ok(Self {
            path: DataStorage::new().get_path(PID_FILE)?,
        })
    }

    fn read(&self) -> Result<Option<u32>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let pid = content.trim().parse().map_err(|_| msg_error_anyhow!(Message::InvalidPidFileContent))?;
        Ok(Some(pid))
    }

    fn write(&self, pid: u32) -> Result<()> {
        fs::write(&self.path, pid.to_string())?;
        Ok(())
    }

    fn remove(&self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Runs the watcher in the current process until a shutdown signal arrives.
pub async fn run_with_signal_handling() -> Result<()> {
    let watcher = Watcher::new(&Config::read()?);

    tokio::select! {
        result = watcher.run() => match result {
            Ok(()) => msg_info!(Message::WatcherExited),
            Err(e) => msg_error!(Message::WatcherPassFailed(e.to_string())),
        },
        _ = shutdown_signal() => msg_info!(Message::WatcherShuttingDown),
    }

    // a foreground run must not drop the record of a detached watcher
    let pid_file = PidFile::locate()?;
    if pid_file.read().unwrap_or(None) == Some(std::process::id()) {
        pid_file.remove();
    }

    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => msg_info!(Message::WatcherReceivedSigterm),
                _ = sigint.recv() => msg_info!(Message::WatcherReceivedSigint),
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            msg_error!(Message::SignalHandlerFailed(e.to_string()));
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(windows)]
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => msg_info!(Message::WatcherReceivedCtrlC),
        Err(e) => {
            msg_error!(Message::SignalHandlerFailed(e.to_string()));
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(any(unix, windows)))]
async fn shutdown_signal() {
    msg_warning!(Message::WatcherSignalHandlingNotSupported);
    std::future::pending::<()>().await;
}

/// Starts a detached watcher process, replacing one that is already running.
pub fn spawn() -> Result<()> {
    let pid_file = PidFile::locate()?;

    if let Some(pid) = pid_file.read().unwrap_or(None) {
        msg_info!(Message::WatcherStoppingExisting(pid.to_string()));
        if let Err(e) = terminate(&pid_file, pid) {
            msg_warning!(Message::WatcherFailedToStopExisting(e.to_string()));
            pid_file.remove();
        }
        std::thread::sleep(Duration::from_secs(1));
    }

    let current_exe = std::env::current_exe().map_err(|e| msg_error_anyhow!(Message::CurrentExecutableUnavailable(e.to_string())))?;
    let pid = launch_detached(&current_exe)?;
    pid_file.write(pid)?;
    msg_info!(Message::WatcherStarted(pid));

    Ok(())
}

/// Stops the background watcher. A watcher that is not running is not an error.
pub fn stop() -> Result<()> {
    let pid_file = PidFile::locate()?;
    match pid_file.read()? {
        Some(pid) => terminate(&pid_file, pid),
        None => {
            msg_info!(Message::WatcherNotRunning);
            Ok(())
        }
    }
}

/// The PID recorded for the background watcher, if any.
pub fn status() -> Result<Option<u32>> {
    Ok(PidFile::locate()?.read().unwrap_or(None))
}

fn terminate(pid_file: &PidFile, pid: u32) -> Result<()> {
    let was_running = kill_process(pid)?;
    pid_file.remove();

    if was_running {
        msg_info!(Message::WatcherStopped(pid));
    } else {
        msg_info!(Message::WatcherNotRunning);
    }
    Ok(())
}

#[cfg(unix)]
fn launch_detached(exe: &Path) -> Result<u32> {
    use std::os::unix::process::CommandExt;

    let mut command = std::process::Command::new(exe);
    command.arg(DAEMON_FLAG);
    // SAFETY: setsid is async-signal-safe and touches no state shared with the parent.
    unsafe {
        command.pre_exec(|| {
            nix::unistd::setsid()?;
            Ok(())
        });
    }
    Ok(command.spawn()?.id())
}

#[cfg(windows)]
fn launch_detached(exe: &Path) -> Result<u32> {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;

    let child = std::process::Command::new(exe)
        .arg(DAEMON_FLAG)
        .creation_flags(CREATE_NO_WINDOW)
        .spawn()?;
    Ok(child.id())
}

#[cfg(not(any(unix, windows)))]
fn launch_detached(_exe: &Path) -> Result<u32> {
    crate::msg_bail_anyhow!(Message::DaemonModeNotSupported);
}

/// Sends SIGTERM, escalating to SIGKILL after a second. Returns false when no such process exists.
#[cfg(unix)]
fn kill_process(pid: u32) -> Result<bool> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let pid = Pid::from_raw(i32::try_from(pid)?);
    let alive = || kill(pid, None).is_ok();

    if !alive() {
        return Ok(false);
    }
    kill(pid, Signal::SIGTERM)?;

    for _ in 0..10 {
        std::thread::sleep(Duration::from_millis(100));
        if !alive() {
            return Ok(true);
        }
    }

    kill(pid, Signal::SIGKILL)?;
    Ok(true)
}

#[cfg(windows)]
fn kill_process(pid: u32) -> Result<bool> {
    use winapi::um::errhandlingapi::GetLastError;
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::{OpenProcess, TerminateProcess};
    use winapi::um::winnt::PROCESS_TERMINATE;

    // SAFETY: the handle is checked for null and closed before returning.
    unsafe {
        let handle = OpenProcess(PROCESS_TERMINATE, 0, pid);
        if handle.is_null() {
            let error = GetLastError();
            // ERROR_INVALID_PARAMETER: no such process
            if error == 87 {
                return Ok(false);
            }
            crate::msg_bail_anyhow!(Message::FailedToOpenProcess(error));
        }

        let terminated = TerminateProcess(handle, 0);
        CloseHandle(handle);

        if terminated == 0 {
            crate::msg_bail_anyhow!(Message::FailedToTerminateProcess(GetLastError()));
        }
    }

    Ok(true)
}

#[cfg(not(any(unix, windows)))]
fn kill_process(_pid: u32) -> Result<bool> {
    crate::msg_bail_anyhow!(Message::ProcessTerminationNotSupported);
}
