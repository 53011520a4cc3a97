//! Keeps the background fetch worker alive: spawn, restart on crash with
//! backoff, terminate gracefully on shutdown.

use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{error, info, warn};

const INITIAL_RESTART_DELAY: Duration = Duration::from_secs(1);
const MAX_RESTART_DELAY: Duration = Duration::from_secs(30);
// a child that survived this long gets a fresh backoff on its next crash
const HEALTHY_UPTIME: Duration = Duration::from_secs(60);
const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Supervisor {
    command: String,
    args: Vec<String>,
    initial_delay: Duration,
}

pub struct SupervisorHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Supervisor {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            initial_delay: INITIAL_RESTART_DELAY,
        }
    }

    /// Shorten the restart backoff, mainly for tests.
    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn start(self) -> SupervisorHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.supervise(shutdown_rx));
        SupervisorHandle { shutdown_tx, task }
    }

    async fn supervise(self, mut shutdown: watch::Receiver<bool>) {
        let mut delay = self.initial_delay;

        loop {
            let started = Instant::now();
            let mut child = match Command::new(&self.command)
                .args(&self.args)
                .kill_on_drop(true)
                .spawn()
            {
                Ok(child) => child,
                Err(e) => {
                    error!("failed to spawn {}: {}", self.command, e);
                    if wait_or_shutdown(&mut shutdown, delay).await {
                        return;
                    }
                    delay = (delay * 2).min(MAX_RESTART_DELAY);
                    continue;
                }
            };

            info!(pid = ?child.id(), "started {}", self.command);

            tokio::select! {
                status = child.wait() => {
                    match status {
                        Ok(status) => warn!("{} exited with {}", self.command, status),
                        Err(e) => warn!("could not wait on {}: {}", self.command, e),
                    }

                    if *shutdown.borrow() {
                        return;
                    }

                    if started.elapsed() >= HEALTHY_UPTIME {
                        delay = self.initial_delay;
                    }

                    warn!("restarting {} in {:?}", self.command, delay);
                    if wait_or_shutdown(&mut shutdown, delay).await {
                        return;
                    }
                    delay = (delay * 2).min(MAX_RESTART_DELAY);
                }
                _ = shutdown.changed() => {
                    terminate_child(&mut child, &self.command).await;
                    return;
                }
            }
        }
    }
}

impl SupervisorHandle {
    /// Stop the supervised child and wait for the supervision task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        // terminate_child bounds the wait; the extra second covers scheduling
        let _ = timeout(GRACEFUL_SHUTDOWN_TIMEOUT + Duration::from_secs(1), self.task).await;
    }
}

/// Sleep for `delay`, returning true if shutdown was requested meanwhile.
async fn wait_or_shutdown(shutdown: &mut watch::Receiver<bool>, delay: Duration) -> bool {
    tokio::select! {
        _ = sleep(delay) => false,
        _ = shutdown.changed() => true,
    }
}

#[cfg(unix)]
async fn terminate_child(child: &mut Child, name: &str) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        return; // already reaped
    };

    info!(pid = %pid, "sending SIGTERM to {}", name);
    if kill(Pid::from_raw(pid as i32), Signal::SIGTERM).is_err() {
        let _ = child.kill().await;
        return;
    }

    match timeout(GRACEFUL_SHUTDOWN_TIMEOUT, child.wait()).await {
        Ok(_) => info!("{} exited after SIGTERM", name),
        Err(_) => {
            warn!("{} did not exit after SIGTERM, sending SIGKILL", name);
            let _ = child.kill().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate_child(child: &mut Child, name: &str) {
    info!("killing {}", name);
    let _ = child.kill().await;
}
