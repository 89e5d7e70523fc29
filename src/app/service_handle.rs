use anyhow::Result;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

type Task = (&'static str, JoinHandle<Result<()>>);

/// Background tasks of the process plus the shutdown channel they watch.
/// Call `shutdown()` at teardown so no recurring task outlives the client.
pub struct ServiceHandle {
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<Task>,
}

impl ServiceHandle {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self { shutdown_tx, tasks: Vec::new() }
    }

    /// Track a spawned task; it is awaited on shutdown.
    pub fn attach(&mut self, name: &'static str, h: JoinHandle<Result<()>>) {
        debug!(task = name, "service task attached");
        self.tasks.push((name, h));
    }

    /// Receiver for tasks that need to observe shutdown.
    pub fn shutdown_rx(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Signal shutdown and wait for every attached task. Task failures are
    /// logged, not returned.
    pub async fn shutdown(self) -> Result<()> {
        self.shutdown_tx.send_replace(true);
        for (name, h) in self.tasks {
            match h.await {
                Ok(Ok(())) => debug!(task = name, "service task finished"),
                Ok(Err(e)) => error!(task = name, "service task returned error: {:?}", e),
                Err(e) => error!(task = name, "service task join error: {:?}", e),
            }
        }
        Ok(())
    }
}

impl Default for ServiceHandle {
    fn default() -> Self {
        Self::new()
    }
}
