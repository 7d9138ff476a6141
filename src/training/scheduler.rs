//! Background thread running self-play on a fixed interval.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use log::info;

use super::self_play::SelfPlayTrainer;

/// Owning handle to the self-play thread.
///
/// Every `interval` the thread asks the trainer for one game; a tick that
/// finds the trainer busy is skipped. Dropping the handle shuts the thread
/// down.
pub struct TrainingScheduler {
    trainer: Arc<SelfPlayTrainer>,
    stop: Mutex<Option<Sender<()>>>,
    join_handle: Mutex<Option<JoinHandle<()>>>,
}

impl TrainingScheduler {
    /// Spawn the scheduler thread.
    pub fn start(trainer: Arc<SelfPlayTrainer>, interval: Duration) -> std::io::Result<Self> {
        trainer.resume();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let worker = Arc::clone(&trainer);
        let join_handle = std::thread::Builder::new()
            .name("gomoku-self-play".to_owned())
            .spawn(move || {
                info!("TrainingScheduler: started, one game every {interval:?}");
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            worker.try_run();
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                info!("TrainingScheduler: exiting");
            })?;

        Ok(Self {
            trainer,
            stop: Mutex::new(Some(stop_tx)),
            join_handle: Mutex::new(Some(join_handle)),
        })
    }

    pub fn trainer(&self) -> &Arc<SelfPlayTrainer> {
        &self.trainer
    }

    /// Stop scheduling, cancel the in-flight game and wait for the thread.
    pub fn shutdown(&self) {
        self.trainer.cancel();
        if let Ok(mut stop) = self.stop.lock() {
            if let Some(tx) = stop.take() {
                let _ = tx.send(());
            }
        }

        let join_handle = {
            let Ok(mut join_handle) = self.join_handle.lock() else {
                return;
            };
            join_handle.take()
        };
        if let Some(join_handle) = join_handle {
            let _ = join_handle.join();
        }
    }
}

impl Drop for TrainingScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
