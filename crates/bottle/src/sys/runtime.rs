use crate::events::GameEvent;
use async_channel::Sender;
use spinring::PlayerId;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;

pub fn start_background_services(tx: Sender<GameEvent>, config_path: Option<PathBuf>) {
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            crate::sys::input::run_stdin_reader(tx).await;
        });
    }

    if let Some(path) = config_path {
        let tx = tx.clone();
        tokio::spawn(async move {
            crate::config::run_async_watcher(tx, path).await;
        });
    }
}

/// Stands in for the pointer animation: reports the spin finished after `duration`.
pub fn spawn_spin_animation(
    tx: Sender<GameEvent>,
    id: PlayerId,
    spin: u64,
    duration: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(duration).await;
        if tx.send(GameEvent::SpinFinished { id, spin }).await.is_err() {
            log::debug!("Event loop gone before {} finished spinning", id);
        }
    })
}
