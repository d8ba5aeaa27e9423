//! Wall-clock tick source backed by a thread
//!
//! Ticks are posted as [`Command::Tick`] into the same channel as player
//! input, which keeps every state change on the session's single loop.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::session::Command;
use crate::sim::Timer;

#[derive(Debug)]
struct Worker {
    /// Dropping this wakes the worker and makes it exit
    cancel: Sender<()>,
    handle: JoinHandle<()>,
}

#[derive(Debug)]
pub struct ThreadTimer<M = Command> {
    messages: Sender<M>,
    to_message: fn(u64) -> M,
    worker: Option<Worker>,
}

impl ThreadTimer<Command> {
    pub fn new(commands: Sender<Command>) -> Self {
        Self::with_message(commands, |generation| Command::Tick { generation })
    }
}

impl<M: Send + 'static> ThreadTimer<M> {
    /// Post ticks into a channel of a caller-defined message type
    pub fn with_message(messages: Sender<M>, to_message: fn(u64) -> M) -> Self {
        Self {
            messages,
            to_message,
            worker: None,
        }
    }
}

impl<M> ThreadTimer<M> {
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Wake the worker and wait for it to exit
    fn shutdown(&mut self) {
        if let Some(Worker { cancel, handle }) = self.worker.take() {
            drop(cancel);
            if handle.join().is_err() {
                log::error!("Timer thread panicked");
            }
        }
    }
}

impl<M: Send + 'static> Timer for ThreadTimer<M> {
    fn start(&mut self, period: Duration, generation: u64) {
        self.shutdown();

        let (cancel, cancelled) = mpsc::channel::<()>();
        let messages = self.messages.clone();
        let to_message = self.to_message;
        let handle = thread::spawn(move || {
            loop {
                match cancelled.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => {
                        if messages.send(to_message(generation)).is_err() {
                            // Session loop is gone
                            break;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            log::trace!("Timer thread for generation {generation} exiting");
        });

        self.worker = Some(Worker { cancel, handle });
    }

    fn stop(&mut self) {
        self.shutdown();
    }
}

impl<M> Drop for ThreadTimer<M> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posts_ticks_with_generation() {
        let (tx, rx) = mpsc::channel();
        let mut timer = ThreadTimer::new(tx);
        timer.start(Duration::from_millis(5), 3);

        let command = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(command, Command::Tick { generation: 3 });
        timer.stop();
        assert!(!timer.is_running());
    }

    #[test]
    fn test_no_ticks_after_stop() {
        let (tx, rx) = mpsc::channel();
        let mut timer = ThreadTimer::new(tx);
        timer.start(Duration::from_millis(2), 1);
        thread::sleep(Duration::from_millis(20));
        timer.stop();

        // Drain whatever arrived before stop returned
        while rx.try_recv().is_ok() {}
        thread::sleep(Duration::from_millis(20));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_restart_replaces_worker() {
        let (tx, rx) = mpsc::channel();
        let mut timer = ThreadTimer::new(tx);
        timer.start(Duration::from_millis(2), 1);
        thread::sleep(Duration::from_millis(10));
        timer.start(Duration::from_millis(2), 2);

        let mut generations = Vec::new();
        while let Ok(Command::Tick { generation }) = rx.recv_timeout(Duration::from_secs(5)) {
            generations.push(generation);
            if generation == 2 {
                break;
            }
        }
        timer.stop();
        generations.extend(rx.try_iter().map(|command| match command {
            Command::Tick { generation } => generation,
            other => panic!("unexpected {other:?}"),
        }));

        // Old worker was joined before the new one started
        let first_new = generations
            .iter()
            .position(|&g| g == 2)
            .expect("no tick from the restarted worker");
        assert!(generations[..first_new].iter().all(|&g| g == 1));
        assert!(generations[first_new..].iter().all(|&g| g == 2));
    }
}
