//! Orchestration of geocoding, marker replacement and focus.
//!
//! The synchronizer is the sole writer to the map session. It runs as a
//! background task driven by a command channel; entry-list changes start a
//! geocode batch tagged with a generation number, and a completion whose
//! tag no longer matches the live generation is discarded — a newer list
//! superseded it while it was in flight.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use tour_content::Entry;

use crate::engine::MapEngine;
use crate::geocode::{Resolver, Stop};
use crate::session::{MapSession, DEFAULT_CENTER};

enum Command {
    Entries(Vec<Entry>),
    Selection(Option<usize>),
    SessionReady,
    Resolved { generation: u64, stops: Vec<Stop> },
    Close,
}

/// Handle to the synchronizer task for one mounted view.
pub struct Synchronizer {
    tx: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl Synchronizer {
    /// Spawns the synchronizer owning `session`.
    ///
    /// The session starts closed; call [`session_ready`](Self::session_ready)
    /// once the engine's resources are loaded and a mount point exists.
    pub fn spawn<E, R>(session: MapSession<E>, resolver: Arc<R>) -> Self
    where
        E: MapEngine,
        R: Resolver,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Worker {
            session,
            resolver,
            tx: tx.clone(),
            generation: 0,
            stops: Vec::new(),
        };
        let task = tokio::spawn(worker.run(rx));
        Self { tx, task }
    }

    /// Replaces the entry list and starts resolving it.
    ///
    /// Any batch still in flight for a previous list is logically
    /// cancelled: its completion will carry a stale generation.
    pub fn set_entries(&self, entries: Vec<Entry>) {
        let _ = self.tx.send(Command::Entries(entries));
    }

    /// Changes the selection. Affects focus only, never markers.
    pub fn set_selection(&self, selection: Option<usize>) {
        let _ = self.tx.send(Command::Selection(selection));
    }

    /// Signals that the engine's resources are loaded and the mount point
    /// is attached, so the map instance can be created.
    pub fn session_ready(&self) {
        let _ = self.tx.send(Command::SessionReady);
    }

    /// Tears down the session and stops the task.
    ///
    /// Outstanding geocode batches finish on their own and are discarded.
    pub async fn close(self) {
        let _ = self.tx.send(Command::Close);
        let _ = self.task.await;
    }
}

struct Worker<E: MapEngine, R: Resolver> {
    session: MapSession<E>,
    resolver: Arc<R>,
    tx: mpsc::UnboundedSender<Command>,
    generation: u64,
    stops: Vec<Stop>,
}

impl<E: MapEngine, R: Resolver> Worker<E, R> {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = rx.recv().await {
            match command {
                Command::Entries(entries) => {
                    self.generation += 1;
                    let generation = self.generation;
                    let resolver = Arc::clone(&self.resolver);
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        let stops = resolver.resolve_all(entries).await;
                        let _ = tx.send(Command::Resolved { generation, stops });
                    });
                }
                Command::Resolved { generation, stops } => {
                    if generation != self.generation {
                        debug!(
                            generation,
                            live = self.generation,
                            "discarding stale geocode batch"
                        );
                        continue;
                    }
                    self.stops = stops;
                    self.session.set_markers(&self.stops);
                }
                Command::SessionReady => {
                    let center = self
                        .stops
                        .first()
                        .map(|stop| stop.position)
                        .unwrap_or(DEFAULT_CENTER);
                    self.session.open(center);
                    // Replaying with the current stops is idempotent.
                    self.session.set_markers(&self.stops);
                }
                Command::Selection(selection) => {
                    self.session.focus(selection, &self.stops);
                }
                Command::Close => break,
            }
        }
        self.session.close();
    }
}
