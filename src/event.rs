//! Terminal input for the dashboard loop.
//!
//! A background task merges the crossterm stream with a periodic tick and
//! forwards both over a bounded channel, so the loop only ever awaits one
//! receiver.

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{Stream, StreamExt};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

const QUEUE_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Paste(String),
    Tick,
    Resize,
}

/// Map one terminal event to a dashboard event. Only key presses count:
/// terminals that report releases and repeats would otherwise double input.
pub fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Paste(text) => Some(Event::Paste(text)),
        CrosstermEvent::Resize(..) => Some(Event::Resize),
        _ => None,
    }
}

pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
    _pump: JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self::from_stream(EventStream::new(), tick_rate)
    }

    /// Read from `source` instead of the real terminal.
    pub fn from_stream<S>(source: S, tick_rate: Duration) -> Self
    where
        S: Stream<Item = io::Result<CrosstermEvent>> + Send + Unpin + 'static,
    {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let pump = tokio::spawn(pump(source, tick_rate, tx));
        Self { rx, _pump: pump }
    }

    /// `None` once the terminal stream has ended or failed.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

async fn pump<S>(mut source: S, tick_rate: Duration, tx: mpsc::Sender<Event>)
where
    S: Stream<Item = io::Result<CrosstermEvent>> + Unpin,
{
    let mut ticker = tokio::time::interval(tick_rate);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // A full queue already has a redraw pending; drop the tick.
                if let Err(TrySendError::Closed(_)) = tx.try_send(Event::Tick) {
                    return;
                }
            }
            next = source.next() => {
                let Some(Ok(raw)) = next else {
                    return;
                };
                if let Some(event) = translate(raw) {
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
            }
        }
    }
}
