//! Request/reply transport to a background render worker.
//!
//! A [`WorkerChannel`] owns exactly one worker thread and the mpsc pair
//! connecting it to the controlling thread. The worker holds its own handle to
//! the engine; the two sides share no mutable state. Cancellation is
//! `reset()`: the endpoints are replaced wholesale, so a reply from an
//! abandoned computation can only ever land in a dropped channel.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::engine::RenderEngine;
use crate::error::{RaylabError, RaylabResult};
use crate::protocol::{RenderReply, RenderRequest};

/// Event delivered by [`WorkerChannel::poll`].
#[derive(Debug)]
pub enum ChannelEvent {
    /// The worker delivered a reply for an accepted request.
    Reply(RenderReply),
    /// The worker disconnected while a request was in flight.
    Lost(String),
}

/// Single-request-in-flight transport to a private render worker.
pub struct WorkerChannel {
    engine: Arc<dyn RenderEngine>,
    request_tx: Sender<RenderRequest>,
    reply_rx: Receiver<RenderReply>,
    in_flight: bool,
}

impl WorkerChannel {
    /// Spawn a fresh worker and the channel endpoints wired to it.
    pub fn spawn(engine: Arc<dyn RenderEngine>) -> RaylabResult<Self> {
        let (request_tx, reply_rx) = spawn_worker(&engine)?;
        Ok(Self {
            engine,
            request_tx,
            reply_rx,
            in_flight: false,
        })
    }

    /// Hand one request to the worker.
    ///
    /// Contract: the previous request's reply must have been drained (or the
    /// channel reset) first. The controller upholds this by construction, so a
    /// violation is a caller bug, not a recoverable condition.
    pub fn send(&mut self, request: RenderRequest) -> RaylabResult<()> {
        debug_assert!(
            !self.in_flight,
            "send with a request still in flight; reset or drain first"
        );
        if self.in_flight {
            return Err(RaylabError::validation(
                "worker channel already has a request in flight",
            ));
        }
        self.request_tx
            .send(request)
            .map_err(|_| RaylabError::channel_lost("render worker is not accepting requests"))?;
        self.in_flight = true;
        Ok(())
    }

    /// Non-blocking poll for the next channel event.
    ///
    /// A worker that disconnects while a request is in flight is reported as
    /// [`ChannelEvent::Lost`] exactly once; a disconnect with nothing in
    /// flight is not an event.
    pub fn poll(&mut self) -> Option<ChannelEvent> {
        match self.reply_rx.try_recv() {
            Ok(reply) => {
                self.in_flight = false;
                Some(ChannelEvent::Reply(reply))
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if self.in_flight {
                    self.in_flight = false;
                    Some(ChannelEvent::Lost(
                        "render worker exited before delivering a reply".to_string(),
                    ))
                } else {
                    None
                }
            }
        }
    }

    /// Abandon the current worker and spawn a fresh one.
    ///
    /// Any in-flight computation is irrecoverably discarded: the old worker
    /// keeps running until its blocking render call returns, finds its reply
    /// channel gone, and exits. On respawn failure the old endpoints are kept
    /// so the channel stays in a defined state; the caller decides whether to
    /// retry.
    pub fn reset(&mut self) -> RaylabResult<()> {
        let (request_tx, reply_rx) = spawn_worker(&self.engine)?;
        self.request_tx = request_tx;
        self.reply_rx = reply_rx;
        self.in_flight = false;
        Ok(())
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}

fn spawn_worker(
    engine: &Arc<dyn RenderEngine>,
) -> RaylabResult<(Sender<RenderRequest>, Receiver<RenderReply>)> {
    let (request_tx, request_rx) = mpsc::channel::<RenderRequest>();
    let (reply_tx, reply_rx) = mpsc::channel::<RenderReply>();
    let engine = Arc::clone(engine);

    std::thread::Builder::new()
        .name("raylab-render-worker".to_string())
        .spawn(move || {
            while let Ok(RenderRequest { id, params }) = request_rx.recv() {
                tracing::debug!(request_id = id.0, scene = %params.scene_name, "worker rendering");
                let outcome = engine
                    .render_image(
                        &params.scene_name,
                        params.width,
                        params.height,
                        params.sample_count,
                    )
                    .map_err(|e| e.to_string());
                if reply_tx.send(RenderReply { id, outcome }).is_err() {
                    // Channel was reset while we rendered; the reply is dead.
                    break;
                }
            }
        })
        .map_err(|e| {
            RaylabError::channel_lost(format!("failed to spawn render worker thread: {e}"))
        })?;

    Ok((request_tx, reply_rx))
}
