//! Render orchestration state machine.
//!
//! The controller owns the UI-visible [`RenderStatus`], issues requests over a
//! [`WorkerChannel`], matches replies back to the active request id, and keeps
//! the surface's busy flag truthful. All mutation happens on the thread that
//! owns the controller; channel delivery is injected into that thread by
//! calling [`RenderController::pump`] from its event loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::catalog::SceneCatalog;
use crate::channel::{ChannelEvent, WorkerChannel};
use crate::engine::RenderEngine;
use crate::error::{RaylabError, RaylabResult};
use crate::protocol::{RenderReply, RenderRequest, RequestId};
use crate::surface::RenderSurface;

/// UI-visible rendering status. At most one request id is live at any instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStatus {
    Idle,
    Rendering(RequestId),
}

/// Options controlling [`RenderController`] behavior.
#[derive(Clone, Debug)]
pub struct ControllerOpts {
    /// Run renders on a background worker. With `false` the controller falls
    /// back to rendering synchronously on the calling thread; that path has no
    /// cancellation granularity.
    pub background: bool,
    /// Optional watchdog. A render exceeding this duration is torn down
    /// through the cancellation path and reported as an error.
    pub render_timeout: Option<Duration>,
}

impl Default for ControllerOpts {
    fn default() -> Self {
        Self {
            background: true,
            render_timeout: None,
        }
    }
}

/// State machine driving dispatch, completion, cancellation and error
/// surfacing for one render front end.
pub struct RenderController<S: RenderSurface> {
    engine: Arc<dyn RenderEngine>,
    catalog: SceneCatalog,
    channel: Option<WorkerChannel>,
    surface: S,
    status: RenderStatus,
    next_id: u64,
    deadline: Option<Instant>,
    opts: ControllerOpts,
}

impl<S: RenderSurface> RenderController<S> {
    /// Build a controller: fetch the scene catalog once, push it to the
    /// surface, and (in background mode) spawn the render worker.
    pub fn new(
        engine: Arc<dyn RenderEngine>,
        mut surface: S,
        opts: ControllerOpts,
    ) -> RaylabResult<Self> {
        let catalog = SceneCatalog::from_engine(engine.as_ref());
        surface.populate_scenes(catalog.names());
        let channel = if opts.background {
            Some(WorkerChannel::spawn(Arc::clone(&engine))?)
        } else {
            None
        };
        Ok(Self {
            engine,
            catalog,
            channel,
            surface,
            status: RenderStatus::Idle,
            next_id: 0,
            deadline: None,
            opts,
        })
    }

    pub fn status(&self) -> RenderStatus {
        self.status
    }

    pub fn catalog(&self) -> &SceneCatalog {
        &self.catalog
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Read the surface's current parameters and start a render.
    ///
    /// Invalid parameters (and a dispatch while one is already rendering) are
    /// rejected before anything is sent: the state stays `Idle` and the error
    /// is surfaced inline. Nothing here panics or propagates; the surface is
    /// always left consistent with the status.
    pub fn dispatch(&mut self) {
        if let Err(err) = self.try_dispatch() {
            tracing::warn!(error = %err, "render request rejected");
            self.surface.show_error(&err.to_string());
        }
    }

    fn try_dispatch(&mut self) -> RaylabResult<()> {
        if let RenderStatus::Rendering(id) = self.status {
            return Err(RaylabError::validation(format!(
                "request {} is still rendering; cancel it first",
                id.0
            )));
        }
        let params = self.surface.read_parameters();
        params.validate(&self.catalog)?;
        let id = self.allocate_id();
        tracing::debug!(
            request_id = id.0,
            scene = %params.scene_name,
            width = params.width,
            height = params.height,
            samples = params.sample_count,
            "dispatching render"
        );
        match self.channel.as_mut() {
            Some(channel) => {
                channel.send(RenderRequest { id, params })?;
                self.status = RenderStatus::Rendering(id);
                self.deadline = self.opts.render_timeout.map(|t| Instant::now() + t);
                self.surface.set_busy(true);
            }
            None => {
                // Synchronous fallback: no suspension point exists, so the
                // status visits Rendering and returns to Idle within this
                // call, and the thread genuinely blocks for the duration.
                self.status = RenderStatus::Rendering(id);
                self.surface.set_busy(true);
                let outcome = self
                    .engine
                    .render_image(
                        &params.scene_name,
                        params.width,
                        params.height,
                        params.sample_count,
                    )
                    .map_err(|e| e.to_string());
                self.handle_reply(RenderReply { id, outcome });
            }
        }
        Ok(())
    }

    /// Cancel the in-flight render, if any.
    ///
    /// The worker is abandoned and replaced; the discarded computation's
    /// eventual reply is unconditionally ignored. Idempotent: cancelling while
    /// idle changes nothing.
    pub fn cancel(&mut self) {
        let RenderStatus::Rendering(id) = self.status else {
            return;
        };
        tracing::debug!(request_id = id.0, "cancelling render");
        self.reset_channel();
        self.finish();
    }

    /// Process pending channel events. Call from the owning thread's event
    /// loop; never blocks.
    pub fn pump(&mut self) {
        if let (RenderStatus::Rendering(id), Some(deadline)) = (self.status, self.deadline)
            && Instant::now() >= deadline
        {
            tracing::warn!(request_id = id.0, "render timed out");
            self.reset_channel();
            self.finish();
            self.surface
                .show_error(&format!("render request {} timed out", id.0));
            return;
        }
        loop {
            let Some(event) = self.channel.as_mut().and_then(|ch| ch.poll()) else {
                break;
            };
            match event {
                ChannelEvent::Reply(reply) => self.handle_reply(reply),
                ChannelEvent::Lost(detail) => self.handle_lost(detail),
            }
        }
    }

    /// Drive [`Self::pump`] until the controller returns to idle.
    ///
    /// Intended for headless front ends; interactive ones call `pump` from
    /// their own event loop instead.
    pub fn run_to_idle(&mut self, poll_interval: Duration) {
        while self.status != RenderStatus::Idle {
            self.pump();
            if self.status == RenderStatus::Idle {
                break;
            }
            std::thread::sleep(poll_interval);
        }
    }

    fn handle_reply(&mut self, reply: RenderReply) {
        let RenderStatus::Rendering(active) = self.status else {
            tracing::debug!(request_id = reply.id.0, "discarding reply delivered while idle");
            return;
        };
        if reply.id != active {
            // A reply from a superseded request must never reach the paint
            // step, whatever the channel did across a reset.
            tracing::debug!(
                request_id = reply.id.0,
                active = active.0,
                "discarding stale reply"
            );
            return;
        }
        match reply.outcome {
            Ok(frame) => {
                tracing::debug!(request_id = active.0, bytes = frame.data.len(), "render complete");
                self.surface.paint(&frame);
                self.finish();
            }
            Err(detail) => {
                let err = RaylabError::engine(detail);
                tracing::warn!(request_id = active.0, error = %err, "render failed");
                self.finish();
                self.surface.show_error(&err.to_string());
            }
        }
    }

    fn handle_lost(&mut self, detail: String) {
        let err = RaylabError::channel_lost(detail);
        tracing::warn!(error = %err, "render worker lost");
        self.reset_channel();
        if matches!(self.status, RenderStatus::Rendering(_)) {
            self.finish();
        }
        self.surface.show_error(&err.to_string());
    }

    fn reset_channel(&mut self) {
        if let Some(channel) = self.channel.as_mut()
            && let Err(err) = channel.reset()
        {
            tracing::warn!(error = %err, "worker respawn failed during reset");
            self.surface.show_error(&err.to_string());
        }
    }

    fn finish(&mut self) {
        self.status = RenderStatus::Idle;
        self.deadline = None;
        self.surface.set_busy(false);
    }

    fn allocate_id(&mut self) -> RequestId {
        self.next_id += 1;
        RequestId(self.next_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FrameRGBA;
    use crate::pattern::PatternEngine;
    use crate::protocol::RenderParameters;
    use crate::surface::InMemorySurface;

    fn frame() -> FrameRGBA {
        FrameRGBA {
            width: 2,
            height: 2,
            data: vec![0; 16],
        }
    }

    fn params() -> RenderParameters {
        RenderParameters {
            scene_name: "Checkerboard".to_string(),
            width: 8,
            height: 8,
            sample_count: 1,
        }
    }

    fn foreground_controller() -> RenderController<InMemorySurface> {
        let opts = ControllerOpts {
            background: false,
            render_timeout: None,
        };
        RenderController::new(
            Arc::new(PatternEngine::new()),
            InMemorySurface::new(params()),
            opts,
        )
        .unwrap()
    }

    #[test]
    fn stale_reply_is_discarded_without_side_effects() {
        let mut ctl = foreground_controller();
        ctl.status = RenderStatus::Rendering(RequestId(7));
        ctl.handle_reply(RenderReply {
            id: RequestId(3),
            outcome: Ok(frame()),
        });
        assert_eq!(ctl.status(), RenderStatus::Rendering(RequestId(7)));
        assert!(ctl.surface().painted().is_empty());
        assert!(ctl.surface().errors().is_empty());
        assert!(ctl.surface().busy_transitions().is_empty());
    }

    #[test]
    fn reply_while_idle_is_discarded() {
        let mut ctl = foreground_controller();
        ctl.handle_reply(RenderReply {
            id: RequestId(1),
            outcome: Ok(frame()),
        });
        assert_eq!(ctl.status(), RenderStatus::Idle);
        assert!(ctl.surface().painted().is_empty());
    }

    #[test]
    fn matching_engine_error_surfaces_and_idles() {
        let mut ctl = foreground_controller();
        ctl.status = RenderStatus::Rendering(RequestId(2));
        ctl.handle_reply(RenderReply {
            id: RequestId(2),
            outcome: Err("malformed scene".to_string()),
        });
        assert_eq!(ctl.status(), RenderStatus::Idle);
        assert!(ctl.surface().painted().is_empty());
        assert_eq!(ctl.surface().errors().len(), 1);
        assert!(ctl.surface().errors()[0].contains("engine error: malformed scene"));
    }

    #[test]
    fn request_ids_are_strictly_increasing() {
        let mut ctl = foreground_controller();
        let a = ctl.allocate_id();
        let b = ctl.allocate_id();
        let c = ctl.allocate_id();
        assert!(a < b && b < c);
    }
}
