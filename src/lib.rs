//! Raylab drives a long-running scene renderer from an interactive front end
//! without freezing it.
//!
//! The renderer itself is an opaque collaborator behind [`RenderEngine`]; what
//! this crate owns is the orchestration around it:
//!
//! - [`WorkerChannel`] keeps the blocking render call on a private worker
//!   thread, one request in flight at a time
//! - [`RenderController`] is the state machine pairing replies to requests,
//!   discarding anything stale, and keeping the front end's busy state honest
//! - cancel-and-restart works even though the computation itself cannot be
//!   interrupted: the worker is abandoned and replaced, and its eventual reply
//!   can only land in a dropped channel
#![forbid(unsafe_code)]

pub mod catalog;
pub mod channel;
pub mod controller;
pub mod engine;
pub mod error;
pub mod pattern;
pub mod protocol;
pub mod surface;

pub use catalog::SceneCatalog;
pub use channel::{ChannelEvent, WorkerChannel};
pub use controller::{ControllerOpts, RenderController, RenderStatus};
pub use engine::{FrameRGBA, RenderEngine};
pub use error::{RaylabError, RaylabResult};
pub use pattern::PatternEngine;
pub use protocol::{RenderParameters, RenderReply, RenderRequest, RequestId};
pub use surface::{InMemorySurface, RenderSurface};
