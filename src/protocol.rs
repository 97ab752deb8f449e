//! Request/reply message pair exchanged between the controller and a render
//! worker, plus the JSON-facing parameter object they are built from.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::SceneCatalog;
use crate::engine::FrameRGBA;
use crate::error::{RaylabError, RaylabResult};

/// Monotonically increasing render request identifier.
///
/// Successive ids distinguish requests for stale-reply detection: a reply
/// whose id does not match the currently active request is discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

/// User-supplied render parameters.
///
/// This is the JSON-facing boundary object; the CLI accepts it as a file and
/// front ends read it off their input controls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderParameters {
    pub scene_name: String,
    pub width: u32,
    pub height: u32,
    pub sample_count: u32,
}

impl RenderParameters {
    /// Parse parameters from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> RaylabResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| RaylabError::validation(format!("parse render parameters JSON: {e}")))
    }

    /// Parse parameters from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> RaylabResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            RaylabError::validation(format!(
                "open render parameters JSON '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate against the scene catalog. Fails fast; nothing is dispatched
    /// for invalid parameters.
    pub fn validate(&self, catalog: &SceneCatalog) -> RaylabResult<()> {
        if self.width == 0 {
            return Err(RaylabError::validation(
                "render parameters 'width' must be >= 1",
            ));
        }
        if self.height == 0 {
            return Err(RaylabError::validation(
                "render parameters 'height' must be >= 1",
            ));
        }
        if self.sample_count == 0 {
            return Err(RaylabError::validation(
                "render parameters 'sample_count' must be >= 1",
            ));
        }
        if !catalog.contains(&self.scene_name) {
            return Err(RaylabError::validation(format!(
                "unknown scene '{}'",
                self.scene_name
            )));
        }
        Ok(())
    }
}

/// One render request. Immutable once created; born at dispatch time and dead
/// on delivery of its matching reply or on cancellation.
#[derive(Clone, Debug)]
pub struct RenderRequest {
    pub id: RequestId,
    pub params: RenderParameters,
}

/// The single message a worker produces per accepted request.
///
/// Engine failures cross the thread boundary as plain strings and are
/// re-wrapped as [`RaylabError::Engine`] at the controller.
#[derive(Debug)]
pub struct RenderReply {
    pub id: RequestId,
    pub outcome: Result<FrameRGBA, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SceneCatalog {
        SceneCatalog::new(vec![
            "Cornell Box with Cubes".to_string(),
            "Spheres".to_string(),
        ])
    }

    fn params() -> RenderParameters {
        RenderParameters {
            scene_name: "Spheres".to_string(),
            width: 64,
            height: 64,
            sample_count: 4,
        }
    }

    #[test]
    fn valid_parameters_pass() {
        params().validate(&catalog()).unwrap();
    }

    #[test]
    fn zero_width_is_rejected() {
        let mut p = params();
        p.width = 0;
        let err = p.validate(&catalog()).unwrap_err();
        assert!(err.to_string().contains("'width'"));
    }

    #[test]
    fn zero_sample_count_is_rejected() {
        let mut p = params();
        p.sample_count = 0;
        assert!(p.validate(&catalog()).is_err());
    }

    #[test]
    fn unknown_scene_is_rejected() {
        let mut p = params();
        p.scene_name = "Teapot".to_string();
        let err = p.validate(&catalog()).unwrap_err();
        assert!(err.to_string().contains("unknown scene 'Teapot'"));
    }

    #[test]
    fn json_round_trips() {
        let p = params();
        let text = serde_json::to_string(&p).unwrap();
        let back = RenderParameters::from_reader(text.as_bytes()).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn request_ids_order() {
        assert!(RequestId(2) > RequestId(1));
    }
}
