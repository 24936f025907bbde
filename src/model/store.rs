//! Reading and writing mixtures as JSON documents.
//!
//! ```json
//! { "components": [ { "rows": 6, "cols": 5, "bias": -0.3, "weights": [ ... ] } ] }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Mixture, RootFilter};
use crate::trace::trace_event;
use crate::util::{DetectError, DetectResult};

#[derive(Serialize, Deserialize)]
struct MixtureDocument {
    components: Vec<RootFilter>,
}

impl Mixture {
    /// Loads and validates a mixture from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> DetectResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| DetectError::ModelIo {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let mixture = Self::from_json_str(&text)?;
        trace_event!("model_loaded", components = mixture.components().len());
        Ok(mixture)
    }

    /// Parses and validates a mixture from JSON text.
    pub fn from_json_str(text: &str) -> DetectResult<Self> {
        let doc: MixtureDocument =
            serde_json::from_str(text).map_err(|err| DetectError::ModelParse {
                reason: err.to_string(),
            })?;
        Self::new(doc.components)
    }

    /// Serialises the mixture's components to JSON.
    pub fn to_json_string(&self) -> DetectResult<String> {
        let doc = MixtureDocument {
            components: self.components().to_vec(),
        };
        serde_json::to_string(&doc).map_err(|err| DetectError::ModelParse {
            reason: err.to_string(),
        })
    }

    /// Writes the mixture to `path` as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> DetectResult<()> {
        let path = path.as_ref();
        let text = self.to_json_string()?;
        fs::write(path, text).map_err(|err| DetectError::ModelIo {
            path: path.display().to_string(),
            reason: err.to_string(),
        })
    }
}
