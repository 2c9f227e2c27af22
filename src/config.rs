use std::path::PathBuf;

use crate::model::{SessionKey, SessionType};

/// Everything one comparison run needs, built once by whichever front end
/// is driving (CLI today) and passed explicitly through the pipeline.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    pub year: u16,
    /// Event name, e.g. "Monza"
    pub event: String,
    pub session: SessionType,
    /// First driver code; deltas are driver1 minus driver2
    pub driver1: String,
    pub driver2: String,
    /// Directory holding the session archives
    pub data_dir: PathBuf,
    /// Where the comparison figure is written; `.svg` selects vector output
    pub output: PathBuf,
    /// Distance grid resolution for the delta curve
    pub resolution: usize,
}

impl CompareConfig {
    pub fn session_key(&self) -> SessionKey {
        SessionKey {
            year: self.year,
            event: self.event.clone(),
            session: self.session,
        }
    }
}
