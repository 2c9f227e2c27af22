use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::info;

use crate::model::{LapTelemetry, SessionKey, TelemetrySample};

/// Telemetry provider over a directory of session archive files.
///
/// One archive holds everything recorded for a single session:
/// `{year}_{event_slug}_{SESSION}.json`. Archives are produced by an
/// exporter outside this repo; this layer owns the format and nothing else
/// reads it. Parsed sessions are cached so repeated driver lookups against
/// the same session read the file once.
pub struct SessionStore {
    root: PathBuf,
    cache: Mutex<HashMap<SessionKey, Arc<SessionFile>>>,
}

#[derive(Debug, Deserialize)]
struct SessionFile {
    year: u16,
    event_name: String,
    drivers: Vec<DriverEntry>,
}

#[derive(Debug, Deserialize)]
struct DriverEntry {
    code: String,
    team: String,
    laps: Vec<LapRecord>,
}

#[derive(Debug, Deserialize)]
struct LapRecord {
    lap_time_s: f64,
    #[serde(default)]
    sector_times_s: [Option<f64>; 3],
    lap_start_time_s: f64,
    #[serde(default)]
    samples: Vec<TelemetrySample>,
}

impl SessionStore {
    pub fn open(root: impl Into<PathBuf>) -> SessionStore {
        SessionStore {
            root: root.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The driver's fastest timed lap of the session, with telemetry.
    ///
    /// Laps without a usable telemetry trace (fewer than 2 samples) are
    /// skipped; among the rest the minimum lap time wins.
    pub fn fastest_lap(&self, key: &SessionKey, driver: &str) -> Result<LapTelemetry> {
        let session = self.session(key)?;

        let entry = session
            .drivers
            .iter()
            .find(|d| d.code.eq_ignore_ascii_case(driver))
            .with_context(|| format!("no driver {:?} in session {}", driver, key))?;

        let fastest = entry
            .laps
            .iter()
            .filter(|lap| lap.samples.len() >= 2)
            .min_by(|a, b| a.lap_time_s.partial_cmp(&b.lap_time_s).unwrap())
            .with_context(|| {
                format!("driver {} has no lap with telemetry in session {}", entry.code, key)
            })?;

        Ok(LapTelemetry {
            driver: entry.code.clone(),
            team: entry.team.clone(),
            lap_time_s: fastest.lap_time_s,
            sector_times_s: fastest.sector_times_s,
            lap_start_time_s: fastest.lap_start_time_s,
            samples: fastest.samples.clone(),
        })
    }

    /// Display title for captions, e.g. "Monza 2023".
    pub fn event_title(&self, key: &SessionKey) -> Result<String> {
        let session = self.session(key)?;
        Ok(format!("{} {}", session.event_name, session.year))
    }

    fn session(&self, key: &SessionKey) -> Result<Arc<SessionFile>> {
        if let Some(session) = self.cache.lock().get(key) {
            return Ok(Arc::clone(session));
        }

        let path = self.resolve_archive_path(key);
        info!("loading session archive {}", path.display());
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed to read session archive {}", path.display()))?;
        let session: SessionFile = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse session archive {}", path.display()))?;

        let session = Arc::new(session);
        self.cache.lock().insert(key.clone(), Arc::clone(&session));
        Ok(session)
    }

    /// Prefer the event name exactly as given, then its slugged form.
    fn resolve_archive_path(&self, key: &SessionKey) -> PathBuf {
        let candidates = [
            self.archive_name(key, &key.event),
            self.archive_name(key, &event_slug(&key.event)),
        ];

        for candidate in &candidates {
            if candidate.exists() {
                return candidate.clone();
            }
        }

        // Fall back to the slugged name; loading will error with context.
        candidates[1].clone()
    }

    fn archive_name(&self, key: &SessionKey, event: &str) -> PathBuf {
        self.root
            .join(format!("{}_{}_{}.json", key.year, event, key.session))
    }
}

/// Normalize an event name for file naming: lowercase, runs of
/// non-alphanumerics collapsed to single underscores.
pub fn event_slug(event: &str) -> String {
    let mut slug = String::with_capacity(event.len());
    let mut last_was_sep = true;
    for c in event.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}
