use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One telemetry row recorded along a lap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Session clock in seconds
    pub time_s: f64,
    /// Distance along lap in meters, non-decreasing
    pub distance_m: f64,
    /// Speed in km/h
    pub speed_kph: f64,
    /// Throttle application in percent [0, 100]
    pub throttle_pct: f64,
    /// Brake application in percent [0, 100]
    pub brake_pct: f64,
}

/// A single driver's fastest lap: telemetry trace plus lap timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapTelemetry {
    /// Three-letter driver code, e.g. "VER"
    pub driver: String,
    /// Team name as recorded by the timing feed
    pub team: String,
    /// Total lap time in seconds
    pub lap_time_s: f64,
    /// Sector 1..3 times in seconds; None when the feed dropped one
    pub sector_times_s: [Option<f64>; 3],
    /// Lap start on the session clock in seconds
    pub lap_start_time_s: f64,
    /// Samples ordered by increasing session time
    pub samples: Vec<TelemetrySample>,
}

impl LapTelemetry {
    /// Last recorded distance of the lap, in meters. 0.0 for an empty trace.
    pub fn max_distance_m(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.distance_m)
            .fold(0.0, f64::max)
    }
}

/// Session classifier used to key archives: three practices, qualifying, race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionType {
    Fp1,
    Fp2,
    Fp3,
    Q,
    R,
}

impl SessionType {
    /// Short uppercase code used in file names and captions.
    pub fn code(&self) -> &'static str {
        match self {
            SessionType::Fp1 => "FP1",
            SessionType::Fp2 => "FP2",
            SessionType::Fp3 => "FP3",
            SessionType::Q => "Q",
            SessionType::R => "R",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FP1" => Ok(SessionType::Fp1),
            "FP2" => Ok(SessionType::Fp2),
            "FP3" => Ok(SessionType::Fp3),
            "Q" => Ok(SessionType::Q),
            "R" => Ok(SessionType::R),
            other => Err(format!("unknown session type {:?}", other)),
        }
    }
}

/// Identifies one session in the archive directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub year: u16,
    pub event: String,
    pub session: SessionType,
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.year, self.event, self.session)
    }
}
