/// Integration tests for the session archive provider.
///
/// Run with: cargo test --test store_tests -- --nocapture
use std::fs;

use serde_json::json;
use tempfile::TempDir;

use lap_delta::model::{SessionKey, SessionType};
use lap_delta::store::SessionStore;

fn sample_row(time_s: f64, distance_m: f64) -> serde_json::Value {
    json!({
        "time_s": time_s,
        "distance_m": distance_m,
        "speed_kph": 250.0,
        "throttle_pct": 100.0,
        "brake_pct": 0.0
    })
}

fn write_monza_archive(dir: &TempDir) {
    let archive = json!({
        "year": 2023,
        "event_name": "Monza",
        "session": "Q",
        "drivers": [
            {
                "code": "VER",
                "team": "Red Bull Racing",
                "laps": [
                    {
                        // Fastest on paper but carries no telemetry: must be skipped.
                        "lap_time_s": 80.0,
                        "sector_times_s": [null, null, null],
                        "lap_start_time_s": 0.0,
                        "samples": []
                    },
                    {
                        "lap_time_s": 81.5,
                        "sector_times_s": [27.0, 27.0, 27.5],
                        "lap_start_time_s": 3120.0,
                        "samples": [sample_row(3120.0, 0.0), sample_row(3201.5, 5793.0)]
                    },
                    {
                        "lap_time_s": 82.3,
                        "sector_times_s": [27.2, 27.3, 27.8],
                        "lap_start_time_s": 3300.0,
                        "samples": [sample_row(3300.0, 0.0), sample_row(3382.3, 5793.0)]
                    }
                ]
            },
            {
                "code": "LEC",
                "team": "Ferrari",
                "laps": [
                    {
                        "lap_time_s": 81.7,
                        "sector_times_s": [27.1, null, 27.6],
                        "lap_start_time_s": 2800.0,
                        "samples": [sample_row(2800.0, 0.0), sample_row(2881.7, 5790.0)]
                    }
                ]
            }
        ]
    });
    fs::write(
        dir.path().join("2023_monza_Q.json"),
        serde_json::to_string_pretty(&archive).unwrap(),
    )
    .unwrap();
}

fn monza_key() -> SessionKey {
    SessionKey {
        year: 2023,
        event: "Monza".to_string(),
        session: SessionType::Q,
    }
}

#[test]
fn picks_the_fastest_lap_with_telemetry() {
    let dir = TempDir::new().unwrap();
    write_monza_archive(&dir);
    let store = SessionStore::open(dir.path());

    let lap = store.fastest_lap(&monza_key(), "VER").expect("lap should load");
    assert_eq!(lap.driver, "VER");
    assert_eq!(lap.team, "Red Bull Racing");
    assert!(
        (lap.lap_time_s - 81.5).abs() < 1e-9,
        "the 80.0s lap has no telemetry and must be skipped"
    );
    assert_eq!(lap.samples.len(), 2);
    assert_eq!(lap.sector_times_s, [Some(27.0), Some(27.0), Some(27.5)]);
    println!("✓ Fastest telemetry-bearing lap selected: {:.1}s", lap.lap_time_s);
}

#[test]
fn driver_codes_match_case_insensitively() {
    let dir = TempDir::new().unwrap();
    write_monza_archive(&dir);
    let store = SessionStore::open(dir.path());

    let lap = store.fastest_lap(&monza_key(), "lec").expect("lowercase code should match");
    assert_eq!(lap.driver, "LEC");
    assert_eq!(lap.sector_times_s[1], None, "dropped sector time must stay None");
    println!("✓ Case-insensitive driver lookup");
}

#[test]
fn event_name_falls_back_to_slug() {
    let dir = TempDir::new().unwrap();
    write_monza_archive(&dir);
    let store = SessionStore::open(dir.path());

    // User typed the display name; the archive file is slugged lowercase.
    let key = SessionKey {
        year: 2023,
        event: "MONZA".to_string(),
        session: SessionType::Q,
    };
    assert!(store.fastest_lap(&key, "VER").is_ok(), "slug resolution should find the archive");
    println!("✓ Display-name key resolves to the slugged archive file");
}

#[test]
fn unknown_driver_is_a_readable_error() {
    let dir = TempDir::new().unwrap();
    write_monza_archive(&dir);
    let store = SessionStore::open(dir.path());

    let err = store.fastest_lap(&monza_key(), "XYZ").unwrap_err();
    assert!(
        format!("{:#}", err).contains("XYZ"),
        "error should name the missing driver: {:#}",
        err
    );
    println!("✓ Unknown driver error names the code");
}

#[test]
fn missing_archive_is_a_readable_error() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::open(dir.path());

    let key = SessionKey {
        year: 1999,
        event: "Imola".to_string(),
        session: SessionType::R,
    };
    let err = store.fastest_lap(&key, "VER").unwrap_err();
    assert!(
        format!("{:#}", err).contains("1999_imola_R.json"),
        "error should name the missing file: {:#}",
        err
    );
    println!("✓ Missing archive error names the expected file");
}

#[test]
fn sessions_are_cached_after_first_parse() {
    let dir = TempDir::new().unwrap();
    write_monza_archive(&dir);
    let store = SessionStore::open(dir.path());

    store.fastest_lap(&monza_key(), "VER").expect("first load");

    // Remove the backing file; a cached session must keep serving lookups.
    fs::remove_file(dir.path().join("2023_monza_Q.json")).unwrap();
    let lap = store.fastest_lap(&monza_key(), "LEC").expect("cache should serve the session");
    assert_eq!(lap.driver, "LEC");
    println!("✓ Second lookup served from the parse cache");
}

#[test]
fn event_title_combines_name_and_year() {
    let dir = TempDir::new().unwrap();
    write_monza_archive(&dir);
    let store = SessionStore::open(dir.path());

    assert_eq!(store.event_title(&monza_key()).unwrap(), "Monza 2023");
    println!("✓ Event title formatted for captions");
}
