//! End to end: payload file through the station into a JSON-lines surface.

use std::{
    io::Write,
    sync::{Arc, Mutex},
};

use aqi::{Category, Pollutant, SnapshotStore};
use station::{
    source::FileSource,
    surface::{attach, JsonLinesSurface},
    Station, StationSettings,
};

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

const PAYLOAD: &str = r#"{
  "air_pollution": {
    "coord": { "lon": 77.31, "lat": 28.41 },
    "list": [{
      "dt": 1729300000,
      "components": { "co": 540.7, "no2": 12.5, "o3": 60.0, "so2": 8.0, "pm2_5": 45.0, "pm10": 71.0 }
    }]
  },
  "weather": { "dt": 1729300100, "main": { "temp": 24.6, "humidity": 58 } }
}"#;

#[test]
fn payload_to_json_lines() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), PAYLOAD).unwrap();

    let store = SnapshotStore::new();
    let buf = SharedBuf::default();
    attach(&store, JsonLinesSurface::new(buf.clone()));

    let mut station = Station::new(
        FileSource::new(file.path()),
        store.clone(),
        StationSettings::default(),
    );
    let snapshot = station.run_cycle().unwrap();

    // PM2.5 at 45 sits in 31..60 -> 51..100: 51 + 49 * 14 / 29.
    let pm25 = snapshot.sub_indices()[&Pollutant::Pm25];
    assert!((pm25 - 74.655_172_413_793_1).abs() < 1e-9);
    assert_eq!(snapshot.dominant(), Some(Pollutant::Pm25));
    assert_eq!(snapshot.category(), Category::Satisfactory);
    assert_eq!(snapshot.sub_indices().len(), 6);

    let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["dominant"], "PM2.5");
    assert_eq!(lines[0]["temperature"], 24.6);
    assert_eq!(lines[0]["location"]["lat"], 28.41);
}

#[test]
fn late_surface_sees_current_snapshot() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), PAYLOAD).unwrap();

    let store = SnapshotStore::new();
    let mut station = Station::new(
        FileSource::new(file.path()),
        store.clone(),
        StationSettings::default(),
    );
    station.run_cycle().unwrap();

    let buf = SharedBuf::default();
    attach(&store, JsonLinesSurface::new(buf.clone()));
    let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    assert_eq!(text.lines().count(), 1);
}
