use rand::Rng;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use warren_core::{Grid, Species};
use warren_simulation::{Simulation, Statistics};

// --- Error Type ---
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary serialization failed: {0}")]
    Binary(#[from] bincode::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// --- Traits ---
/// Serializes a snapshot into a single line of text.
pub trait Serializer: Send + Sync {
    fn serialize(&self, snapshot: &Snapshot) -> Result<String, TransportError>;
}

/// Sends serialized data to a destination.
pub trait Sender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;
}

// --- Snapshot ---

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub plants: usize,
    pub herbivores: usize,
    pub carnivores: usize,
}

/// Read-only view of a simulation at one hour: every field grid, the
/// occupancy grids and the running counters.
#[derive(Serialize, Debug)]
pub struct Snapshot<'a> {
    pub hour: u64,
    pub day: u64,
    pub length: usize,
    pub width: usize,
    pub min_temp: f64,
    pub max_temp: f64,
    pub light: &'a Grid<f64>,
    pub water: &'a Grid<f64>,
    pub temperature: &'a Grid<f64>,
    pub scent: &'a Grid<f64>,
    pub burrow: &'a Grid<bool>,
    pub plants: &'a Grid<bool>,
    pub herbivores: &'a Grid<bool>,
    pub carnivores: &'a Grid<bool>,
    pub counts: Counts,
    pub stats: &'a Statistics,
}

impl<'a> Snapshot<'a> {
    pub fn capture<R: Rng>(sim: &'a Simulation<R>) -> Self {
        let env = sim.environment();
        Snapshot {
            hour: sim.clock(),
            day: sim.day(),
            length: env.length(),
            width: env.width(),
            min_temp: env.min_temp(),
            max_temp: env.max_temp(),
            light: env.light(),
            water: env.water(),
            temperature: env.temperature(),
            scent: env.scent(),
            burrow: env.burrow(),
            plants: sim.plants().occupancy(),
            herbivores: sim.herbivores().occupancy(),
            carnivores: sim.carnivores().occupancy(),
            counts: Counts {
                plants: sim.plants().len(),
                herbivores: sim.herbivores().len(),
                carnivores: sim.carnivores().len(),
            },
            stats: sim.stats(),
        }
    }
}

// --- Serializers ---

/// One JSON object per snapshot.
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, snapshot: &Snapshot) -> Result<String, TransportError> {
        let json_string = serde_json::to_string(snapshot)?;
        Ok(json_string)
    }
}

/// bincode-encoded snapshot, base64 so it still fits on one line.
pub struct BinarySerializer;

impl Serializer for BinarySerializer {
    fn serialize(&self, snapshot: &Snapshot) -> Result<String, TransportError> {
        let buffer = bincode::serialize(snapshot)?;
        Ok(base64::encode(&buffer))
    }
}

// --- Senders ---

/// Sends data to standard output, one frame per line.
pub struct StdioSender {
    stdout: io::Stdout,
}

impl StdioSender {
    pub fn new() -> Self {
        StdioSender { stdout: io::stdout() }
    }
}

impl Sender for StdioSender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut lock = self.stdout.lock();
        lock.write_all(data)?;
        lock.write_all(b"\n")?;
        lock.flush()?;
        Ok(())
    }
}

impl Default for StdioSender {
    fn default() -> Self {
        Self::new()
    }
}

/// Appends frames to a file, one per line.
pub struct FileSender {
    writer: BufWriter<File>,
}

impl FileSender {
    pub fn create(path: &Path) -> Result<Self, TransportError> {
        let file = File::create(path)?;
        Ok(FileSender {
            writer: BufWriter::new(file),
        })
    }
}

impl Sender for FileSender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.writer.write_all(data)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

// --- Text report ---

/// Plain-text end-of-run summary.
pub fn report<R: Rng>(sim: &Simulation<R>) -> String {
    let stats = sim.stats();
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "After {} days ({} hours):", sim.day(), sim.clock());
    let _ = writeln!(out, "  Plants alive:        {}", sim.plants().len());
    let _ = writeln!(out, "  Rabbits alive:       {}", sim.herbivores().len());
    let _ = writeln!(out, "  Foxes alive:         {}", sim.carnivores().len());
    let _ = writeln!(out, "  Plants eaten:        {}", stats.plants_eaten);
    let _ = writeln!(out, "  Plants died:         {}", stats.plants_died);
    let _ = writeln!(out, "  Rabbits died:        {}", stats.herbivores_died);
    let _ = writeln!(out, "  Foxes died:          {}", stats.carnivores_died);
    let d = &stats.deaths;
    let _ = writeln!(
        out,
        "  Deaths by cause:     starved {}, desiccated {}, frozen {}, boiled {}, eaten {}",
        d.starved, d.desiccated, d.frozen, d.boiled, d.eaten
    );
    let _ = writeln!(out, "  Times drunk:         {}", stats.times_drunk);
    let _ = writeln!(out, "  Times rained:        {}", stats.times_rained);
    for (label, species) in [("Rabbit", Species::Rabbit), ("Fox", Species::Fox)] {
        let m = stats.moves(species);
        let _ = writeln!(
            out,
            "  {} moves:{:width$}random walk {}, forage {}, find water {}, wait {}",
            label,
            "",
            m.random_walk,
            m.forage,
            m.find_water,
            m.wait,
            width = 14 - label.len()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use warren_config::Config;

    fn sim() -> Simulation {
        let mut config = Config::default();
        config.seed = Some(21);
        config.grid.length = 12;
        config.grid.width = 12;
        config.water.has_lake = false;
        config.fauna.num_burrows = 1;
        config.fauna.num_foxes = 1;
        Simulation::new(config).unwrap()
    }

    #[test]
    fn json_snapshot_has_grids_and_counts() {
        let mut sim = sim();
        sim.run_hour();
        let snapshot = Snapshot::capture(&sim);
        let json = JsonSerializer.serialize(&snapshot).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["hour"], 1);
        assert_eq!(value["length"], 12);
        assert_eq!(value["counts"]["carnivores"], 1);
        assert_eq!(value["light"]["cells"].as_array().unwrap().len(), 144);
        assert!(value["stats"]["rabbit_moves"]["wait"].is_u64());
    }

    #[test]
    fn binary_snapshot_is_base64_bincode() {
        let sim = sim();
        let snapshot = Snapshot::capture(&sim);
        let line = BinarySerializer.serialize(&snapshot).unwrap();
        let bytes = base64::decode(&line).unwrap();
        assert_eq!(bytes, bincode::serialize(&snapshot).unwrap());
        assert!(!line.contains('\n'));
    }

    #[test]
    fn file_sender_writes_one_line_per_frame() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut sender = FileSender::create(file.path()).unwrap();
        sender.send(b"first").unwrap();
        sender.send(b"second").unwrap();

        let mut content = String::new();
        File::open(file.path()).unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn report_lists_every_counter() {
        let mut sim = sim();
        sim.run_day();
        let text = report(&sim);
        assert!(text.starts_with("After 1 days (24 hours):"));
        for label in [
            "Plants alive",
            "Rabbits alive",
            "Foxes alive",
            "Plants eaten",
            "Deaths by cause",
            "Times drunk",
            "Times rained",
            "Rabbit moves",
            "Fox moves",
        ] {
            assert!(text.contains(label), "missing {}", label);
        }
    }
}
