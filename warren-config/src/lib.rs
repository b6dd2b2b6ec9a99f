use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Number of fixed candidate sites a pond can be placed on.
pub const POND_SITES: usize = 6;

/// A burrow has eight neighbouring cells to put rabbits on.
pub const MAX_RABBITS_PER_BURROW: usize = 8;

// --- Error Type ---
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Unknown parameter '{0}'")]
    UnknownParameter(String),
}

// --- Configuration Sections ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GridSettings {
    /// Rows.
    pub length: usize,
    /// Columns.
    pub width: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self { length: 50, width: 50 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WeatherSettings {
    pub max_clouds: u32,
    pub cloud_chance: f64,
    pub overcast_chance: f64,
    pub rain_chance: f64,
    /// Light level everywhere on an overcast day.
    pub overcast_light: f64,
    /// Water added by a day of rain and removed again when it dries up.
    pub rain_amount: f64,
    pub max_cloud_size: usize,
    pub min_cloud_thickness: f64,
    pub max_cloud_thickness: f64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            max_clouds: 10,
            cloud_chance: 0.6,
            overcast_chance: 0.2,
            rain_chance: 0.8,
            overcast_light: 0.3,
            rain_amount: 0.2,
            max_cloud_size: 8,
            min_cloud_thickness: 0.4,
            max_cloud_thickness: 0.9,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WaterSettings {
    pub num_ponds: usize,
    pub has_lake: bool,
    pub pond_spread: usize,
    pub lake_spread: usize,
    /// Background moisture of dry land.
    pub ambient: f64,
}

impl Default for WaterSettings {
    fn default() -> Self {
        Self {
            num_ponds: 0,
            has_lake: true,
            pond_spread: 1,
            lake_spread: 4,
            ambient: 0.25,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TemperatureSettings {
    pub water_temp: f64,
    pub light_temp: f64,
    pub natural_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
}

impl Default for TemperatureSettings {
    fn default() -> Self {
        Self {
            water_temp: -2.0,
            light_temp: 2.0,
            natural_temp: 10.0,
            max_temp: 32.0,
            min_temp: -32.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ScentSettings {
    /// Fraction of a cell's scent left after one hour.
    pub dissipation_rate: f64,
    /// Fraction carried to each ring of neighbours.
    pub dissipation_spread: f64,
    /// How many rings of neighbours scent reaches.
    pub scent_spread: usize,
}

impl Default for ScentSettings {
    fn default() -> Self {
        Self {
            dissipation_rate: 0.9,
            dissipation_spread: 0.8,
            scent_spread: 1,
        }
    }
}

/// Grass constants, based on bluegrass.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GrassSettings {
    pub init_size_min: f64,
    pub init_size_max: f64,
    pub init_energy_min: f64,
    pub init_energy_max: f64,
    pub init_water_min: f64,
    pub init_water_max: f64,
    pub max_units: f64,
    pub unit_energy_cost: f64,
    pub unit_extra_energy: f64,
    pub unit_water_cost: f64,
    pub unit_extra_water: f64,
    /// Fraction of a unit's energy cost an eater actually gets.
    pub energy_loss: f64,
    /// Fraction of a unit's water cost an eater actually gets.
    pub water_loss: f64,
}

impl Default for GrassSettings {
    fn default() -> Self {
        Self {
            init_size_min: 3.0,
            init_size_max: 5.0,
            init_energy_min: 500.0,
            init_energy_max: 1000.0,
            init_water_min: 500.0,
            init_water_max: 1000.0,
            max_units: 5.0,
            unit_energy_cost: 500.0,
            unit_extra_energy: 500.0,
            unit_water_cost: 500.0,
            unit_extra_water: 500.0,
            energy_loss: 0.9,
            water_loss: 0.5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FloraSettings {
    pub plant_chance: f64,
    pub plant_repop_chance: f64,
    pub energy_absorb_factor: f64,
    pub water_absorb_factor: f64,
    pub plant_units_to_eat: f64,
    pub grass: GrassSettings,
}

impl Default for FloraSettings {
    fn default() -> Self {
        Self {
            plant_chance: 0.9,
            plant_repop_chance: 0.1,
            energy_absorb_factor: 1000.0,
            water_absorb_factor: 1000.0,
            plant_units_to_eat: 2.0,
            grass: GrassSettings::default(),
        }
    }
}

/// Constants that differ between rabbits and foxes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpeciesSettings {
    pub max_energy: f64,
    pub max_water: f64,
    pub drink_amount: f64,
    /// Ambient temperature the species is most comfortable at.
    pub natural_temp: f64,
}

fn default_rabbit() -> SpeciesSettings {
    SpeciesSettings {
        max_energy: 1000.0,
        max_water: 500.0,
        drink_amount: 100.0,
        natural_temp: 10.0,
    }
}

fn default_fox() -> SpeciesSettings {
    SpeciesSettings {
        max_energy: 3000.0,
        max_water: 1500.0,
        drink_amount: 300.0,
        natural_temp: 8.0,
    }
}

/// A species table as written in a file: any key may be left out.
#[derive(Deserialize, Default)]
#[serde(default)]
struct SpeciesOverrides {
    max_energy: Option<f64>,
    max_water: Option<f64>,
    drink_amount: Option<f64>,
    natural_temp: Option<f64>,
}

impl SpeciesOverrides {
    fn over(self, base: SpeciesSettings) -> SpeciesSettings {
        SpeciesSettings {
            max_energy: self.max_energy.unwrap_or(base.max_energy),
            max_water: self.max_water.unwrap_or(base.max_water),
            drink_amount: self.drink_amount.unwrap_or(base.drink_amount),
            natural_temp: self.natural_temp.unwrap_or(base.natural_temp),
        }
    }
}

fn rabbit_table<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SpeciesSettings, D::Error> {
    Ok(SpeciesOverrides::deserialize(deserializer)?.over(default_rabbit()))
}

fn fox_table<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SpeciesSettings, D::Error> {
    Ok(SpeciesOverrides::deserialize(deserializer)?.over(default_fox()))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FaunaSettings {
    pub rabbits_per_burrow: usize,
    pub max_rabbits: usize,
    pub num_burrows: usize,
    pub num_foxes: usize,
    pub move_chance: f64,
    pub energy_percent: f64,
    pub water_percent: f64,
    pub hungry_percent: f64,
    pub starve_percent: f64,
    pub thirsty_percent: f64,
    pub desiccate_percent: f64,
    pub froze_offset: f64,
    pub boiled_offset: f64,
    pub energy_move_factor: f64,
    pub energy_wait_reduce: f64,
    pub water_move_factor: f64,
    pub water_wait_reduce: f64,
    pub temp_transfer: f64,
    pub extra_fox_steps: u32,
    #[serde(deserialize_with = "rabbit_table")]
    pub rabbit: SpeciesSettings,
    #[serde(deserialize_with = "fox_table")]
    pub fox: SpeciesSettings,
}

impl Default for FaunaSettings {
    fn default() -> Self {
        Self {
            rabbits_per_burrow: 5,
            max_rabbits: 100,
            num_burrows: 5,
            num_foxes: 3,
            move_chance: 0.5,
            energy_percent: 0.3,
            water_percent: 0.1,
            hungry_percent: 0.9,
            starve_percent: 0.5,
            thirsty_percent: 0.4,
            desiccate_percent: 0.2,
            froze_offset: -20.0,
            boiled_offset: 20.0,
            energy_move_factor: 6.0,
            energy_wait_reduce: 2.0,
            water_move_factor: 8.0,
            water_wait_reduce: 2.0,
            temp_transfer: 0.2,
            extra_fox_steps: 3,
            rabbit: default_rabbit(),
            fox: default_fox(),
        }
    }
}

// --- Top-Level Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Seed for the simulation RNG. Drawn from entropy when absent.
    pub seed: Option<u64>,
    pub grid: GridSettings,
    pub weather: WeatherSettings,
    pub water: WaterSettings,
    pub temperature: TemperatureSettings,
    pub scent: ScentSettings,
    pub flora: FloraSettings,
    pub fauna: FaunaSettings,
}

fn check_probability(name: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::Validation(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_species(name: &str, species: &SpeciesSettings) -> Result<(), ConfigError> {
    check_positive(&format!("{}.max_energy", name), species.max_energy)?;
    check_positive(&format!("{}.max_water", name), species.max_water)?;
    check_positive(&format!("{}.drink_amount", name), species.drink_amount)?;
    if !species.natural_temp.is_finite() {
        return Err(ConfigError::Validation(format!("{}.natural_temp must be finite", name)));
    }
    Ok(())
}

/// Parse a sweep value as a non-negative whole number.
fn as_count(name: &str, value: f64) -> Result<usize, ConfigError> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Ok(value as usize)
    } else {
        Err(ConfigError::Validation(format!(
            "{} must be a non-negative whole number, got {}",
            name, value
        )))
    }
}

impl Config {
    /// Reject configurations the engine cannot run. Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.length == 0 || self.grid.width == 0 {
            return Err(ConfigError::Validation(
                "Grid dimensions must be greater than 0".to_string(),
            ));
        }

        let w = &self.weather;
        check_probability("weather.cloud_chance", w.cloud_chance)?;
        check_probability("weather.overcast_chance", w.overcast_chance)?;
        check_probability("weather.rain_chance", w.rain_chance)?;
        check_probability("weather.overcast_light", w.overcast_light)?;
        check_probability("weather.min_cloud_thickness", w.min_cloud_thickness)?;
        check_probability("weather.max_cloud_thickness", w.max_cloud_thickness)?;
        if w.min_cloud_thickness > w.max_cloud_thickness {
            return Err(ConfigError::Validation(
                "weather.min_cloud_thickness must not exceed max_cloud_thickness".to_string(),
            ));
        }
        if w.max_cloud_size == 0 {
            return Err(ConfigError::Validation(
                "weather.max_cloud_size must be greater than 0".to_string(),
            ));
        }
        if !(w.rain_amount.is_finite() && w.rain_amount >= 0.0) {
            return Err(ConfigError::Validation(
                "weather.rain_amount must be non-negative".to_string(),
            ));
        }

        if self.water.num_ponds > POND_SITES {
            return Err(ConfigError::Validation(format!(
                "water.num_ponds must be at most {}, got {}",
                POND_SITES, self.water.num_ponds
            )));
        }
        if !(self.water.ambient.is_finite() && self.water.ambient >= 0.0) {
            return Err(ConfigError::Validation(
                "water.ambient must be non-negative".to_string(),
            ));
        }

        if self.temperature.min_temp >= self.temperature.max_temp {
            return Err(ConfigError::Validation(
                "temperature.min_temp must be below max_temp".to_string(),
            ));
        }

        check_probability("scent.dissipation_rate", self.scent.dissipation_rate)?;
        check_probability("scent.dissipation_spread", self.scent.dissipation_spread)?;

        let f = &self.flora;
        check_probability("flora.plant_chance", f.plant_chance)?;
        check_probability("flora.plant_repop_chance", f.plant_repop_chance)?;
        check_positive("flora.plant_units_to_eat", f.plant_units_to_eat)?;
        if f.energy_absorb_factor < 0.0 || f.water_absorb_factor < 0.0 {
            return Err(ConfigError::Validation(
                "flora absorb factors must be non-negative".to_string(),
            ));
        }
        let g = &f.grass;
        check_positive("grass.max_units", g.max_units)?;
        check_positive("grass.unit_energy_cost", g.unit_energy_cost)?;
        check_positive("grass.unit_water_cost", g.unit_water_cost)?;
        check_probability("grass.energy_loss", g.energy_loss)?;
        check_probability("grass.water_loss", g.water_loss)?;
        if g.init_size_min <= 0.0 || g.init_size_min > g.init_size_max || g.init_size_max > g.max_units {
            return Err(ConfigError::Validation(
                "grass initial size range must satisfy 0 < min <= max <= max_units".to_string(),
            ));
        }
        if g.init_energy_min > g.init_energy_max || g.init_water_min > g.init_water_max {
            return Err(ConfigError::Validation(
                "grass initial reserve ranges must have min <= max".to_string(),
            ));
        }

        let a = &self.fauna;
        if a.rabbits_per_burrow > MAX_RABBITS_PER_BURROW {
            return Err(ConfigError::Validation(format!(
                "fauna.rabbits_per_burrow must be at most {}, got {}",
                MAX_RABBITS_PER_BURROW, a.rabbits_per_burrow
            )));
        }
        let cells = self.grid.length * self.grid.width;
        if a.num_burrows > cells || a.num_foxes > cells {
            return Err(ConfigError::Validation(
                "More burrows or foxes than grid cells".to_string(),
            ));
        }
        if a.extra_fox_steps == 0 {
            return Err(ConfigError::Validation(
                "fauna.extra_fox_steps must be at least 1".to_string(),
            ));
        }
        check_probability("fauna.move_chance", a.move_chance)?;
        check_probability("fauna.energy_percent", a.energy_percent)?;
        check_probability("fauna.water_percent", a.water_percent)?;
        check_probability("fauna.hungry_percent", a.hungry_percent)?;
        check_probability("fauna.starve_percent", a.starve_percent)?;
        check_probability("fauna.thirsty_percent", a.thirsty_percent)?;
        check_probability("fauna.desiccate_percent", a.desiccate_percent)?;
        check_probability("fauna.temp_transfer", a.temp_transfer)?;
        if a.starve_percent >= a.hungry_percent {
            return Err(ConfigError::Validation(
                "fauna.starve_percent must be below hungry_percent".to_string(),
            ));
        }
        if a.desiccate_percent >= a.thirsty_percent {
            return Err(ConfigError::Validation(
                "fauna.desiccate_percent must be below thirsty_percent".to_string(),
            ));
        }
        if a.froze_offset >= a.boiled_offset {
            return Err(ConfigError::Validation(
                "fauna.froze_offset must be below boiled_offset".to_string(),
            ));
        }
        check_positive("fauna.energy_move_factor", a.energy_move_factor)?;
        check_positive("fauna.energy_wait_reduce", a.energy_wait_reduce)?;
        check_positive("fauna.water_move_factor", a.water_move_factor)?;
        check_positive("fauna.water_wait_reduce", a.water_wait_reduce)?;
        check_species("fauna.rabbit", &a.rabbit)?;
        check_species("fauna.fox", &a.fox)?;

        Ok(())
    }

    /// A copy of this configuration with one named parameter replaced, for
    /// what-if sweeps. The result is validated.
    pub fn with_parameter(&self, name: &str, value: f64) -> Result<Config, ConfigError> {
        let mut config = self.clone();
        match name {
            "grid_length" => config.grid.length = as_count(name, value)?,
            "grid_width" => config.grid.width = as_count(name, value)?,
            "max_clouds" => config.weather.max_clouds = as_count(name, value)? as u32,
            "cloud_chance" => config.weather.cloud_chance = value,
            "overcast_chance" => config.weather.overcast_chance = value,
            "rain_chance" => config.weather.rain_chance = value,
            "num_ponds" => config.water.num_ponds = as_count(name, value)?,
            "pond_spread" => config.water.pond_spread = as_count(name, value)?,
            "lake_spread" => config.water.lake_spread = as_count(name, value)?,
            "natural_temp" => config.temperature.natural_temp = value,
            "dissipation_rate" => config.scent.dissipation_rate = value,
            "dissipation_spread" => config.scent.dissipation_spread = value,
            "scent_spread" => config.scent.scent_spread = as_count(name, value)?,
            "plant_chance" => config.flora.plant_chance = value,
            "plant_repop_chance" => config.flora.plant_repop_chance = value,
            "plant_units_to_eat" => config.flora.plant_units_to_eat = value,
            "rabbits_per_burrow" => config.fauna.rabbits_per_burrow = as_count(name, value)?,
            "max_rabbits" => config.fauna.max_rabbits = as_count(name, value)?,
            "num_burrows" => config.fauna.num_burrows = as_count(name, value)?,
            "num_foxes" => config.fauna.num_foxes = as_count(name, value)?,
            "move_chance" => config.fauna.move_chance = value,
            "temp_transfer" => config.fauna.temp_transfer = value,
            "extra_fox_steps" => config.fauna.extra_fox_steps = as_count(name, value)? as u32,
            _ => return Err(ConfigError::UnknownParameter(name.to_string())),
        }
        config.validate()?;
        Ok(config)
    }
}

// --- Loading Function ---

/// Load a configuration file. `.toml` files are read as TOML, anything else
/// as JSON. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: Config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    config.validate()?;
    Ok(config)
}
