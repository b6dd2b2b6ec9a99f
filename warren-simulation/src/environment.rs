//! Environmental fields: light, water, temperature and scent.

use log::{debug, trace};
use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use warren_config::{Config, ScentSettings, TemperatureSettings, WaterSettings, WeatherSettings};
use warren_core::{Grid, Position};

/// Candidate pond centres as fractions of (length, width).
const POND_SITES: [(f64, f64); warren_config::POND_SITES] = [
    (0.2, 0.2),
    (0.2, 0.8),
    (0.8, 0.2),
    (0.8, 0.8),
    (0.5, 0.2),
    (0.5, 0.8),
];

/// Water level of each painted band, outermost first.
const OUTER_BAND: f64 = 0.5;
const INNER_BAND: f64 = 0.75;
const CORE_BAND: f64 = 1.0;

/// Water level at which a cell counts as drinkable open water.
pub const FULL_WATER: f64 = 1.0;

const CLEAR_LIGHT: f64 = 1.0;

/// Outcome of one day's weather roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Clear,
    Overcast,
    Rain,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentField {
    light: Grid<f64>,
    water: Grid<f64>,
    water_body: Grid<bool>,
    temperature: Grid<f64>,
    herbivore_scent: Grid<f64>,
    carnivore_scent: Grid<f64>,
    scent: Grid<f64>,
    burrow: Grid<bool>,
    min_temp: f64,
    max_temp: f64,
    rained: bool,
    #[serde(skip)]
    weather: WeatherSettings,
    #[serde(skip)]
    water_settings: WaterSettings,
    #[serde(skip)]
    temperature_settings: TemperatureSettings,
    #[serde(skip)]
    scent_settings: ScentSettings,
}

impl EnvironmentField {
    /// Dry land under a clear sky. Water bodies and burrows are added by
    /// [`init_water`](Self::init_water) and [`place_burrows`](Self::place_burrows).
    pub fn new(config: &Config) -> Self {
        let (length, width) = (config.grid.length, config.grid.width);
        let mut field = EnvironmentField {
            light: Grid::new(length, width, CLEAR_LIGHT),
            water: Grid::new(length, width, config.water.ambient),
            water_body: Grid::new(length, width, false),
            temperature: Grid::new(length, width, config.temperature.natural_temp),
            herbivore_scent: Grid::new(length, width, 0.0),
            carnivore_scent: Grid::new(length, width, 0.0),
            scent: Grid::new(length, width, 0.0),
            burrow: Grid::new(length, width, false),
            min_temp: config.temperature.min_temp,
            max_temp: config.temperature.max_temp,
            rained: false,
            weather: config.weather.clone(),
            water_settings: config.water.clone(),
            temperature_settings: config.temperature.clone(),
            scent_settings: config.scent.clone(),
        };
        field.update_temperature();
        field
    }

    pub fn length(&self) -> usize {
        self.light.length()
    }

    pub fn width(&self) -> usize {
        self.light.width()
    }

    pub fn light(&self) -> &Grid<f64> {
        &self.light
    }

    pub fn water(&self) -> &Grid<f64> {
        &self.water
    }

    pub fn temperature(&self) -> &Grid<f64> {
        &self.temperature
    }

    /// Signed scent: herbivore channel minus carnivore channel.
    pub fn scent(&self) -> &Grid<f64> {
        &self.scent
    }

    pub fn herbivore_scent(&self) -> &Grid<f64> {
        &self.herbivore_scent
    }

    pub fn carnivore_scent(&self) -> &Grid<f64> {
        &self.carnivore_scent
    }

    pub fn burrow(&self) -> &Grid<bool> {
        &self.burrow
    }

    pub fn water_body(&self) -> &Grid<bool> {
        &self.water_body
    }

    pub fn min_temp(&self) -> f64 {
        self.min_temp
    }

    pub fn max_temp(&self) -> f64 {
        self.max_temp
    }

    pub fn rained(&self) -> bool {
        self.rained
    }

    pub fn is_water_body(&self, pos: Position) -> bool {
        self.water_body.get(pos).copied().unwrap_or(false)
    }

    pub fn is_burrow(&self, pos: Position) -> bool {
        self.burrow.get(pos).copied().unwrap_or(false)
    }

    /// Paint ponds on shuffled candidate sites and, optionally, one central lake.
    pub fn init_water<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (length, width) = (self.length(), self.width());
        let ponds = self.water_settings.num_ponds.min(POND_SITES.len());
        let pond_spread = self.water_settings.pond_spread;

        let mut sites = POND_SITES;
        sites.shuffle(rng);
        for &(fy, fx) in sites.iter().take(ponds) {
            let y = ((fy * length as f64) as usize).min(length - 1);
            let x = ((fx * width as f64) as usize).min(width - 1);
            trace!("Pond at ({}, {})", y, x);
            self.paint_water_body(y, x, y, x, pond_spread);
        }

        if self.water_settings.has_lake {
            let (cy, cx) = (length / 2, width / 2);
            let (ry, rx) = (length / 20, width / 20);
            self.paint_water_body(
                cy - ry,
                cx - rx,
                (cy + ry).min(length - 1),
                (cx + rx).min(width - 1),
                self.water_settings.lake_spread,
            );
        }

        debug!(
            "Painted {} ponds{}; {} open water cells",
            ponds,
            if self.water_settings.has_lake { " and a lake" } else { "" },
            self.water_body.count()
        );
        self.update_temperature();
    }

    /// Paint concentric bands around the core box `(y1, x1)..=(y2, x2)`,
    /// widest band first so the core overwrites it. Clipped to the grid.
    pub fn paint_water_body(&mut self, y1: usize, x1: usize, y2: usize, x2: usize, spread: usize) {
        let bands = [
            (OUTER_BAND, spread.saturating_mul(2)),
            (INNER_BAND, spread),
            (CORE_BAND, 0),
        ];
        let (length, width) = (self.length(), self.width());
        for (level, grow) in bands {
            let top = y1.saturating_sub(grow);
            let left = x1.saturating_sub(grow);
            let bottom = y2.saturating_add(grow).min(length - 1);
            let right = x2.saturating_add(grow).min(width - 1);
            for y in top..=bottom {
                for x in left..=right {
                    let pos = Position::new(y, x);
                    self.water[pos] = level;
                    self.water_body[pos] = true;
                }
            }
        }
    }

    /// Pick burrow sites on dry land, away from existing burrows.
    pub fn place_burrows<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<Position> {
        let candidates: Vec<Position> = self
            .burrow
            .positions()
            .filter(|&pos| !self.water_body[pos] && !self.burrow[pos])
            .collect();
        let chosen: Vec<Position> = candidates.choose_multiple(rng, count).copied().collect();
        for &pos in &chosen {
            self.burrow[pos] = true;
        }
        debug!("Placed {} burrows", chosen.len());
        chosen
    }

    /// Roll the day's weather: overcast (and maybe rain) or clear with clouds.
    /// Yesterday's rain dries up unless it rains again.
    pub fn weather_tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Weather {
        let mut evaporate = self.rained;
        self.rained = false;

        let weather = if rng.gen_bool(self.weather.overcast_chance) {
            self.light.fill(self.weather.overcast_light);
            if rng.gen_bool(self.weather.rain_chance) {
                let amount = self.weather.rain_amount;
                for (_, level) in self.water.iter_mut() {
                    *level += amount;
                }
                self.rained = true;
                evaporate = false;
                Weather::Rain
            } else {
                Weather::Overcast
            }
        } else {
            self.light.fill(CLEAR_LIGHT);
            for _ in 0..self.weather.max_clouds {
                if rng.gen_bool(self.weather.cloud_chance) {
                    self.make_cloud(rng);
                }
            }
            Weather::Clear
        };

        if evaporate {
            let amount = self.weather.rain_amount;
            for (_, level) in self.water.iter_mut() {
                *level = (*level - amount).max(0.0);
            }
        }

        debug!("Weather: {:?}{}", weather, if evaporate { ", rain evaporated" } else { "" });
        weather
    }

    /// Darken a random rectangle of light by a random thickness.
    pub fn make_cloud<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (length, width) = (self.length(), self.width());
        let max_size = self.weather.max_cloud_size.max(1);
        let height = rng.gen_range(1..=max_size);
        let breadth = rng.gen_range(1..=max_size);
        let top = rng.gen_range(0..length);
        let left = rng.gen_range(0..width);
        let thickness = rng.gen_range(self.weather.min_cloud_thickness..=self.weather.max_cloud_thickness);

        for y in top..(top + height).min(length) {
            for x in left..(left + breadth).min(width) {
                self.light[Position::new(y, x)] *= thickness;
            }
        }
    }

    /// Recompute temperature from water and light, clamped to the scalar bounds.
    pub fn update_temperature(&mut self) {
        let t = &self.temperature_settings;
        let (min, max) = (self.min_temp, self.max_temp);
        self.temperature = self.water.zip_map(&self.light, |water, light| {
            (t.natural_temp + water * t.water_temp + light * t.light_temp).clamp(min, max)
        });
    }

    /// Decay both scent channels, stamp current occupancy, spread to nearby
    /// rings and recombine into the signed field.
    pub fn update_scent(&mut self, herbivores: &Grid<bool>, carnivores: &Grid<bool>) {
        let s = &self.scent_settings;
        self.herbivore_scent = diffuse(&self.herbivore_scent, herbivores, s);
        self.carnivore_scent = diffuse(&self.carnivore_scent, carnivores, s);
        self.scent = self
            .herbivore_scent
            .zip_map(&self.carnivore_scent, |herb, carn| herb - carn);
    }

    /// Nearest cell of open water to `origin`. Ties go to the first cell in
    /// row-major order.
    pub fn nearest_full_water(&self, origin: Position) -> Option<Position> {
        self.water
            .iter()
            .filter(|(_, level)| **level >= FULL_WATER)
            .map(|(pos, _)| pos)
            .min_by_key(|pos| OrderedFloat(origin.distance(pos)))
    }
}

fn diffuse(prior: &Grid<f64>, occupancy: &Grid<bool>, settings: &ScentSettings) -> Grid<f64> {
    let base = prior.zip_map(occupancy, |scent, occupied| {
        let decayed = scent * settings.dissipation_rate;
        if *occupied {
            decayed.max(1.0)
        } else {
            decayed
        }
    });

    let mut spread = base.clone();
    for (pos, value) in spread.iter_mut() {
        let mut factor = 1.0;
        for ring in 1..=settings.scent_spread {
            factor *= settings.dissipation_spread;
            for cell in base.ring(pos, ring) {
                *value = value.max(base[cell] * factor);
            }
        }
    }
    spread
}
