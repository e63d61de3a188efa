use anyhow::{bail, Context};
use chrono::{NaiveDate, NaiveDateTime};
use fdrcore::entity::{Attribute, AttributeValue, MaskedArray, Parameter, Pilot};
use fdrcore::nodes::names;
use fdrcore::{Entity, FlightStore};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Climb and descent rate of the synthetic profile, ft/s.
const VERTICAL_SPEED: f64 = 25.0;
/// Seconds spent accelerating to, or decelerating from, cruise speed.
const SPEED_RAMP: f64 = 60.0;
/// Ceiling of the simulated radio altimeter, ft.
const RADIO_RANGE: f64 = 2500.0;

/// Configuration for generating one synthetic flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Recording length, seconds.
    pub duration: f64,
    /// Sample rate of every channel except pitch.
    pub frequency: f64,
    pub field_elevation: f64,
    /// Cruise height above the field, ft.
    pub cruise_height: f64,
    pub cruise_speed: f64,
    pub runway_heading: f64,
    pub noise: f64,
    pub seed: u64,
    pub start: NaiveDateTime,
    pub flight_number: u32,
    pub initial_fuel: f64,
    /// Fuel burned per second, kg.
    pub fuel_burn: f64,
    pub zero_fuel_weight: f64,
    pub engines: usize,
    pub flying_pilot: Pilot,
    pub description: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            duration: 1800.0,
            frequency: 1.0,
            field_elevation: 250.0,
            cruise_height: 10_000.0,
            cruise_speed: 250.0,
            runway_heading: 270.0,
            noise: 0.0,
            seed: 0,
            start: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_opt(8, 0, 0))
                .unwrap_or_default(),
            flight_number: 1234,
            initial_fuel: 12_000.0,
            fuel_burn: 1.0,
            zero_fuel_weight: 48_000.0,
            engines: 2,
            flying_pilot: Pilot::Captain,
            description: None,
        }
    }
}

/// Key times of the profile, seconds from the start of the recording.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    pub roll: f64,
    pub liftoff: f64,
    pub top_of_climb: f64,
    pub top_of_descent: f64,
    pub touchdown: f64,
}

impl Timeline {
    fn height(&self, t: f64, cruise: f64) -> f64 {
        if t < self.liftoff || t >= self.touchdown {
            0.0
        } else if t < self.top_of_climb {
            VERTICAL_SPEED * (t - self.liftoff)
        } else if t < self.top_of_descent {
            cruise
        } else {
            cruise - VERTICAL_SPEED * (t - self.top_of_descent)
        }
    }

    fn airspeed(&self, t: f64, cruise: f64) -> f64 {
        let rollout = self.touchdown + SPEED_RAMP;
        if t < self.roll || t >= rollout {
            0.0
        } else if t < self.liftoff {
            cruise * (t - self.roll) / SPEED_RAMP
        } else if t < self.touchdown {
            cruise
        } else {
            cruise * (rollout - t) / SPEED_RAMP
        }
    }

    fn pitch(&self, t: f64) -> f64 {
        if t >= self.liftoff && t < self.top_of_climb {
            8.0
        } else if t >= self.top_of_descent && t < self.touchdown {
            -3.0
        } else {
            0.0
        }
    }

    fn engine_n1(&self, t: f64) -> f64 {
        if t >= self.roll && t < self.top_of_climb {
            90.0
        } else if t >= self.top_of_climb && t < self.top_of_descent {
            75.0
        } else if t >= self.top_of_descent && t < self.touchdown {
            45.0
        } else {
            25.0
        }
    }

    fn autopilot(&self, t: f64) -> bool {
        t >= self.liftoff + 120.0 && t < self.touchdown - 120.0
    }
}

impl GeneratorConfig {
    /// Places the flight so that it lifts off after a tenth of the recording
    /// and touches down at 85 % of it.
    pub fn timeline(&self) -> anyhow::Result<Timeline> {
        if self.duration <= 0.0 || self.frequency <= 0.0 {
            bail!("duration and frequency must be positive");
        }
        if self.cruise_speed <= 100.0 {
            bail!("cruise speed {} kt is too slow to fly", self.cruise_speed);
        }
        let roll = 0.1 * self.duration;
        let liftoff = roll + SPEED_RAMP;
        let touchdown = 0.85 * self.duration;
        let leg = self.cruise_height / VERTICAL_SPEED;
        let timeline = Timeline {
            roll,
            liftoff,
            top_of_climb: liftoff + leg,
            top_of_descent: touchdown - leg,
            touchdown,
        };
        if timeline.top_of_climb > timeline.top_of_descent {
            bail!(
                "{} s is too short to reach {} ft and come back",
                self.duration,
                self.cruise_height
            );
        }
        Ok(timeline)
    }

    fn sample_count(&self) -> usize {
        (self.duration * self.frequency).floor() as usize
    }
}

struct ChannelBuilder<'a> {
    config: &'a GeneratorConfig,
    rng: StdRng,
}

impl ChannelBuilder<'_> {
    fn jitter(&mut self) -> f64 {
        if self.config.noise > 0.0 {
            self.rng.gen_range(-self.config.noise..self.config.noise)
        } else {
            0.0
        }
    }

    fn sampled(
        &mut self,
        name: &str,
        frequency: f64,
        offset: f64,
        noisy: bool,
        f: impl Fn(f64) -> Option<f64>,
    ) -> anyhow::Result<Entity> {
        let count = (self.config.duration * frequency).floor() as usize;
        let mut samples = Vec::with_capacity(count);
        for index in 0..count {
            let t = index as f64 / frequency + offset;
            let jitter = if noisy { self.jitter() } else { 0.0 };
            samples.push(f(t).map(|v| v + jitter));
        }
        let parameter = Parameter::new(name, MaskedArray::from_options(&samples), frequency, offset)
            .with_context(|| format!("building channel '{name}'"))?;
        Ok(parameter.into())
    }

    fn channel(&mut self, name: &str, noisy: bool, f: impl Fn(f64) -> f64) -> anyhow::Result<Entity> {
        let hz = self.config.frequency;
        self.sampled(name, hz, 0.0, noisy, |t| Some(f(t)))
    }
}

/// Builds the raw channels and attributes of a synthetic flight.
pub fn build_flight_from_config(config: &GeneratorConfig) -> anyhow::Result<FlightStore> {
    let timeline = config.timeline()?;
    let cruise = config.cruise_height;
    let field = config.field_elevation;
    let hz = config.frequency;
    let mut builder = ChannelBuilder {
        config,
        rng: StdRng::seed_from_u64(config.seed),
    };

    let mut entities = vec![
        builder.channel(names::ALTITUDE_STD, true, |t| field + timeline.height(t, cruise))?,
        builder.sampled(names::ALTITUDE_RADIO_SENSOR, hz, 0.0, true, |t| {
            Some(timeline.height(t, cruise)).filter(|h| *h <= RADIO_RANGE)
        })?,
        builder.channel(names::AIRSPEED, true, |t| timeline.airspeed(t, config.cruise_speed))?,
        builder.channel(names::HEADING_MAGNETIC, false, |t| {
            let turned = if t >= timeline.top_of_climb { 90.0 } else { 0.0 };
            (config.runway_heading + turned) % 360.0
        })?,
        builder.channel(names::ACCELERATION_NORMAL, true, |_| 1.0)?,
        builder.channel(names::ACCELERATION_LATERAL, true, |_| 0.0)?,
        builder.channel(names::ACCELERATION_LONGITUDINAL, true, |_| 0.0)?,
        builder.channel(names::ROLL, true, |_| 0.0)?,
        // Two attitude sensors sampled half a period apart.
        builder.sampled(names::PITCH_1, hz, 0.25 / hz, true, |t| Some(timeline.pitch(t)))?,
        builder.sampled(names::PITCH_2, hz, 0.75 / hz, true, |t| Some(timeline.pitch(t)))?,
        builder.channel(names::FUEL_QTY, false, |t| config.initial_fuel - config.fuel_burn * t)?,
        builder.channel(names::GROSS_WEIGHT, false, |t| {
            config.zero_fuel_weight + config.initial_fuel - config.fuel_burn * t
        })?,
        builder.channel(names::FLIGHT_NUMBER_CHANNEL, false, |_| f64::from(config.flight_number))?,
    ];

    let (engaged, disengaged) = match config.flying_pilot {
        Pilot::Captain => (names::AUTOPILOT_1_ENGAGED, names::AUTOPILOT_2_ENGAGED),
        Pilot::FirstOfficer => (names::AUTOPILOT_2_ENGAGED, names::AUTOPILOT_1_ENGAGED),
    };
    entities.push(builder.channel(engaged, false, |t| if timeline.autopilot(t) { 1.0 } else { 0.0 })?);
    entities.push(builder.channel(disengaged, false, |_| 0.0)?);

    let (flying, monitoring) = match config.flying_pilot {
        Pilot::Captain => (
            [names::PITCH_CAPTAIN, names::ROLL_CAPTAIN],
            [names::PITCH_FIRST_OFFICER, names::ROLL_FIRST_OFFICER],
        ),
        Pilot::FirstOfficer => (
            [names::PITCH_FIRST_OFFICER, names::ROLL_FIRST_OFFICER],
            [names::PITCH_CAPTAIN, names::ROLL_CAPTAIN],
        ),
    };
    for name in flying {
        entities.push(builder.channel(name, false, |t| 2.0 * (t / 5.0).sin())?);
    }
    for name in monitoring {
        entities.push(builder.channel(name, false, |_| 0.0)?);
    }

    for engine in 0..config.engines.min(names::ENG_N1.len()) {
        let trim = engine as f64;
        entities.push(builder.channel(names::ENG_N1[engine], true, |t| timeline.engine_n1(t) + trim)?);
        entities.push(builder.channel(names::ENG_N2[engine], true, |t| {
            timeline.engine_n1(t) + 10.0 + trim
        })?);
    }

    entities.push(Attribute::new(names::START_DATETIME, AttributeValue::DateTime(config.start)).into());
    entities.push(Attribute::number(names::MAIN_GEAR_TO_ALTITUDE_RADIO, 10.0).into());
    entities.push(Attribute::number(names::DIST_GEAR_TO_TAIL, 50.0).into());

    let mut store = FlightStore::new();
    for entity in entities {
        store.insert(entity).context("assembling synthetic flight")?;
    }
    log::debug!(
        "generated {} channels of {} samples",
        store.len(),
        config.sample_count()
    );
    Ok(store)
}

pub fn build_flight(duration: f64, seed: u64) -> anyhow::Result<FlightStore> {
    let config = GeneratorConfig {
        duration,
        seed,
        ..Default::default()
    };
    build_flight_from_config(&config)
}
