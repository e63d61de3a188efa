//! Flight-level attributes measured from the recording itself.

use chrono::{Duration as ChronoDuration, NaiveDateTime};

use crate::entity::{Attribute, AttributeValue, Entity, Events};
use crate::math::StatsHelper;
use crate::nodes::names;
use crate::prelude::{
    Alignment, DependencyGroup, DeriveError, DeriveResult, DeriveSettings, DerivedNode, NodeInputs,
};

/// Which event of a flight an attribute is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    First,
    Last,
}

impl Occurrence {
    pub(crate) fn pick<'a, T>(self, events: &'a Events<T>) -> Option<&'a T> {
        match self {
            Occurrence::First => events.first(),
            Occurrence::Last => events.last(),
        }
    }
}

/// Fuel on board at takeoff or landing.
///
/// A value entered on the flight record takes precedence over the recorded
/// fuel quantity.
pub struct FuelAttribute {
    name: &'static str,
    manual: &'static str,
    recorded: &'static str,
    occurrence: Occurrence,
    dependencies: &'static [DependencyGroup],
}

pub static TAKEOFF_FUEL: FuelAttribute = FuelAttribute {
    name: names::TAKEOFF_FUEL,
    manual: names::AFR_TAKEOFF_FUEL,
    recorded: names::FUEL_QTY_AT_LIFTOFF,
    occurrence: Occurrence::First,
    dependencies: &[DependencyGroup::OptionalGroup {
        names: &[names::AFR_TAKEOFF_FUEL, names::FUEL_QTY_AT_LIFTOFF],
        min_count: 1,
    }],
};

pub static LANDING_FUEL: FuelAttribute = FuelAttribute {
    name: names::LANDING_FUEL,
    manual: names::AFR_LANDING_FUEL,
    recorded: names::FUEL_QTY_AT_TOUCHDOWN,
    occurrence: Occurrence::Last,
    dependencies: &[DependencyGroup::OptionalGroup {
        names: &[names::AFR_LANDING_FUEL, names::FUEL_QTY_AT_TOUCHDOWN],
        min_count: 1,
    }],
};

impl DerivedNode for FuelAttribute {
    fn name(&self) -> &'static str {
        self.name
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        self.dependencies
    }

    fn alignment(&self) -> Alignment {
        Alignment::Unaligned
    }

    fn derive(&self, inputs: &NodeInputs, _settings: &DeriveSettings) -> DeriveResult<Entity> {
        if let Some(fuel) = inputs
            .optional_attribute(self.manual)
            .and_then(|a| a.value.as_number())
        {
            return Ok(Attribute::number(self.name, fuel).into());
        }
        let kpvs = inputs.key_point_values(self.recorded)?;
        let kpv = self
            .occurrence
            .pick(kpvs)
            .ok_or_else(|| DeriveError::NotComputable(format!("no '{}' recorded", self.recorded)))?;
        Ok(Attribute::number(self.name, kpv.value).into())
    }
}

/// Gross weight at takeoff or landing from the matching key point value.
pub struct GrossWeightAttribute {
    name: &'static str,
    source: &'static str,
    occurrence: Occurrence,
    dependencies: &'static [DependencyGroup],
}

pub static TAKEOFF_GROSS_WEIGHT: GrossWeightAttribute = GrossWeightAttribute {
    name: names::TAKEOFF_GROSS_WEIGHT,
    source: names::GROSS_WEIGHT_AT_LIFTOFF,
    occurrence: Occurrence::First,
    dependencies: &[DependencyGroup::Required(names::GROSS_WEIGHT_AT_LIFTOFF)],
};

pub static LANDING_GROSS_WEIGHT: GrossWeightAttribute = GrossWeightAttribute {
    name: names::LANDING_GROSS_WEIGHT,
    source: names::GROSS_WEIGHT_AT_TOUCHDOWN,
    occurrence: Occurrence::Last,
    dependencies: &[DependencyGroup::Required(names::GROSS_WEIGHT_AT_TOUCHDOWN)],
};

impl DerivedNode for GrossWeightAttribute {
    fn name(&self) -> &'static str {
        self.name
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        self.dependencies
    }

    fn alignment(&self) -> Alignment {
        Alignment::Unaligned
    }

    fn derive(&self, inputs: &NodeInputs, _settings: &DeriveSettings) -> DeriveResult<Entity> {
        let kpvs = inputs.key_point_values(self.source)?;
        let kpv = self
            .occurrence
            .pick(kpvs)
            .ok_or_else(|| DeriveError::NotComputable(format!("no '{}' recorded", self.source)))?;
        Ok(Attribute::number(self.name, kpv.value).into())
    }
}

/// Wall-clock time of the first liftoff or last touchdown.
pub struct EventDatetime {
    name: &'static str,
    instants: &'static str,
    occurrence: Occurrence,
    dependencies: &'static [DependencyGroup],
}

pub static TAKEOFF_DATETIME: EventDatetime = EventDatetime {
    name: names::TAKEOFF_DATETIME,
    instants: names::LIFTOFF,
    occurrence: Occurrence::First,
    dependencies: &[
        DependencyGroup::Required(names::LIFTOFF),
        DependencyGroup::Required(names::START_DATETIME),
    ],
};

pub static LANDING_DATETIME: EventDatetime = EventDatetime {
    name: names::LANDING_DATETIME,
    instants: names::TOUCHDOWN,
    occurrence: Occurrence::Last,
    dependencies: &[
        DependencyGroup::Required(names::START_DATETIME),
        DependencyGroup::Required(names::TOUCHDOWN),
    ],
};

fn datetime_of(inputs: &NodeInputs, name: &str) -> DeriveResult<NaiveDateTime> {
    inputs
        .attribute(name)?
        .value
        .as_datetime()
        .ok_or_else(|| DeriveError::InvalidInput(format!("'{name}' is not a date-time")))
}

impl DerivedNode for EventDatetime {
    fn name(&self) -> &'static str {
        self.name
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        self.dependencies
    }

    fn alignment(&self) -> Alignment {
        Alignment::Unaligned
    }

    fn derive(&self, inputs: &NodeInputs, _settings: &DeriveSettings) -> DeriveResult<Entity> {
        let start = datetime_of(inputs, names::START_DATETIME)?;
        let instants = inputs.key_time_instances(self.instants)?;
        let instant = self
            .occurrence
            .pick(instants)
            .ok_or_else(|| DeriveError::NotComputable(format!("no '{}' in this flight", self.instants)))?;
        let seconds = instants.seconds_at(instant.index);
        let at = start + ChronoDuration::milliseconds((seconds * 1000.0).round() as i64);
        Ok(Attribute::new(self.name, AttributeValue::DateTime(at)).into())
    }
}

/// Seconds from takeoff to landing.
pub struct Duration;

impl DerivedNode for Duration {
    fn name(&self) -> &'static str {
        names::DURATION
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[
            DependencyGroup::Required(names::TAKEOFF_DATETIME),
            DependencyGroup::Required(names::LANDING_DATETIME),
        ]
    }

    fn alignment(&self) -> Alignment {
        Alignment::Unaligned
    }

    fn derive(&self, inputs: &NodeInputs, _settings: &DeriveSettings) -> DeriveResult<Entity> {
        let takeoff = datetime_of(inputs, names::TAKEOFF_DATETIME)?;
        let landing = datetime_of(inputs, names::LANDING_DATETIME)?;
        let seconds = (landing - takeoff).num_milliseconds() as f64 / 1000.0;
        Ok(Attribute::number(self.name(), seconds).into())
    }
}

/// The flight number recorded most often.
///
/// Negative values mean the channel is carrying something else, so none is
/// reported.
pub struct FlightNumber;

impl DerivedNode for FlightNumber {
    fn name(&self) -> &'static str {
        names::FLIGHT_NUMBER
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[DependencyGroup::Required(names::FLIGHT_NUMBER_CHANNEL)]
    }

    fn derive(&self, inputs: &NodeInputs, _settings: &DeriveSettings) -> DeriveResult<Entity> {
        let channel = inputs.parameter(names::FLIGHT_NUMBER_CHANNEL)?;
        let values = channel.array.valid_values();
        if values.iter().any(|v| *v < 0.0) {
            return Err(DeriveError::NotComputable(
                "flight number channel holds negative values".into(),
            ));
        }
        let number = StatsHelper::mode(values.iter().filter(|v| **v > 0.0).map(|v| v.trunc() as i64))
            .ok_or_else(|| DeriveError::NotComputable("no flight number recorded".into()))?;
        Ok(Attribute::new(self.name(), AttributeValue::Text(number.to_string())).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::entity::{FlightStore, KeyPointValues, KeyTimeInstances, MaskedArray, Parameter};
    use crate::nodes::derive_from;

    fn epoch() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    fn value_of(node: &dyn DerivedNode, entities: Vec<Entity>) -> DeriveResult<AttributeValue> {
        let store: FlightStore = entities.into_iter().collect();
        derive_from(node, &store).map(|e| e.as_attribute().unwrap().value.clone())
    }

    fn kpvs(name: &str, items: &[(f64, f64)]) -> Entity {
        let mut kpvs = KeyPointValues::new(name, 1.0, 0.0);
        for (index, value) in items {
            kpvs.push_value(*index, *value);
        }
        kpvs.into()
    }

    #[test]
    fn manual_fuel_overrides_recorded() {
        let manual = || Entity::from(Attribute::number(names::AFR_TAKEOFF_FUEL, 100.0));
        let recorded = || kpvs(names::FUEL_QTY_AT_LIFTOFF, &[(132.0, 200.0)]);
        assert_eq!(value_of(&TAKEOFF_FUEL, vec![manual()]), Ok(AttributeValue::Number(100.0)));
        assert_eq!(value_of(&TAKEOFF_FUEL, vec![recorded()]), Ok(AttributeValue::Number(200.0)));
        assert_eq!(
            value_of(&TAKEOFF_FUEL, vec![manual(), recorded()]),
            Ok(AttributeValue::Number(100.0))
        );
    }

    #[test]
    fn landing_fuel_uses_last_touchdown() {
        let recorded = kpvs(names::FUEL_QTY_AT_TOUCHDOWN, &[(87.0, 160.0), (132.0, 200.0)]);
        assert_eq!(value_of(&LANDING_FUEL, vec![recorded]), Ok(AttributeValue::Number(200.0)));
        assert_eq!(
            LANDING_FUEL.operational_combinations(),
            vec![
                vec![names::AFR_LANDING_FUEL],
                vec![names::FUEL_QTY_AT_TOUCHDOWN],
                vec![names::AFR_LANDING_FUEL, names::FUEL_QTY_AT_TOUCHDOWN],
            ]
        );
    }

    #[test]
    fn gross_weights_pick_first_and_last() {
        let liftoff = kpvs(names::GROSS_WEIGHT_AT_LIFTOFF, &[(5.0, 135.0), (12.0, 120.0)]);
        let touchdown = kpvs(names::GROSS_WEIGHT_AT_TOUCHDOWN, &[(5.0, 15.0), (12.0, 120.0)]);
        assert_eq!(value_of(&TAKEOFF_GROSS_WEIGHT, vec![liftoff]), Ok(AttributeValue::Number(135.0)));
        assert_eq!(value_of(&LANDING_GROSS_WEIGHT, vec![touchdown]), Ok(AttributeValue::Number(120.0)));
    }

    #[test]
    fn takeoff_datetime_counts_from_start() {
        let mut liftoff = KeyTimeInstances::new(names::LIFTOFF, 0.25, 0.0);
        liftoff.push_index(100.0);
        let start = Attribute::new(names::START_DATETIME, AttributeValue::DateTime(epoch()));
        let expected = epoch() + ChronoDuration::seconds(400);
        assert_eq!(
            value_of(&TAKEOFF_DATETIME, vec![liftoff.into(), start.clone().into()]),
            Ok(AttributeValue::DateTime(expected))
        );

        let empty = KeyTimeInstances::new(names::LIFTOFF, 0.25, 0.0);
        assert!(matches!(
            value_of(&TAKEOFF_DATETIME, vec![empty.into(), start.into()]),
            Err(DeriveError::NotComputable(_))
        ));
    }

    #[test]
    fn landing_datetime_uses_last_touchdown() {
        let mut touchdown = KeyTimeInstances::new(names::TOUCHDOWN, 0.5, 0.0);
        touchdown.push_index(12.0);
        touchdown.push_index(30.0);
        let start = Attribute::new(names::START_DATETIME, AttributeValue::DateTime(epoch()));
        assert_eq!(
            value_of(&LANDING_DATETIME, vec![start.into(), touchdown.into()]),
            Ok(AttributeValue::DateTime(epoch() + ChronoDuration::minutes(1)))
        );
    }

    #[test]
    fn duration_in_seconds() {
        let takeoff = epoch() + ChronoDuration::minutes(1);
        let landing = epoch() + ChronoDuration::seconds(150);
        assert_eq!(
            value_of(
                &Duration,
                vec![
                    Attribute::new(names::TAKEOFF_DATETIME, AttributeValue::DateTime(takeoff)).into(),
                    Attribute::new(names::LANDING_DATETIME, AttributeValue::DateTime(landing)).into(),
                ]
            ),
            Ok(AttributeValue::Number(90.0))
        );
    }

    fn flight_numbers(values: Vec<f64>) -> DeriveResult<AttributeValue> {
        value_of(
            &FlightNumber,
            vec![Parameter::at_1hz(names::FLIGHT_NUMBER_CHANNEL, MaskedArray::from_values(values)).into()],
        )
    }

    #[test]
    fn flight_number_is_most_common_value() {
        assert_eq!(
            flight_numbers(vec![103.0, 102.0, 102.0]),
            Ok(AttributeValue::Text("102".into()))
        );
        let mut noisy = vec![2.0, 555.6, 888.0, 7777.0, 9100.0];
        noisy.extend(std::iter::repeat(444.0).take(14));
        assert_eq!(flight_numbers(noisy), Ok(AttributeValue::Text("444".into())));
    }

    #[test]
    fn flight_number_rejects_negative_or_missing() {
        assert!(matches!(
            flight_numbers(vec![-1.0, 2.0, -4.0, 10.0]),
            Err(DeriveError::NotComputable(_))
        ));
        let store: FlightStore = [Entity::from(Parameter::at_1hz(
            names::FLIGHT_NUMBER_CHANNEL,
            MaskedArray::invalid(3),
        ))]
        .into_iter()
        .collect();
        assert!(matches!(
            derive_from(&FlightNumber, &store),
            Err(DeriveError::NotComputable(_))
        ));
    }
}
