//! Display unit registry for distance and area measurements
//!
//! Raw values are always stored in base units (meters, square meters). A unit
//! is only a conversion factor plus a fixed number of decimals, so switching
//! the active unit re-formats existing values without touching geometry.

use crate::error::MeasureError;
use crate::measurement::MeasurementMode;

/// Kind of physical quantity a unit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityKind {
    Distance,
    Area,
}

impl QuantityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuantityKind::Distance => "distance",
            QuantityKind::Area => "area",
        }
    }
}

impl std::fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuantityKind {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "distance" | "length" => Ok(QuantityKind::Distance),
            "area" => Ok(QuantityKind::Area),
            _ => Err(MeasureError::UnknownQuantity(s.to_string())),
        }
    }
}

impl From<MeasurementMode> for QuantityKind {
    fn from(mode: MeasurementMode) -> Self {
        match mode {
            MeasurementMode::Distance => QuantityKind::Distance,
            MeasurementMode::Area => QuantityKind::Area,
        }
    }
}

/// Registry entry describing one display unit
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct UnitSpec {
    /// Canonical symbol shown in labels
    pub symbol: &'static str,
    /// Multiplier from the base unit to this unit
    pub factor: f64,
    /// Fixed decimals used when formatting
    pub decimals: usize,
}

impl UnitSpec {
    /// Convert a base-unit value into this unit
    pub fn convert(&self, raw: f64) -> f64 {
        raw * self.factor
    }

    /// Convert a value in this unit back to the base unit
    pub fn to_base(&self, display: f64) -> f64 {
        display / self.factor
    }

    /// Format a base-unit value as a label, e.g. `"1.25 km"`
    pub fn format(&self, raw: f64) -> String {
        format!("{:.*} {}", self.decimals, self.convert(raw), self.symbol)
    }
}

/// Display units for distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum DistanceUnit {
    #[default]
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "km")]
    Kilometers,
    #[serde(rename = "ft")]
    Feet,
    #[serde(rename = "mi")]
    Miles,
}

impl DistanceUnit {
    pub const ALL: [DistanceUnit; 4] = [
        DistanceUnit::Meters,
        DistanceUnit::Kilometers,
        DistanceUnit::Feet,
        DistanceUnit::Miles,
    ];

    pub fn spec(&self) -> UnitSpec {
        match self {
            DistanceUnit::Meters => UnitSpec { symbol: "m", factor: 1.0, decimals: 0 },
            DistanceUnit::Kilometers => UnitSpec { symbol: "km", factor: 0.001, decimals: 2 },
            DistanceUnit::Feet => UnitSpec { symbol: "ft", factor: 3.28084, decimals: 0 },
            DistanceUnit::Miles => UnitSpec { symbol: "mi", factor: 0.000621371, decimals: 2 },
        }
    }

    pub fn symbol(&self) -> &'static str {
        self.spec().symbol
    }

    /// Look up a unit by symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "m" => Some(DistanceUnit::Meters),
            "km" => Some(DistanceUnit::Kilometers),
            "ft" => Some(DistanceUnit::Feet),
            "mi" => Some(DistanceUnit::Miles),
            _ => None,
        }
    }
}

/// Display units for areas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum AreaUnit {
    #[default]
    #[serde(rename = "m²", alias = "m2")]
    SquareMeters,
    #[serde(rename = "km²", alias = "km2")]
    SquareKilometers,
    #[serde(rename = "ha")]
    Hectares,
    #[serde(rename = "ft²", alias = "ft2")]
    SquareFeet,
    #[serde(rename = "acres", alias = "ac")]
    Acres,
}

impl AreaUnit {
    pub const ALL: [AreaUnit; 5] = [
        AreaUnit::SquareMeters,
        AreaUnit::SquareKilometers,
        AreaUnit::Hectares,
        AreaUnit::SquareFeet,
        AreaUnit::Acres,
    ];

    pub fn spec(&self) -> UnitSpec {
        match self {
            AreaUnit::SquareMeters => UnitSpec { symbol: "m²", factor: 1.0, decimals: 0 },
            AreaUnit::SquareKilometers => UnitSpec { symbol: "km²", factor: 0.000001, decimals: 3 },
            AreaUnit::Hectares => UnitSpec { symbol: "ha", factor: 0.0001, decimals: 3 },
            AreaUnit::SquareFeet => UnitSpec { symbol: "ft²", factor: 10.7639, decimals: 0 },
            AreaUnit::Acres => UnitSpec { symbol: "acres", factor: 0.000247105, decimals: 3 },
        }
    }

    pub fn symbol(&self) -> &'static str {
        self.spec().symbol
    }

    /// Look up a unit by symbol; ASCII spellings of the squared units are accepted
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "m²" | "m2" => Some(AreaUnit::SquareMeters),
            "km²" | "km2" => Some(AreaUnit::SquareKilometers),
            "ha" => Some(AreaUnit::Hectares),
            "ft²" | "ft2" => Some(AreaUnit::SquareFeet),
            "acres" | "acre" | "ac" => Some(AreaUnit::Acres),
            _ => None,
        }
    }
}

/// Currently selected display units, one per quantity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct UnitSelection {
    pub distance: DistanceUnit,
    pub area: AreaUnit,
}

impl UnitSelection {
    pub fn new(distance: DistanceUnit, area: AreaUnit) -> Self {
        Self { distance, area }
    }

    /// Change the unit for `kind` by symbol
    ///
    /// An unknown symbol leaves the selection unchanged.
    pub fn set(&mut self, kind: QuantityKind, symbol: &str) -> Result<(), MeasureError> {
        let unknown = || MeasureError::UnknownUnit {
            kind,
            symbol: symbol.to_string(),
        };
        match kind {
            QuantityKind::Distance => {
                self.distance = DistanceUnit::from_symbol(symbol).ok_or_else(unknown)?;
            }
            QuantityKind::Area => {
                self.area = AreaUnit::from_symbol(symbol).ok_or_else(unknown)?;
            }
        }
        Ok(())
    }

    /// Unit spec used for values of the given measurement mode
    pub fn spec_for(&self, mode: MeasurementMode) -> UnitSpec {
        match mode {
            MeasurementMode::Distance => self.distance.spec(),
            MeasurementMode::Area => self.area.spec(),
        }
    }

    /// Format a base-unit value of the given mode with the selected unit
    pub fn format(&self, mode: MeasurementMode, raw: f64) -> String {
        self.spec_for(mode).format(raw)
    }
}

/// All registered units of a quantity kind
pub fn registry(kind: QuantityKind) -> Vec<UnitSpec> {
    match kind {
        QuantityKind::Distance => DistanceUnit::ALL.iter().map(|u| u.spec()).collect(),
        QuantityKind::Area => AreaUnit::ALL.iter().map(|u| u.spec()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_formatting() {
        assert_eq!(DistanceUnit::Meters.spec().format(1113.19), "1113 m");
        assert_eq!(DistanceUnit::Kilometers.spec().format(1113.19), "1.11 km");
        assert_eq!(DistanceUnit::Feet.spec().format(100.0), "328 ft");
        assert_eq!(DistanceUnit::Miles.spec().format(1609.344), "1.00 mi");
    }

    #[test]
    fn test_area_formatting() {
        assert_eq!(AreaUnit::SquareMeters.spec().format(12_061.28), "12061 m²");
        assert_eq!(AreaUnit::Hectares.spec().format(12_061.28), "1.206 ha");
        assert_eq!(AreaUnit::SquareKilometers.spec().format(2_500_000.0), "2.500 km²");
        assert_eq!(AreaUnit::SquareFeet.spec().format(1.0), "11 ft²");
        assert_eq!(AreaUnit::Acres.spec().format(4046.86), "1.000 acres");
    }

    #[test]
    fn test_zero_is_displayable() {
        assert_eq!(DistanceUnit::Meters.spec().format(0.0), "0 m");
        assert_eq!(AreaUnit::Hectares.spec().format(0.0), "0.000 ha");
    }

    #[test]
    fn test_conversion_round_trips_within_rounding() {
        let raw = 12_345.678;
        for spec in registry(QuantityKind::Distance)
            .into_iter()
            .chain(registry(QuantityKind::Area))
        {
            let shown: f64 = format!("{:.*}", spec.decimals, spec.convert(raw))
                .parse()
                .unwrap();
            let tolerance = 0.5 * 10f64.powi(-(spec.decimals as i32)) / spec.factor;
            assert!(
                (spec.to_base(shown) - raw).abs() <= tolerance + 1e-9,
                "{} failed round trip",
                spec.symbol
            );
        }
    }

    #[test]
    fn test_symbol_lookup() {
        for unit in DistanceUnit::ALL {
            assert_eq!(DistanceUnit::from_symbol(unit.symbol()), Some(unit));
        }
        for unit in AreaUnit::ALL {
            assert_eq!(AreaUnit::from_symbol(unit.symbol()), Some(unit));
        }
        assert_eq!(AreaUnit::from_symbol("m2"), Some(AreaUnit::SquareMeters));
        assert_eq!(AreaUnit::from_symbol("ac"), Some(AreaUnit::Acres));
        assert_eq!(DistanceUnit::from_symbol("yd"), None);
    }

    #[test]
    fn test_selection_rejects_unknown_symbol() {
        let mut selection = UnitSelection::new(DistanceUnit::Feet, AreaUnit::Hectares);

        let err = selection.set(QuantityKind::Distance, "furlong").unwrap_err();
        assert!(matches!(err, MeasureError::UnknownUnit { kind: QuantityKind::Distance, .. }));
        assert_eq!(selection.distance, DistanceUnit::Feet);

        // Area symbols are not valid distance symbols
        assert!(selection.set(QuantityKind::Distance, "ha").is_err());
        assert_eq!(selection.distance, DistanceUnit::Feet);
    }

    #[test]
    fn test_selection_kinds_are_independent() {
        let mut selection = UnitSelection::default();
        selection.set(QuantityKind::Area, "acres").unwrap();
        assert_eq!(selection.area, AreaUnit::Acres);
        assert_eq!(selection.distance, DistanceUnit::Meters);

        selection.set(QuantityKind::Distance, "mi").unwrap();
        assert_eq!(selection.distance, DistanceUnit::Miles);
        assert_eq!(selection.area, AreaUnit::Acres);
    }

    #[test]
    fn test_selection_serializes_as_symbols() {
        let selection = UnitSelection::new(DistanceUnit::Kilometers, AreaUnit::SquareMeters);
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r#"{"distance":"km","area":"m²"}"#);

        let parsed: UnitSelection =
            serde_json::from_str(r#"{"distance":"ft","area":"m2"}"#).unwrap();
        assert_eq!(parsed.area, AreaUnit::SquareMeters);
        assert_eq!(parsed.distance, DistanceUnit::Feet);
    }

    #[test]
    fn test_unit_change_rescales_without_recompute() {
        let raw = 12_061.276;
        let mut selection = UnitSelection::default();
        let before = selection.spec_for(MeasurementMode::Area).convert(raw);
        selection.set(QuantityKind::Area, "ha").unwrap();
        let after = selection.spec_for(MeasurementMode::Area).convert(raw);
        assert_relative_eq!(after, before * 0.0001, epsilon = 1e-9);
    }

    #[test]
    fn test_quantity_kind_parse() {
        assert_eq!("Area".parse::<QuantityKind>().unwrap(), QuantityKind::Area);
        assert_eq!("distance".parse::<QuantityKind>().unwrap(), QuantityKind::Distance);
        assert!("volume".parse::<QuantityKind>().is_err());
    }
}
