//! Narrow interface for persisting the selected display units

use crate::units::UnitSelection;
use std::convert::Infallible;

/// Storage for unit preferences owned outside the measurement tool
pub trait PreferenceStore {
    type Error: std::error::Error;

    /// Previously saved selection, or `None` if nothing was saved
    fn load_units(&self) -> Result<Option<UnitSelection>, Self::Error>;

    /// Persist the current selection
    fn save_units(&mut self, units: &UnitSelection) -> Result<(), Self::Error>;
}

/// Store that keeps nothing; units fall back to defaults on every load
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPreferenceStore;

impl PreferenceStore for NoopPreferenceStore {
    type Error = Infallible;

    fn load_units(&self) -> Result<Option<UnitSelection>, Self::Error> {
        Ok(None)
    }

    fn save_units(&mut self, _units: &UnitSelection) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// In-memory store, useful for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    units: Option<UnitSelection>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_units(units: UnitSelection) -> Self {
        Self { units: Some(units) }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    type Error = Infallible;

    fn load_units(&self) -> Result<Option<UnitSelection>, Self::Error> {
        Ok(self.units)
    }

    fn save_units(&mut self, units: &UnitSelection) -> Result<(), Self::Error> {
        self.units = Some(*units);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{AreaUnit, DistanceUnit};

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryPreferenceStore::new();
        assert_eq!(store.load_units().unwrap(), None);

        let units = UnitSelection::new(DistanceUnit::Miles, AreaUnit::Acres);
        store.save_units(&units).unwrap();
        assert_eq!(store.load_units().unwrap(), Some(units));
    }

    #[test]
    fn test_noop_store_forgets() {
        let mut store = NoopPreferenceStore;
        store.save_units(&UnitSelection::default()).unwrap();
        assert_eq!(store.load_units().unwrap(), None);
    }
}
