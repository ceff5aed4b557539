//! Map Measurement Core Library
//!
//! Geodesic calculations, display units and the measurement session state
//! machine for the interactive map measuring tool.

pub mod config;
pub mod coordinate;
pub mod error;
pub mod geodesy;
pub mod measurement;
pub mod preferences;
pub mod session;
pub mod units;

pub use config::MeasureConfig;
pub use coordinate::GeoPoint;
pub use error::{MeasureError, Result};
pub use geodesy::{Sphere, DEFAULT_EARTH_RADIUS_M};
pub use measurement::{FinalizedMeasurement, MeasurementId, MeasurementMode};
pub use preferences::{MemoryPreferenceStore, NoopPreferenceStore, PreferenceStore};
pub use session::{MeasurementSession, Preview, SessionEffect};
pub use units::{AreaUnit, DistanceUnit, QuantityKind, UnitSelection, UnitSpec};
