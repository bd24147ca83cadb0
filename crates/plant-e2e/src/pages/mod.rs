//! Page objects for the application under test.

pub mod navigation;
pub mod planting;

pub use navigation::{DirectMapNavigator, MapNavigator};
pub use planting::{MapPlantingPage, TourOutcome};
