//! Domain models for the Smart Irrigation Dashboard

mod alert;
mod crop;
mod dashboard;
mod feature;
mod irrigation;
mod observation;

pub use alert::*;
pub use crop::*;
pub use dashboard::*;
pub use feature::*;
pub use irrigation::*;
pub use observation::*;
