pub mod kinematics;
pub mod control;
pub mod collision;
pub mod outcome;
pub mod episode;
pub mod observation;
pub mod error;
pub mod policy;
pub mod autopilots;
pub mod flight_loop;
pub mod batch;
pub mod analyzer;

pub use batch::*;
pub use episode::*;
pub use error::SimError;
pub use flight_loop::*;
pub use policy::*;
