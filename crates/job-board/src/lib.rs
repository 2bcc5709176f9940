pub mod applications;
pub mod catalog;
pub mod config;
pub mod directory;
pub mod error;
pub mod newsletter;
pub mod router;
pub mod session;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod uploads;

pub use router::board_router;
pub use state::BoardState;
