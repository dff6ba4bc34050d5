pub mod audit;
pub mod bets;
pub mod budget;
pub mod notifications;
pub mod platforms;
pub mod statistics;
pub mod system;
pub mod tickets;
pub mod tipsters;

pub use audit::*;
pub use bets::*;
pub use budget::*;
pub use notifications::*;
pub use platforms::*;
pub use statistics::*;
pub use system::*;
pub use tickets::*;
pub use tipsters::*;
