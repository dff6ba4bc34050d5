pub mod amount;
pub mod audit;
pub mod bet;
pub mod budget;
pub mod mode;
pub mod notification;
pub mod platform;
pub mod ticket;
pub mod tipster;

pub use amount::{check_amount, MAX_AMOUNT, MAX_ODDS};
pub use audit::*;
pub use bet::*;
pub use budget::*;
pub use mode::*;
pub use notification::*;
pub use platform::*;
pub use ticket::*;
pub use tipster::*;
