pub mod board;
pub mod buyer;
pub mod changes;
pub mod common;
pub mod raffle;
pub mod sold_number;
pub mod stats;
pub mod update;

pub use board::*;
pub use buyer::*;
pub use changes::*;
pub use common::*;
pub use raffle::*;
pub use sold_number::*;
pub use stats::*;
pub use update::*;
