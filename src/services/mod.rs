pub mod live;
pub mod raffle_service;
pub mod report_service;
pub mod update_service;

pub use live::*;
pub use raffle_service::*;
pub use report_service::*;
pub use update_service::*;
