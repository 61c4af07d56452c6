pub mod installer;
pub mod update_feed;

pub use installer::*;
pub use update_feed::*;
