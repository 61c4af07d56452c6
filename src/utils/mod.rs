pub mod price;
pub mod ticket_number;

pub use price::*;
pub use ticket_number::*;
