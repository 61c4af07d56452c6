pub mod raffles;
pub mod sold_numbers;

pub use raffles as raffle_entity;
pub use sold_numbers as sold_number_entity;
