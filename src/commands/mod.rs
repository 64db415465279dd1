pub mod demo_command;
pub mod simulate_command;
pub mod transaction_builder;

pub use self::{demo_command::*, simulate_command::*, transaction_builder::*};
