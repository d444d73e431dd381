pub mod describe;
pub mod generate;
pub mod preview;

mod connect;
