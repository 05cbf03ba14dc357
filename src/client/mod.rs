pub mod controller;
pub mod store;
pub mod transport;
