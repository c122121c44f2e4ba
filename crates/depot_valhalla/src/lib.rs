pub mod client;
mod response;

pub use client::{ValhallaClient, ValhallaError};
