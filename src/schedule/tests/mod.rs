pub mod utils;

mod concurrency;
mod scenario;
mod store;
