pub mod fetcher;
pub mod mock;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_server;

pub use fetcher::AirbnbClient;
pub use mock::MockSource;
pub use traits::ReviewSource;
