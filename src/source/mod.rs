pub mod traits;
pub mod yahoo;

pub use traits::PriceSource;
pub use yahoo::YahooSource;
