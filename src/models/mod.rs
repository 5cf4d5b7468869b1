mod candle;
mod quote;
mod signal;
pub mod symbol;

pub use candle::Candle;
pub use quote::PriceQuote;
pub use signal::{Signal, SignalAction, SignalHistory};
