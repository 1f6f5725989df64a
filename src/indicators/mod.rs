// =============================================================================
// Indicator Engine
// =============================================================================
//
// Pure, side-effect-free VWAP / RSI computations over an oldest-first bar
// slice. Every derived series has exactly one entry per input bar and uses
// `None` where the value is undefined (window not yet full, zero
// denominator). Signal predicates return ascending bar indices.
//
// Nothing here holds state between calls; callers own any polling loop.

pub mod bands;
pub mod rolling;
pub mod rsi;
pub mod signals;
pub mod vwap;

pub use bands::{vwap_price_bands, vwap_volume_bands, VwapBands};
pub use rsi::rsi;
pub use vwap::{percentage_distance, vwap, vwap_with_basis, PriceBasis};
