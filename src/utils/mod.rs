pub mod units;

pub use units::{format_ether, parse_ether, ETHER_DECIMALS};
