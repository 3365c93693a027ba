//! Poll lifecycle and voting rules, independent of HTTP.

pub mod gate;
pub mod ledger;
pub mod listing;
pub mod tally;
pub mod window;
