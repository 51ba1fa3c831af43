pub mod proposal;
pub mod vault;
pub mod vesting;

#[cfg(test)]
mod proptests;

pub use proposal::*;
pub use vault::*;
pub use vesting::*;
