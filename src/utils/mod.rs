//! Supporting utilities.

pub mod path;
