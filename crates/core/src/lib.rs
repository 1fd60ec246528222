#![forbid(unsafe_code)]

pub mod curriculum;
pub mod model;
