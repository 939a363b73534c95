pub mod accounts;
pub mod analysis;
pub mod support;
