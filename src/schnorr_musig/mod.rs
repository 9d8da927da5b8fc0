pub mod key_aggregation;
pub mod musig_math;
pub mod musig_protocol;
