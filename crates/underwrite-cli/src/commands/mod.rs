pub mod irr;
pub mod underwriting;
