pub mod assumptions;
pub mod cashflow;
pub mod exit;
pub mod loan;
pub mod metrics;
#[cfg(feature = "sensitivity")]
pub mod sensitivity;
pub mod underwriting;
