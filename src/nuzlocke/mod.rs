pub mod capture;
pub mod entry;
pub mod error;
pub mod run;
pub mod threshold;
