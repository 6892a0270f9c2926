mod omf_app;
pub mod rebuild;

pub use omf_app::{OmfApp, OmfOperation};
