// data module
pub mod data {
    pub mod peak;
    pub mod distribution;
}

// algorithm module
pub mod algorithm {
    pub mod fold;
}

pub mod config;
pub mod error;

pub use config::FoldingConfig;
pub use data::distribution::IsotopeDistribution;
pub use data::peak::Peak;
pub use error::IsoError;
