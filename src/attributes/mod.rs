//! Container attribute fetcher

mod operations;
mod results;

pub use operations::fetch_container_attributes;
pub use results::ContainerAttributes;
