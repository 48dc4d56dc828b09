pub mod geoip;

pub use geoip::{GeoIpResolver, LocalDatabase, RemoteLookup};
