//! geoip-resolver - IP address to country code resolution
//!
//! Resolves an IP address to a lowercase two-letter country code (or a
//! continent code as a degraded fallback). Sources are tried in order:
//! ipinfo.io, an externally mounted `ipinfo_lite.mmdb`, then the
//! `geoip.db` bundled into the binary.
//!
//! # Architecture
//! - `services::geoip`: remote client, local database selection, resolver
//! - `config`: TOML + environment configuration
//! - `errors`: error type shared by all tiers
//! - `system`: logging initialization
//! - `cli`: command-line definitions for the `geoip-lookup` binary
//!
//! # Example
//! ```no_run
//! use geoip_resolver::config::StaticConfig;
//! use geoip_resolver::services::GeoIpResolver;
//!
//! let resolver = GeoIpResolver::new(&StaticConfig::default());
//! let code = resolver.lookup_str("8.8.8.8");
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod services;
pub mod system;
