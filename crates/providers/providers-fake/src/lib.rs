#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod chain;

mod config;
pub use config::FakeChainConfig;

mod errors;
pub use errors::FakeChainSourceError;

mod source;
pub use source::FakeChainSource;

#[cfg(feature = "metrics")]
mod metrics;
#[cfg(feature = "metrics")]
pub use metrics::Metrics;
