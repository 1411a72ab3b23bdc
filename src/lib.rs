//! Lead Insights Library
//!
//! Conversion scoring, buyer segmentation and campaign recommendations for
//! real-estate marketing leads.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `insights`: Campaign analytics over scored leads.
//! - `leads`: Lead lifecycle service (create, update, import) with re-scoring.
//! - `loader`: JSON record files and report rendering.
//! - `models`: Core data models.
//! - `recommendations`: Action recommendations from a set of scored leads.
//! - `repository`: Lead storage trait and in-memory store.
//! - `scoring`: Conversion likelihood and buyer segment for a single lead.
//! - `validation`: Payload checks applied before scoring.

pub mod config;
pub mod errors;
pub mod insights;
pub mod leads;
pub mod loader;
pub mod models;
pub mod recommendations;
pub mod repository;
pub mod scoring;
pub mod validation;
