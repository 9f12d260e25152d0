#![doc = "acul-kit-core: pipelines for fetching, building and deploying Auth0 ACUL sample screens."]

//! This crate holds every pipeline and data model behind the `acul-kit` CLI.
//! Network, bundler and Management API access go through the traits in
//! [`contract`], so all of it can be driven from tests with the generated mocks.
//!
//! # Pipelines
//! - [`fetch`]: example markdown → repaired `{screen}.tsx` files + manifest
//! - [`build`]: samples → versioned bundle directory + stylesheet
//! - [`deploy`]: point tenant screens at the build, or reset them

pub mod build;
pub mod config;
pub mod contract;
pub mod deploy;
pub mod extract;
pub mod fetch;
pub mod manifest;
pub mod repair;
pub mod report;
pub mod screens;
pub mod versions;
