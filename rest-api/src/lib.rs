//! Use-case layer of a knowledge-base REST API.
//!
//! Requests come in as untyped JSON, pass through validating deserializers
//! into the domain model, and leave through use cases that orchestrate the
//! storage and site-access ports. HTTP handlers only translate transport
//! concerns; everything interesting happens in [`usecases`].

pub mod api;
pub mod config;
pub mod domain;
pub mod patch;
pub mod serialization;
pub mod usecases;
pub mod validation;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
