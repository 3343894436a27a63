//! Kubernetes-backed `MicroserviceStore` implementation (C9).

pub mod microservice_store;

pub use microservice_store::{KubeMicroserviceStore, Microservice, MicroserviceSpec, MicroserviceStatus};
