//! # Kubegraph Kubernetes client
//!
//! Typed models for the slice of the Kubernetes API this connector reads
//! (core/v1, apps/v1, rbac.authorization.k8s.io/v1), the [`KubeApi`]
//! capability trait, and the HTTP implementation backing it.

pub mod apps;
pub mod client;
pub mod corev1;
pub mod error;
pub mod http;
pub mod meta;
pub mod rbac;

pub use client::KubeApi;
pub use error::{ApiError, ApiResult};
pub use http::{ClientConfig, HttpKubeClient};
pub use meta::{ListParams, ObjectList, ObjectMeta};
