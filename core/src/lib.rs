//! Synchronous REST client for the content pipeline backend.
//!
//! # Overview
//! Typed clients for topics, generated content, images, schedules,
//! interactions, recommendations, topic discovery and source validation.
//! Every call goes through one fetch helper that attaches headers, executes
//! the request on a pluggable `Transport`, unwraps the `{ "data": ... }`
//! envelope and maps failures to a single `ApiError` shape.
//!
//! # Design
//! - `ApiClient` is cheap to clone and shareable across threads; resource
//!   clients are borrowed views (`client.topics()`, `client.images()`, ...).
//! - Requests are plain `HttpRequest` values. `UreqTransport` sends them over
//!   the network; `FixtureTransport` replays scripted responses in tests.
//! - Backend records are converted into the public models once, applying
//!   defaults for missing fields at the boundary.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod interceptors;
pub mod transport;
pub mod types;

pub use auth::{NoToken, StaticToken, TokenProvider, TokenStore};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{handle_api_error, handle_http_error, ApiError, ErrorCode, ErrorReporter};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use interceptors::RequestConfig;
pub use transport::{FixtureTransport, Transport, TransportError, UreqTransport};
pub use types::{
    Category, Content, Image, ImageSource, Paginated, Pagination, Schedule, ScheduleStatus,
    SortOrder, Topic, TopicStatus,
};
