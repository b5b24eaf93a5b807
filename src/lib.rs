//! Bearer credentials for outbound REST calls.
//!
//! A [`TokenProvider`](provider::TokenProvider) hands out ready-to-use
//! [`AuthorizedRequest`](http::AuthorizedRequest)s for one of two strategies: a freshly minted
//! HS256 JWT per call, or an OAuth 2.0 `account_credentials` token that lives in a
//! [`TokenStore`](store::TokenStore), is probed against the API before use, and is refreshed
//! transparently once the server stops accepting it.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod jwt;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod store;
pub mod validator;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::{Path, PathBuf},
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
