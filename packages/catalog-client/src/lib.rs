pub mod aggregate;
pub mod http;
pub mod session;

mod error;

pub use error::{Error, Result};
pub use http::HttpPageSource;
pub use session::{SearchSession, SessionAction, SessionSettings};

use std::{future::Future, pin::Pin};

use catalog_domain::{PageRequest, PageResponse};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Anything that can answer a page request for one endpoint.
pub trait PageSource
where
	Self: Send + Sync,
{
	fn fetch_page<'a>(
		&'a self,
		endpoint: &'a str,
		request: &'a PageRequest,
	) -> BoxFuture<'a, Result<PageResponse>>;
}
