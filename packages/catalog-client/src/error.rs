pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error("Search endpoint {endpoint} responded with status {status}.")]
	Status { endpoint: String, status: u16 },
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("Request was cancelled.")]
	Cancelled,
	#[error("Search session has shut down.")]
	SessionClosed,
}
impl Error {
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}
}
