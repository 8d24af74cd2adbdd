//! Error type shared by gate construction and configuration loading.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = GateError> = core::result::Result<T, E>;

/// Errors raised while building or wrapping a gate. Calls through a gate never fail on their own.
#[derive(Debug, Error)]
pub enum GateError {
	/// Bad threshold or non-callable target.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
	/// Malformed configuration document or environment value.
	#[error("config: {0}")]
	Config(String),
	/// Configuration file could not be read or written.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
}

impl GateError {
	/// Build a [`GateError::InvalidArgument`].
	pub fn invalid_argument(msg: impl Into<String>) -> Self { Self::InvalidArgument(msg.into()) }
	/// Build a [`GateError::Config`].
	pub fn config(msg: impl Into<String>) -> Self { Self::Config(msg.into()) }

	/// True for misuse of the construction API (bad probability, non-callable target).
	pub fn is_invalid_argument(&self) -> bool { matches!(self, Self::InvalidArgument(_)) }
}
