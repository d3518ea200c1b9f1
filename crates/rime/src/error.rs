/// Errors raised by mutating container operations.
///
/// Absence is never an error: lookups and removals report it through
/// `Option` / `bool` results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// The key is already present and the operation does not overwrite.
	#[error("an entry with the same key already exists")]
	DuplicateKey,

	/// A required argument was missing or had the wrong type.
	#[error("invalid argument: {reason}")]
	InvalidArgument { reason: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
