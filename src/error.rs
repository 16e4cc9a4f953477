use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
	#[error("no parsable records in {0} data")]
	Empty(&'static str),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}
