use thiserror::Error;

/// Errors raised while building the data model the policy engine operates
/// on. The policy algorithms themselves never fail: an empty or singleton
/// candidate queue is a legitimate input, not an error condition.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("malformed evr string for solvable '{name}': {source}")]
    InvalidEvr {
        name: String,
        #[source]
        source: solv_evr::EvrParseError,
    },

    #[error("unknown solvable id {0}")]
    UnknownSolvable(u32),

    #[error("unknown repository id {0}")]
    UnknownRepository(u32),
}

pub type Result<T> = std::result::Result<T, PolicyError>;
