/// Error type for running an evolution.
///
/// Every variant aborts the operation that produced it. Nothing in this crate
/// retries.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("the population is empty")]
    EmptyPopulation,

    #[error("evaluation of candidate {id} failed: {source}")]
    Evaluation {
        id: u64,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("the evaluation worker pool has been shut down")]
    ShutDown,

    #[error("failed to start the evaluation worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
