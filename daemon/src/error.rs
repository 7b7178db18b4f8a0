use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("config error: {0}")]
    Config(String),

    #[error("scenario error: {0}")]
    Scenario(String),
}
