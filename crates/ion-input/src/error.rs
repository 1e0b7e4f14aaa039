use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to parse binding config: {0}")]
    MalformedConfig(#[from] serde_json::Error),

    #[error("binding references unknown action '{0}'")]
    UnknownAction(String),
}

pub type InputResult<T> = Result<T, InputError>;
