#[derive(thiserror::Error, Debug)]
pub enum RaylabError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("engine error: {0}")]
    Engine(String),

    #[error("channel lost: {0}")]
    ChannelLost(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RaylabResult<T> = Result<T, RaylabError>;

impl RaylabError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    pub fn channel_lost(msg: impl Into<String>) -> Self {
        Self::ChannelLost(msg.into())
    }
}
