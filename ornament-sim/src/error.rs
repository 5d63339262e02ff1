/// Errors raised while configuring or building the scene.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("invalid countdown date: month {month}, day {day}")]
    InvalidDate { month: u32, day: u32 },
    #[error("model pool is empty; at least one ornament model is required")]
    EmptyModelPool,
    #[error("invalid setting: {0}")]
    InvalidSetting(String),
}

pub type SimResult<T> = Result<T, SimError>;
