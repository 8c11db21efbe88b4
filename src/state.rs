use crate::{config::Config, error::AppError, store::Repository};

/// Everything the shell needs for one session of the program.
#[derive(Debug)]
pub struct AppState {
    pub repo: Repository,
    pub config: Config,
}

impl AppState {
    pub fn load(config: Config) -> Result<Self, AppError> {
        let repo = Repository::open(&config.data_dir)?;
        Ok(Self { repo, config })
    }
}
