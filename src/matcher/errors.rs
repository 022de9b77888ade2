use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MatchError {
    #[error("matcher has not been fitted to a corpus")]
    NotFitted,
}
