/*
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    /// A uniqueness rule (email, subscription pair) would be broken.
    #[error("conflict")]
    Conflict,
}
