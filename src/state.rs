/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - auth: AuthGuard, db: Db, kind: AppKind
 * - Clone 前提で持つ (内部は Arc/Copy で cheap)
 */
use std::sync::Arc;

use crate::config::AppKind;
use crate::repos::Db;
use crate::services::auth::AuthGuard;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthGuard>,
    pub db: Arc<Db>,
    pub kind: AppKind,
}

impl AppState {
    pub fn new(auth: AuthGuard, db: Db, kind: AppKind) -> Self {
        Self {
            auth: Arc::new(auth),
            db: Arc::new(db),
            kind,
        }
    }
}
