use std::sync::Arc;

use sqlx::PgPool;

use crate::assemblers::ModelAssembler;
use crate::config::Config;
use crate::repositories::{
    InMemoryStore, PgUserAddressRepository, PgUserRepository, UserAddressRepository,
    UserRepository,
};
use crate::services::{UserAddressService, UserService};

/// アプリケーション共有状態
///
/// axum の State として全ハンドラーで共有される。
/// Clone は必須（axum が内部で clone するため）。
#[derive(Clone)]
pub struct AppState {
    /// アプリケーション設定（Arc で共有）
    pub config: Arc<Config>,
    pub user_service: UserService,
    pub address_service: UserAddressService,
    /// `_links` の組み立て
    pub assembler: ModelAssembler,
}

impl AppState {
    /// リポジトリ実装を指定して AppState を作成
    pub fn new(
        config: Config,
        user_repo: Arc<dyn UserRepository>,
        address_repo: Arc<dyn UserAddressRepository>,
    ) -> Self {
        let assembler = ModelAssembler::new(config.public_base_url.clone());
        Self {
            config: Arc::new(config),
            user_service: UserService::new(user_repo.clone(), address_repo.clone()),
            address_service: UserAddressService::new(user_repo, address_repo),
            assembler,
        }
    }

    /// PostgreSQL バックエンド
    pub fn postgres(db_pool: PgPool, config: Config) -> Self {
        let user_repo = Arc::new(PgUserRepository::new(db_pool.clone()));
        let address_repo = Arc::new(PgUserAddressRepository::new(db_pool));
        Self::new(config, user_repo, address_repo)
    }

    /// インメモリバックエンド（test プロファイル）
    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(config, store.clone(), store)
    }
}
