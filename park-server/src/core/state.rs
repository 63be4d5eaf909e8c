use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{BackgroundTasks, Config, TaskKind};
use crate::db::DbService;
use crate::message::MessageBus;
use crate::poi::QueueRandomizer;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是请求处理的核心数据结构，使用 Arc/浅拷贝共享。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | message_bus | MessageBus | 推送通道消息总线 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 推送通道消息总线
    pub message_bus: MessageBus,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替
    pub fn new(
        config: Config,
        pool: SqlitePool,
        message_bus: MessageBus,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            config,
            pool,
            message_bus,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：数据库 (含迁移)、消息总线、JWT 服务
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        let db_service = DbService::new(&config.database_path)
            .await
            .expect("Failed to initialize database");

        let message_bus = MessageBus::new();
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self::new(config.clone(), db_service.pool, message_bus, jwt_service)
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 内、HTTP 服务启动前调用
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let randomizer = QueueRandomizer::new(
            self.pool.clone(),
            self.message_bus.clone(),
            Duration::from_secs(self.config.queue_update_interval_secs),
        );
        let shutdown = tasks.shutdown_token();
        tasks.spawn("queue_randomizer", TaskKind::Periodic, async move {
            randomizer.run(shutdown).await;
        });
    }

    /// 获取消息总线
    pub fn message_bus(&self) -> &MessageBus {
        &self.message_bus
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
