//! Park POI Directory Server - 主题乐园兴趣点目录后端
//!
//! # 架构概述
//!
//! 本模块是 Park Server 的主入口，提供以下核心功能：
//!
//! - **数据库** (`db`): SQLite 存储，POI / 坐标环 / 双向关联
//! - **领域逻辑** (`poi`): 过滤谓词、关联 reconciler、队列随机器
//! - **推送通道** (`message`): WebSocket 广播，admin/guest 受众分组
//! - **认证** (`auth`): JWT 认证体系
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! park-server/src/
//! ├── core/          # 配置、状态、后台任务
//! ├── auth/          # JWT 认证、中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (repository)
//! ├── poi/           # POI 领域逻辑
//! ├── message/       # 推送通道 (消息总线 + WebSocket)
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod message;
pub mod poi;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use message::{BusMessage, EventType, MessageBus};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logger();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____             __
   / __ \____ ______/ /__
  / /_/ / __ `/ ___/ //_/
 / ____/ /_/ / /  / ,<
/_/    \__,_/_/  /_/|_|
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}
