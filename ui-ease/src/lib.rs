//! # UI Ease
//!
//! 单个 UI 表面的显示/隐藏过渡引擎。
//!
//! ## 架构概述
//!
//! 过渡只有一个权威状态：进度值 V（0 = 隐藏，1 = 显示）。
//!
//! ```text
//! Host                               UiEase
//!   │                                  │
//!   │── show() / hide() / set_value() ►│ ProgressDriver：取消反方向任务，启动新任务
//!   │                                  │
//!   │── tick(dt) ─────────────────────►│ 采样新的 V
//!   │                                  │   └► effect::compose：按效果列表写入 Surface
//!   │◄─ on_shown / on_hidden 回调 ─────│ 到达终点时
//! ```
//!
//! 库本身不依赖任何引擎：逐帧调度由宿主调用 [`UiEase::tick`] 完成，
//! 表面读写通过 [`Surface`] trait 完成。
//!
//! ## 模块结构
//!
//! - [`easing`]：缓动曲线
//! - [`surface`]：表面访问器接口与内存实现
//! - [`effect`]：属性效果与效果合成器
//! - [`driver`]：进度驱动器（状态机、方向任务、完成通知）
//! - [`ease`]：对外 API
//! - [`config`]：过渡配置
//! - [`error`]：错误类型

pub mod config;
pub mod driver;
pub mod ease;
pub mod easing;
pub mod effect;
pub mod error;
pub mod surface;

// 重导出核心类型
pub use config::TransitionConfig;
pub use driver::{Direction, DriverPhase, WaitSync};
pub use ease::UiEase;
pub use easing::{Ease, bound, bound01, curve, ping_pong, ping_pong01};
pub use effect::{Effect, EffectKind, PropertyEffect, Tween, UpdateHook};
pub use error::{ConfigError, EaseError, EaseResult};
pub use surface::{RectSurface, Surface, SurfaceProperty, Vec3};
