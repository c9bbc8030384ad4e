//! # Ease Preview
//!
//! 过渡预览工具：读取过渡配置，以固定帧率无头运行一次 Show/Hide，
//! 逐帧打印进度和表面状态。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p ease-preview -- --config demos/slide_in.json show
//! cargo run -p ease-preview -- --config demos/slide_in.json --from 1 hide --fps 30
//! cargo run -p ease-preview -- start-show --json --log-level debug
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing::{info, warn};
use ui_ease::{PropertyEffect, RectSurface, TransitionConfig, UiEase};

#[derive(Parser)]
#[command(name = "ease-preview")]
#[command(about = "过渡预览工具 - 以固定帧率无头运行 Show/Hide 并打印每帧状态")]
#[command(version)]
struct Cli {
    /// 要执行的过渡
    #[arg(value_enum)]
    action: Action,

    /// 过渡配置文件（JSON）。省略时使用只带 Fade 的默认配置
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 帧率
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// 最多运行的帧数（循环过渡不会自然结束）
    #[arg(long, default_value_t = 600)]
    max_frames: u32,

    /// 开始前先把进度设为该值
    #[arg(long)]
    from: Option<f32>,

    /// 表面宽度
    #[arg(long, default_value_t = 100.0)]
    width: f32,

    /// 表面高度
    #[arg(long, default_value_t = 100.0)]
    height: f32,

    /// 每帧输出一行 JSON
    #[arg(long)]
    json: bool,

    /// 日志级别
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Action {
    /// 显示
    Show,
    /// 隐藏
    Hide,
    /// 从完全隐藏开始显示
    StartShow,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(cli.log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(cli) {
        eprintln!("ease-preview error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main(cli: Cli) -> anyhow::Result<()> {
    if cli.fps == 0 {
        anyhow::bail!("帧率必须大于 0");
    }

    let config = match &cli.config {
        Some(path) => TransitionConfig::load(path)
            .with_context(|| format!("无法加载过渡配置: {}", path.display()))?,
        None => {
            info!("未指定配置文件，使用默认 Fade 过渡");
            TransitionConfig::default().with_effect(PropertyEffect::fade())
        }
    };
    if config.looping {
        warn!(max_frames = cli.max_frames, "循环过渡不会自然结束，将在最大帧数处停止");
    }

    let surface = RectSurface::new(cli.width, cli.height);
    let mut ease = UiEase::new(config, surface).context("无法创建过渡")?;
    if let Some(value) = cli.from {
        ease.set_value(value);
    }
    ease.start();

    ease.on_shown(|| info!("显示完成"));
    ease.on_hidden(|| info!("隐藏完成"));

    match cli.action {
        Action::Show => ease.show(),
        Action::Hide => ease.hide(),
        Action::StartShow => ease.start_show(),
    }

    let dt = 1.0 / cli.fps as f32;
    let wait = ease.wait_sync();
    let mut frame = 0;
    print_frame(&ease, frame, cli.json);

    while !wait.is_ready() && frame < cli.max_frames {
        ease.tick(dt);
        frame += 1;
        print_frame(&ease, frame, cli.json);
    }

    if !wait.is_ready() {
        ease.stop();
        info!(frame, "达到最大帧数，已停止");
    }
    Ok(())
}

fn print_frame(ease: &UiEase<RectSurface>, frame: u32, as_json: bool) {
    let surface = ease.surface();
    if as_json {
        let line = json!({
            "frame": frame,
            "value": ease.get_value(),
            "phase": format!("{:?}", ease.phase()),
            "alpha": surface.alpha,
            "position": [surface.position.x, surface.position.y],
            "scale": [surface.scale.x, surface.scale.y],
            "rotation": [surface.rotation.x, surface.rotation.y, surface.rotation.z],
            "blocks_raycasts": surface.blocks_raycasts,
            "active": surface.active,
        });
        println!("{line}");
    } else {
        println!(
            "{frame:>4}  V={:.4}  {:<11}  alpha={:.3}  pos=({:.1}, {:.1})  scale=({:.3}, {:.3})  rot=({:.1}, {:.1}, {:.1})  raycast={}  active={}",
            ease.get_value(),
            format!("{:?}", ease.phase()),
            surface.alpha,
            surface.position.x,
            surface.position.y,
            surface.scale.x,
            surface.scale.y,
            surface.rotation.x,
            surface.rotation.y,
            surface.rotation.z,
            surface.blocks_raycasts,
            surface.active,
        );
    }
}
