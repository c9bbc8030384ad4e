//! # Config 模块
//!
//! 过渡配置：时长、延迟、开关、输入阈值以及属性效果列表。
//!
//! 配置在创建过渡时读入一次，播放期间只读。文件格式为 JSON，
//! 缺省字段取默认值。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::effect::PropertyEffect;
use crate::error::ConfigError;

/// 过渡配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// 显示或隐藏一次所需的时间（秒）
    ///
    /// 非正值不会报错，过渡会在第一帧直接到达终点。
    #[serde(default = "default_total_time")]
    pub total_time: f32,

    /// 显示动画开始前的延迟（秒）
    #[serde(default)]
    pub delay_before_show: f32,

    /// 隐藏动画开始前的延迟（秒）
    #[serde(default)]
    pub delay_before_hide: f32,

    /// 随 Show/Hide 自动激活/停用表面
    #[serde(default)]
    pub auto_activate: bool,

    /// 随 Show/Hide 自动开关输入
    #[serde(default = "default_auto_block_raycasts")]
    pub auto_block_raycasts: bool,

    /// 循环播放
    #[serde(default, alias = "loop")]
    pub looping: bool,

    /// 显示途中打开输入的时间比例 (0.0 - 1.0)
    #[serde(default = "default_raycast_on_value")]
    pub raycast_on_value: f32,

    /// 初始进度值（0 = 隐藏，1 = 显示）
    #[serde(default = "default_initial_value")]
    pub initial_value: f32,

    /// 属性效果，按顺序评估
    #[serde(default)]
    pub effects: Vec<PropertyEffect>,
}

// 默认值函数
fn default_total_time() -> f32 {
    0.3
}

fn default_auto_block_raycasts() -> bool {
    true
}

fn default_raycast_on_value() -> f32 {
    0.5
}

fn default_initial_value() -> f32 {
    1.0
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            total_time: default_total_time(),
            delay_before_show: 0.0,
            delay_before_hide: 0.0,
            auto_activate: false,
            auto_block_raycasts: default_auto_block_raycasts(),
            looping: false,
            raycast_on_value: default_raycast_on_value(),
            initial_value: default_initial_value(),
            effects: Vec::new(),
        }
    }
}

impl TransitionConfig {
    /// 设置时长
    pub fn with_total_time(mut self, total_time: f32) -> Self {
        self.total_time = total_time;
        self
    }

    /// 设置显示/隐藏前的延迟
    pub fn with_delays(mut self, before_show: f32, before_hide: f32) -> Self {
        self.delay_before_show = before_show;
        self.delay_before_hide = before_hide;
        self
    }

    pub fn with_auto_activate(mut self, auto_activate: bool) -> Self {
        self.auto_activate = auto_activate;
        self
    }

    pub fn with_auto_block_raycasts(mut self, auto_block_raycasts: bool) -> Self {
        self.auto_block_raycasts = auto_block_raycasts;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_raycast_on_value(mut self, raycast_on_value: f32) -> Self {
        self.raycast_on_value = raycast_on_value;
        self
    }

    pub fn with_initial_value(mut self, initial_value: f32) -> Self {
        self.initial_value = initial_value;
        self
    }

    /// 追加一条效果
    pub fn with_effect(mut self, effect: PropertyEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// 从 JSON 字符串解析
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// 加载配置文件
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_json_str(&content)?;
        config.validate()?;
        info!(path = %path.display(), effects = config.effects.len(), "过渡配置加载成功");
        Ok(config)
    }

    /// 加载配置文件，失败时返回默认配置并记录警告
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "过渡配置加载失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            message: e.to_string(),
        })?;

        fs::write(path, json).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.total_time.is_finite() {
            return Err(invalid("total_time", "必须是有限值"));
        }
        if self.total_time <= 0.0 {
            warn!(total_time = self.total_time, "过渡时长非正，将在第一帧直接到达终点");
        }

        for (field, delay) in [
            ("delay_before_show", self.delay_before_show),
            ("delay_before_hide", self.delay_before_hide),
        ] {
            if !delay.is_finite() || delay < 0.0 {
                return Err(invalid(field, "必须是非负有限值"));
            }
        }

        if !(0.0..=1.0).contains(&self.raycast_on_value) {
            return Err(invalid("raycast_on_value", "必须在 0.0 - 1.0 之间"));
        }

        if !(0.0..=1.0).contains(&self.initial_value) {
            return Err(invalid("initial_value", "必须在 0.0 - 1.0 之间"));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidField {
        field: field.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Ease;
    use crate::effect::EffectKind;

    #[test]
    fn test_default_config() {
        let config = TransitionConfig::default();
        assert_eq!(config.total_time, 0.3);
        assert!(config.auto_block_raycasts);
        assert!(!config.auto_activate);
        assert_eq!(config.raycast_on_value, 0.5);
        assert_eq!(config.initial_value, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = TransitionConfig::from_json_str(r#"{"loop": true}"#).unwrap();
        assert!(config.looping);
        assert_eq!(config.total_time, 0.3);
        assert!(config.effects.is_empty());
    }

    #[test]
    fn test_parse_effect_list() {
        let json = r#"{
            "total_time": 0.5,
            "effects": [
                {"type": "fade"},
                {"type": "move_x", "pos": 100, "ratio": -1, "ease": "quad_out", "tag": "slide"},
                {"type": "custom"}
            ]
        }"#;
        let config = TransitionConfig::from_json_str(json).unwrap();

        let kinds: Vec<_> = config.effects.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![EffectKind::Fade, EffectKind::MoveX, EffectKind::Custom]
        );
        let slide = config.effects[1].effect.tween().unwrap();
        assert_eq!(slide.pos, 100.0);
        assert_eq!(slide.ease, Ease::QuadOut);
        assert_eq!(config.effects[1].tag.as_deref(), Some("slide"));
    }

    #[test]
    fn test_parse_error() {
        let err = TransitionConfig::from_json_str("{ total_time: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_config_validation() {
        let config = TransitionConfig::default().with_raycast_on_value(1.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidField { ref field, .. }) if field == "raycast_on_value"
        ));

        let config = TransitionConfig::default().with_delays(-1.0, 0.0);
        assert!(config.validate().is_err());

        let config = TransitionConfig::default().with_total_time(f32::NAN);
        assert!(config.validate().is_err());

        // 非正时长只记录警告
        let config = TransitionConfig::default().with_total_time(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.json");

        let config = TransitionConfig::default()
            .with_total_time(0.5)
            .with_looping(true)
            .with_effect(PropertyEffect::fade())
            .with_effect(PropertyEffect::scale_x(1.0, -0.5, Ease::BackOut).with_tag("pop"));
        config.save(&path).unwrap();

        let loaded = TransitionConfig::load(&path).unwrap();
        assert_eq!(loaded.total_time, 0.5);
        assert!(loaded.looping);
        assert_eq!(loaded.effects.len(), 2);
        assert_eq!(loaded.effects[1].tag.as_deref(), Some("pop"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        assert!(matches!(
            TransitionConfig::load(&path),
            Err(ConfigError::Io { .. })
        ));
        let fallback = TransitionConfig::load_or_default(&path);
        assert_eq!(fallback.total_time, 0.3);
    }
}
