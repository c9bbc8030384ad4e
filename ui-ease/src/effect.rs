//! # Effect 模块
//!
//! 属性效果与效果合成器。
//!
//! 过渡只维护一个进度值 V（0 = 隐藏，1 = 显示）。每个 [`PropertyEffect`]
//! 把 V 经过自己的缓动曲线映射到表面的一个属性上：
//!
//! - V = 1 时属性等于锚点 `pos`
//! - V = 0 时属性等于 `pos + ratio`（位移类乘以表面宽/高）
//!
//! 合成器按列表顺序依次写入，同一属性被多次写入时以最后一次为准。

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::easing::{Ease, curve};
use crate::surface::{Surface, SurfaceProperty};

/// 效果种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Fade,
    MoveX,
    MoveY,
    ScaleX,
    ScaleY,
    RotateX,
    RotateY,
    RotateZ,
    Custom,
}

/// 一条插值轨道的参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    /// 锚点：完全显示时的属性值
    #[serde(default)]
    pub pos: f32,
    /// 隐藏端相对锚点的偏移。位移类以表面尺寸为单位：MoveX 的 -1 表示从左侧一个宽度处进入
    #[serde(default)]
    pub ratio: f32,
    /// 缓动曲线
    #[serde(default)]
    pub ease: Ease,
}

impl Default for Tween {
    fn default() -> Self {
        Self {
            pos: 0.0,
            ratio: 0.0,
            ease: Ease::default(),
        }
    }
}

impl Tween {
    pub fn new(pos: f32, ratio: f32, ease: Ease) -> Self {
        Self { pos, ratio, ease }
    }
}

/// Custom 效果的更新回调，接收未经缓动的原始进度值
#[derive(Clone)]
pub struct UpdateHook(Rc<dyn Fn(f32)>);

impl UpdateHook {
    pub fn new(f: impl Fn(f32) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, value: f32) {
        (self.0)(value)
    }
}

impl fmt::Debug for UpdateHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UpdateHook(..)")
    }
}

/// 效果本体
///
/// 每个变体只携带它需要的字段。序列化为带 `type` 标签的对象：
/// `{"type": "move_x", "pos": 100, "ratio": -1, "ease": "cubic_out"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// 透明度。`ratio == 0` 时为 0 → 1 的线性淡入，忽略锚点
    Fade(Tween),
    MoveX(Tween),
    MoveY(Tween),
    ScaleX(Tween),
    ScaleY(Tween),
    RotateX(Tween),
    RotateY(Tween),
    RotateZ(Tween),
    /// 自定义效果，由调用方自行处理缓动
    Custom {
        #[serde(skip)]
        on_update: Option<UpdateHook>,
    },
}

/// 位移类效果的尺寸乘数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extent {
    Unit,
    Width,
    Height,
}

impl Effect {
    /// 效果种类
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::Fade(_) => EffectKind::Fade,
            Effect::MoveX(_) => EffectKind::MoveX,
            Effect::MoveY(_) => EffectKind::MoveY,
            Effect::ScaleX(_) => EffectKind::ScaleX,
            Effect::ScaleY(_) => EffectKind::ScaleY,
            Effect::RotateX(_) => EffectKind::RotateX,
            Effect::RotateY(_) => EffectKind::RotateY,
            Effect::RotateZ(_) => EffectKind::RotateZ,
            Effect::Custom { .. } => EffectKind::Custom,
        }
    }

    /// 插值参数（Custom 没有）
    pub fn tween(&self) -> Option<&Tween> {
        match self {
            Effect::Fade(t)
            | Effect::MoveX(t)
            | Effect::MoveY(t)
            | Effect::ScaleX(t)
            | Effect::ScaleY(t)
            | Effect::RotateX(t)
            | Effect::RotateY(t)
            | Effect::RotateZ(t) => Some(t),
            Effect::Custom { .. } => None,
        }
    }

    pub fn tween_mut(&mut self) -> Option<&mut Tween> {
        match self {
            Effect::Fade(t)
            | Effect::MoveX(t)
            | Effect::MoveY(t)
            | Effect::ScaleX(t)
            | Effect::ScaleY(t)
            | Effect::RotateX(t)
            | Effect::RotateY(t)
            | Effect::RotateZ(t) => Some(t),
            Effect::Custom { .. } => None,
        }
    }

    /// 变换类效果写入的通道
    fn channel(&self) -> Option<(SurfaceProperty, Extent)> {
        let channel = match self {
            Effect::MoveX(_) => (SurfaceProperty::PositionX, Extent::Width),
            Effect::MoveY(_) => (SurfaceProperty::PositionY, Extent::Height),
            Effect::ScaleX(_) => (SurfaceProperty::ScaleX, Extent::Unit),
            Effect::ScaleY(_) => (SurfaceProperty::ScaleY, Extent::Unit),
            Effect::RotateX(_) => (SurfaceProperty::RotationX, Extent::Unit),
            Effect::RotateY(_) => (SurfaceProperty::RotationY, Extent::Unit),
            Effect::RotateZ(_) => (SurfaceProperty::RotationZ, Extent::Unit),
            Effect::Fade(_) | Effect::Custom { .. } => return None,
        };
        Some(channel)
    }
}

/// 配置中的一条属性效果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyEffect {
    #[serde(flatten)]
    pub effect: Effect,
    /// 识别用标签
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl PropertyEffect {
    pub fn new(effect: Effect) -> Self {
        Self { effect, tag: None }
    }

    /// 0 → 1 线性淡入
    pub fn fade() -> Self {
        Self::new(Effect::Fade(Tween::new(0.0, 0.0, Ease::Linear)))
    }

    /// 从 `pos + ratio` 到 `pos` 的透明度曲线
    pub fn fade_from(pos: f32, ratio: f32, ease: Ease) -> Self {
        Self::new(Effect::Fade(Tween::new(pos, ratio, ease)))
    }

    pub fn move_x(pos: f32, ratio: f32, ease: Ease) -> Self {
        Self::new(Effect::MoveX(Tween::new(pos, ratio, ease)))
    }

    pub fn move_y(pos: f32, ratio: f32, ease: Ease) -> Self {
        Self::new(Effect::MoveY(Tween::new(pos, ratio, ease)))
    }

    pub fn scale_x(pos: f32, ratio: f32, ease: Ease) -> Self {
        Self::new(Effect::ScaleX(Tween::new(pos, ratio, ease)))
    }

    pub fn scale_y(pos: f32, ratio: f32, ease: Ease) -> Self {
        Self::new(Effect::ScaleY(Tween::new(pos, ratio, ease)))
    }

    pub fn rotate_x(pos: f32, ratio: f32, ease: Ease) -> Self {
        Self::new(Effect::RotateX(Tween::new(pos, ratio, ease)))
    }

    pub fn rotate_y(pos: f32, ratio: f32, ease: Ease) -> Self {
        Self::new(Effect::RotateY(Tween::new(pos, ratio, ease)))
    }

    pub fn rotate_z(pos: f32, ratio: f32, ease: Ease) -> Self {
        Self::new(Effect::RotateZ(Tween::new(pos, ratio, ease)))
    }

    pub fn custom(on_update: impl Fn(f32) + 'static) -> Self {
        Self::new(Effect::Custom {
            on_update: Some(UpdateHook::new(on_update)),
        })
    }

    /// 设置标签
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn kind(&self) -> EffectKind {
        self.effect.kind()
    }

    /// 为 Custom 效果挂接回调。其他种类返回 `false`
    ///
    /// 配置文件无法描述回调，加载后由调用方补上。
    pub fn set_update_hook(&mut self, f: impl Fn(f32) + 'static) -> bool {
        match &mut self.effect {
            Effect::Custom { on_update } => {
                *on_update = Some(UpdateHook::new(f));
                true
            }
            _ => false,
        }
    }

    /// 以进度 `value` 评估本效果并写入表面
    pub fn apply<S: Surface + ?Sized>(&self, surface: &mut S, value: f32) {
        match &self.effect {
            Effect::Fade(tween) => {
                let alpha = if tween.ratio == 0.0 {
                    curve(value, 1.0, 0.0, 1.0, Ease::Linear)
                } else {
                    curve(value, 1.0, tween.pos + tween.ratio, tween.pos, tween.ease)
                };
                surface.set_property(SurfaceProperty::Alpha, alpha);
            }
            Effect::Custom { on_update } => {
                if let Some(hook) = on_update {
                    hook.call(value);
                }
            }
            effect => {
                let (Some(tween), Some((property, extent))) = (effect.tween(), effect.channel())
                else {
                    return;
                };
                // None 曲线表示临时停用该效果
                if tween.ease.is_none() {
                    return;
                }
                let (width, height) = surface.size();
                let offset = match extent {
                    Extent::Unit => tween.ratio,
                    Extent::Width => width * tween.ratio,
                    Extent::Height => height * tween.ratio,
                };
                let target = curve(value, 1.0, tween.pos + offset, tween.pos, tween.ease);
                surface.set_property(property, target);
            }
        }
    }
}

/// 效果合成：按顺序评估全部效果
///
/// 同一帧内所有效果看到的是同一个 `value`。
pub fn compose<S: Surface + ?Sized>(effects: &[PropertyEffect], surface: &mut S, value: f32) {
    for effect in effects {
        effect.apply(surface, value);
    }
}
