//! # Easing 模块
//!
//! 缓动曲线库。给定时间比例与曲线类型，返回两个端点之间的插值。
//!
//! 曲线本身无状态：`curve(t, total, start, end, ease)` 是纯函数，
//! 同样的输入永远得到同样的输出。

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// 缓动曲线类型
///
/// `None` 不是"线性"：对于位移/缩放/旋转效果，它表示跳过该效果
/// （由合成器负责判断）。曲线库自身把它当作线性比例处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// 不驱动属性
    None,
    /// 线性（匀速）
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    /// 三次缓出（默认）
    #[default]
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    SineIn,
    SineOut,
    SineInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    CircIn,
    CircOut,
    CircInOut,
    /// 回弹缓入（起点会略微越界）
    BackIn,
    BackOut,
    BackInOut,
    /// 弹性缓入
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    /// 弹跳缓入
    BounceIn,
    BounceOut,
    BounceInOut,
}

impl Ease {
    /// 是否为跳过标记
    pub fn is_none(&self) -> bool {
        matches!(self, Ease::None)
    }

    /// 计算缓动比例
    ///
    /// # 参数
    /// - `t`: 时间进度 (0.0 - 1.0)，超出范围会被限制
    ///
    /// # 返回
    /// - 缓动后的比例。Back/Elastic 系列在区间内可能超出 [0, 1]
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Ease::None | Ease::Linear => t,
            Ease::QuadIn => t * t,
            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::QuadInOut => in_out(t, |x| x * x),
            Ease::CubicIn => t * t * t,
            Ease::CubicOut => 1.0 - (1.0 - t).powi(3),
            Ease::CubicInOut => in_out(t, |x| x * x * x),
            Ease::QuartIn => t.powi(4),
            Ease::QuartOut => 1.0 - (1.0 - t).powi(4),
            Ease::QuartInOut => in_out(t, |x| x.powi(4)),
            Ease::QuintIn => t.powi(5),
            Ease::QuintOut => 1.0 - (1.0 - t).powi(5),
            Ease::QuintInOut => in_out(t, |x| x.powi(5)),
            Ease::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Ease::SineOut => (t * PI / 2.0).sin(),
            Ease::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Ease::ExpoIn => expo_in(t),
            Ease::ExpoOut => 1.0 - expo_in(1.0 - t),
            Ease::ExpoInOut => in_out(t, expo_in),
            Ease::CircIn => 1.0 - (1.0 - t * t).sqrt(),
            Ease::CircOut => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Ease::CircInOut => in_out(t, |x| 1.0 - (1.0 - x * x).sqrt()),
            Ease::BackIn => back_in(t),
            Ease::BackOut => 1.0 - back_in(1.0 - t),
            Ease::BackInOut => in_out(t, back_in),
            Ease::ElasticIn => 1.0 - elastic_out(1.0 - t),
            Ease::ElasticOut => elastic_out(t),
            Ease::ElasticInOut => in_out(t, |x| 1.0 - elastic_out(1.0 - x)),
            Ease::BounceIn => 1.0 - bounce_out(1.0 - t),
            Ease::BounceOut => bounce_out(t),
            Ease::BounceInOut => in_out(t, |x| 1.0 - bounce_out(1.0 - x)),
        }
    }
}

/// 按曲线在 `start` 与 `end` 之间插值
///
/// - `t`: 已经过的时间
/// - `total`: 总时间。`total <= 0` 时直接返回 `end`
pub fn curve(t: f32, total: f32, start: f32, end: f32, ease: Ease) -> f32 {
    if total <= 0.0 {
        return end;
    }
    start + (end - start) * ease.apply(t / total)
}

/// 往返值：前半段 `start → end`，后半段 `end → start`，两段使用同一曲线
///
/// 一般把 `total` 设为 1，`t` 随时间在 0～1 之间循环。推荐 InOut 系列。
pub fn ping_pong(t: f32, total: f32, start: f32, end: f32, ease: Ease) -> f32 {
    let half = total / 2.0;
    if t < half {
        curve(t, half, start, end, ease)
    } else {
        curve(t - half, half, end, start, ease)
    }
}

/// 弹跳值：与 [`ping_pong`] 相同，但去程与回程各用一条曲线
///
/// 推荐去程用 In 系列、回程用 Out 系列，例如 `CubicIn` / `CubicOut`。
pub fn bound(t: f32, total: f32, start: f32, end: f32, ease_in: Ease, ease_out: Ease) -> f32 {
    let half = total / 2.0;
    if t < half {
        curve(t, half, start, end, ease_in)
    } else {
        curve(t - half, half, end, start, ease_out)
    }
}

/// 以 1 为周期的 [`ping_pong`]，使用 `CubicInOut`
pub fn ping_pong01(t: f32, start: f32, end: f32) -> f32 {
    ping_pong(t, 1.0, start, end, Ease::CubicInOut)
}

/// 以 1 为周期的 [`bound`]，去程 `CubicIn`，回程 `CubicOut`
pub fn bound01(t: f32, start: f32, end: f32) -> f32 {
    bound(t, 1.0, start, end, Ease::CubicIn, Ease::CubicOut)
}

/// 由 In 曲线构造 InOut 曲线
fn in_out(t: f32, f: impl Fn(f32) -> f32) -> f32 {
    if t < 0.5 {
        f(t * 2.0) / 2.0
    } else {
        1.0 - f((1.0 - t) * 2.0) / 2.0
    }
}

fn expo_in(t: f32) -> f32 {
    if t == 0.0 {
        0.0
    } else {
        2.0_f32.powf(10.0 * t - 10.0)
    }
}

fn back_in(t: f32) -> f32 {
    let c1 = 1.70158;
    let c3 = c1 + 1.0;
    c3 * t * t * t - c1 * t * t
}

/// 弹性缓出
fn elastic_out(t: f32) -> f32 {
    if t == 0.0 {
        0.0
    } else if t == 1.0 {
        1.0
    } else {
        let c4 = (2.0 * PI) / 3.0;
        2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
    }
}

/// 弹跳缓出
fn bounce_out(t: f32) -> f32 {
    let n1 = 7.5625;
    let d1 = 2.75;

    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 32] = [
        Ease::None,
        Ease::Linear,
        Ease::QuadIn,
        Ease::QuadOut,
        Ease::QuadInOut,
        Ease::CubicIn,
        Ease::CubicOut,
        Ease::CubicInOut,
        Ease::QuartIn,
        Ease::QuartOut,
        Ease::QuartInOut,
        Ease::QuintIn,
        Ease::QuintOut,
        Ease::QuintInOut,
        Ease::SineIn,
        Ease::SineOut,
        Ease::SineInOut,
        Ease::ExpoIn,
        Ease::ExpoOut,
        Ease::ExpoInOut,
        Ease::CircIn,
        Ease::CircOut,
        Ease::CircInOut,
        Ease::BackIn,
        Ease::BackOut,
        Ease::BackInOut,
        Ease::ElasticIn,
        Ease::ElasticOut,
        Ease::ElasticInOut,
        Ease::BounceIn,
        Ease::BounceOut,
        Ease::BounceInOut,
    ];

    #[test]
    fn test_endpoints() {
        for ease in ALL {
            assert!(ease.apply(0.0).abs() < 0.001, "{ease:?} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < 0.001, "{ease:?} at 1");
        }
    }

    #[test]
    fn test_linear() {
        let ease = Ease::Linear;
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(0.5), 0.5);
        assert_eq!(ease.apply(1.0), 1.0);
    }

    #[test]
    fn test_in_out_midpoint() {
        for ease in [Ease::QuadInOut, Ease::CubicInOut, Ease::SineInOut] {
            assert!((ease.apply(0.5) - 0.5).abs() < 0.01, "{ease:?}");
        }
    }

    #[test]
    fn test_clamp() {
        let ease = Ease::Linear;
        assert_eq!(ease.apply(-0.5), 0.0);
        assert_eq!(ease.apply(1.5), 1.0);
    }

    #[test]
    fn test_curve_interpolates_between_endpoints() {
        assert_eq!(curve(0.0, 1.0, -100.0, 100.0, Ease::Linear), -100.0);
        assert_eq!(curve(0.5, 1.0, -100.0, 100.0, Ease::Linear), 0.0);
        assert_eq!(curve(1.0, 1.0, -100.0, 100.0, Ease::Linear), 100.0);
        // 时间按总时长归一化
        assert_eq!(curve(1.0, 2.0, 0.0, 10.0, Ease::Linear), 5.0);
    }

    #[test]
    fn test_curve_zero_total_snaps_to_end() {
        assert_eq!(curve(0.0, 0.0, 3.0, 7.0, Ease::CubicOut), 7.0);
        assert_eq!(curve(0.5, -1.0, 3.0, 7.0, Ease::CubicOut), 7.0);
    }

    #[test]
    fn test_cubic_out_is_front_loaded() {
        assert!(Ease::CubicOut.apply(0.5) > 0.5);
        assert!(Ease::CubicIn.apply(0.5) < 0.5);
    }

    #[test]
    fn test_ping_pong() {
        assert_eq!(ping_pong(0.0, 1.0, 0.0, 10.0, Ease::Linear), 0.0);
        assert_eq!(ping_pong(0.25, 1.0, 0.0, 10.0, Ease::Linear), 5.0);
        assert_eq!(ping_pong(0.5, 1.0, 0.0, 10.0, Ease::Linear), 10.0);
        assert_eq!(ping_pong(0.75, 1.0, 0.0, 10.0, Ease::Linear), 5.0);
        assert_eq!(ping_pong(1.0, 1.0, 0.0, 10.0, Ease::Linear), 0.0);
    }

    #[test]
    fn test_bound_uses_separate_curves() {
        let up = bound(0.25, 1.0, 0.0, 1.0, Ease::CubicIn, Ease::CubicOut);
        let down = bound(0.75, 1.0, 0.0, 1.0, Ease::CubicIn, Ease::CubicOut);
        assert!((up - Ease::CubicIn.apply(0.5)).abs() < 1e-6);
        assert!((down - (1.0 - Ease::CubicOut.apply(0.5))).abs() < 1e-6);
    }

    #[test]
    fn test_unit_period_defaults() {
        assert_eq!(ping_pong01(0.0, 2.0, 4.0), 2.0);
        assert_eq!(ping_pong01(0.5, 2.0, 4.0), 4.0);
        assert!((ping_pong01(0.25, 0.0, 1.0) - 0.5).abs() < 1e-6);
        assert_eq!(
            ping_pong01(0.1, 0.0, 1.0),
            ping_pong(0.1, 1.0, 0.0, 1.0, Ease::CubicInOut)
        );

        assert_eq!(
            bound01(0.25, 0.0, 1.0),
            bound(0.25, 1.0, 0.0, 1.0, Ease::CubicIn, Ease::CubicOut)
        );
        assert_eq!(
            bound01(0.75, 0.0, 1.0),
            bound(0.75, 1.0, 0.0, 1.0, Ease::CubicIn, Ease::CubicOut)
        );
        assert_eq!(bound01(0.5, 0.0, 1.0), 1.0);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Ease::CubicInOut).unwrap();
        assert_eq!(json, "\"cubic_in_out\"");
        let ease: Ease = serde_json::from_str("\"none\"").unwrap();
        assert!(ease.is_none());
    }
}
