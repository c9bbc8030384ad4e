//! # Ease 模块
//!
//! 对外的过渡对象 [`UiEase`]：把配置、表面、进度驱动器组合在一起。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let config = TransitionConfig::default()
//!     .with_effect(PropertyEffect::fade())
//!     .with_effect(PropertyEffect::move_x(0.0, -1.0, Ease::CubicOut));
//! let mut panel = UiEase::new(config, RectSurface::new(320.0, 240.0))?;
//! panel.set_value(0.0);
//!
//! panel.show_with(|| println!("shown"));
//! loop {
//!     panel.tick(dt);
//!     if !panel.check_easing() { break; }
//! }
//! ```

use tracing::debug;

use crate::config::TransitionConfig;
use crate::driver::{Direction, DriverPhase, ProgressDriver, Stage, WaitSync};
use crate::effect::{self, EffectKind, PropertyEffect};
use crate::error::{EaseError, EaseResult};
use crate::surface::Surface;

/// 单个表面的显示/隐藏过渡
pub struct UiEase<S: Surface> {
    config: TransitionConfig,
    surface: S,
    driver: ProgressDriver,
    observer: Option<crate::driver::ProgressObserver>,
}

impl<S: Surface + std::fmt::Debug> std::fmt::Debug for UiEase<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiEase")
            .field("surface", &self.surface)
            .field("driver", &self.driver)
            .field("effects", &self.config.effects.len())
            .finish()
    }
}

impl<S: Surface> UiEase<S> {
    /// 创建过渡
    ///
    /// 验证配置，以 `initial_value` 作为初始进度并立即评估一次效果。
    pub fn new(config: TransitionConfig, mut surface: S) -> EaseResult<Self> {
        config.validate()?;

        let (width, height) = surface.size();
        if !width.is_finite() || !height.is_finite() {
            return Err(EaseError::MissingSurface {
                what: format!("尺寸不是有限值 ({width}, {height})"),
            });
        }

        let value = config.initial_value;
        effect::compose(&config.effects, &mut surface, value);
        debug!(value, effects = config.effects.len(), "UiEase created");

        Ok(Self {
            config,
            surface,
            driver: ProgressDriver::new(value),
            observer: None,
        })
    }

    fn with_stage<R>(&mut self, f: impl FnOnce(&mut ProgressDriver, &mut Stage<'_, S>) -> R) -> R {
        let mut stage = Stage {
            config: &self.config,
            surface: &mut self.surface,
            observer: &mut self.observer,
        };
        f(&mut self.driver, &mut stage)
    }

    /// 初始激活策略
    ///
    /// 已显示（V > 0）或显示任务待执行时激活表面并接收输入，否则停用并关闭输入。
    /// 受 `auto_activate` / `auto_block_raycasts` 控制。
    pub fn start(&mut self) {
        let shown = self.driver.value() > 0.0 || self.check_fadein();
        let auto_activate = self.config.auto_activate;
        let auto_block = self.config.auto_block_raycasts;

        self.with_stage(|driver, stage| {
            if auto_activate && stage.surface.is_active_self() != shown {
                driver.set_active(stage, shown);
            }
            if auto_block {
                stage.surface.set_blocks_raycasts(shown);
            }
        });
    }

    // ========== 过渡控制 ==========

    /// 显示
    pub fn show(&mut self) {
        self.with_stage(|driver, stage| driver.show(stage, None));
    }

    /// 显示，完成时调用一次 `on_complete`
    pub fn show_with(&mut self, on_complete: impl FnOnce() + 'static) {
        self.with_stage(|driver, stage| driver.show(stage, Some(Box::new(on_complete))));
    }

    /// 从完全隐藏开始显示
    pub fn start_show(&mut self) {
        self.with_stage(|driver, stage| driver.start_show(stage, None));
    }

    /// 从完全隐藏开始显示，完成时调用一次 `on_complete`
    pub fn start_show_with(&mut self, on_complete: impl FnOnce() + 'static) {
        self.with_stage(|driver, stage| driver.start_show(stage, Some(Box::new(on_complete))));
    }

    /// 隐藏
    pub fn hide(&mut self) {
        self.with_stage(|driver, stage| driver.hide(stage, None));
    }

    /// 隐藏，完成时调用一次 `on_complete`
    pub fn hide_with(&mut self, on_complete: impl FnOnce() + 'static) {
        self.with_stage(|driver, stage| driver.hide(stage, Some(Box::new(on_complete))));
    }

    /// 立即设值（0 = 隐藏，1 = 显示），越界值被限制
    pub fn set_value(&mut self, value: f32) {
        self.with_stage(|driver, stage| driver.set_value(stage, value));
    }

    /// 当前进度
    pub fn get_value(&self) -> f32 {
        self.driver.value()
    }

    /// 停止过渡，丢弃未触发的单次回调
    pub fn stop(&mut self) {
        self.driver.stop();
    }

    /// 推进一帧
    pub fn tick(&mut self, dt: f32) {
        self.with_stage(|driver, stage| driver.tick(stage, dt));
    }

    /// 暂停当前任务
    pub fn pause(&mut self) {
        self.driver.pause();
    }

    /// 恢复当前任务
    pub fn resume(&mut self) {
        self.driver.resume();
    }

    /// 激活/停用表面。停用时挂起进行中的任务，重新激活后继续
    pub fn set_active(&mut self, active: bool) {
        self.with_stage(|driver, stage| driver.set_active(stage, active));
    }

    // ========== 状态查询 ==========

    /// 是否有任务正在推进
    pub fn check_easing(&self) -> bool {
        self.driver.is_easing()
    }

    /// 显示任务是否存在
    pub fn check_fadein(&self) -> bool {
        self.driver.phase() == DriverPhase::ShowRunning
    }

    /// 隐藏任务是否存在
    pub fn check_fadeout(&self) -> bool {
        self.driver.phase() == DriverPhase::HideRunning
    }

    pub fn phase(&self) -> DriverPhase {
        self.driver.phase()
    }

    /// 等待当前过渡结束
    pub fn wait_sync(&self) -> WaitSync {
        self.driver.wait_sync()
    }

    // ========== 回调 ==========

    /// 每次显示完成时调用
    pub fn on_shown(&mut self, listener: impl FnMut() + 'static) {
        self.driver
            .completion_mut(Direction::Show)
            .subscribe(Box::new(listener));
    }

    /// 每次隐藏完成时调用
    pub fn on_hidden(&mut self, listener: impl FnMut() + 'static) {
        self.driver
            .completion_mut(Direction::Hide)
            .subscribe(Box::new(listener));
    }

    /// 调试用：每次评估效果前以当前进度调用
    pub fn set_progress_observer(&mut self, observer: impl FnMut(f32) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_progress_observer(&mut self) {
        self.observer = None;
    }

    // ========== 输入 ==========

    /// 设置是否接收输入
    pub fn set_block_raycasts(&mut self, blocks: bool) {
        self.surface.set_blocks_raycasts(blocks);
    }

    /// 是否接收输入
    pub fn get_block_raycasts(&self) -> bool {
        self.surface.blocks_raycasts()
    }

    // ========== 效果 ==========

    /// 第一个指定种类的效果
    pub fn get_effect(&self, kind: EffectKind) -> Option<&PropertyEffect> {
        self.config.effects.iter().find(|e| e.kind() == kind)
    }

    pub fn get_effect_mut(&mut self, kind: EffectKind) -> Option<&mut PropertyEffect> {
        self.config.effects.iter_mut().find(|e| e.kind() == kind)
    }

    /// 第一个带指定标签的效果
    pub fn get_effect_by_tag(&self, tag: &str) -> Option<&PropertyEffect> {
        self.config
            .effects
            .iter()
            .find(|e| e.tag.as_deref() == Some(tag))
    }

    pub fn get_effect_by_tag_mut(&mut self, tag: &str) -> Option<&mut PropertyEffect> {
        self.config
            .effects
            .iter_mut()
            .find(|e| e.tag.as_deref() == Some(tag))
    }

    /// 全部效果（按评估顺序）
    pub fn get_effects(&self) -> &[PropertyEffect] {
        &self.config.effects
    }

    /// 可修改的效果列表，修改在下一次评估时生效
    pub fn effects_mut(&mut self) -> &mut Vec<PropertyEffect> {
        &mut self.config.effects
    }

    // ========== 访问器 ==========

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// 取回表面
    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Ease;
    use crate::surface::RectSurface;

    fn panel() -> UiEase<RectSurface> {
        let config = TransitionConfig::default()
            .with_effect(PropertyEffect::fade().with_tag("alpha"))
            .with_effect(PropertyEffect::move_x(0.0, -1.0, Ease::CubicOut))
            .with_effect(PropertyEffect::move_x(10.0, 1.0, Ease::Linear).with_tag("second"));
        UiEase::new(config, RectSurface::new(100.0, 100.0)).unwrap()
    }

    #[test]
    fn test_new_renders_initial_value() {
        let config = TransitionConfig::default()
            .with_initial_value(0.0)
            .with_effect(PropertyEffect::fade());
        let ease = UiEase::new(config, RectSurface::default()).unwrap();
        assert_eq!(ease.get_value(), 0.0);
        assert_eq!(ease.surface().alpha, 0.0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = TransitionConfig::default().with_raycast_on_value(-0.1);
        assert!(matches!(
            UiEase::new(config, RectSurface::default()),
            Err(EaseError::Config(_))
        ));
    }

    #[test]
    fn test_new_rejects_unusable_surface() {
        let surface = RectSurface::new(f32::NAN, 10.0);
        assert!(matches!(
            UiEase::new(TransitionConfig::default(), surface),
            Err(EaseError::MissingSurface { .. })
        ));
    }

    #[test]
    fn test_effect_lookup() {
        let ease = panel();
        let first = ease.get_effect(EffectKind::MoveX).unwrap();
        assert_eq!(first.effect.tween().unwrap().pos, 0.0);

        let second = ease.get_effect_by_tag("second").unwrap();
        assert_eq!(second.effect.tween().unwrap().pos, 10.0);

        assert!(ease.get_effect(EffectKind::RotateZ).is_none());
        assert!(ease.get_effect_by_tag("missing").is_none());
        assert_eq!(ease.get_effects().len(), 3);
    }

    #[test]
    fn test_bypass_effect_at_runtime() {
        let mut ease = panel();
        ease.get_effect_by_tag_mut("second")
            .and_then(|e| e.effect.tween_mut())
            .unwrap()
            .ease = Ease::None;

        ease.set_value(0.0);
        // 第二条 MoveX 被停用，第一条生效
        assert_eq!(ease.surface().position.x, -100.0);
    }

    #[test]
    fn test_block_raycasts_accessors() {
        let mut ease = panel();
        ease.set_block_raycasts(false);
        assert!(!ease.get_block_raycasts());
        ease.set_block_raycasts(true);
        assert!(ease.get_block_raycasts());
    }

    #[test]
    fn test_start_policy_hidden() {
        let config = TransitionConfig::default()
            .with_initial_value(0.0)
            .with_auto_activate(true);
        let mut ease = UiEase::new(config, RectSurface::default()).unwrap();
        ease.start();

        assert!(!ease.surface().active);
        assert!(!ease.get_block_raycasts());
    }

    #[test]
    fn test_start_policy_shown() {
        let config = TransitionConfig::default().with_auto_activate(true);
        let surface = RectSurface::default().with_active(false);
        let mut ease = UiEase::new(config, surface).unwrap();
        ease.set_block_raycasts(false);
        ease.start();

        assert!(ease.surface().active);
        assert!(ease.get_block_raycasts());
    }
}
