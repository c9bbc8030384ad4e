//! # Driver 模块
//!
//! 进度驱动器：持有唯一的进度值 V，负责 Show/Hide/SetValue 的排序与互斥，
//! 并在每帧把新的 V 交给效果合成器。
//!
//! ## 状态机
//!
//! ```text
//!            show()                 hide()
//!   Idle ───────────► ShowRunning ───────────► HideRunning
//!    ▲                  │    ▲                    │
//!    │   到达终点/stop  │    └────── show() ──────┘
//!    └──────────────────┴─────────────────────────┘
//! ```
//!
//! 任何启动某个方向的入口都会先取消另一个方向，所以两个方向不可能同时运行。
//! 被取消的任务不会再评估任何帧，也不会触发完成回调。

mod notify;
mod task;

pub use notify::{Completion, EasingSignal, Listener, OneShot, WaitSync};
pub use task::{Direction, DirectionTask, Step, TaskPhase};

use tracing::{debug, trace, warn};

use crate::config::TransitionConfig;
use crate::effect;
use crate::surface::Surface;

/// 进度观察者，每次合成前以 V 调用
pub type ProgressObserver = Box<dyn FnMut(f32)>;

/// 驱动器当前状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    /// 无任务
    Idle,
    /// 显示任务存在
    ShowRunning,
    /// 隐藏任务存在
    HideRunning,
}

#[derive(Debug, Clone, Default)]
enum DriverState {
    #[default]
    Idle,
    ShowRunning(DirectionTask),
    HideRunning(DirectionTask),
}

impl DriverState {
    fn running(task: DirectionTask) -> Self {
        match task.direction() {
            Direction::Show => DriverState::ShowRunning(task),
            Direction::Hide => DriverState::HideRunning(task),
        }
    }

    fn direction(&self) -> Option<Direction> {
        match self {
            DriverState::Idle => None,
            DriverState::ShowRunning(_) => Some(Direction::Show),
            DriverState::HideRunning(_) => Some(Direction::Hide),
        }
    }

    fn task_mut(&mut self) -> Option<&mut DirectionTask> {
        match self {
            DriverState::Idle => None,
            DriverState::ShowRunning(task) | DriverState::HideRunning(task) => Some(task),
        }
    }
}

/// 驱动器在一次操作中需要的外部环境
///
/// 由过渡的各个字段分别借用拼成，驱动器自身不持有它们。
pub struct Stage<'a, S: Surface> {
    pub config: &'a TransitionConfig,
    pub surface: &'a mut S,
    pub observer: &'a mut Option<ProgressObserver>,
}

impl<S: Surface> Stage<'_, S> {
    /// 以进度 `value` 评估全部效果
    fn render(&mut self, value: f32) {
        if let Some(observer) = self.observer.as_mut() {
            observer(value);
        }
        effect::compose(&self.config.effects, self.surface, value);
    }
}

/// 进度驱动器
#[derive(Debug)]
pub struct ProgressDriver {
    value: f32,
    state: DriverState,
    shown: Completion,
    hidden: Completion,
    easing: EasingSignal,
}

impl ProgressDriver {
    /// 以初始进度创建驱动器
    pub fn new(value: f32) -> Self {
        Self {
            value,
            state: DriverState::Idle,
            shown: Completion::default(),
            hidden: Completion::default(),
            easing: EasingSignal::default(),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn phase(&self) -> DriverPhase {
        match self.state {
            DriverState::Idle => DriverPhase::Idle,
            DriverState::ShowRunning(_) => DriverPhase::ShowRunning,
            DriverState::HideRunning(_) => DriverPhase::HideRunning,
        }
    }

    /// 是否有任务正在推进
    pub fn is_easing(&self) -> bool {
        self.easing.get()
    }

    /// 创建等待点，过渡结束时就绪
    pub fn wait_sync(&self) -> WaitSync {
        self.easing.wait()
    }

    /// 当前任务（如果有）
    pub fn task(&self) -> Option<&DirectionTask> {
        match &self.state {
            DriverState::Idle => None,
            DriverState::ShowRunning(task) | DriverState::HideRunning(task) => Some(task),
        }
    }

    /// 某个方向的完成通知
    pub fn completion_mut(&mut self, direction: Direction) -> &mut Completion {
        match direction {
            Direction::Show => &mut self.shown,
            Direction::Hide => &mut self.hidden,
        }
    }

    // ========== 入口 ==========

    /// 显示
    pub fn show<S: Surface>(&mut self, stage: &mut Stage<'_, S>, on_complete: Option<OneShot>) {
        self.request(stage, Direction::Show, on_complete);
    }

    /// 隐藏
    pub fn hide<S: Surface>(&mut self, stage: &mut Stage<'_, S>, on_complete: Option<OneShot>) {
        self.request(stage, Direction::Hide, on_complete);
    }

    /// 从头显示：丢弃进行中的隐藏，先把 V 置 0 再显示
    pub fn start_show<S: Surface>(
        &mut self,
        stage: &mut Stage<'_, S>,
        on_complete: Option<OneShot>,
    ) {
        self.cancel(Direction::Hide);
        self.hidden.clear_one_shot();

        self.set_value(stage, 0.0);
        self.show(stage, on_complete);
    }

    /// 立即设值
    ///
    /// 取消所有任务。值有变化时，按"本次设值或被打断的任务指向哪一端"
    /// 触发对应方向的完成通知和终点副作用，然后同步评估一次合成器。
    pub fn set_value<S: Surface>(&mut self, stage: &mut Stage<'_, S>, value: f32) {
        let in_flight = self.state.direction();
        self.cancel_all();

        let value = value.clamp(0.0, 1.0);
        if value == self.value {
            return;
        }

        debug!(from = self.value, to = value, in_flight = ?in_flight, "set_value");

        let outcome = if value == 1.0 {
            Some(Direction::Show)
        } else if value == 0.0 {
            Some(Direction::Hide)
        } else {
            in_flight
        };
        if let Some(direction) = outcome {
            self.settle(stage, direction);
        }

        self.value = value;
        stage.render(value);
        self.easing.set(false);
    }

    /// 停止：取消两个方向的任务，丢弃（不调用）单次回调
    pub fn stop(&mut self) {
        debug!(phase = ?self.phase(), "stop");
        self.shown.clear_one_shot();
        self.hidden.clear_one_shot();
        self.cancel_all();
    }

    /// 暂停当前任务，保留任务与单次回调
    pub fn pause(&mut self) {
        if let Some(task) = self.state.task_mut() {
            task.pause();
        }
    }

    /// 恢复当前任务，从暂停处继续
    pub fn resume(&mut self) {
        if let Some(task) = self.state.task_mut() {
            task.resume();
        }
    }

    /// 激活/停用表面，任务随之暂停或恢复
    pub fn set_active<S: Surface>(&mut self, stage: &mut Stage<'_, S>, active: bool) {
        stage.surface.set_active(active);
        if active {
            self.resume();
        } else {
            self.pause();
        }
    }

    // ========== 逐帧 ==========

    /// 推进 `dt` 秒并评估一帧
    pub fn tick<S: Surface>(&mut self, stage: &mut Stage<'_, S>, dt: f32) {
        let Some(task) = self.state.task_mut() else {
            return;
        };
        let direction = task.direction();

        match task.advance(self.value, dt) {
            Step::Suspended | Step::Waiting => {}
            Step::Frame { value, ratio } => {
                trace!(?direction, value, ratio, "frame");
                self.value = value;
                stage.render(value);
                self.open_input_at_threshold(stage, direction, ratio);
            }
            Step::Wrapped { value, ratio } => {
                // 本帧停在终点，任务已重新锚定到相反端点
                debug!(?direction, value, "loop wrap");
                self.value = value;
                stage.render(value);
                self.open_input_at_threshold(stage, direction, ratio);
            }
            Step::Finished { value, ratio } => {
                self.value = value;
                stage.render(value);
                self.open_input_at_threshold(stage, direction, ratio);
                self.complete(stage, direction);
            }
        }
    }

    // ========== 内部 ==========

    fn request<S: Surface>(
        &mut self,
        stage: &mut Stage<'_, S>,
        direction: Direction,
        on_complete: Option<OneShot>,
    ) {
        let opposite = direction.opposite();
        self.cancel(opposite);
        self.completion_mut(opposite).clear_one_shot();

        let config = stage.config;
        match direction {
            Direction::Show => {
                if config.auto_activate && !stage.surface.is_active_self() {
                    self.set_active(stage, true);
                }
                if config.auto_block_raycasts {
                    // 阈值为 0 时立即接收输入，否则等到越过阈值
                    stage
                        .surface
                        .set_blocks_raycasts(config.raycast_on_value == 0.0);
                }
            }
            Direction::Hide => {
                if config.auto_block_raycasts {
                    stage.surface.set_blocks_raycasts(false);
                }
            }
        }

        self.completion_mut(direction).set_one_shot(on_complete);

        let target = direction.target();
        if self.value == target {
            debug!(?direction, "already at target");
            self.settle(stage, direction);
            return;
        }

        if !stage.surface.is_active_in_hierarchy() {
            debug!(?direction, "surface inactive, applying immediately");
            self.set_value(stage, target);
            return;
        }

        if self.value.is_nan() {
            warn!(?direction, "progress is NaN, restarting from the opposite end");
            self.value = direction.origin();
        }

        self.cancel_all();
        self.start_task(stage, direction);
    }

    fn start_task<S: Surface>(&mut self, stage: &mut Stage<'_, S>, direction: Direction) {
        let config = stage.config;
        let delay = match direction {
            Direction::Show => config.delay_before_show,
            Direction::Hide => config.delay_before_hide,
        };
        debug!(?direction, from = self.value, delay, duration = config.total_time, "start task");

        let task = DirectionTask::new(direction, delay, config.total_time, config.looping);
        self.state = DriverState::running(task);
        self.easing.set(true);
    }

    /// 取消某个方向的任务（如果正在运行）
    fn cancel(&mut self, direction: Direction) {
        if self.state.direction() == Some(direction) {
            self.state = DriverState::Idle;
            self.easing.set(false);
        }
    }

    fn cancel_all(&mut self) {
        self.cancel(Direction::Show);
        self.cancel(Direction::Hide);
    }

    /// 同步到达终点：触发完成通知并应用终点副作用
    fn settle<S: Surface>(&mut self, stage: &mut Stage<'_, S>, direction: Direction) {
        self.completion_mut(direction).fire();

        let config = stage.config;
        let shown = direction == Direction::Show;
        if config.auto_activate {
            self.set_active(stage, shown);
        }
        if config.auto_block_raycasts {
            stage.surface.set_blocks_raycasts(shown);
        }
    }

    /// 任务自然结束
    fn complete<S: Surface>(&mut self, stage: &mut Stage<'_, S>, direction: Direction) {
        debug!(?direction, value = self.value, "task complete");
        self.state = DriverState::Idle;

        if direction == Direction::Hide && stage.config.auto_activate {
            self.set_active(stage, false);
        }
        self.completion_mut(direction).fire();
        self.easing.set(false);
    }

    /// 显示途中时间比例越过阈值后打开输入，之后不会再关闭
    fn open_input_at_threshold<S: Surface>(
        &self,
        stage: &mut Stage<'_, S>,
        direction: Direction,
        ratio: f32,
    ) {
        if direction == Direction::Show
            && stage.config.auto_block_raycasts
            && ratio >= stage.config.raycast_on_value
        {
            stage.surface.set_blocks_raycasts(true);
        }
    }
}
