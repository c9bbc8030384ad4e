//! # Task 模块
//!
//! 单个方向任务：把进度值推向一端（显示 = 1，隐藏 = 0）。
//!
//! 任务只是普通数据（方向、阶段、起始值、已过时间），由宿主每帧调用
//! [`DirectionTask::advance`] 采样。暂停只冻结时间累加，任务身份和
//! 已捕获的起始值都保留，恢复后从暂停处继续。

/// 过渡方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// 显示（进度 → 1）
    Show,
    /// 隐藏（进度 → 0）
    Hide,
}

impl Direction {
    /// 目标端点
    pub fn target(self) -> f32 {
        match self {
            Direction::Show => 1.0,
            Direction::Hide => 0.0,
        }
    }

    /// 相反端点（循环时从这里重新开始）
    pub fn origin(self) -> f32 {
        match self {
            Direction::Show => 0.0,
            Direction::Hide => 1.0,
        }
    }

    /// 相反方向
    pub fn opposite(self) -> Self {
        match self {
            Direction::Show => Direction::Hide,
            Direction::Hide => Direction::Show,
        }
    }
}

/// 任务阶段
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskPhase {
    /// 等待开始前的延迟
    Delay { remaining: f32 },
    /// 正在播放
    Playing,
}

/// 一次采样的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// 已暂停，本帧不评估
    Suspended,
    /// 仍在延迟中，本帧不评估
    Waiting,
    /// 普通帧
    Frame { value: f32, ratio: f32 },
    /// 循环回绕：本帧到达终点，下一帧从相反端点重新开始
    Wrapped { value: f32, ratio: f32 },
    /// 到达终点，任务结束
    Finished { value: f32, ratio: f32 },
}

/// 方向任务
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionTask {
    direction: Direction,
    phase: TaskPhase,
    /// 播放开始时捕获的进度值
    start_value: f32,
    /// 播放阶段已经过的时间（秒）
    elapsed: f32,
    duration: f32,
    looping: bool,
    paused: bool,
}

impl DirectionTask {
    /// 创建新任务
    ///
    /// 延迟只在第一次播放前生效一次，循环回绕不会再次等待。
    pub fn new(direction: Direction, delay: f32, duration: f32, looping: bool) -> Self {
        Self {
            direction,
            phase: TaskPhase::Delay {
                remaining: delay.max(0.0),
            },
            start_value: direction.origin(),
            elapsed: 0.0,
            duration,
            looping,
            paused: false,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn phase(&self) -> TaskPhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// 推进 `dt` 秒并采样
    ///
    /// `current` 是驱动器持有的当前进度值，仅在延迟结束、开始播放的那一帧被捕获为起始值。
    pub fn advance(&mut self, current: f32, dt: f32) -> Step {
        if self.paused {
            return Step::Suspended;
        }
        let dt = dt.max(0.0);

        match self.phase {
            TaskPhase::Delay { remaining } => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.phase = TaskPhase::Delay { remaining };
                    return Step::Waiting;
                }
                self.phase = TaskPhase::Playing;
                self.start_value = current;
                // 延迟多出来的时间计入播放
                self.elapsed = -remaining;
            }
            TaskPhase::Playing => {
                self.elapsed += dt;
            }
        }

        self.sample()
    }

    fn sample(&mut self) -> Step {
        // 非正时长：第一次评估就到达终点
        let ratio = if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let target = self.direction.target();
        let value = (self.start_value + (target - self.start_value) * ratio).clamp(0.0, 1.0);

        if ratio < 1.0 {
            return Step::Frame { value, ratio };
        }

        if self.looping {
            self.start_value = self.direction.origin();
            self.elapsed = 0.0;
            Step::Wrapped { value, ratio }
        } else {
            Step::Finished { value, ratio }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_endpoints() {
        assert_eq!(Direction::Show.target(), 1.0);
        assert_eq!(Direction::Show.origin(), 0.0);
        assert_eq!(Direction::Hide.target(), 0.0);
        assert_eq!(Direction::Hide.opposite(), Direction::Show);
    }

    #[test]
    fn test_show_task_progresses_linearly() {
        let mut task = DirectionTask::new(Direction::Show, 0.0, 1.0, false);

        assert_eq!(
            task.advance(0.0, 0.25),
            Step::Frame {
                value: 0.25,
                ratio: 0.25
            }
        );
        assert_eq!(
            task.advance(0.25, 0.25),
            Step::Frame {
                value: 0.5,
                ratio: 0.5
            }
        );
        assert_eq!(
            task.advance(0.5, 0.5),
            Step::Finished {
                value: 1.0,
                ratio: 1.0
            }
        );
    }

    #[test]
    fn test_start_value_captured_after_delay() {
        let mut task = DirectionTask::new(Direction::Hide, 0.5, 1.0, false);

        assert_eq!(task.advance(0.8, 0.25), Step::Waiting);
        assert_eq!(task.phase(), TaskPhase::Delay { remaining: 0.25 });

        // 延迟结束：起始值取 0.5，剩余 0.25 秒计入播放
        let step = task.advance(0.5, 0.5);
        assert_eq!(
            step,
            Step::Frame {
                value: 0.375,
                ratio: 0.25
            }
        );
        assert_eq!(task.phase(), TaskPhase::Playing);
    }

    #[test]
    fn test_zero_duration_snaps() {
        let mut task = DirectionTask::new(Direction::Show, 0.0, 0.0, false);
        assert_eq!(
            task.advance(0.0, 0.0),
            Step::Finished {
                value: 1.0,
                ratio: 1.0
            }
        );

        let mut task = DirectionTask::new(Direction::Hide, 0.0, -3.0, false);
        assert_eq!(
            task.advance(1.0, 0.016),
            Step::Finished {
                value: 0.0,
                ratio: 1.0
            }
        );
    }

    #[test]
    fn test_loop_wraps_without_finishing() {
        let mut task = DirectionTask::new(Direction::Show, 0.5, 1.0, true);
        task.advance(0.0, 0.5);

        assert_eq!(
            task.advance(0.0, 1.0),
            Step::Wrapped {
                value: 1.0,
                ratio: 1.0
            }
        );
        // 回绕后不再等待延迟，起始值取相反端点而不是当前值
        assert_eq!(task.phase(), TaskPhase::Playing);
        assert_eq!(
            task.advance(1.0, 0.5),
            Step::Frame {
                value: 0.5,
                ratio: 0.5
            }
        );
    }

    #[test]
    fn test_hide_loop_wraps_to_shown() {
        let mut task = DirectionTask::new(Direction::Hide, 0.0, 1.0, true);

        assert_eq!(
            task.advance(1.0, 1.0),
            Step::Wrapped {
                value: 0.0,
                ratio: 1.0
            }
        );
        assert_eq!(
            task.advance(0.0, 0.25),
            Step::Frame {
                value: 0.75,
                ratio: 0.25
            }
        );
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut task = DirectionTask::new(Direction::Show, 0.0, 1.0, false);
        task.advance(0.0, 0.25);

        task.pause();
        assert_eq!(task.advance(0.25, 10.0), Step::Suspended);

        task.resume();
        assert_eq!(
            task.advance(0.25, 0.25),
            Step::Frame {
                value: 0.5,
                ratio: 0.5
            }
        );
    }
}
