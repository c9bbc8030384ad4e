//! # Surface 模块
//!
//! 过渡作用的目标表面：一个带位置、缩放、旋转、透明度和输入开关的矩形。
//!
//! 引擎侧实现 [`Surface`] trait，把读写转发到自己的节点上；
//! 没有引擎的场景（测试、预览工具）使用内存实现 [`RectSurface`]。

/// 可被过渡效果写入的标量属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceProperty {
    /// 整体透明度 (0.0 - 1.0)
    Alpha,
    /// 本地坐标 X
    PositionX,
    /// 本地坐标 Y
    PositionY,
    /// 本地缩放 X
    ScaleX,
    /// 本地缩放 Y
    ScaleY,
    /// 本地欧拉角 X（度）
    RotationX,
    /// 本地欧拉角 Y（度）
    RotationY,
    /// 本地欧拉角 Z（度）
    RotationZ,
}

/// 表面访问器接口
///
/// ## 输入开关
///
/// `blocks_raycasts() == true` 表示表面**接收**输入（射线检测会命中它），
/// `false` 表示输入穿透。过渡在显示途中按阈值打开它，隐藏时立即关闭。
///
/// ## 激活状态
///
/// `is_active_self` 是表面自身的开关；`is_active_in_hierarchy` 还考虑了
/// 父节点。只有在层级中激活的表面才能运行逐帧任务。
pub trait Surface {
    /// 读取属性当前值
    fn property(&self, property: SurfaceProperty) -> f32;

    /// 写入属性
    fn set_property(&mut self, property: SurfaceProperty, value: f32);

    /// 矩形尺寸 `(width, height)`
    fn size(&self) -> (f32, f32);

    /// 是否接收输入
    fn blocks_raycasts(&self) -> bool;

    /// 设置是否接收输入
    fn set_blocks_raycasts(&mut self, blocks: bool);

    /// 自身是否激活
    fn is_active_self(&self) -> bool;

    /// 在层级中是否激活（默认等同于自身状态）
    fn is_active_in_hierarchy(&self) -> bool {
        self.is_active_self()
    }

    /// 设置自身激活状态
    fn set_active(&mut self, active: bool);
}

/// 三维向量（仅用于本地变换存储）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// 创建新的向量
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// 零向量
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// 单位向量 (1, 1, 1)
    pub const fn one() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

/// 内存中的矩形表面
///
/// 不依赖任何引擎，所有状态都是普通字段。
#[derive(Debug, Clone, PartialEq)]
pub struct RectSurface {
    /// 本地坐标
    pub position: Vec3,
    /// 本地缩放
    pub scale: Vec3,
    /// 本地欧拉角（度）
    pub rotation: Vec3,
    /// 矩形宽度
    pub width: f32,
    /// 矩形高度
    pub height: f32,
    /// 透明度
    pub alpha: f32,
    /// 是否接收输入
    pub blocks_raycasts: bool,
    /// 自身激活状态
    pub active: bool,
    /// 父节点激活状态
    pub parent_active: bool,
}

impl Default for RectSurface {
    fn default() -> Self {
        Self {
            position: Vec3::zero(),
            scale: Vec3::one(),
            rotation: Vec3::zero(),
            width: 100.0,
            height: 100.0,
            alpha: 1.0,
            blocks_raycasts: true,
            active: true,
            parent_active: true,
        }
    }
}

impl RectSurface {
    /// 创建指定尺寸的表面
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// 设置本地坐标
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position.x = x;
        self.position.y = y;
        self
    }

    /// 设置父节点激活状态
    pub fn with_parent_active(mut self, parent_active: bool) -> Self {
        self.parent_active = parent_active;
        self
    }

    /// 设置自身激活状态
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

impl Surface for RectSurface {
    fn property(&self, property: SurfaceProperty) -> f32 {
        match property {
            SurfaceProperty::Alpha => self.alpha,
            SurfaceProperty::PositionX => self.position.x,
            SurfaceProperty::PositionY => self.position.y,
            SurfaceProperty::ScaleX => self.scale.x,
            SurfaceProperty::ScaleY => self.scale.y,
            SurfaceProperty::RotationX => self.rotation.x,
            SurfaceProperty::RotationY => self.rotation.y,
            SurfaceProperty::RotationZ => self.rotation.z,
        }
    }

    fn set_property(&mut self, property: SurfaceProperty, value: f32) {
        let slot = match property {
            SurfaceProperty::Alpha => &mut self.alpha,
            SurfaceProperty::PositionX => &mut self.position.x,
            SurfaceProperty::PositionY => &mut self.position.y,
            SurfaceProperty::ScaleX => &mut self.scale.x,
            SurfaceProperty::ScaleY => &mut self.scale.y,
            SurfaceProperty::RotationX => &mut self.rotation.x,
            SurfaceProperty::RotationY => &mut self.rotation.y,
            SurfaceProperty::RotationZ => &mut self.rotation.z,
        };
        *slot = value;
    }

    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn blocks_raycasts(&self) -> bool {
        self.blocks_raycasts
    }

    fn set_blocks_raycasts(&mut self, blocks: bool) {
        self.blocks_raycasts = blocks;
    }

    fn is_active_self(&self) -> bool {
        self.active
    }

    fn is_active_in_hierarchy(&self) -> bool {
        self.active && self.parent_active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
