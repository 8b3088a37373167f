use embedded_graphics::pixelcolor::Rgb565;

use crate::types::{Block, HardwareError, RenderError};

/// 绘制目标，按块写入面板
pub trait Canvas {
    /// 用 `color` 填满整个面板
    fn clear(&mut self, color: Rgb565) -> Result<(), RenderError>;

    /// 绘制单个块，失败不影响面板其他区域
    fn paint_block(&mut self, block: &Block) -> Result<(), RenderError>;
}

/// 面板电源控制，主循环退出时调用
pub trait PanelControl {
    fn set_backlight(&mut self, on: bool) -> Result<(), HardwareError>;

    /// 控制器进入低功耗状态
    fn sleep(&mut self) -> Result<(), HardwareError>;
}
