use embedded_graphics::{
    pixelcolor::{Rgb565, RgbColor, WebColors},
    prelude::{Point, Size},
    primitives::Rectangle,
};

/// 面板物理尺寸（竖屏）
pub const PANEL_WIDTH: u32 = 240;
pub const PANEL_HEIGHT: u32 = 320;

pub fn panel_bounds() -> Rectangle {
    Rectangle::new(Point::zero(), Size::new(PANEL_WIDTH, PANEL_HEIGHT))
}

/// 单次绘制的刷新决策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    /// 清屏后重绘所有块
    Full,
    /// 只重绘随时间变化的块
    Incremental,
    Skip,
}

impl RefreshDecision {
    pub fn paints(&self) -> bool {
        !matches!(self, RefreshDecision::Skip)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSet {
    /// 100x100 图标
    Large,
    /// 50x50 图标
    Small,
}

impl IconSet {
    pub fn dir_name(&self) -> &'static str {
        match self {
            IconSet::Large => "large",
            IconSet::Small => "small",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub font: FontSize,
    pub color: Rgb565,
    /// 相对于块左上角的锚点
    pub position: Point,
    pub alignment: Alignment,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, font: FontSize, position: Point) -> Self {
        Self {
            text: text.into(),
            font,
            color: palette::TEXT,
            position,
            alignment: Alignment::Left,
        }
    }

    pub fn centered(self) -> Self {
        self.aligned(Alignment::Center)
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_color(mut self, color: Rgb565) -> Self {
        self.color = color;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub background: Rgb565,
    pub spans: Vec<TextSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Text(TextBlock),
    Icon { id: String, set: IconSet },
}

/// 作为整体绘制的矩形区域
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub region: Rectangle,
    pub content: BlockContent,
}

impl Block {
    pub fn text(region: Rectangle, spans: Vec<TextSpan>) -> Self {
        Self {
            region,
            content: BlockContent::Text(TextBlock {
                background: palette::BACKGROUND,
                spans,
            }),
        }
    }

    pub fn icon(region: Rectangle, id: impl Into<String>, set: IconSet) -> Self {
        Self {
            region,
            content: BlockContent::Icon { id: id.into(), set },
        }
    }

    /// Concatenated span text, used for logging and tests.
    pub fn text_content(&self) -> Option<String> {
        match &self.content {
            BlockContent::Text(block) => Some(
                block
                    .spans
                    .iter()
                    .map(|span| span.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            BlockContent::Icon { .. } => None,
        }
    }
}

pub mod palette {
    use super::*;

    pub const BACKGROUND: Rgb565 = Rgb565::BLACK;
    pub const TEXT: Rgb565 = Rgb565::WHITE;
    pub const ACCENT: Rgb565 = Rgb565::CSS_LIGHT_SKY_BLUE;
    pub const MUTED: Rgb565 = Rgb565::CSS_LIGHT_GRAY;
}
