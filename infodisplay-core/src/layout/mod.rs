//! 布局表
//! 每个屏幕的块区域都是固定坐标（240x320 竖屏），由屏幕按表绘制

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

pub const SMALL_ICON: u32 = 50;
pub const LARGE_ICON: u32 = 100;

const fn rect(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(w, h))
}

/// 一个预报时段：时间、图标、温度、湿度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastSlot {
    pub time: Rectangle,
    pub icon: Rectangle,
    pub temp: Rectangle,
    pub humidity: Rectangle,
}

impl ForecastSlot {
    /// Slot `width` pixels wide with its top-left corner at (`x`, `y`).
    const fn column(x: i32, y: i32, width: u32, icon_gap: i32) -> Self {
        let icon_x = x + (width as i32 - SMALL_ICON as i32) / 2;
        Self {
            time: rect(x, y, width, 15),
            icon: rect(icon_x, y + icon_gap, SMALL_ICON, SMALL_ICON),
            temp: rect(x, y + icon_gap + SMALL_ICON as i32 + 2, width, 15),
            humidity: rect(x, y + icon_gap + SMALL_ICON as i32 + 18, width, 15),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentLayout {
    pub date: Rectangle,
    pub clock: Rectangle,
    pub icon: Rectangle,
    pub description: Rectangle,
    pub temperature: Rectangle,
    pub feels_like: Rectangle,
    pub humidity: Rectangle,
    pub wind: Rectangle,
    pub preview: [ForecastSlot; 3],
    pub indoor_label: Rectangle,
    pub indoor_temp: Rectangle,
    pub indoor_humidity: Rectangle,
}

/// 当前屏预览的未来小时
pub const PREVIEW_HOURS: [usize; 3] = [1, 2, 3];

pub fn current() -> CurrentLayout {
    CurrentLayout {
        date: rect(0, 0, 240, 20),
        clock: rect(0, 20, 240, 30),
        icon: rect(0, 52, LARGE_ICON, LARGE_ICON),
        description: rect(100, 52, 140, 25),
        temperature: rect(100, 77, 140, 25),
        feels_like: rect(100, 102, 140, 18),
        humidity: rect(100, 120, 140, 16),
        wind: rect(100, 136, 140, 16),
        preview: [
            ForecastSlot::column(0, 155, 80, 16),
            ForecastSlot::column(80, 155, 80, 16),
            ForecastSlot::column(160, 155, 80, 16),
        ],
        indoor_label: rect(0, 255, 240, 15),
        indoor_temp: rect(0, 272, 120, 40),
        indoor_humidity: rect(120, 272, 120, 40),
    }
}

/// 逐小时列表的一行：左侧图标，右侧文字块
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlyRow {
    pub icon: Rectangle,
    pub text: Rectangle,
}

pub const HOURLY_ROW_HOURS: [usize; 6] = [4, 5, 6, 7, 8, 9];
pub const HOURLY_GRID_HOURS: [usize; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];

pub fn hourly_rows() -> [HourlyRow; 6] {
    core::array::from_fn(|i| {
        let y = 10 + (i as i32) * SMALL_ICON as i32;
        HourlyRow {
            icon: rect(0, y, SMALL_ICON, SMALL_ICON),
            text: rect(SMALL_ICON as i32, y, 240 - SMALL_ICON, SMALL_ICON),
        }
    })
}

pub fn hourly_grid() -> [ForecastSlot; 9] {
    core::array::from_fn(|i| {
        let x = (i % 3) as i32 * 80;
        let y = 10 + (i / 3) as i32 * 100;
        ForecastSlot::column(x, y, 80, 16)
    })
}

/// 每日预报的一行：星期与日期、图标、详情
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyRow {
    pub label: Rectangle,
    pub icon: Rectangle,
    pub detail: Rectangle,
}

pub const DAILY_DAYS: [usize; 6] = [1, 2, 3, 4, 5, 6];

pub fn daily_rows() -> [DailyRow; 6] {
    core::array::from_fn(|i| {
        let y = 10 + (i as i32) * SMALL_ICON as i32;
        DailyRow {
            label: rect(0, y, 60, SMALL_ICON),
            icon: rect(60, y, SMALL_ICON, SMALL_ICON),
            detail: rect(110, y, 130, SMALL_ICON),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::ContainsPoint;
    use infodisplay_common::panel_bounds;

    fn on_panel(r: &Rectangle) -> bool {
        let panel = panel_bounds();
        match r.bottom_right() {
            Some(br) => panel.contains(r.top_left) && panel.contains(br),
            None => false,
        }
    }

    fn overlaps(a: &Rectangle, b: &Rectangle) -> bool {
        !a.intersection(b).is_zero_sized()
    }

    fn assert_disjoint(rects: &[Rectangle]) {
        for (i, a) in rects.iter().enumerate() {
            assert!(on_panel(a), "{a:?} leaves the panel");
            for b in &rects[i + 1..] {
                assert!(!overlaps(a, b), "{a:?} overlaps {b:?}");
            }
        }
    }

    fn slot_rects(slot: &ForecastSlot) -> [Rectangle; 4] {
        [slot.time, slot.icon, slot.temp, slot.humidity]
    }

    #[test]
    fn current_blocks_do_not_overlap() {
        let l = current();
        let mut rects = vec![
            l.date,
            l.clock,
            l.icon,
            l.description,
            l.temperature,
            l.feels_like,
            l.humidity,
            l.wind,
            l.indoor_label,
            l.indoor_temp,
            l.indoor_humidity,
        ];
        for slot in &l.preview {
            rects.extend(slot_rects(slot));
        }
        assert_disjoint(&rects);
    }

    #[test]
    fn hourly_tables_do_not_overlap() {
        let rows: Vec<_> = hourly_rows().iter().flat_map(|r| [r.icon, r.text]).collect();
        assert_disjoint(&rows);
        let grid: Vec<_> = hourly_grid().iter().flat_map(slot_rects).collect();
        assert_disjoint(&grid);
    }

    #[test]
    fn daily_rows_do_not_overlap() {
        let rows: Vec<_> = daily_rows()
            .iter()
            .flat_map(|r| [r.label, r.icon, r.detail])
            .collect();
        assert_disjoint(&rows);
    }
}
