use ratatui::{Frame, layout::Rect, widgets::Clear};

/// Rect of `width` x `height` centered in `frame_area`, clamped to fit
pub fn centered_popup(frame_area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(frame_area.width);
    let popup_height = height.min(frame_area.height);

    Rect {
        x: frame_area.x + frame_area.width.saturating_sub(popup_width) / 2,
        y: frame_area.y + frame_area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    }
}

/// Popup anchored under the cell `(x, y)`
///
/// Flips above the anchor when there is not enough room below, and shifts
/// left so it stays inside `bounds`.
pub fn popup_near_cell(bounds: Rect, x: u16, y: u16, width: u16, height: u16) -> Rect {
    let width = width.min(bounds.width);
    let bottom = bounds.y + bounds.height;

    let space_below = bottom.saturating_sub(y + 1);
    let space_above = y.saturating_sub(bounds.y);
    let (popup_y, height) = if space_below >= height || space_below >= space_above {
        (y + 1, height.min(space_below))
    } else {
        let height = height.min(space_above);
        (y - height, height)
    };

    let max_x = (bounds.x + bounds.width).saturating_sub(width);
    let popup_x = x.clamp(bounds.x, max_x.max(bounds.x));

    Rect {
        x: popup_x,
        y: popup_y,
        width,
        height,
    }
}

pub fn clear_area(frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);
}

#[cfg(test)]
#[path = "popup_tests.rs"]
mod popup_tests;
