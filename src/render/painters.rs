//! Per-kind painters: each knows how to turn one [`Instance`] plus its
//! laid-out [`Rect`] into drawlist commands (spec §3 "painter table keyed
//! by tag", §4.6 Renderer).

use crate::drawlist::DrawlistBuilder;
use crate::instance::Instance;
use crate::layout::Rect;
use crate::style::{BorderStyle, Color};
use crate::vnode::Payload;
use crate::widget::measure::wrap;

/// Paint the background fill and border for any container-like instance
/// before its children are painted (spec §4.6 "background fill happens
/// before children").
pub fn paint_background(builder: &mut DrawlistBuilder, rect: Rect, border: BorderStyle, bg: Option<Color>) {
    if let Some(color) = bg {
        builder.fill_rect(clamp_u16(rect.x), clamp_u16(rect.y), rect.width, rect.height, color);
    }
    let Some(glyphs) = border.glyphs() else { return };
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    let (x, y, w, h) = (clamp_u16(rect.x), clamp_u16(rect.y), rect.width, rect.height);
    let color = bg.unwrap_or(Color::Default);
    builder.draw_text(x, y, &glyphs.tl.to_string(), &crate::style::TextStyle::default().color(color));
    builder.draw_text(x + w.saturating_sub(1), y, &glyphs.tr.to_string(), &crate::style::TextStyle::default().color(color));
    builder.draw_text(x, y + h.saturating_sub(1), &glyphs.bl.to_string(), &crate::style::TextStyle::default().color(color));
    builder.draw_text(
        x + w.saturating_sub(1),
        y + h.saturating_sub(1),
        &glyphs.br.to_string(),
        &crate::style::TextStyle::default().color(color),
    );
    for col in (x + 1)..(x + w.saturating_sub(1)) {
        builder.draw_text(col, y, &glyphs.h.to_string(), &crate::style::TextStyle::default().color(color));
        builder.draw_text(col, y + h.saturating_sub(1), &glyphs.h.to_string(), &crate::style::TextStyle::default().color(color));
    }
    for row in (y + 1)..(y + h.saturating_sub(1)) {
        builder.draw_text(x, row, &glyphs.v.to_string(), &crate::style::TextStyle::default().color(color));
        builder.draw_text(x + w.saturating_sub(1), row, &glyphs.v.to_string(), &crate::style::TextStyle::default().color(color));
    }
}

/// Paint a `Text` instance: wraps to the laid-out width and draws each line
/// (spec §4.4 text wrapping, §4.6).
pub fn paint_text(builder: &mut DrawlistBuilder, rect: Rect, instance: &Instance) {
    let Payload::Text { content } = &instance.payload else { return };
    let lines = wrap(content, usize::from(rect.width));
    for (i, line) in lines.iter().enumerate() {
        let Ok(dy) = u16::try_from(i) else { break };
        if dy >= rect.height {
            break;
        }
        builder.draw_text(clamp_u16(rect.x), clamp_u16(rect.y) + dy, line, &instance.appearance.text_style);
    }
}

pub fn paint_button(builder: &mut DrawlistBuilder, rect: Rect, instance: &Instance) {
    let Payload::Button { label, disabled } = &instance.payload else { return };
    let mut style = instance.appearance.text_style.clone();
    if *disabled {
        style.attrs.insert(crate::style::Attrs::DIM);
    }
    builder.draw_text(clamp_u16(rect.x), clamp_u16(rect.y), label, &style);
}

/// Paint a table's column headers with a sort-direction glyph next to
/// whichever column is currently sorted (spec §8 scenario 2). Row content
/// arrives as ordinary child instances painted by the caller.
pub fn paint_table(builder: &mut DrawlistBuilder, rect: Rect, instance: &Instance) {
    let Payload::Table(table) = &instance.payload else { return };
    if table.columns.is_empty() || rect.width == 0 {
        return;
    }
    let style = &instance.appearance.text_style;
    let col_width = (rect.width / u16::try_from(table.columns.len()).unwrap_or(1)).max(1);
    for (i, column) in table.columns.iter().enumerate() {
        let Ok(i_u16) = u16::try_from(i) else { break };
        let x = clamp_u16(rect.x) + col_width * i_u16;
        builder.draw_text(x, clamp_u16(rect.y), column, style);
        if table.sort_column == Some(i) {
            let glyph = if table.sort_ascending { "▲" } else { "▼" };
            let glyph_x = x + u16::try_from(column.chars().count()).unwrap_or(0) + 1;
            builder.draw_text(glyph_x, clamp_u16(rect.y), glyph, style);
        }
    }
}

/// Paint up to `max_visible` queued toast messages, oldest first, stacked
/// one per row (spec §8 scenario 5: excess messages never reach the drawlist
/// at all, not merely go unpainted).
pub fn paint_toast_container(builder: &mut DrawlistBuilder, rect: Rect, instance: &Instance) {
    let Payload::ToastContainer { max_visible, messages } = &instance.payload else { return };
    let style = &instance.appearance.text_style;
    for (i, message) in messages.iter().take(*max_visible).enumerate() {
        let Ok(dy) = u16::try_from(i) else { break };
        if dy >= rect.height {
            break;
        }
        builder.draw_text(clamp_u16(rect.x), clamp_u16(rect.y) + dy, message, style);
    }
}

fn clamp_u16(v: i32) -> u16 {
    v.clamp(0, i32::from(u16::MAX)) as u16
}
