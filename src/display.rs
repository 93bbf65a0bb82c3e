use display_info::DisplayInfo;
use enigo::MouseControllable;
use eframe::egui;
use once_cell::sync::Lazy;

/// Primary display rectangle as (x, y, width, height).
static PRIMARY_DISPLAY: Lazy<(i32, i32, u32, u32)> = Lazy::new(primary_display_bounds);

fn primary_display_bounds() -> (i32, i32, u32, u32) {
    match DisplayInfo::all() {
        Ok(displays) => {
            let primary = displays.iter().find(|d| d.is_primary).or_else(|| displays.first());
            if let Some(d) = primary {
                return (d.x, d.y, d.width, d.height);
            }
        }
        Err(e) => tracing::warn!(%e, "display query failed, using main display size"),
    }
    let (w, h) = enigo::Enigo::new().main_display_size();
    (0, 0, w.max(0) as u32, h.max(0) as u32)
}

/// Top-left position that centres a window of `size` inside `display`.
pub fn centered_in(display: (i32, i32, u32, u32), size: egui::Vec2) -> egui::Pos2 {
    let (x, y, w, h) = display;
    egui::pos2(
        x as f32 + ((w as f32 - size.x) / 2.0).max(0.0),
        y as f32 + ((h as f32 - size.y) / 2.0).max(0.0),
    )
}

pub fn centered_on_primary(size: egui::Vec2) -> egui::Pos2 {
    centered_in(*PRIMARY_DISPLAY, size)
}
