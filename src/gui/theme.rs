use egui::{Color32, Context, Rounding, Stroke, Visuals};

use crate::model::Theme;

pub const ACCENT: Color32 = Color32::from_rgb(99, 102, 241);

/// Apply the selected theme to the whole interface
pub fn apply_theme(ctx: &Context, theme: Theme) {
    match theme {
        Theme::Light => ctx.set_visuals(light_visuals()),
        Theme::Dark => ctx.set_visuals(dark_visuals()),
    }
}

/// Secondary text color for the current theme
pub fn secondary_text(theme: Theme) -> Color32 {
    match theme {
        Theme::Light => Color32::from_rgb(71, 85, 105),
        Theme::Dark => Color32::from_rgb(148, 163, 184),
    }
}

fn dark_visuals() -> Visuals {
    // Start with the dark theme as a base
    let mut visuals = Visuals::dark();

    // Slate backgrounds
    visuals.panel_fill = Color32::from_rgb(15, 23, 42);
    visuals.window_fill = Color32::from_rgb(30, 41, 59);

    // Active widgets have a slightly lighter background
    visuals.widgets.active.bg_fill = Color32::from_rgb(51, 65, 85);
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::from_rgb(248, 250, 252));

    // Inactive widgets are darker
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(30, 41, 59);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(203, 213, 225));

    // Selected items pick up the indigo accent
    visuals.selection.bg_fill = Color32::from_rgb(67, 56, 202);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    visuals.hyperlink_color = Color32::from_rgb(129, 140, 248);

    // Rounded corners for everything
    let rounding = Rounding::same(4.0);
    visuals.window_rounding = rounding;
    visuals.menu_rounding = rounding;

    visuals
}

fn light_visuals() -> Visuals {
    let mut visuals = Visuals::light();

    visuals.panel_fill = Color32::WHITE;
    visuals.window_fill = Color32::from_rgb(248, 250, 252);

    visuals.selection.bg_fill = Color32::from_rgb(224, 231, 255);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    visuals.hyperlink_color = Color32::from_rgb(79, 70, 229);

    let rounding = Rounding::same(4.0);
    visuals.window_rounding = rounding;
    visuals.menu_rounding = rounding;

    visuals
}
