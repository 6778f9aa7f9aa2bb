use egui::{Color32, Id, Pos2, Rect, RichText, Sense, Vec2};
use rolestage_tools::{FrameStats, Panel, StatsMode, stats::PANEL_HISTORY};

pub const STATS_AREA_ID: &str = "stats";

const GRAPH_HEIGHT: f32 = 30.0;

fn palette(mode: StatsMode) -> (Color32, Color32) {
    match mode {
        StatsMode::Fps => (Color32::from_rgb(0x00, 0xff, 0xff), Color32::from_rgb(0x00, 0x00, 0x22)),
        StatsMode::Ms => (Color32::from_rgb(0x00, 0xff, 0x00), Color32::from_rgb(0x00, 0x22, 0x00)),
    }
}

/// Bar height in points for one sample, clamped to the graph.
fn bar_height(value: f32, graph_max: f32, height: f32) -> f32 {
    if graph_max <= 0.0 {
        return 0.0;
    }
    (value / graph_max).clamp(0.0, 1.0) * height
}

fn sparkline(ui: &mut egui::Ui, panel: &Panel, fg: Color32) {
    let (rect, _) = ui.allocate_exact_size(Vec2::new(PANEL_HISTORY as f32, GRAPH_HEIGHT), Sense::hover());
    let painter = ui.painter();
    painter.rect_filled(rect, 0.0, fg.gamma_multiply(0.2));

    // Newest sample on the right edge.
    let offset = PANEL_HISTORY - panel.sample_count();
    for (i, value) in panel.history().enumerate() {
        let x = rect.left() + (offset + i) as f32;
        let top = rect.bottom() - bar_height(value, panel.graph_max, rect.height());
        painter.rect_filled(
            Rect::from_min_max(Pos2::new(x, top), Pos2::new(x + 1.0, rect.bottom())),
            0.0,
            fg,
        );
    }
}

/// Draw the active stats panel in the top-left corner. Clicking it cycles
/// between FPS and MS.
pub fn draw_stats(ctx: &egui::Context, stats: &mut FrameStats) {
    let mode = stats.mode();
    let (fg, bg) = palette(mode);
    let panel = stats.panel();

    let area = egui::Area::new(Id::new(STATS_AREA_ID))
        .anchor(egui::Align2::LEFT_TOP, Vec2::ZERO)
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(bg)
                .inner_margin(egui::Margin::same(3))
                .show(ui, |ui| {
                    ui.label(RichText::new(panel.label()).monospace().size(10.0).color(fg));
                    sparkline(ui, panel, fg);
                });
        });

    if area.response.interact(Sense::click()).clicked() {
        stats.cycle_mode();
        tracing::debug!("stats overlay: {:?}", stats.mode());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn bars_clamp_to_graph() {
        assert_eq!(bar_height(50.0, 100.0, 30.0), 15.0);
        assert_eq!(bar_height(250.0, 100.0, 30.0), 30.0);
        assert_eq!(bar_height(-1.0, 100.0, 30.0), 0.0);
        assert_eq!(bar_height(10.0, 0.0, 30.0), 0.0);
    }

    #[test]
    fn palettes_differ_per_mode() {
        assert_ne!(palette(StatsMode::Fps).0, palette(StatsMode::Ms).0);
    }

    #[test]
    fn draws_headless_without_changing_mode() {
        let ctx = egui::Context::default();
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        for i in 1..=10 {
            stats.update(start + Duration::from_millis(16 * i));
        }
        for _ in 0..2 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| draw_stats(ctx, &mut stats));
        }
        assert_eq!(stats.mode(), StatsMode::Fps);
    }
}
