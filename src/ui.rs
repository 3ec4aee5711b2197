//! egui control panel
//!
//! A top status bar (active source, FPS, computed blur) and a side panel
//! with the prescription controls. Pure layout; the caller owns the state
//! and the next frame's blur radius is derived from whatever the widgets
//! left behind.

use crate::model::{format_diopters, Eye, SimParams};
use crate::source::SourceKind;

/// Slider bound for either eye, in diopters.
pub const MAX_DIOPTERS: f32 = 10.0;

/// Read-only status shown in the top bar.
pub struct StatusLine {
    /// `None` when no source could be acquired at all.
    pub source: Option<SourceKind>,
    /// Set when even the sample clip failed to load.
    pub source_error: Option<String>,
    pub fps: f64,
}

/// Message drawn over the panel area when no source could be acquired at
/// all. `None` while a source (camera or clip) is feeding the panels.
pub fn panel_overlay_text(status: &StatusLine) -> Option<String> {
    match (status.source, &status.source_error) {
        (None, Some(err)) => Some(format!("failed to load: {err}")),
        _ => None,
    }
}

pub fn draw(ctx: &egui::Context, params: &mut SimParams, status: &StatusLine) {
    egui::TopBottomPanel::top("status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label("Defocus Simulator");
            ui.separator();
            match status.source {
                Some(kind) => {
                    ui.label(format!("Source: {}", kind.label()));
                }
                None => {
                    ui.label("Source: none");
                }
            }
            ui.separator();
            ui.label(format!("FPS: {:.1}", status.fps));
            ui.separator();
            ui.label(format!("Blur: {:.2} px", params.blur_radius()));
        });
    });

    egui::SidePanel::left("controls").show(ctx, |ui| {
        ui.heading("Prescription");
        ui.separator();

        ui.label(format!("Left eye: {}", format_diopters(params.left.sphere)));
        ui.add(egui::Slider::new(&mut params.left.sphere, 0.0..=MAX_DIOPTERS).text("diopters"));

        ui.add_space(4.0);

        ui.label(format!("Right eye: {}", format_diopters(params.right.sphere)));
        ui.add(egui::Slider::new(&mut params.right.sphere, 0.0..=MAX_DIOPTERS).text("diopters"));

        ui.separator();
        ui.heading("Dominant eye");
        ui.horizontal(|ui| {
            if ui
                .selectable_label(params.dominant == Eye::Left, "Left")
                .clicked()
            {
                params.dominant = Eye::Left;
            }
            if ui
                .selectable_label(params.dominant == Eye::Right, "Right")
                .clicked()
            {
                params.dominant = Eye::Right;
            }
        });

        ui.separator();
        egui::CollapsingHeader::new("Astigmatism (approximate)").show(ui, |ui| {
            ui.label(
                "Uniform stand-in for directional blur: adds half of the \
                 cylinder's blur on top of the sphere's.",
            );
            ui.label(format!("Left cyl: {}", format_diopters(params.left.cylinder)));
            ui.add(
                egui::Slider::new(&mut params.left.cylinder, 0.0..=MAX_DIOPTERS).text("diopters"),
            );
            ui.label(format!(
                "Right cyl: {}",
                format_diopters(params.right.cylinder)
            ));
            ui.add(
                egui::Slider::new(&mut params.right.cylinder, 0.0..=MAX_DIOPTERS).text("diopters"),
            );
        });
    });

    // Both panels show frames or neither does, so one centered message
    // replaces the whole panel area.
    if let Some(message) = panel_overlay_text(status) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.colored_label(egui::Color32::RED, message);
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_only_when_nothing_loaded() {
        let mut status = StatusLine {
            source: None,
            source_error: Some("failed to read sample clip assets/sample.gif".to_string()),
            fps: 0.0,
        };
        assert_eq!(
            panel_overlay_text(&status).as_deref(),
            Some("failed to load: failed to read sample clip assets/sample.gif"),
        );

        status.source = Some(SourceKind::SampleVideo);
        status.source_error = None;
        assert_eq!(panel_overlay_text(&status), None);

        status.source = Some(SourceKind::DeviceCamera);
        assert_eq!(panel_overlay_text(&status), None);
    }
}
