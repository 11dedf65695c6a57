//! The parameter panel.
//!
//! Sliders and color pickers edit a draft copy of the parameters. The draft
//! becomes a commit only once the user lets go: while a slider is dragged or
//! a text field is focused, the live parameters and the displayed galaxy stay
//! untouched. Every commit triggers one regeneration.

use crate::params::{Control, ParameterSet, Rgb};

/// Tracks whether the draft has uncommitted edits and decides when they
/// become a commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitGate {
    dirty: bool,
}

impl CommitGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame of widget state.
    ///
    /// `changed` is whether any value changed this frame, `interacting`
    /// whether the pointer is still held on a widget or a widget has
    /// keyboard focus. Returns `true` on the frame the edit finishes.
    pub fn observe(&mut self, changed: bool, interacting: bool) -> bool {
        if changed {
            self.dirty = true;
        }
        if self.dirty && !interacting {
            self.dirty = false;
            return true;
        }
        false
    }

    /// Whether there are edits waiting for the user to finish.
    pub fn is_pending(&self) -> bool {
        self.dirty
    }

    pub fn clear(&mut self) {
        self.dirty = false;
    }
}

/// What the panel asks the viewer to do.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    /// Replace the live parameters and regenerate.
    Commit(ParameterSet),
    /// Regenerate with the same parameters and fresh randomness.
    Regenerate,
}

/// Read-only numbers the panel displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelStats {
    pub fps: Option<u32>,
    pub point_count: usize,
}

/// Slider panel state.
#[derive(Debug, Clone)]
pub struct ControlPanel {
    draft: ParameterSet,
    gate: CommitGate,
    visible: bool,
}

impl ControlPanel {
    pub fn new(params: &ParameterSet, visible: bool) -> Self {
        Self {
            draft: params.clone(),
            gate: CommitGate::new(),
            visible,
        }
    }

    /// Values currently shown in the widgets.
    pub fn draft(&self) -> &ParameterSet {
        &self.draft
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }

    /// Follow the live parameters unless an edit is in progress.
    pub fn sync(&mut self, live: &ParameterSet) {
        if !self.gate.is_pending() && self.draft != *live {
            self.draft = live.clone();
        }
    }

    /// Change one numeric draft value. Returns whether it changed.
    pub fn edit(&mut self, control: Control, value: f64) -> bool {
        let before = self.draft.get(control);
        self.draft.set(control, value);
        self.draft.get(control) != before
    }

    pub fn edit_color(&mut self, which: ColorSlot, color: Rgb) -> bool {
        let slot = match which {
            ColorSlot::Inside => &mut self.draft.inside_color,
            ColorSlot::Outside => &mut self.draft.outside_color,
        };
        if *slot == color {
            return false;
        }
        *slot = color;
        true
    }

    /// Close out one frame of widget state.
    pub fn finish_frame(&mut self, changed: bool, interacting: bool) -> Option<PanelAction> {
        self.gate
            .observe(changed, interacting)
            .then(|| PanelAction::Commit(self.draft.clone()))
    }

    /// Restore defaults and commit them right away.
    pub fn reset(&mut self) -> PanelAction {
        self.gate.clear();
        self.draft = ParameterSet::default();
        PanelAction::Commit(self.draft.clone())
    }

    /// Draw the panel. Does nothing while hidden.
    #[cfg(feature = "egui")]
    pub fn show(&mut self, ctx: &egui::Context, live: &ParameterSet, stats: PanelStats) -> Option<PanelAction> {
        if !self.visible {
            return None;
        }
        self.sync(live);

        let mut changed = false;
        let mut reset = false;
        let mut regenerate = false;

        egui::Window::new("Galaxy")
            .default_pos([10.0, 10.0])
            .default_width(260.0)
            .resizable(false)
            .show(ctx, |ui| {
                match stats.fps {
                    Some(fps) => ui.label(format!("{} fps", fps)),
                    None => ui.label("-- fps"),
                };
                ui.label(format!("{} points", stats.point_count));

                ui.separator();
                for control in Control::ALL {
                    let bounds = control.bounds();
                    let mut value = self.draft.get(control);
                    // Snapping happens in `edit`, on absolute multiples of the step.
                    let mut slider = egui::Slider::new(&mut value, bounds.min..=bounds.max).text(control.label());
                    if control.is_integer() {
                        slider = slider.fixed_decimals(0);
                    }
                    if ui.add(slider).changed() {
                        changed |= self.edit(control, value);
                    }
                }

                ui.separator();
                for (slot, label) in [(ColorSlot::Inside, "insideColor"), (ColorSlot::Outside, "outsideColor")] {
                    ui.horizontal(|ui| {
                        let current = match slot {
                            ColorSlot::Inside => self.draft.inside_color,
                            ColorSlot::Outside => self.draft.outside_color,
                        };
                        let mut bytes = to_srgb_bytes(current);
                        if egui::color_picker::color_edit_button_srgb(ui, &mut bytes).changed() {
                            changed |= self.edit_color(slot, from_srgb_bytes(bytes));
                        }
                        ui.label(format!("{} {}", label, current.to_hex()));
                    });
                }

                ui.separator();
                ui.horizontal(|ui| {
                    reset = ui.button("Reset").clicked();
                    regenerate = ui.button("Regenerate").clicked();
                });
                ui.label("Double-click: fullscreen, H: hide panel");
            });

        if reset {
            return Some(self.reset());
        }

        let interacting = ctx.is_using_pointer() || ctx.memory(|m| m.focused().is_some());
        let commit = self.finish_frame(changed, interacting);
        if commit.is_none() && regenerate {
            return Some(PanelAction::Regenerate);
        }
        commit
    }
}

/// Which gradient endpoint a color edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSlot {
    Inside,
    Outside,
}

#[cfg(feature = "egui")]
fn to_srgb_bytes(c: Rgb) -> [u8; 3] {
    let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [byte(c.r), byte(c.g), byte(c.b)]
}

#[cfg(feature = "egui")]
fn from_srgb_bytes(b: [u8; 3]) -> Rgb {
    Rgb::from_u32(((b[0] as u32) << 16) | ((b[1] as u32) << 8) | b[2] as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_waits_for_release() {
        let mut gate = CommitGate::new();
        // Dragging: several changes, no commit.
        assert!(!gate.observe(true, true));
        assert!(!gate.observe(true, true));
        assert!(!gate.observe(false, true));
        assert!(gate.is_pending());
        // Released: exactly one commit.
        assert!(gate.observe(false, false));
        assert!(!gate.observe(false, false));
    }

    #[test]
    fn test_gate_commits_click_without_drag() {
        let mut gate = CommitGate::new();
        assert!(gate.observe(true, false));
        assert!(!gate.is_pending());
    }

    #[test]
    fn test_drag_only_touches_draft() {
        let live = ParameterSet::default();
        let mut panel = ControlPanel::new(&live, true);

        let changed = panel.edit(Control::Branches, 7.0);
        assert!(panel.finish_frame(changed, true).is_none());
        assert_eq!(panel.draft().branches, 7);
        assert_eq!(live.branches, 3);

        // The viewer hasn't committed, so sync must not overwrite the draft.
        panel.sync(&live);
        assert_eq!(panel.draft().branches, 7);

        match panel.finish_frame(false, false) {
            Some(PanelAction::Commit(params)) => assert_eq!(params.branches, 7),
            other => panic!("expected commit, got {:?}", other),
        }
    }

    #[test]
    fn test_edit_snaps_to_step() {
        let mut panel = ControlPanel::new(&ParameterSet::default(), true);
        panel.edit(Control::Count, 12_345.0);
        assert_eq!(panel.draft().count, 12_300);
        assert!(!panel.edit(Control::Count, 12_310.0));
    }

    #[test]
    fn test_color_edit_and_reset() {
        let mut live = ParameterSet::default();
        live.branches = 9;
        let mut panel = ControlPanel::new(&live, true);

        assert!(panel.edit_color(ColorSlot::Outside, Rgb::from_u32(0x00ff00)));
        assert!(!panel.edit_color(ColorSlot::Outside, Rgb::from_u32(0x00ff00)));

        assert_eq!(panel.reset(), PanelAction::Commit(ParameterSet::default()));
        assert!(panel.finish_frame(false, false).is_none());
    }

    #[cfg(feature = "egui")]
    #[test]
    fn test_srgb_bytes_match_hex() {
        let c = Rgb::from_u32(0xff3c30);
        assert_eq!(to_srgb_bytes(c), [0xff, 0x3c, 0x30]);
        assert_eq!(from_srgb_bytes([0x1b, 0x71, 0x84]), Rgb::from_u32(0x1b7184));
    }

    #[test]
    fn test_toggle_visibility() {
        let mut panel = ControlPanel::new(&ParameterSet::default(), true);
        panel.toggle_visible();
        assert!(!panel.is_visible());
    }
}
