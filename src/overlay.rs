// Tooltip overlays: small absolutely-positioned boxes showing each element's
// conversion, toggled from the extension toolbar.

use crate::config::Settings;

/// Rendering backend for overlays (the live page in wasm builds).
pub trait OverlayHost {
    type Target;
    type Handle;

    /// Elements carrying both the converted marker and a tooltip, with that tooltip text.
    fn tooltip_targets(&self, settings: &Settings) -> Vec<(Self::Target, String)>;

    /// False for targets that are not laid out (hidden, display:none, detached).
    fn is_displayed(&self, target: &Self::Target) -> bool;

    fn render(&mut self, target: &Self::Target, text: &str, style: &OverlayStyle)
        -> Option<Self::Handle>;

    fn remove(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub background: String,
    pub color: String,
    pub padding: String,
    pub border_radius: String,
    pub font_size: String,
    pub z_index: i32,
    /// Pixels the overlay is raised above the target's top edge
    pub lift: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            background: "rgba(0,0,0,0.8)".to_string(),
            color: "#fff".to_string(),
            padding: "2px 4px".to_string(),
            border_radius: "3px".to_string(),
            font_size: "12px".to_string(),
            z_index: 10000,
            lift: 4.0,
        }
    }
}

impl OverlayStyle {
    /// CSS declarations for the overlay box, minus its position.
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        vec![
            ("position", "absolute".to_string()),
            ("background", self.background.clone()),
            ("color", self.color.clone()),
            ("padding", self.padding.clone()),
            ("border-radius", self.border_radius.clone()),
            ("font-size", self.font_size.clone()),
            ("pointer-events", "none".to_string()),
            ("z-index", self.z_index.to_string()),
        ]
    }

    /// Full declarations for an overlay over a target whose top-left corner is
    /// at (`top`, `left`) in page coordinates.
    pub fn placed_declarations(&self, top: f64, left: f64) -> Vec<(&'static str, String)> {
        let mut decls = self.declarations();
        decls.push(("top", format!("{}px", top - self.lift)));
        decls.push(("left", format!("{}px", left)));
        decls
    }
}

/// Owns the overlays currently on screen.
pub struct OverlayManager<H: OverlayHost> {
    handles: Vec<H::Handle>,
    visible: bool,
    style: OverlayStyle,
}

impl<H: OverlayHost> Default for OverlayManager<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: OverlayHost> OverlayManager<H> {
    pub fn new() -> Self {
        Self::with_style(OverlayStyle::default())
    }

    pub fn with_style(style: OverlayStyle) -> Self {
        Self {
            handles: Vec::new(),
            visible: false,
            style,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn overlay_count(&self) -> usize {
        self.handles.len()
    }

    /// Render an overlay for every displayed target. Calling it again while
    /// visible replaces the overlays instead of stacking a second set.
    pub fn show(&mut self, host: &mut H, settings: &Settings) -> usize {
        if self.visible {
            self.hide(host);
        }

        for (target, text) in host.tooltip_targets(settings) {
            if !host.is_displayed(&target) {
                continue;
            }
            if let Some(handle) = host.render(&target, &text, &self.style) {
                self.handles.push(handle);
            }
        }

        self.visible = true;
        tracing::debug!(overlays = self.handles.len(), "tooltips shown");
        self.handles.len()
    }

    pub fn hide(&mut self, host: &mut H) {
        while let Some(handle) = self.handles.pop() {
            host.remove(handle);
        }
        self.visible = false;
    }

    /// Returns the new visibility.
    pub fn toggle(&mut self, host: &mut H, settings: &Settings) -> bool {
        if self.visible {
            self.hide(host);
        } else {
            self.show(host, settings);
        }
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingHost {
        // (id, tooltip, displayed)
        targets: Vec<(u32, String, bool)>,
        rendered: Vec<(u32, String)>,
        next_handle: u32,
        live: Vec<u32>,
    }

    impl OverlayHost for RecordingHost {
        type Target = u32;
        type Handle = u32;

        fn tooltip_targets(&self, _settings: &Settings) -> Vec<(u32, String)> {
            self.targets
                .iter()
                .map(|(id, text, _)| (*id, text.clone()))
                .collect()
        }

        fn is_displayed(&self, target: &u32) -> bool {
            self.targets
                .iter()
                .any(|(id, _, displayed)| id == target && *displayed)
        }

        fn render(&mut self, target: &u32, text: &str, _style: &OverlayStyle) -> Option<u32> {
            self.rendered.push((*target, text.to_string()));
            self.next_handle += 1;
            self.live.push(self.next_handle);
            Some(self.next_handle)
        }

        fn remove(&mut self, handle: u32) {
            self.live.retain(|h| *h != handle);
        }
    }

    fn host() -> RecordingHost {
        RecordingHost {
            targets: vec![
                (1, "2 in = 50.80 mm".to_string(), true),
                (2, "3 ft = 0.91 m".to_string(), false),
                (3, "1/2\" = 12.70 mm".to_string(), true),
            ],
            ..RecordingHost::default()
        }
    }

    #[test]
    fn test_show_skips_hidden_targets() {
        let mut host = host();
        let mut overlays = OverlayManager::new();
        assert_eq!(overlays.show(&mut host, &Settings::default()), 2);
        assert!(overlays.is_visible());
        assert_eq!(
            host.rendered,
            vec![
                (1, "2 in = 50.80 mm".to_string()),
                (3, "1/2\" = 12.70 mm".to_string())
            ]
        );
    }

    #[test]
    fn test_hide_drains_everything() {
        let mut host = host();
        let mut overlays = OverlayManager::new();
        overlays.show(&mut host, &Settings::default());
        overlays.hide(&mut host);
        assert!(!overlays.is_visible());
        assert_eq!(overlays.overlay_count(), 0);
        assert!(host.live.is_empty());

        // hiding again is harmless
        overlays.hide(&mut host);
        assert!(host.live.is_empty());
    }

    #[test]
    fn test_show_twice_does_not_stack() {
        let mut host = host();
        let mut overlays = OverlayManager::new();
        overlays.show(&mut host, &Settings::default());
        overlays.show(&mut host, &Settings::default());
        assert_eq!(overlays.overlay_count(), 2);
        assert_eq!(host.live.len(), 2);
    }

    #[test]
    fn test_toggle() {
        let mut host = host();
        let mut overlays = OverlayManager::new();
        let settings = Settings::default();
        assert!(overlays.toggle(&mut host, &settings));
        assert_eq!(host.live.len(), 2);
        assert!(!overlays.toggle(&mut host, &settings));
        assert!(host.live.is_empty());
        assert!(overlays.toggle(&mut host, &settings));
        assert_eq!(host.live.len(), 2);
    }

    #[test]
    fn test_style_declarations() {
        let decls = OverlayStyle::default().declarations();
        assert!(decls.contains(&("position", "absolute".to_string())));
        assert!(decls.contains(&("pointer-events", "none".to_string())));
        assert!(decls.contains(&("z-index", "10000".to_string())));
    }

    #[test]
    fn test_placed_declarations_lift_above_target() {
        let decls = OverlayStyle::default().placed_declarations(120.0, 35.5);
        assert!(decls.contains(&("top", "116px".to_string())));
        assert!(decls.contains(&("left", "35.5px".to_string())));
        assert!(decls.contains(&("position", "absolute".to_string())));
    }
}
