//! Layer visibility controls.

/// Controls which visual layers are displayed on the canvas.
#[derive(Debug, Clone)]
pub struct LayerVisibility {
    /// Show the stock bar outline
    pub bar: bool,
    /// Show part outlines
    pub parts: bool,
    /// Show cut lines
    pub cuts: bool,
    /// Show part labels
    pub labels: bool,
    /// Show deviation labels on sloped cuts
    pub angles: bool,
    /// Show the waste span
    pub waste: bool,
    /// Show layout warnings on the canvas
    pub warnings: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            bar: true,
            parts: true,
            cuts: true,
            labels: true,
            angles: true,
            waste: true,
            warnings: true,
        }
    }
}

impl LayerVisibility {
    /// Show all layers
    pub fn show_all(&mut self) {
        *self = Self::default();
    }

    /// Hide everything except the bar and parts
    pub fn minimal(&mut self) {
        self.bar = true;
        self.parts = true;
        self.cuts = false;
        self.labels = false;
        self.angles = false;
        self.waste = false;
        self.warnings = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_then_show_all() {
        let mut layers = LayerVisibility::default();
        layers.minimal();
        assert!(layers.parts && !layers.cuts && !layers.labels);
        layers.show_all();
        assert!(layers.cuts && layers.angles && layers.waste);
    }
}
