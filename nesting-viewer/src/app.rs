//! Main application state and eframe integration.

use std::path::PathBuf;
use std::sync::Arc;

use egui::{CentralPanel, Context, Key, Modifiers, SidePanel, TopBottomPanel, Vec2};
use nesting_core::generator::{
    layout_pages, render_dxf, render_svg, screen_scene, BarScene, PrintBar, Rect as SceneRect,
    SCREEN_PADDING,
};
use nesting_core::model::{EndCut, PartSpan};
use nesting_core::{parse_report_file, Layout, LayoutCache, Pattern, ResolverConfig};

use crate::canvas::{self, Highlight};
use crate::layers::LayerVisibility;
use crate::theme;
use crate::transform::ViewTransform;

/// Print export target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Svg,
    Dxf,
}

/// Main application state.
pub struct ViewerApp {
    /// Loaded patterns, in report order
    patterns: Vec<Pattern>,
    /// Currently displayed pattern index
    current_pattern: usize,
    /// Path to the loaded file
    file_path: Option<PathBuf>,

    /// Resolver thresholds, editable from the inspector
    config: ResolverConfig,
    /// Layouts already resolved for this file
    cache: LayoutCache,
    /// Layout of the current pattern
    layout: Option<Arc<Layout>>,

    /// View transformation (pan/zoom)
    transform: ViewTransform,
    /// Layer visibility toggles
    layers: LayerVisibility,

    /// Show the inspector panel
    show_inspector: bool,
    /// Status message
    status_message: String,

    /// Error message to display
    error_message: Option<String>,

    /// Current mouse position in scene coordinates
    mouse_scene_pos: Option<nesting_core::generator::Point>,

    /// Index of span currently being hovered
    hovered_span: Option<usize>,

    /// Index of currently selected span
    selected_span: Option<usize>,

    /// Show keyboard shortcuts help dialog
    show_shortcuts_dialog: bool,

    /// Show about dialog
    show_about_dialog: bool,

    /// Canvas rect from last frame
    last_canvas_rect: Option<egui::Rect>,
}

impl ViewerApp {
    /// Create a new viewer application.
    pub fn new(_cc: &eframe::CreationContext<'_>, initial_file: Option<PathBuf>) -> Self {
        let mut app = Self {
            patterns: Vec::new(),
            current_pattern: 0,
            file_path: None,
            config: ResolverConfig::default(),
            cache: LayoutCache::new(),
            layout: None,
            transform: ViewTransform::default(),
            layers: LayerVisibility::default(),
            show_inspector: true,
            status_message: "No file loaded. Use File > Open or Ctrl+O".to_string(),
            error_message: None,
            mouse_scene_pos: None,
            hovered_span: None,
            selected_span: None,
            show_shortcuts_dialog: false,
            show_about_dialog: false,
            last_canvas_rect: None,
        };

        // Load initial file if provided
        if let Some(path) = initial_file {
            app.load_file(path);
        }

        app
    }

    /// Load a nesting report.
    fn load_file(&mut self, path: PathBuf) {
        match parse_report_file(&path) {
            Ok(report) => {
                let patterns = report.patterns();
                let num_patterns = patterns.len();
                let total_parts: usize = patterns.iter().map(|p| p.parts.len()).sum();

                self.patterns = patterns;
                self.file_path = Some(path.clone());
                self.error_message = None;
                self.cache.clear();
                self.select_pattern(0);

                self.status_message = format!(
                    "Loaded: {} | {} bar(s) | {} parts",
                    path.file_name()
                        .map(|s| s.to_string_lossy().to_string())
                        .unwrap_or_default(),
                    num_patterns,
                    total_parts
                );

                tracing::info!("Loaded {} with {} patterns", path.display(), num_patterns);
            }
            Err(e) => {
                self.error_message = Some(format!("Failed to load file: {}", e));
                self.status_message = "Error loading file".to_string();
                tracing::error!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    /// Open file dialog and load selected file.
    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Nesting Reports", &["json", "JSON"])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.load_file(path);
        }
    }

    /// Switch to a pattern and resolve its layout.
    fn select_pattern(&mut self, index: usize) {
        self.current_pattern = index;
        self.selected_span = None;
        self.hovered_span = None;
        self.transform.reset();
        self.refresh_layout();
    }

    /// Re-resolve the current pattern with the current thresholds.
    fn refresh_layout(&mut self) {
        self.layout = self
            .patterns
            .get(self.current_pattern)
            .map(|pattern| self.cache.resolve(pattern, &self.config));
        if let Some(layout) = &self.layout {
            if self.selected_span.is_some_and(|i| i >= layout.spans.len()) {
                self.selected_span = None;
            }
        }
    }

    fn current_pattern(&self) -> Option<&Pattern> {
        self.patterns.get(self.current_pattern)
    }

    /// Print all bars to a file chosen by the user.
    fn export_pages(&mut self, format: ExportFormat) {
        if self.patterns.is_empty() {
            self.error_message = Some("No file loaded to export".to_string());
            return;
        }

        let (label, extension) = match format {
            ExportFormat::Svg => ("SVG Drawing", "svg"),
            ExportFormat::Dxf => ("DXF Drawing", "dxf"),
        };
        let default_name = self
            .file_path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| format!("{}.{}", s.to_string_lossy(), extension))
            .unwrap_or_else(|| format!("nesting.{}", extension));

        let Some(save_path) = rfd::FileDialog::new()
            .add_filter(label, &[extension])
            .set_file_name(&default_name)
            .save_file()
        else {
            return;
        };

        let layouts: Vec<Arc<Layout>> = self
            .patterns
            .iter()
            .map(|pattern| self.cache.resolve(pattern, &self.config))
            .collect();
        let captions: Vec<String> = self
            .patterns
            .iter()
            .enumerate()
            .map(|(i, pattern)| pattern_title(pattern, i))
            .collect();
        let bars: Vec<PrintBar> = captions
            .iter()
            .zip(&layouts)
            .map(|(caption, layout)| PrintBar {
                caption,
                layout: layout.as_ref(),
            })
            .collect();

        let pages = layout_pages(&bars);
        let content = match format {
            ExportFormat::Svg => render_svg(&pages),
            ExportFormat::Dxf => render_dxf(&pages),
        };

        match std::fs::write(&save_path, content) {
            Ok(()) => {
                self.status_message = format!(
                    "Exported {} page(s) to {}",
                    pages.len(),
                    save_path.display()
                );
                tracing::info!("Exported {} to {}", extension, save_path.display());
            }
            Err(e) => {
                self.error_message = Some(format!("Failed to save {}: {}", label, e));
                tracing::error!("Failed to save {}: {}", save_path.display(), e);
            }
        }
    }

    /// Scene for the current layout at the given canvas size.
    fn scene_for(&self, canvas_rect: egui::Rect) -> Option<BarScene> {
        let layout = self.layout.as_ref()?;
        let canvas = SceneRect::new(
            0.0,
            0.0,
            canvas_rect.width() as f64,
            canvas_rect.height() as f64,
        );
        Some(screen_scene(layout, canvas, SCREEN_PADDING))
    }

    /// Render the menu bar.
    fn render_menu(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                // File menu
                ui.menu_button("File", |ui| {
                    if ui.button("Open... (Ctrl+O)").clicked() {
                        self.open_file_dialog();
                        ui.close_menu();
                    }
                    ui.separator();
                    let has_patterns = !self.patterns.is_empty();
                    if ui
                        .add_enabled(has_patterns, egui::Button::new("Export SVG... (Ctrl+E)"))
                        .clicked()
                    {
                        self.export_pages(ExportFormat::Svg);
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(has_patterns, egui::Button::new("Export DXF..."))
                        .clicked()
                    {
                        self.export_pages(ExportFormat::Dxf);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit (Ctrl+Q)").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                // View menu
                ui.menu_button("View", |ui| {
                    if ui.button("Fit to Window (F)").clicked() {
                        self.transform.reset();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Show All Layers").clicked() {
                        self.layers.show_all();
                        ui.close_menu();
                    }
                    if ui.button("Parts Only").clicked() {
                        self.layers.minimal();
                        ui.close_menu();
                    }
                    ui.separator();
                    ui.checkbox(&mut self.show_inspector, "Inspector Panel");
                });

                // Help menu
                ui.menu_button("Help", |ui| {
                    if ui.button("Keyboard Shortcuts (?)").clicked() {
                        self.show_shortcuts_dialog = true;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("About").clicked() {
                        self.show_about_dialog = true;
                        ui.close_menu();
                    }
                });
            });
        });
    }

    /// Render the pattern list.
    fn render_pattern_list(&mut self, ctx: &Context) {
        if self.patterns.is_empty() {
            return;
        }

        let mut clicked = None;
        SidePanel::left("patterns")
            .min_width(180.0)
            .max_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Bars");
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (i, pattern) in self.patterns.iter().enumerate() {
                        let selected = i == self.current_pattern;
                        if ui
                            .selectable_label(selected, pattern_title(pattern, i))
                            .clicked()
                        {
                            clicked = Some(i);
                        }
                    }
                });
            });

        if let Some(i) = clicked {
            self.select_pattern(i);
        }
    }

    /// Render the inspector side panel.
    fn render_inspector(&mut self, ctx: &Context) {
        if !self.show_inspector {
            return;
        }

        let mut config_changed = false;
        SidePanel::right("inspector")
            .min_width(220.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                ui.heading("Inspector");
                ui.separator();

                if let Some(pattern) = self.current_pattern() {
                    ui.collapsing("Bar", |ui| {
                        ui.label(format!(
                            "Profile: {}",
                            pattern.profile_name.as_deref().unwrap_or("-")
                        ));
                        match pattern.stock_length_mm() {
                            Some(stock) => ui.label(format!("Stock: {:.1} mm", stock)),
                            None => ui.label("Stock: missing"),
                        };
                        ui.label(format!("Parts: {}", pattern.parts.len()));
                        match pattern.waste_mm() {
                            Some(waste) => ui.label(format!("Waste: {:.1} mm", waste)),
                            None => ui.label(format!("Waste: invalid ({})", pattern.waste)),
                        };
                        ui.label(format!(
                            "Utilization: {:.1}%",
                            pattern.utilization() * 100.0
                        ));
                    });
                    ui.separator();
                }

                if let Some(layout) = &self.layout {
                    ui.collapsing("Layout", |ui| {
                        match layout.marker {
                            Some(marker) => ui.label(format!("Marker: {}", marker)),
                            None => ui.label(format!("Spans: {}", layout.spans.len())),
                        };
                        ui.label(format!("Cuts: {}", layout.boundaries.len()));
                        ui.label(format!("Sloped cuts: {}", layout.sloped_count()));
                        for warning in &layout.warnings {
                            ui.colored_label(theme::WARNING_TEXT, warning.to_string());
                        }
                        for diagnostic in &layout.diagnostics {
                            ui.colored_label(
                                theme::WARNING_TEXT,
                                format!("Part {}: {}", diagnostic.part_index + 1, diagnostic.message),
                            );
                        }
                    });
                    ui.separator();

                    // Selected span info
                    if let Some(span) = self.selected_span.and_then(|i| layout.spans.get(i)) {
                        render_span_details(ui, span);
                        if ui.button("Clear Selection (Esc)").clicked() {
                            self.selected_span = None;
                        }
                        ui.separator();
                    }
                }

                ui.collapsing("Thresholds", |ui| {
                    let fields = [
                        ("Near straight", &mut self.config.near_straight_deg),
                        ("Negligible miter", &mut self.config.negligible_miter_deg),
                        ("Match tolerance", &mut self.config.match_tolerance_deg),
                        ("Two-sided min", &mut self.config.two_sided_min_deg),
                        ("Anchor straight", &mut self.config.anchor_straight_deg),
                    ];
                    egui::Grid::new("thresholds_grid")
                        .num_columns(2)
                        .show(ui, |ui| {
                            for (label, value) in fields {
                                ui.label(label);
                                let drag = egui::DragValue::new(value)
                                    .speed(0.1)
                                    .range(0.0..=45.0)
                                    .suffix("°");
                                config_changed |= ui.add(drag).changed();
                                ui.end_row();
                            }
                        });
                    if ui.button("Defaults").clicked() {
                        self.config = ResolverConfig::default();
                        config_changed = true;
                    }
                });

                ui.separator();

                // Layer controls
                ui.collapsing("Layers", |ui| {
                    ui.checkbox(&mut self.layers.bar, "Bar (1)");
                    ui.checkbox(&mut self.layers.parts, "Parts (2)");
                    ui.checkbox(&mut self.layers.cuts, "Cuts (3)");
                    ui.checkbox(&mut self.layers.labels, "Labels (4)");
                    ui.checkbox(&mut self.layers.angles, "Angles (5)");
                    ui.checkbox(&mut self.layers.waste, "Waste (6)");
                    ui.checkbox(&mut self.layers.warnings, "Warnings (7)");
                });

                ui.separator();

                // View info
                ui.label(format!("Zoom: {}", self.transform.zoom_percent()));
            });

        if config_changed {
            tracing::debug!("Resolver thresholds changed: {:?}", self.config);
            self.refresh_layout();
        }
    }

    /// Render the status bar.
    fn render_status_bar(&mut self, ctx: &Context) {
        let mut navigate_to = None;
        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status_message);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(self.transform.zoom_percent());

                    // Show position along the bar in mm
                    if let (Some(pos), Some(canvas_rect)) =
                        (self.mouse_scene_pos, self.last_canvas_rect)
                    {
                        if let Some(mm) = self.position_mm(pos.x, canvas_rect) {
                            ui.separator();
                            ui.label(format!("{:.1} mm", mm));
                        }
                    }

                    // Pattern navigation
                    if self.patterns.len() > 1 {
                        ui.separator();

                        // Next button (drawn first due to right-to-left layout)
                        let next_enabled = self.current_pattern < self.patterns.len() - 1;
                        if ui
                            .add_enabled(next_enabled, egui::Button::new("▶"))
                            .on_hover_text("Next bar (Page Down)")
                            .clicked()
                        {
                            navigate_to = Some(self.current_pattern + 1);
                        }

                        ui.label(format!(
                            "{} / {}",
                            self.current_pattern + 1,
                            self.patterns.len()
                        ));

                        let prev_enabled = self.current_pattern > 0;
                        if ui
                            .add_enabled(prev_enabled, egui::Button::new("◀"))
                            .on_hover_text("Previous bar (Page Up)")
                            .clicked()
                        {
                            navigate_to = Some(self.current_pattern - 1);
                        }

                        ui.separator();
                        ui.label("Bar:");
                    }
                });
            });
        });

        if let Some(i) = navigate_to {
            self.select_pattern(i);
        }
    }

    /// Position along the stock bar under a scene x coordinate, in mm.
    fn position_mm(&self, scene_x: f64, canvas_rect: egui::Rect) -> Option<f64> {
        let layout = self.layout.as_ref()?;
        if !layout.is_renderable() {
            return None;
        }
        let bar = self.scene_for(canvas_rect)?.bar;
        let fraction = (scene_x - bar.x) / bar.width;
        (0.0..=nesting_core::generator::scene::layout_extent(layout))
            .contains(&fraction)
            .then(|| fraction * layout.stock_length_mm)
    }

    /// Render the main canvas.
    fn render_canvas(&mut self, ctx: &Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(theme::CANVAS_BG))
            .show(ctx, |ui| {
                // Handle keyboard shortcuts
                self.handle_keyboard(ctx);

                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
                let canvas_rect = response.rect;
                self.last_canvas_rect = Some(canvas_rect);

                // Handle pan (middle mouse or right mouse drag)
                if response.dragged_by(egui::PointerButton::Middle)
                    || response.dragged_by(egui::PointerButton::Secondary)
                {
                    self.transform.pan(response.drag_delta());
                }

                // Handle zoom (scroll wheel)
                let scroll_delta = ctx.input(|i| i.raw_scroll_delta);
                if scroll_delta.y != 0.0 {
                    if let Some(hover_pos) = response.hover_pos() {
                        let factor = if scroll_delta.y > 0.0 {
                            ViewTransform::ZOOM_FACTOR
                        } else {
                            1.0 / ViewTransform::ZOOM_FACTOR
                        };
                        self.transform.zoom_at(hover_pos, canvas_rect, factor);
                    }
                }

                // Track mouse position in scene coordinates
                self.mouse_scene_pos = response
                    .hover_pos()
                    .map(|screen_pos| self.transform.screen_to_scene(screen_pos, canvas_rect));

                let Some(scene) = self.scene_for(canvas_rect) else {
                    // Show placeholder text
                    painter.text(
                        canvas_rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "No file loaded\n\nUse File > Open or Ctrl+O",
                        egui::FontId::proportional(20.0),
                        theme::DIM_TEXT,
                    );
                    return;
                };

                // Detect hovered span
                self.hovered_span = self
                    .mouse_scene_pos
                    .and_then(|pos| canvas::span_at(&scene, pos));

                // Handle click to select span
                if response.clicked() {
                    self.selected_span = self.hovered_span;
                }

                canvas::render_scene(
                    &painter,
                    &scene,
                    &self.transform,
                    canvas_rect,
                    &self.layers,
                    Highlight {
                        hovered: self.hovered_span,
                        selected: self.selected_span,
                    },
                );
            });
    }

    /// Handle keyboard shortcuts.
    fn handle_keyboard(&mut self, ctx: &Context) {
        let mut open = false;
        let mut export = false;
        let mut navigate_to = None;

        ctx.input(|i| {
            // Ctrl+O: Open file
            if i.modifiers.ctrl && i.key_pressed(Key::O) {
                open = true;
            }

            // Ctrl+Q: Quit
            if i.modifiers.ctrl && i.key_pressed(Key::Q) {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }

            // Ctrl+E: Export SVG
            if i.modifiers.ctrl && i.key_pressed(Key::E) {
                export = true;
            }

            // ?: Show keyboard shortcuts
            if i.key_pressed(Key::Questionmark) || (i.modifiers.shift && i.key_pressed(Key::Slash))
            {
                self.show_shortcuts_dialog = true;
            }

            // F / Home: Fit to window
            if (i.key_pressed(Key::F) && i.modifiers == Modifiers::NONE) || i.key_pressed(Key::Home)
            {
                self.transform.reset();
            }

            if let Some(canvas_rect) = self.last_canvas_rect {
                // +/=: Zoom in
                if i.key_pressed(Key::Plus) || i.key_pressed(Key::Equals) {
                    self.transform
                        .zoom_centered(canvas_rect, ViewTransform::ZOOM_FACTOR);
                }

                // -: Zoom out
                if i.key_pressed(Key::Minus) {
                    self.transform
                        .zoom_centered(canvas_rect, 1.0 / ViewTransform::ZOOM_FACTOR);
                }
            }

            // Page Up/Down: Navigate patterns
            if i.key_pressed(Key::PageUp) && self.current_pattern > 0 {
                navigate_to = Some(self.current_pattern - 1);
            }
            if i.key_pressed(Key::PageDown) && self.current_pattern + 1 < self.patterns.len() {
                navigate_to = Some(self.current_pattern + 1);
            }

            // Escape: Clear selection
            if i.key_pressed(Key::Escape) {
                self.selected_span = None;
                self.show_shortcuts_dialog = false;
                self.show_about_dialog = false;
            }

            // Number keys for layer toggles
            let toggles = [
                (Key::Num1, &mut self.layers.bar),
                (Key::Num2, &mut self.layers.parts),
                (Key::Num3, &mut self.layers.cuts),
                (Key::Num4, &mut self.layers.labels),
                (Key::Num5, &mut self.layers.angles),
                (Key::Num6, &mut self.layers.waste),
                (Key::Num7, &mut self.layers.warnings),
            ];
            for (key, layer) in toggles {
                if i.key_pressed(key) {
                    *layer = !*layer;
                }
            }
        });

        // File dialogs block, so run them outside the input lock
        if open {
            self.open_file_dialog();
        }
        if export {
            self.export_pages(ExportFormat::Svg);
        }
        if let Some(i) = navigate_to {
            self.select_pattern(i);
        }
    }

    /// Show error dialog if there's an error.
    fn show_error_dialog(&mut self, ctx: &Context) {
        if let Some(error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(&error);
                    ui.separator();
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }
    }

    /// Show keyboard shortcuts help dialog.
    fn show_shortcuts_help(&mut self, ctx: &Context) {
        if !self.show_shortcuts_dialog {
            return;
        }

        const SHORTCUTS: &[(&str, &[(&str, &str)])] = &[
            (
                "File",
                &[
                    ("Ctrl+O", "Open file"),
                    ("Ctrl+E", "Export SVG"),
                    ("Ctrl+Q", "Quit"),
                ],
            ),
            (
                "Navigation",
                &[
                    ("Scroll", "Zoom in/out"),
                    ("Middle/Right drag", "Pan view"),
                    ("F / Home", "Fit to window"),
                    ("+/-", "Zoom in/out"),
                    ("Page Up/Down", "Previous/next bar"),
                ],
            ),
            (
                "Selection",
                &[("Click", "Select part"), ("Escape", "Clear selection")],
            ),
            (
                "Layers",
                &[
                    ("1", "Toggle bar"),
                    ("2", "Toggle parts"),
                    ("3", "Toggle cuts"),
                    ("4", "Toggle labels"),
                    ("5", "Toggle angles"),
                    ("6", "Toggle waste"),
                    ("7", "Toggle warnings"),
                ],
            ),
        ];

        egui::Window::new("Keyboard Shortcuts")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                egui::Grid::new("shortcuts_grid")
                    .num_columns(2)
                    .spacing([20.0, 4.0])
                    .show(ui, |ui| {
                        for (section, entries) in SHORTCUTS {
                            ui.strong(*section);
                            ui.end_row();
                            for (key, action) in *entries {
                                ui.label(*key);
                                ui.label(*action);
                                ui.end_row();
                            }
                            ui.end_row();
                        }
                    });

                ui.separator();
                if ui.button("Close").clicked() {
                    self.show_shortcuts_dialog = false;
                }
            });
    }

    /// Show about dialog.
    fn show_about(&mut self, ctx: &Context) {
        if !self.show_about_dialog {
            return;
        }

        egui::Window::new("About Nesting Viewer")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.heading("Nesting Viewer");
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.separator();
                ui.label("A viewer for steel bar cutting patterns.");
                ui.label("");
                ui.label("Built with egui/eframe");
                ui.separator();
                if ui.button("Close").clicked() {
                    self.show_about_dialog = false;
                }
            });
    }

    /// Show tooltip for hovered span.
    fn show_span_tooltip(&self, ctx: &Context) {
        let Some(idx) = self.hovered_span else {
            return;
        };
        // Selected span details are in the inspector
        if self.selected_span == Some(idx) {
            return;
        }
        let Some(span) = self.layout.as_ref().and_then(|l| l.spans.get(idx)) else {
            return;
        };

        egui::show_tooltip_at_pointer(
            ctx,
            egui::LayerId::new(egui::Order::Tooltip, egui::Id::new("span_tooltip_layer")),
            egui::Id::new("span_tooltip"),
            |ui| {
                ui.strong(span.name.as_str());
                ui.label(format!("{:.1} mm", span.length_mm));
                ui.label(format!(
                    "{} / {}",
                    describe_end(span.geometry.left()),
                    describe_end(span.geometry.right())
                ));
            },
        );
    }
}

/// Side panel and caption title for a pattern.
fn pattern_title(pattern: &Pattern, index: usize) -> String {
    let profile = pattern.profile_name.as_deref().unwrap_or("?");
    match pattern.stock_length_mm() {
        Some(stock) => format!("#{} {} | {:.0} mm", index + 1, profile, stock),
        None => format!("#{} {}", index + 1, profile),
    }
}

/// Short description of a drawn end cut.
fn describe_end(end: &EndCut) -> String {
    if end.cut.is_straight() {
        match end.measured_deviation_deg {
            Some(dev) if dev > 0.0 => format!("straight ({:.1}°)", dev),
            _ => "straight".to_string(),
        }
    } else {
        format!("{:.1}°", end.cut.deviation())
    }
}

fn render_span_details(ui: &mut egui::Ui, span: &PartSpan) {
    ui.heading(format!("{} (part {})", span.name, span.part_index + 1));
    ui.separator();
    ui.label(format!("Length: {:.1} mm", span.length_mm));
    ui.label(format!("Left end: {}", describe_end(span.geometry.left())));
    ui.label(format!("Right end: {}", describe_end(span.geometry.right())));
    if span.geometry.flipped {
        ui.label("Drawn reversed");
    }
    if span.complementary {
        ui.label("Complementary pair");
    }
    ui.separator();
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.render_menu(ctx);
        self.render_pattern_list(ctx);
        self.render_inspector(ctx);
        self.render_status_bar(ctx);
        self.render_canvas(ctx);
        self.show_error_dialog(ctx);
        self.show_shortcuts_help(ctx);
        self.show_about(ctx);
        self.show_span_tooltip(ctx);

        // Only repaint on interaction
        if ctx.input(|i| {
            i.pointer.is_moving() || i.pointer.any_down() || i.raw_scroll_delta != egui::Vec2::ZERO
        }) {
            ctx.request_repaint();
        }
    }
}
