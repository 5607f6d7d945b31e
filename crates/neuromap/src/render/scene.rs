//! Terminal scene renderer
//!
//! Orthographic projection of the laid-out graph onto a character grid:
//! connections first (heavier glyphs when highlighted), then neuron
//! markers by kind, then labels. The browser front end renders its own
//! scene; this one serves the CLI and tests.

use std::collections::HashMap;

use super::Canvas;
use crate::core::NodeKind;
use crate::graph::{highlight, GraphData};

/// Character set used for markers and connection lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphSet {
    /// Pure ASCII, maximum compatibility
    Ascii,
    /// Unicode markers, better visual quality
    #[default]
    Unicode,
}

impl GlyphSet {
    fn marker(&self, kind: NodeKind, focused: bool) -> char {
        match self {
            GlyphSet::Unicode if focused => '◉',
            GlyphSet::Unicode => match kind {
                NodeKind::Concept => '●',
                NodeKind::Principle => '◆',
                NodeKind::Question => '○',
            },
            GlyphSet::Ascii if focused => '@',
            GlyphSet::Ascii => match kind {
                NodeKind::Concept => 'O',
                NodeKind::Principle => '#',
                NodeKind::Question => '?',
            },
        }
    }

    fn edge(&self, strength: f32) -> char {
        match self {
            GlyphSet::Unicode if strength >= 0.5 => '•',
            GlyphSet::Unicode => '·',
            GlyphSet::Ascii if strength >= 0.5 => '*',
            GlyphSet::Ascii => '.',
        }
    }
}

/// Scene rendering configuration
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Canvas width in columns
    pub width: usize,
    /// Canvas height in rows; terminal cells are roughly twice as tall as
    /// wide, so half the width keeps the world square
    pub height: usize,
    /// World radius mapped onto the canvas
    pub radius: f32,
    pub glyphs: GlyphSet,
    /// Draw neuron titles beside their markers
    pub show_labels: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 72,
            height: 36,
            radius: 5.0,
            glyphs: GlyphSet::default(),
            show_labels: true,
        }
    }
}

/// Projects graph positions into a character grid
#[derive(Debug, Clone, Default)]
pub struct SceneRenderer {
    config: SceneConfig,
}

impl SceneRenderer {
    /// Renderer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer with a custom configuration
    pub fn with_config(config: SceneConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Render the graph, radiating highlight from `focus` if given
    ///
    /// The projection drops z, so a 3D layout is seen from the front.
    pub fn render(&self, graph: &GraphData, focus: Option<&str>) -> String {
        let mut canvas = Canvas::new(self.config.width, self.config.height);
        let strengths = highlight::highlight_strengths(graph, focus);

        self.draw_connections(&mut canvas, graph, &strengths);
        self.draw_neurons(&mut canvas, graph, focus);

        format!("{}", canvas)
    }

    fn draw_connections(
        &self,
        canvas: &mut Canvas,
        graph: &GraphData,
        strengths: &HashMap<String, f32>,
    ) {
        for connection in graph.connections() {
            let from = self.project(graph, &connection.source_id);
            let to = self.project(graph, &connection.target_id);
            let strength = strengths.get(&connection.id).copied().unwrap_or(0.0);
            canvas.draw_line(from.0, from.1, to.0, to.1, self.config.glyphs.edge(strength));
        }
    }

    fn draw_neurons(&self, canvas: &mut Canvas, graph: &GraphData, focus: Option<&str>) {
        for neuron in graph.neurons() {
            let (x, y) = self.project(graph, &neuron.id);
            let focused = focus == Some(neuron.id.as_str());
            canvas.set(x, y, self.config.glyphs.marker(neuron.kind, focused));
            if self.config.show_labels {
                canvas.draw_text(x + 2, y, &neuron.title);
            }
        }
    }

    fn project(&self, graph: &GraphData, id: &str) -> (i32, i32) {
        let position = graph.display_position(id);
        let span = self.config.radius * 2.0;
        let x = (position.x + self.config.radius) / span * (self.config.width as f32 - 1.0);
        // Screen y grows downward
        let y = (self.config.radius - position.y) / span * (self.config.height as f32 - 1.0);
        (x.round() as i32, y.round() as i32)
    }
}
