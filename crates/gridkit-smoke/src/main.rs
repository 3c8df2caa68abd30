//! GridKit Smoke Harness
//!
//! Loads a JSON grid scene, runs a measure and a layout pass over it and
//! prints the result as JSON. Used to check layout stability from scripts.

use anyhow::{Context, Result};
use gridkit_layout::{
    spec, Alignment, DefaultGapPolicy, GridConfig, GridLayout, LayoutDiagnostic, LayoutParams,
    Margins, MeasureSpec, Measurable, Measurement, Visibility, UNDEFINED,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

/// Parse command line arguments
struct Args {
    scene: Option<String>,
    width: f32,
    height: f32,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut scene = None;
        let mut width = 400.0f32;
        let mut height = 300.0f32;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--scene" => {
                    scene = args.next();
                }
                "--width" => {
                    if let Some(val) = args.next() {
                        width = val.parse().unwrap_or(400.0);
                    }
                }
                "--height" => {
                    if let Some(val) = args.next() {
                        height = val.parse().unwrap_or(300.0);
                    }
                }
                other => warn!(arg = other, "Ignoring unknown argument"),
            }
        }

        Self {
            scene,
            width,
            height,
        }
    }

    /// Load the scene from file or use the built-in one
    fn load_scene(&self) -> Result<Scene> {
        let text = match &self.scene {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read scene file {path}"))?,
            None => DEFAULT_SCENE.to_string(),
        };
        serde_json::from_str(&text).context("Malformed scene")
    }
}

const DEFAULT_SCENE: &str = r#"{
    "config": { "column_count": 3, "padding": { "top": 8, "right": 8, "bottom": 8, "left": 8 } },
    "children": [
        { "column": { "size": 3, "alignment": "fill" }, "content": { "kind": "text", "text_width": 600, "line_height": 18 } },
        { "content": { "kind": "box", "width": 80, "height": 24, "baseline": 18 } },
        { "column": { "weight": 1, "alignment": "fill" }, "content": { "kind": "box", "width": 40, "height": 24 } },
        { "content": { "kind": "box", "width": 60, "height": 30, "baseline": 20 } },
        { "column": { "size": 2 }, "content": { "kind": "box", "width": 120, "height": 40 }, "visibility": "collapsed" }
    ]
}"#;

#[derive(Debug, Deserialize)]
struct Scene {
    #[serde(default)]
    config: GridConfig,
    #[serde(default)]
    margin_policy: Option<GapPolicyDto>,
    children: Vec<SceneChild>,
}

#[derive(Debug, Deserialize)]
struct GapPolicyDto {
    gap: f32,
    #[serde(default)]
    container_margin: f32,
}

#[derive(Debug, Deserialize)]
struct SpecDto {
    start: Option<i32>,
    #[serde(default = "default_span")]
    size: i32,
    #[serde(default)]
    alignment: Alignment,
    #[serde(default)]
    weight: f32,
}

impl Default for SpecDto {
    fn default() -> Self {
        Self {
            start: None,
            size: default_span(),
            alignment: Alignment::Undefined,
            weight: 0.0,
        }
    }
}

fn default_span() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
struct SceneChild {
    #[serde(default)]
    row: SpecDto,
    #[serde(default)]
    column: SpecDto,
    #[serde(default)]
    margins: Margins,
    #[serde(default)]
    spacer: bool,
    #[serde(default)]
    visibility: Visibility,
    content: Content,
}

impl SceneChild {
    fn params(&self) -> Result<LayoutParams> {
        let row = to_spec(&self.row)?;
        let column = to_spec(&self.column)?;
        let params = if self.spacer {
            LayoutParams::spacer(row, column)?
        } else {
            LayoutParams::new(row, column)?
        };
        Ok(params.with_margins(self.margins))
    }
}

fn to_spec(dto: &SpecDto) -> Result<gridkit_layout::Spec> {
    let start = dto.start.unwrap_or(UNDEFINED);
    Ok(spec(start, dto.size, dto.alignment, dto.weight)?)
}

/// Scripted content standing in for real widgets.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Content {
    /// A rigid box, optionally shrinkable to a minimum size.
    Box {
        width: f32,
        height: f32,
        min_width: Option<f32>,
        min_height: Option<f32>,
        baseline: Option<f32>,
    },
    /// A paragraph that wraps to the width it is given.
    Text { text_width: f32, line_height: f32 },
}

#[derive(Debug)]
struct SceneItem {
    content: Content,
    visibility: Visibility,
}

impl Measurable for SceneItem {
    fn measure(&self, width: MeasureSpec, _height: MeasureSpec) -> Measurement {
        match &self.content {
            Content::Box {
                width,
                height,
                min_width,
                min_height,
                baseline,
            } => {
                let measurement = Measurement::range(
                    min_width.unwrap_or(*width),
                    *width,
                    min_height.unwrap_or(*height),
                    *height,
                );
                match baseline {
                    Some(b) => measurement.with_baseline(*b),
                    None => measurement,
                }
            }
            Content::Text {
                text_width,
                line_height,
            } => {
                let available = width.limit().unwrap_or(*text_width).max(1.0);
                let used = match width {
                    MeasureSpec::Exactly(w) => w,
                    _ => text_width.min(available),
                };
                let lines = (text_width / available).ceil().max(1.0);
                let height = lines * line_height;
                Measurement::range(used.min(*line_height * 4.0), used, height, height)
                    .with_baseline(line_height * 0.8)
            }
        }
    }

    fn visibility(&self) -> Visibility {
        self.visibility
    }
}

fn describe(diagnostic: &LayoutDiagnostic) -> serde_json::Value {
    match diagnostic {
        LayoutDiagnostic::OverconstrainedAxis {
            axis,
            required,
            available,
        } => json!({
            "kind": "overconstrained_axis",
            "axis": axis,
            "required": required,
            "available": available
        }),
        LayoutDiagnostic::InconsistentConstraint {
            axis,
            from,
            to,
            value,
            kind,
        } => json!({
            "kind": "inconsistent_constraint",
            "axis": axis,
            "from": from,
            "to": to,
            "value": value,
            "link": format!("{kind:?}")
        }),
    }
}

fn run(args: &Args) -> Result<serde_json::Value> {
    let scene = args.load_scene()?;

    let mut grid: GridLayout<SceneItem> = GridLayout::with_config(scene.config);
    if let Some(policy) = scene.margin_policy {
        grid.set_margin_policy(Box::new(DefaultGapPolicy {
            gap: policy.gap,
            container_margin: policy.container_margin,
        }));
    }
    for (index, child) in scene.children.into_iter().enumerate() {
        let params = child
            .params()
            .with_context(|| format!("Invalid layout params for child {index}"))?;
        grid.add_child(
            SceneItem {
                content: child.content,
                visibility: child.visibility,
            },
            params,
        )?;
    }
    info!(children = grid.child_count(), "Scene loaded");

    let measured = grid.measure(
        MeasureSpec::AtMost(args.width),
        MeasureSpec::AtMost(args.height),
    );
    let outcome = grid.layout(args.width, args.height);

    let children: Vec<serde_json::Value> = outcome
        .bounds
        .iter()
        .zip(grid.placements())
        .enumerate()
        .map(|(index, (rect, cell))| {
            json!({
                "index": index,
                "row": [cell.row.min, cell.row.max],
                "column": [cell.column.min, cell.column.max],
                "x": rect.x,
                "y": rect.y,
                "width": rect.width,
                "height": rect.height
            })
        })
        .collect();
    let diagnostics: Vec<serde_json::Value> = measured
        .diagnostics
        .iter()
        .chain(&outcome.diagnostics)
        .map(describe)
        .collect();

    let status = if diagnostics.is_empty() { "pass" } else { "warn" };

    Ok(json!({
        "status": status,
        "measured": { "width": measured.width, "height": measured.height },
        "container": { "width": args.width, "height": args.height },
        "rows": grid.row_count(),
        "columns": grid.column_count(),
        "column_lines": outcome.column_lines,
        "row_lines": outcome.row_lines,
        "children": children,
        "diagnostics": diagnostics
    }))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let report = run(&args)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
