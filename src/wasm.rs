//! WASM bindings for the visualization pipeline
//!
//! `SemanticGraphView` holds a validated config; each `visualize` call takes
//! a serialized session and returns `{ scene, stats }`.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::config::VizConfig;
use crate::error::{Result, VizError};
use crate::layout::LayoutAlgorithm;
use crate::pipeline::{visualize_network, visualize_scatter, Precomputed, Visualization, VizSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Network,
    Scatter,
}

/// Payload accepted by [`SemanticGraphView::visualize`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizeRequest {
    pub session: VizSession,
    #[serde(default)]
    pub mode: ViewMode,
    /// Overrides the configured layout for this call.
    #[serde(default)]
    pub layout: Option<LayoutAlgorithm>,
    /// Scatter coordinates, one row per chunk plus one for the query
    /// embedding when the session has one.
    #[serde(default)]
    pub projection: Option<Vec<Vec<f64>>>,
}

fn run(config: &VizConfig, request: VisualizeRequest) -> Result<Visualization> {
    let mut config = config.clone();
    if let Some(algorithm) = request.layout {
        config.layout.algorithm = algorithm;
    }

    match request.mode {
        ViewMode::Network => visualize_network(&request.session, &config),
        ViewMode::Scatter => {
            let projection = request
                .projection
                .ok_or_else(|| VizError::invalid("scatter mode needs a projection"))?;
            visualize_scatter(&request.session, &Precomputed(projection), &config)
        }
    }
}

fn to_js(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct SemanticGraphView {
    config: VizConfig,
}

#[wasm_bindgen]
impl SemanticGraphView {
    /// Create a view from an optional JSON `VizConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> std::result::Result<SemanticGraphView, JsValue> {
        let config = match config_json {
            Some(json) => VizConfig::from_json(&json).map_err(to_js)?,
            None => VizConfig::default(),
        };
        Ok(SemanticGraphView { config })
    }

    /// Build a scene for `{ session, mode?, layout?, projection? }`.
    ///
    /// Returns `{ scene, stats }`.
    #[wasm_bindgen]
    pub fn visualize(&self, request: JsValue) -> std::result::Result<JsValue, JsValue> {
        let request: VisualizeRequest = serde_wasm_bindgen::from_value(request).map_err(to_js)?;
        let visualization = run(&self.config, request).map_err(to_js)?;
        serde_wasm_bindgen::to_value(&visualization).map_err(to_js)
    }

    #[wasm_bindgen(js_name = layoutAlgorithms)]
    pub fn layout_algorithms() -> Vec<String> {
        LayoutAlgorithm::ALL.iter().map(|a| a.as_str().to_string()).collect()
    }

    #[wasm_bindgen(js_name = configJson)]
    pub fn config_json(&self) -> std::result::Result<String, JsValue> {
        serde_json::to_string(&self.config).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn version() -> String {
        crate::version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> VisualizeRequest {
        serde_json::from_str(json).unwrap()
    }

    const SESSION: &str = r#"{
        "chunks": ["apples", "pears", "rockets"],
        "embeddings": [[1.0, 0.1, 0.0], [0.9, 0.2, 0.0], [0.0, 0.0, 1.0]],
        "hits": [{ "chunk": 0, "distance": 0.1 }]
    }"#;

    #[test]
    fn test_network_request_with_layout_override() {
        let req = request(&format!(r#"{{ "session": {}, "layout": "circular" }}"#, SESSION));
        assert_eq!(req.mode, ViewMode::Network);
        let viz = run(&VizConfig::default(), req).unwrap();
        assert_eq!(viz.scene.nodes.len(), 4);
        assert_eq!(viz.scene.edges.len(), 1);
    }

    #[test]
    fn test_scatter_request_needs_projection() {
        let req = request(&format!(r#"{{ "session": {}, "mode": "scatter" }}"#, SESSION));
        assert!(matches!(run(&VizConfig::default(), req), Err(VizError::InvalidParameter(_))));

        let req = request(&format!(
            r#"{{ "session": {}, "mode": "scatter", "projection": [[0, 0], [1, 0], [5, 5]] }}"#,
            SESSION
        ));
        let viz = run(&VizConfig::default(), req).unwrap();
        assert_eq!(viz.scene.title, VizConfig::default().scatter_style.title);
        assert_eq!(viz.scene.nodes.len(), 3);
    }

    #[test]
    fn test_unknown_layout_rejected() {
        let parsed: std::result::Result<VisualizeRequest, _> =
            serde_json::from_str(&format!(r#"{{ "session": {}, "layout": "random" }}"#, SESSION));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_layout_algorithm_names() {
        assert_eq!(
            SemanticGraphView::layout_algorithms(),
            vec!["spring", "circular", "kamada_kawai"]
        );
    }
}
