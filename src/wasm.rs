//! WASM bindings for orbit-core.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.

use log::Level;
use wasm_bindgen::prelude::*;

use crate::layout::{apply_layout, compute_layout, ring_capacity, LayoutConfig, LayoutState};
use crate::output::{LayoutInput, LayoutOutput, NodeOutput};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

/// Route `log` output to the browser console and install the panic hook.
#[wasm_bindgen]
pub fn init_logging() {
    let _ = console_log::init_with_level(Level::Debug);
    console_error_panic_hook::set_once();
}

/// Lay out `{ nodes, edges, config? }` and return the result as JSON.
#[wasm_bindgen]
pub fn layout_graph(input: &str) -> String {
    let output = run_layout(input);
    if let Some(err) = &output.error {
        console_error(&format!("Error reading layout input: {}", err.message));
    }
    serde_json::to_string(&output)
        .unwrap_or_else(|e| format!("{{\"error\": {{\"message\": \"{e}\", \"line\": 0, \"column\": 0}}}}"))
}

/// Capacity of `ring` under the default config.
#[wasm_bindgen]
pub fn ring_capacity_for(ring: i32) -> u32 {
    ring_capacity(ring as i64, &LayoutConfig::default())
}

fn run_layout(input: &str) -> LayoutOutput {
    let LayoutInput { mut nodes, edges, config } = match serde_json::from_str::<LayoutInput>(input) {
        Ok(input) => input,
        Err(e) => return LayoutOutput::from_error(&e),
    };

    let (state, changed, rings) = match compute_layout(&nodes, &edges, &config) {
        Some(result) => {
            let changed = apply_layout(&mut nodes, &result, &config);
            (LayoutState::LaidOut, changed, result.effective_ring)
        }
        None => (LayoutState::Idle, Vec::new(), Default::default()),
    };

    let nodes = nodes
        .into_iter()
        .map(|n| NodeOutput {
            ring: rings.get(&n.id).copied(),
            id: n.id,
            position: n.position,
            distance: n.distance,
            max_distance: n.max_distance,
        })
        .collect();

    LayoutOutput {
        nodes,
        changed,
        state: Some(state),
        error: None,
    }
}
