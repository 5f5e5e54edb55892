//! WebAssembly bindings for the step visualizer.
//!
//! Provides a thin wrapper around [`Session`] for browser hosts. The host
//! owns the animation loop: it calls `tick` from `requestAnimationFrame`
//! with `performance.now()` and redraws from `getFrame`.

use std::time::Duration;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{
    catalog::{AlgorithmMeta, Catalog},
    playback::PlaybackController,
    schema::{DatasetSpec, SessionParams},
    session::{Session, SessionStatus},
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Milliseconds from `performance.now()`; garbage maps to zero.
fn duration_from_ms(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f64(ms / 1000.0)
    } else {
        Duration::ZERO
    }
}

/// Browser-facing visualizer: a catalog plus at most one open session.
#[wasm_bindgen]
pub struct WasmVisualizer {
    catalog: Catalog,
    session: Option<Session>,
}

#[wasm_bindgen]
impl WasmVisualizer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmVisualizer {
        WasmVisualizer {
            catalog: Catalog::with_builtins(),
            session: None,
        }
    }

    /// Topic names in display order.
    #[wasm_bindgen(js_name = listTopics)]
    pub fn list_topics(&self) -> Result<JsValue, JsValue> {
        let topics: Vec<&str> = self.catalog.topics().collect();
        to_js(&topics)
    }

    /// Metadata for every algorithm in `topic`.
    #[wasm_bindgen(js_name = listAlgorithms)]
    pub fn list_algorithms(&self, topic: &str) -> Result<JsValue, JsValue> {
        let metas: Vec<&AlgorithmMeta> = self.catalog.list(topic).iter().map(|e| &e.meta).collect();
        to_js(&metas)
    }

    /// Open a session from a share-link query string and return its status.
    #[wasm_bindgen]
    pub fn open(&mut self, topic: &str, slug: &str, query: &str) -> Result<JsValue, JsValue> {
        let params = SessionParams::from_query(query);
        let session = Session::open(&self.catalog, topic, slug, params);
        let status = to_js(session.status());
        self.session = Some(session);
        status
    }

    /// Load and materialize the open session.
    #[wasm_bindgen]
    pub fn resolve(&mut self) -> Result<JsValue, JsValue> {
        let session = self.session_mut()?;
        to_js(session.resolve())
    }

    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> Result<JsValue, JsValue> {
        to_js(self.session()?.status())
    }

    #[wasm_bindgen(js_name = getMeta)]
    pub fn get_meta(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session()?.meta())
    }

    /// Replace the dataset with user-edited values.
    #[wasm_bindgen(js_name = setInput)]
    pub fn set_input(&mut self, values: &js_sys::Float64Array) -> Result<JsValue, JsValue> {
        let session = self.session_mut()?;
        to_js(session.set_input(values.to_vec()))
    }

    /// Regenerate the dataset with `n` elements from a random seed.
    #[wasm_bindgen]
    pub fn shuffle(&mut self, n: usize) -> Result<JsValue, JsValue> {
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        let session = self.session_mut()?;
        let dataset = DatasetSpec {
            n,
            seed,
            ..session.dataset().clone()
        };
        to_js(session.regenerate(dataset))
    }

    /// Advance playback to `now_ms` and report what happened.
    #[wasm_bindgen]
    pub fn tick(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        let outcome = self.controller_mut()?.tick(duration_from_ms(now_ms));
        to_js(&outcome)
    }

    #[wasm_bindgen(js_name = playForward)]
    pub fn play_forward(&mut self) -> Result<(), JsValue> {
        self.controller_mut()?.play_forward();
        Ok(())
    }

    #[wasm_bindgen(js_name = playBackward)]
    pub fn play_backward(&mut self) -> Result<(), JsValue> {
        self.controller_mut()?.play_backward();
        Ok(())
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) -> Result<(), JsValue> {
        self.controller_mut()?.pause();
        Ok(())
    }

    #[wasm_bindgen(js_name = stepNext)]
    pub fn step_next(&mut self) -> Result<(), JsValue> {
        self.controller_mut()?.step_next();
        Ok(())
    }

    #[wasm_bindgen(js_name = stepPrev)]
    pub fn step_prev(&mut self) -> Result<(), JsValue> {
        self.controller_mut()?.step_prev();
        Ok(())
    }

    /// Jump to a frame; out-of-range values are clamped.
    #[wasm_bindgen]
    pub fn seek(&mut self, index: f64) -> Result<(), JsValue> {
        // `as` saturates and maps NaN to 0.
        self.controller_mut()?.seek(index as i64);
        Ok(())
    }

    #[wasm_bindgen(js_name = toStart)]
    pub fn to_start(&mut self) -> Result<(), JsValue> {
        self.controller_mut()?.to_start();
        Ok(())
    }

    #[wasm_bindgen(js_name = toEnd)]
    pub fn to_end(&mut self) -> Result<(), JsValue> {
        self.controller_mut()?.to_end();
        Ok(())
    }

    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&mut self, speed: f64) -> Result<(), JsValue> {
        self.controller_mut()?.set_speed(speed);
        Ok(())
    }

    /// Current frame as JSON, or `null` when the timeline is empty.
    #[wasm_bindgen(js_name = getFrame)]
    pub fn get_frame(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session()?.current_frame())
    }

    #[wasm_bindgen(js_name = getPlayback)]
    pub fn get_playback(&self) -> Result<JsValue, JsValue> {
        to_js(&self.controller()?.state())
    }

    /// Share-link query string for the current session.
    #[wasm_bindgen(js_name = getQuery)]
    pub fn get_query(&self) -> Result<String, JsValue> {
        Ok(self.session()?.params().to_query())
    }
}

impl Default for WasmVisualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmVisualizer {
    fn session(&self) -> Result<&Session, JsValue> {
        self.session
            .as_ref()
            .ok_or_else(|| JsValue::from_str("No session open"))
    }

    fn session_mut(&mut self) -> Result<&mut Session, JsValue> {
        self.session
            .as_mut()
            .ok_or_else(|| JsValue::from_str("No session open"))
    }

    fn controller(&self) -> Result<&PlaybackController, JsValue> {
        let session = self.session()?;
        session.controller().ok_or_else(|| not_ready(session.status()))
    }

    fn controller_mut(&mut self) -> Result<&mut PlaybackController, JsValue> {
        let session = self.session_mut()?;
        let status = session.status().clone();
        session.controller_mut().ok_or_else(|| not_ready(&status))
    }
}

fn not_ready(status: &SessionStatus) -> JsValue {
    JsValue::from_str(&format!("Session is not ready: {status:?}"))
}
