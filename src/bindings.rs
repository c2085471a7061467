//! Python bindings for the engine and the frequency mapping.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::audio_engine::AudioEngine;
use crate::audio_engine::config::EngineConfig;
use crate::audio_engine::constants::{MAX_FREQ_HZ, MIN_FREQ_HZ};
use crate::audio_engine::frequency_map;
use crate::audio_engine::transport::EngineState;
use crate::messages::EngineEvent;

const DEFAULT_MIN_HZ: f64 = MIN_FREQ_HZ as f64;
const DEFAULT_MAX_HZ: f64 = MAX_FREQ_HZ as f64;

#[pyclass(name = "AudioEngine", unsendable)]
pub struct PyAudioEngine {
    engine: AudioEngine,
}

#[pymethods]
impl PyAudioEngine {
    #[new]
    #[pyo3(signature = (sample_rate=None, buffer_frames=None))]
    pub fn new(sample_rate: Option<u32>, buffer_frames: Option<u32>) -> PyResult<Self> {
        let mut config = EngineConfig {
            sample_rate,
            ..EngineConfig::default()
        };
        if let Some(buffer_frames) = buffer_frames {
            config.buffer_frames = buffer_frames;
        }

        let engine = AudioEngine::new(config)
            .map_err(|e| PyRuntimeError::new_err(format!("Failed to start audio stream: {e}")))?;
        Ok(Self { engine })
    }

    /// Decode in the background; completion is reported by `poll_event`.
    pub fn load_file(&mut self, data: &[u8]) {
        self.engine.load_file(data.to_vec());
    }

    /// Decode on the calling thread and return the duration in seconds.
    pub fn load_file_blocking(&mut self, data: &[u8]) -> PyResult<f64> {
        self.engine
            .load_file_blocking(data.to_vec())
            .map_err(|e| PyValueError::new_err(format!("Failed to decode audio: {e}")))
    }

    pub fn play(&mut self) {
        self.engine.play();
    }

    pub fn pause(&mut self) {
        self.engine.pause();
    }

    pub fn seek(&mut self, position: f64) {
        self.engine.seek(position);
    }

    pub fn set_frequency_range(&mut self, low_hz: f32, high_hz: f32) {
        self.engine.set_frequency_range(low_hz, high_hz);
    }

    pub fn tick(&mut self) -> Option<f64> {
        self.engine.tick()
    }

    /// Poll for the next engine event.
    ///
    /// Returns `None` when no events are available.
    pub fn poll_event(&mut self, py: Python<'_>) -> PyResult<Option<Py<PyAny>>> {
        let Some(event) = self.engine.poll_event() else {
            return Ok(None);
        };

        let dict = PyDict::new(py);
        match event {
            EngineEvent::LoadProgress { percent, stage } => {
                dict.set_item("type", "progress")?;
                dict.set_item("percent", percent)?;
                dict.set_item("stage", stage)?;
            }
            EngineEvent::Loaded { duration } => {
                dict.set_item("type", "loaded")?;
                dict.set_item("duration", duration)?;
            }
            EngineEvent::LoadFailed(error) => {
                dict.set_item("type", "error")?;
                dict.set_item("msg", error.to_string())?;
            }
            EngineEvent::Ended => {
                dict.set_item("type", "ended")?;
            }
        }

        Ok(Some(dict.into_any().unbind()))
    }

    #[getter]
    pub fn state(&mut self) -> &'static str {
        match self.engine.state() {
            EngineState::Unloaded => "unloaded",
            EngineState::Decoding => "decoding",
            EngineState::Ready => "ready",
            EngineState::Playing => "playing",
        }
    }

    #[getter]
    pub fn is_playing(&mut self) -> bool {
        self.engine.is_playing()
    }

    #[getter]
    pub fn is_ready(&self) -> bool {
        self.engine.is_ready()
    }

    #[getter]
    pub fn duration(&self) -> f64 {
        self.engine.duration()
    }

    #[getter]
    pub fn current_time(&mut self) -> f64 {
        self.engine.current_time()
    }

    #[getter]
    pub fn frequency_range(&self) -> (f32, f32) {
        let range = self.engine.frequency_range();
        (range.low_hz(), range.high_hz())
    }
}

#[pyfunction]
#[pyo3(signature = (position, min=DEFAULT_MIN_HZ, max=DEFAULT_MAX_HZ))]
pub fn to_frequency(position: f64, min: f64, max: f64) -> PyResult<f64> {
    frequency_map::to_frequency(position, min, max).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pyfunction]
#[pyo3(signature = (frequency, min=DEFAULT_MIN_HZ, max=DEFAULT_MAX_HZ))]
pub fn to_position(frequency: f64, min: f64, max: f64) -> PyResult<f64> {
    frequency_map::to_position(frequency, min, max).map_err(|e| PyValueError::new_err(e.to_string()))
}
