//! WASM bindings for the bhkernel N-body kernel.
//!
//! Two surfaces are exported to JavaScript:
//!
//! - Stateless buffer functions (`build_tree`, `compute_forces_bh`,
//!   `compute_forces_direct`, `leapfrog_step`, `compute_energy`) that work on
//!   `Float64Array`s owned by the caller. They share one thread-local
//!   [`Kernel`], so its node arena is reused across calls.
//! - Simulation sessions that keep their bodies on the Rust side and hand
//!   back packed positions per frame.
//!
//! # Architecture
//!
//! State lives in thread-local storage (WASM is single-threaded). Sessions are
//! referenced from JavaScript by opaque `u32` ids.
//!
//! # Example Usage (JavaScript)
//!
//! ```javascript
//! const simId = simulation_create({ theta: 0.7 });
//!
//! simulation_init(simId, x, y, vx, vy, mass);
//!
//! // Each animation frame
//! const frame = simulation_step(simId, 0.001, 4);
//! draw(frame.positions);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use bhkernel::bodies::{Body, BodySet};
use bhkernel::energy::EnergyReport;
use bhkernel::quadtree::TreeStats;
use bhkernel::{Kernel, KernelConfig, Simulation};

// =============================================================================
// Serialization helpers
// =============================================================================

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsError::new(&e.to_string()))
}

/// Reads an optional config object; `undefined`/`null` mean defaults.
fn config_from_js(value: JsValue) -> Result<KernelConfig, JsError> {
    if value.is_undefined() || value.is_null() {
        Ok(KernelConfig::default())
    } else {
        from_js(value)
    }
}

// =============================================================================
// Thread-local storage
// =============================================================================

thread_local! {
    static KERNEL: RefCell<Kernel> = RefCell::new(Kernel::default());
    static SIMULATIONS: RefCell<HashMap<u32, Simulation>> = RefCell::new(HashMap::new());
    static NEXT_SIM_ID: RefCell<u32> = const { RefCell::new(0) };
}

fn not_found(sim_id: u32) -> JsError {
    JsError::new(&format!("Simulation {} not found", sim_id))
}

fn with_simulation<T>(
    sim_id: u32,
    f: impl FnOnce(&Simulation) -> Result<T, JsError>,
) -> Result<T, JsError> {
    SIMULATIONS.with(|sims| {
        let sims = sims.borrow();
        let sim = sims.get(&sim_id).ok_or_else(|| not_found(sim_id))?;
        f(sim)
    })
}

fn with_simulation_mut<T>(
    sim_id: u32,
    f: impl FnOnce(&mut Simulation) -> Result<T, JsError>,
) -> Result<T, JsError> {
    SIMULATIONS.with(|sims| {
        let mut sims = sims.borrow_mut();
        let sim = sims.get_mut(&sim_id).ok_or_else(|| not_found(sim_id))?;
        f(sim)
    })
}

// =============================================================================
// Serializable types for JavaScript interop
// =============================================================================

/// Body data for adding a single body
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct BodyInput {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub vx: f64,
    #[serde(default)]
    pub vy: f64,
    pub mass: f64,
}

impl From<BodyInput> for Body {
    fn from(input: BodyInput) -> Self {
        Body::new([input.x, input.y], [input.vx, input.vy], input.mass)
    }
}

/// Result of adding a body
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBodyResult {
    pub body_count: usize,
    pub energy: EnergyReport,
}

/// Quadtree diagnostics from the most recent build
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeStatsSnapshot {
    pub nodes: usize,
    pub max_depth: usize,
    pub saturated: usize,
    pub exhausted: bool,
    pub depth_capped: bool,
}

impl From<TreeStats> for TreeStatsSnapshot {
    fn from(stats: TreeStats) -> Self {
        Self {
            nodes: stats.nodes,
            max_depth: stats.max_depth,
            saturated: stats.saturated,
            exhausted: stats.exhausted,
            depth_capped: stats.depth_capped,
        }
    }
}

// =============================================================================
// Stateless buffer functions
// =============================================================================

/// Replace the configuration of the shared kernel.
///
/// Accepts a partial object such as `{ theta: 0.5, directThreshold: 64 }`.
#[wasm_bindgen]
pub fn kernel_configure(config: JsValue) -> Result<(), JsError> {
    let kernel = Kernel::new(config_from_js(config)?)?;
    KERNEL.with(|k| *k.borrow_mut() = kernel);
    Ok(())
}

/// Build the quadtree over the given bodies.
///
/// # Returns
/// Index of the root node in the arena
#[wasm_bindgen]
pub fn build_tree(x: &[f64], y: &[f64], mass: &[f64]) -> Result<u32, JsError> {
    KERNEL.with(|k| {
        let root = k.borrow_mut().build_tree(x, y, mass)?;
        Ok(root.index() as u32)
    })
}

/// Barnes-Hut accelerations, written into `ax`/`ay`
#[wasm_bindgen]
pub fn compute_forces_bh(
    x: &[f64],
    y: &[f64],
    mass: &[f64],
    ax: &mut [f64],
    ay: &mut [f64],
) -> Result<(), JsError> {
    KERNEL.with(|k| Ok(k.borrow_mut().compute_forces_bh(x, y, mass, ax, ay)?))
}

/// Exact pairwise accelerations, written into `ax`/`ay`
#[wasm_bindgen]
pub fn compute_forces_direct(
    x: &[f64],
    y: &[f64],
    mass: &[f64],
    ax: &mut [f64],
    ay: &mut [f64],
) -> Result<(), JsError> {
    KERNEL.with(|k| Ok(k.borrow_mut().compute_forces_direct(x, y, mass, ax, ay)?))
}

/// Accelerations from direct summation or the tree, depending on body count
#[wasm_bindgen]
pub fn compute_forces(
    x: &[f64],
    y: &[f64],
    mass: &[f64],
    ax: &mut [f64],
    ay: &mut [f64],
) -> Result<(), JsError> {
    KERNEL.with(|k| Ok(k.borrow_mut().compute_forces(x, y, mass, ax, ay)?))
}

/// Advance all buffers by one leapfrog step.
///
/// `ax`/`ay` must hold the accelerations of the current positions (call
/// `compute_forces` once before the first step).
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn leapfrog_step(
    dt: f64,
    x: &mut [f64],
    y: &mut [f64],
    vx: &mut [f64],
    vy: &mut [f64],
    ax: &mut [f64],
    ay: &mut [f64],
    mass: &[f64],
) -> Result<(), JsError> {
    KERNEL.with(|k| Ok(k.borrow_mut().leapfrog_step(dt, x, y, vx, vy, ax, ay, mass)?))
}

/// Total energy; kinetic only above the pair cutoff.
#[wasm_bindgen]
pub fn compute_energy(
    x: &[f64],
    y: &[f64],
    vx: &[f64],
    vy: &[f64],
    mass: &[f64],
) -> Result<f64, JsError> {
    KERNEL.with(|k| Ok(k.borrow().compute_energy(x, y, vx, vy, mass)?))
}

/// Diagnostics from the shared kernel's most recent tree build
#[wasm_bindgen]
pub fn kernel_tree_stats() -> Result<JsValue, JsError> {
    KERNEL.with(|k| to_js(&TreeStatsSnapshot::from(k.borrow().tree_stats())))
}

// =============================================================================
// Simulation management
// =============================================================================

/// Create a new, empty simulation.
///
/// # Arguments
/// * `config` - Optional kernel configuration object
///
/// # Returns
/// A simulation ID for use with the other `simulation_*` functions
#[wasm_bindgen]
pub fn simulation_create(config: JsValue) -> Result<u32, JsError> {
    let simulation = Simulation::new(config_from_js(config)?)?;

    let id = NEXT_SIM_ID.with(|next_id| {
        let mut id = next_id.borrow_mut();
        let current = *id;
        *id += 1;
        current
    });

    SIMULATIONS.with(|sims| {
        sims.borrow_mut().insert(id, simulation);
    });

    Ok(id)
}

/// Delete a simulation to free memory.
#[wasm_bindgen]
pub fn simulation_delete(sim_id: u32) {
    SIMULATIONS.with(|sims| {
        sims.borrow_mut().remove(&sim_id);
    });
}

/// Replace every body and reset the clock.
///
/// # Returns
/// The initial frame (`positions`, `bodyCount`, `energy`, `simTime`)
#[wasm_bindgen]
pub fn simulation_init(
    sim_id: u32,
    x: &[f64],
    y: &[f64],
    vx: &[f64],
    vy: &[f64],
    mass: &[f64],
) -> Result<JsValue, JsError> {
    let bodies = BodySet::from_buffers(x, y, vx, vy, mass)?;
    with_simulation_mut(sim_id, |sim| to_js(&sim.init(bodies.iter())?))
}

/// Advance the simulation by `substeps` steps of `dt`.
///
/// # Returns
/// The frame after the last substep
#[wasm_bindgen]
pub fn simulation_step(sim_id: u32, dt: f64, substeps: usize) -> Result<JsValue, JsError> {
    with_simulation_mut(sim_id, |sim| to_js(&sim.step(dt, substeps)?))
}

/// Add one body (`{ x, y, vx, vy, mass }`) and recompute forces.
///
/// # Returns
/// `{ bodyCount, energy }`
#[wasm_bindgen]
pub fn simulation_add_body(sim_id: u32, body: JsValue) -> Result<JsValue, JsError> {
    let body: BodyInput = from_js(body)?;
    with_simulation_mut(sim_id, |sim| {
        let (body_count, energy) = sim.add_body(body.into())?;
        to_js(&AddBodyResult { body_count, energy })
    })
}

/// Remove every body and reset the clock.
#[wasm_bindgen]
pub fn simulation_clear(sim_id: u32) -> Result<(), JsError> {
    with_simulation_mut(sim_id, |sim| {
        sim.clear();
        Ok(())
    })
}

// =============================================================================
// State queries
// =============================================================================

/// Positions packed as `[x0, y0, x1, y1, ...]`
#[wasm_bindgen]
pub fn simulation_get_positions(sim_id: u32) -> Result<Vec<f64>, JsError> {
    with_simulation(sim_id, |sim| Ok(sim.positions_interleaved()))
}

/// Energy report; `potential` is absent above the pair cutoff.
#[wasm_bindgen]
pub fn simulation_get_energy(sim_id: u32) -> Result<JsValue, JsError> {
    with_simulation(sim_id, |sim| to_js(&sim.energy()?))
}

/// Current simulation time
#[wasm_bindgen]
pub fn simulation_get_time(sim_id: u32) -> Result<f64, JsError> {
    with_simulation(sim_id, |sim| Ok(sim.time()))
}

/// Get body count.
#[wasm_bindgen]
pub fn simulation_body_count(sim_id: u32) -> Result<usize, JsError> {
    with_simulation(sim_id, |sim| Ok(sim.body_count()))
}

/// Quadtree diagnostics from this simulation's most recent build
#[wasm_bindgen]
pub fn simulation_tree_stats(sim_id: u32) -> Result<JsValue, JsError> {
    with_simulation(sim_id, |sim| {
        to_js(&TreeStatsSnapshot::from(sim.kernel().tree_stats()))
    })
}
