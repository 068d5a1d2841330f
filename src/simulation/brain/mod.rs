//! Decision network mapping an observation and the agent's own state to a
//! discrete movement action.
//!
//! The topology is fixed: one `tanh` hidden layer and a logistic output layer
//! of three "buttons" (turn left, turn right, brake). Parameters live in flat
//! ndarray blocks; [`Brain::think`] is a pure function of its inputs.

use std::f32::consts::TAU;

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::Observation;

pub mod mlp;

pub use mlp::{Activation, Mlp};

/// Inputs appended after the observation: x, y and heading.
pub const STATE_INPUTS: usize = 3;
/// Output buttons: turn left, turn right, brake.
pub const ACTION_OUTPUTS: usize = 3;

/// Network shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layout {
    /// Input width.
    pub inputs: usize,
    /// Hidden layer width.
    pub hidden: usize,
    /// Output width.
    pub outputs: usize,
}

impl Layout {
    /// Layout for an observation of `observation_len` tiles.
    pub fn for_observation(observation_len: usize, hidden: usize) -> Self {
        Self {
            inputs: observation_len + STATE_INPUTS,
            hidden,
            outputs: ACTION_OUTPUTS,
        }
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.hidden * self.inputs + self.hidden + self.outputs * self.hidden + self.outputs
    }

    /// Like [`Layout::parameter_count`], but `None` on overflow.
    pub fn checked_parameter_count(&self) -> Option<usize> {
        let hidden = self.hidden.checked_mul(self.inputs)?.checked_add(self.hidden)?;
        let output = self.outputs.checked_mul(self.hidden)?.checked_add(self.outputs)?;
        hidden.checked_add(output)
    }

    /// The layout as an `(inputs, hidden, outputs)` tuple.
    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.inputs, self.hidden, self.outputs)
    }
}

/// Buttons pressed by the network for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Action {
    /// Turn counter-clockwise on screen.
    pub turn_left: bool,
    /// Turn clockwise on screen.
    pub turn_right: bool,
    /// Stand still this tick.
    pub brake: bool,
}

impl Action {
    /// Thresholds raw network outputs by rounding them to 0 or 1.
    pub fn from_outputs(outputs: &Array1<f32>) -> Self {
        let pressed = |idx: usize| outputs.get(idx).is_some_and(|v| v.round() as i32 == 1);
        Self {
            turn_left: pressed(0),
            turn_right: pressed(1),
            brake: pressed(2),
        }
    }

    /// Heading change for this tick. Left alone turns by `-turn_rate`, right
    /// alone by `+turn_rate`, both or neither cancel out.
    pub fn turn(&self, turn_rate: f32) -> f32 {
        match (self.turn_left, self.turn_right) {
            (true, false) => -turn_rate,
            (false, true) => turn_rate,
            _ => 0.0,
        }
    }

    /// Distance travelled this tick.
    pub fn speed(&self, base_speed: f32) -> f32 {
        if self.brake { 0.0 } else { base_speed }
    }
}

/// A one-hidden-layer perceptron that controls an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    /// Input to hidden layer (`tanh`).
    pub hidden: Mlp,
    /// Hidden to output layer (logistic).
    pub output: Mlp,
}

impl Brain {
    /// Creates a founder brain with parameters drawn from `[-scale, scale)`.
    pub fn new_random<R: Rng>(layout: Layout, scale: f32, rng: &mut R) -> Self {
        Self {
            hidden: Mlp::new_random(layout.inputs, layout.hidden, scale, rng),
            output: Mlp::new_random(layout.hidden, layout.outputs, scale, rng),
        }
    }

    /// Rebuilds a brain from parameters laid out as by [`Brain::to_flat_vector`].
    ///
    /// Returns `None` when `flat` does not hold exactly
    /// `layout.parameter_count()` values.
    pub fn from_flat(layout: Layout, flat: &[f32]) -> Option<Self> {
        if flat.len() != layout.parameter_count() {
            return None;
        }

        let mut rest = flat;
        let mut take = |n: usize| {
            let (head, tail) = rest.split_at(n);
            rest = tail;
            head.to_vec()
        };

        let hidden = Mlp {
            weights: ndarray::Array2::from_shape_vec(
                (layout.hidden, layout.inputs),
                take(layout.hidden * layout.inputs),
            )
            .ok()?,
            biases: Array1::from_vec(take(layout.hidden)),
        };
        let output = Mlp {
            weights: ndarray::Array2::from_shape_vec(
                (layout.outputs, layout.hidden),
                take(layout.outputs * layout.hidden),
            )
            .ok()?,
            biases: Array1::from_vec(take(layout.outputs)),
        };

        Some(Self { hidden, output })
    }

    /// Shape of this brain.
    pub fn layout(&self) -> Layout {
        Layout {
            inputs: self.hidden.input_size(),
            hidden: self.hidden.output_size(),
            outputs: self.output.output_size(),
        }
    }

    /// Builds the input vector: observation values, then position (as a
    /// fraction of the map extent) and heading (as a fraction of a turn).
    pub fn inputs(observation: &Observation, position: (f32, f32), heading: f32) -> Array1<f32> {
        observation
            .values()
            .chain([position.0, position.1, heading / TAU])
            .collect()
    }

    /// Runs the network and thresholds its outputs into an action.
    ///
    /// `position` must already be expressed relative to the map extent.
    #[inline]
    pub fn think(&self, observation: &Observation, position: (f32, f32), heading: f32) -> Action {
        let inputs = Self::inputs(observation, position, heading);
        debug_assert_eq!(inputs.len(), self.layout().inputs);

        let hidden = self.hidden.forward(&inputs, Activation::Tanh);
        let outputs = self.output.forward(&hidden, Activation::Sigmoid);
        Action::from_outputs(&outputs)
    }

    /// Creates a new brain by averaging two parent brains of the same layout.
    pub fn crossover(parent1: &Brain, parent2: &Brain) -> Self {
        Self {
            hidden: Mlp::crossover(&parent1.hidden, &parent2.hidden),
            output: Mlp::crossover(&parent1.output, &parent2.output),
        }
    }

    /// Mutates all layers in the brain.
    pub fn mutate<R: Rng>(&mut self, mutation_scale: f32, rng: &mut R) {
        self.hidden.mutate(mutation_scale, rng);
        self.output.mutate(mutation_scale, rng);
    }

    /// Flattens all weights and biases into a single vector: hidden weights
    /// (row-major), hidden biases, output weights, output biases.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(self.layout().parameter_count());
        for layer in [&self.hidden, &self.output] {
            flat.extend(layer.weights.iter().copied());
            flat.extend(layer.biases.iter().copied());
        }
        flat
    }
}
