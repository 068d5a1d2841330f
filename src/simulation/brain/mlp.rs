//! Single dense layer of the decision network.

use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Activation applied to a layer's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// Hyperbolic tangent, range (-1, 1).
    Tanh,
    /// Logistic function, range (0, 1). Rounding its output yields a button press.
    Sigmoid,
}

impl Activation {
    #[inline]
    fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }
}

/// A single layer of a multi-layer perceptron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
}

impl Mlp {
    /// Creates a new layer with weights and biases drawn from `[-scale, scale)`.
    pub fn new_random<R: Rng>(
        input_size: usize,
        output_size: usize,
        scale: f32,
        rng: &mut R,
    ) -> Self {
        let weights =
            Array2::from_shape_fn((output_size, input_size), |_| rng.random_range(-scale..scale));
        let biases = Array1::from_shape_fn(output_size, |_| rng.random_range(-scale..scale));
        Self { weights, biases }
    }

    /// Number of inputs the layer expects.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of outputs the layer produces.
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Performs a forward pass with the given activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>, activation: Activation) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output.mapv_inplace(|x| activation.apply(x));
        output
    }

    /// Mutates weights and biases by adding noise from `[-mutation_scale, mutation_scale)`.
    pub fn mutate<R: Rng>(&mut self, mutation_scale: f32, rng: &mut R) {
        if mutation_scale <= 0.0 {
            return;
        }
        self.weights
            .mapv_inplace(|w| w + rng.random_range(-mutation_scale..mutation_scale));
        self.biases
            .mapv_inplace(|b| b + rng.random_range(-mutation_scale..mutation_scale));
    }

    /// Creates a new layer by averaging two parent layers.
    pub fn crossover(parent1: &Mlp, parent2: &Mlp) -> Self {
        Self {
            weights: &parent1.weights * 0.5 + &parent2.weights * 0.5,
            biases: &parent1.biases * 0.5 + &parent2.biases * 0.5,
        }
    }
}
