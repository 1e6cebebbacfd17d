//! Reference sequence regressor: a dense tanh stack trained by SGD.
//!
//! This is the bundled conforming implementation of the
//! [`SequenceRegressor`] capability. It flattens each input window and runs
//! it through one or two tanh hidden layers (widths taken from the
//! hyperparameter candidate) followed by a tanh output layer, trained by
//! mini-batch gradient descent on mean squared error with early stopping on
//! validation loss. Any other implementation of the trait can replace it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use timecast_spi::{
    FitOptions, HyperparameterCandidate, RegressorBlob, RegressorFactory, Result,
    SequenceRegressor, TimecastError, Window, WindowSet,
};

const INIT_SEED: u64 = 42;
const LEARNING_RATE: f64 = 0.05;

/// Network structure, serialized as the artifact's `graph` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct GraphSpec {
    /// Flattened input width (`span * nb_features`); 0 until first fit.
    input_dim: usize,
    /// Hidden layer widths (one or two entries).
    hidden: Vec<usize>,
    /// Output width (`nb_features`).
    output_dim: usize,
    /// Activation identifier.
    activation: String,
}

/// One dense layer, row-major `out x in`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Layer {
    w: Vec<Vec<f64>>,
    b: Vec<f64>,
}

impl Layer {
    fn init(rng: &mut StdRng, input: usize, output: usize) -> Self {
        // Xavier uniform
        let scale = (6.0 / (input + output) as f64).sqrt();
        Layer {
            w: (0..output)
                .map(|_| (0..input).map(|_| rng.gen_range(-scale..scale)).collect())
                .collect(),
            b: vec![0.0; output],
        }
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.w
            .iter()
            .zip(self.b.iter())
            .map(|(row, &b)| {
                let z: f64 = row.iter().zip(input.iter()).map(|(w, x)| w * x).sum();
                (z + b).tanh()
            })
            .collect()
    }
}

/// Dense sequence regressor over flattened windows.
#[derive(Debug)]
pub struct DenseSequenceRegressor {
    spec: GraphSpec,
    layers: Vec<Layer>,
    loss_fct: String,
    optimizer: String,
}

impl DenseSequenceRegressor {
    fn new(hidden: Vec<usize>, nb_features: usize, loss_fct: &str, optimizer: &str) -> Self {
        Self {
            spec: GraphSpec {
                input_dim: 0,
                hidden,
                output_dim: nb_features,
                activation: "tanh".to_string(),
            },
            layers: Vec::new(),
            loss_fct: loss_fct.to_string(),
            optimizer: optimizer.to_string(),
        }
    }

    fn initialize(&mut self, input_dim: usize) {
        self.spec.input_dim = input_dim;
        let mut rng = StdRng::seed_from_u64(INIT_SEED);
        let mut widths = vec![input_dim];
        widths.extend(&self.spec.hidden);
        widths.push(self.spec.output_dim);

        self.layers = widths
            .windows(2)
            .map(|pair| Layer::init(&mut rng, pair[0], pair[1]))
            .collect();
    }

    /// Loss function identifier the regressor was compiled with.
    pub fn loss_fct(&self) -> &str {
        &self.loss_fct
    }

    /// Optimizer identifier the regressor was compiled with.
    pub fn optimizer(&self) -> &str {
        &self.optimizer
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(TimecastError::Regressor(
                "regressor is not fitted".to_string(),
            ));
        }
        Ok(())
    }

    fn flatten(window: &Window) -> Vec<f64> {
        window.iter().flatten().copied().collect()
    }

    /// Forward pass keeping every layer's activation for backprop.
    fn forward_trace(&self, input: Vec<f64>) -> Vec<Vec<f64>> {
        let mut activations = vec![input];
        for layer in &self.layers {
            let next = layer.forward(activations.last().map(|a| a.as_slice()).unwrap_or(&[]));
            activations.push(next);
        }
        activations
    }

    fn forward(&self, window: &Window) -> Vec<f64> {
        let mut a = Self::flatten(window);
        for layer in &self.layers {
            a = layer.forward(&a);
        }
        a
    }

    /// One gradient-descent step over a mini-batch. Returns the batch loss.
    fn train_batch(&mut self, x: &[Window], y: &[Vec<f64>]) -> f64 {
        let batch = x.len();
        let mut grads: Vec<(Vec<Vec<f64>>, Vec<f64>)> = self
            .layers
            .iter()
            .map(|layer| {
                (
                    vec![vec![0.0; layer.w[0].len()]; layer.w.len()],
                    vec![0.0; layer.b.len()],
                )
            })
            .collect();
        let mut loss = 0.0;

        for (window, target) in x.iter().zip(y.iter()) {
            let activations = self.forward_trace(Self::flatten(window));
            let output = activations.last().cloned().unwrap_or_default();

            // MSE with the tanh derivative folded into the output delta
            let mut delta: Vec<f64> = output
                .iter()
                .zip(target.iter())
                .map(|(&o, &t)| {
                    loss += (o - t) * (o - t);
                    2.0 * (o - t) * (1.0 - o * o)
                })
                .collect();

            for (l, layer) in self.layers.iter().enumerate().rev() {
                let input = &activations[l];
                for (i, &d) in delta.iter().enumerate() {
                    for (j, &a) in input.iter().enumerate() {
                        grads[l].0[i][j] += d * a;
                    }
                    grads[l].1[i] += d;
                }
                if l > 0 {
                    delta = (0..input.len())
                        .map(|j| {
                            let back: f64 =
                                delta.iter().enumerate().map(|(i, &d)| d * layer.w[i][j]).sum();
                            back * (1.0 - input[j] * input[j])
                        })
                        .collect();
                }
            }
        }

        let scale = LEARNING_RATE / batch as f64;
        for (layer, (gw, gb)) in self.layers.iter_mut().zip(grads.iter()) {
            for (row, grow) in layer.w.iter_mut().zip(gw.iter()) {
                for (w, g) in row.iter_mut().zip(grow.iter()) {
                    *w -= scale * g;
                }
            }
            for (b, g) in layer.b.iter_mut().zip(gb.iter()) {
                *b -= scale * g;
            }
        }

        loss / (batch * self.spec.output_dim) as f64
    }
}

impl SequenceRegressor for DenseSequenceRegressor {
    fn fit(
        &mut self,
        train: &WindowSet,
        validation: &WindowSet,
        options: FitOptions,
    ) -> Result<()> {
        if train.is_empty() {
            return Err(TimecastError::Regressor(
                "no training samples".to_string(),
            ));
        }

        let input_dim: usize = train.x[0].iter().map(|row| row.len()).sum();
        self.initialize(input_dim);

        let mut best_val = f64::INFINITY;
        let mut stale_epochs = 0;

        for epoch in 0..options.num_epochs {
            for chunk in (0..train.len()).collect::<Vec<_>>().chunks(options.batch_size) {
                let x: Vec<Window> = chunk.iter().map(|&k| train.x[k].clone()).collect();
                let y: Vec<Vec<f64>> = chunk.iter().map(|&k| train.y[k].clone()).collect();
                self.train_batch(&x, &y);
            }

            // Early stopping on validation loss
            let val_loss = if validation.is_empty() {
                self.evaluate(&train.x, &train.y)?
            } else {
                self.evaluate(&validation.x, &validation.y)?
            };
            if !val_loss.is_finite() {
                return Err(TimecastError::Regressor(format!(
                    "training diverged at epoch {}",
                    epoch
                )));
            }
            if val_loss < best_val {
                best_val = val_loss;
                stale_epochs = 0;
            } else {
                stale_epochs += 1;
                if stale_epochs >= options.patience {
                    break;
                }
            }
        }

        Ok(())
    }

    fn evaluate(&self, x: &[Window], y: &[Vec<f64>]) -> Result<f64> {
        self.ensure_ready()?;
        if x.is_empty() {
            return Err(TimecastError::Regressor(
                "no samples to evaluate".to_string(),
            ));
        }

        let mut loss = 0.0;
        let mut count = 0usize;
        for (window, target) in x.iter().zip(y.iter()) {
            let output = self.forward(window);
            for (&o, &t) in output.iter().zip(target.iter()) {
                loss += (o - t) * (o - t);
                count += 1;
            }
        }
        Ok(loss / count as f64)
    }

    fn predict(&self, x: &[Window]) -> Result<Vec<Vec<f64>>> {
        self.ensure_ready()?;
        Ok(x.iter().map(|window| self.forward(window)).collect())
    }

    fn save(&self) -> Result<RegressorBlob> {
        self.ensure_ready()?;
        let graph = serde_json::to_vec(&self.spec)
            .map_err(|e| TimecastError::Regressor(e.to_string()))?;
        let weights = serde_json::to_vec(&self.layers)
            .map_err(|e| TimecastError::Regressor(e.to_string()))?;
        Ok(RegressorBlob { graph, weights })
    }
}

/// Factory for [`DenseSequenceRegressor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DenseRegressorFactory;

impl RegressorFactory for DenseRegressorFactory {
    fn build(
        &self,
        candidate: &HyperparameterCandidate,
        nb_features: usize,
    ) -> Result<Box<dyn SequenceRegressor>> {
        if candidate.activation() != "tanh" {
            return Err(TimecastError::Regressor(format!(
                "unsupported activation '{}'",
                candidate.activation()
            )));
        }

        let mut hidden = vec![candidate.l1() as usize];
        if let Some(l2) = candidate.l2() {
            hidden.push(l2 as usize);
        }

        Ok(Box::new(DenseSequenceRegressor::new(
            hidden,
            nb_features,
            candidate.loss_fct(),
            candidate.optimizer(),
        )))
    }

    fn restore(
        &self,
        blob: &RegressorBlob,
        loss_fct: &str,
        optimizer: &str,
    ) -> Result<Box<dyn SequenceRegressor>> {
        let spec: GraphSpec = serde_json::from_slice(&blob.graph)
            .map_err(|e| TimecastError::Artifact(format!("bad graph payload: {}", e)))?;
        let layers: Vec<Layer> = serde_json::from_slice(&blob.weights)
            .map_err(|e| TimecastError::Artifact(format!("bad weights payload: {}", e)))?;

        Ok(Box::new(DenseSequenceRegressor {
            spec,
            layers,
            loss_fct: loss_fct.to_string(),
            optimizer: optimizer.to_string(),
        }))
    }
}
