//! Recurrent neural controller carried by every animal.
//!
//! A mind maps `inputs` sensed values to `outputs` motor values through one
//! hidden layer of tanh units with a single step of recurrence:
//!
//! ```text
//! hidden' = tanh(W_ih · input + W_hh · hidden + b_h)
//! output  = W_ho · hidden' + b_o
//! ```
//!
//! All parameters live in one contiguous buffer that is tiled by the five
//! blocks of a [`MindLayout`]. Evolution only ever touches that buffer.

use std::ops::Range;

use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::rng::Random;

/// Input, output and hidden sizes of a mind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindShape {
    /// Number of input values (`ni`).
    pub inputs: usize,
    /// Number of output values (`no`).
    pub outputs: usize,
    /// Number of hidden recurrent units (`nh`).
    pub hidden: usize,
}

impl MindShape {
    /// Creates a shape from `(ni, no, nh)`.
    pub fn new(inputs: usize, outputs: usize, hidden: usize) -> Self {
        Self {
            inputs,
            outputs,
            hidden,
        }
    }

    /// Total parameter count: `ni*nh + nh*nh + nh + nh*no + no`.
    pub fn weight_count(&self) -> usize {
        let Self {
            inputs: ni,
            outputs: no,
            hidden: nh,
        } = *self;
        ni * nh + nh * nh + nh + nh * no + no
    }
}

/// One of the five logical sub-blocks of the weight buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    /// Input-to-hidden matrix, `nh x ni`.
    InputHidden,
    /// Hidden-to-hidden matrix, `nh x nh`.
    HiddenHidden,
    /// Hidden bias, `nh`.
    HiddenBias,
    /// Hidden-to-output matrix, `no x nh`.
    HiddenOutput,
    /// Output bias, `no`.
    OutputBias,
}

/// Position of every [`Block`] inside the weight buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MindLayout {
    input_hidden: Range<usize>,
    hidden_hidden: Range<usize>,
    hidden_bias: Range<usize>,
    hidden_output: Range<usize>,
    output_bias: Range<usize>,
}

impl MindLayout {
    /// Lays the blocks out back to back.
    ///
    /// # Panics
    ///
    /// Panics if the blocks do not tile exactly `shape.weight_count()` values.
    /// A mismatch would alias weight regions and is never recoverable.
    pub fn new(shape: MindShape) -> Self {
        let MindShape {
            inputs: ni,
            outputs: no,
            hidden: nh,
        } = shape;

        let mut cursor = 0;
        let mut take = |len: usize| {
            let range = cursor..cursor + len;
            cursor += len;
            range
        };

        let layout = Self {
            input_hidden: take(ni * nh),
            hidden_hidden: take(nh * nh),
            hidden_bias: take(nh),
            hidden_output: take(nh * no),
            output_bias: take(no),
        };

        assert_eq!(
            cursor,
            shape.weight_count(),
            "mind weight blocks do not tile the parameter buffer"
        );
        layout
    }

    /// Range of `block` inside the weight buffer.
    pub fn range(&self, block: Block) -> Range<usize> {
        match block {
            Block::InputHidden => self.input_hidden.clone(),
            Block::HiddenHidden => self.hidden_hidden.clone(),
            Block::HiddenBias => self.hidden_bias.clone(),
            Block::HiddenOutput => self.hidden_output.clone(),
            Block::OutputBias => self.output_bias.clone(),
        }
    }

    /// All block ranges in buffer order.
    pub fn ranges(&self) -> [Range<usize>; 5] {
        [
            self.input_hidden.clone(),
            self.hidden_hidden.clone(),
            self.hidden_bias.clone(),
            self.hidden_output.clone(),
            self.output_bias.clone(),
        ]
    }

    /// One past the last weight index.
    pub fn len(&self) -> usize {
        self.output_bias.end
    }

    /// True for the degenerate shape with no parameters at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Recurrent network with persistent hidden state.
///
/// Cloning a mind copies its genome (`input`, `output` and weights) but starts
/// the copy with a zeroed hidden state: offspring never inherit transient
/// activations.
#[derive(Debug)]
pub struct Mind {
    /// Sensed values, written before every [`Mind::forward`].
    pub input: Array1<f32>,
    /// Motor values produced by the last [`Mind::forward`].
    pub output: Array1<f32>,
    weight: Vec<f32>,
    memory: Array1<f32>,
    shape: MindShape,
    layout: MindLayout,
}

impl Clone for Mind {
    fn clone(&self) -> Self {
        Self {
            input: self.input.clone(),
            output: self.output.clone(),
            weight: self.weight.clone(),
            memory: Array1::zeros(self.shape.hidden),
            shape: self.shape,
            layout: self.layout.clone(),
        }
    }
}

impl Mind {
    /// Creates a mind with all weights, buffers and memory set to zero.
    pub fn new(shape: MindShape) -> Self {
        Self::with_weights(shape, vec![0.0; shape.weight_count()])
    }

    /// Creates a mind around an existing parameter buffer.
    ///
    /// # Panics
    ///
    /// Panics if `weight.len()` differs from `shape.weight_count()`.
    pub fn with_weights(shape: MindShape, weight: Vec<f32>) -> Self {
        let layout = MindLayout::new(shape);
        assert_eq!(
            weight.len(),
            layout.len(),
            "mind parameter buffer has the wrong length"
        );

        Self {
            input: Array1::zeros(shape.inputs),
            output: Array1::zeros(shape.outputs),
            weight,
            memory: Array1::zeros(shape.hidden),
            shape,
            layout,
        }
    }

    /// Creates a mind whose weights are drawn from the standard normal distribution.
    pub fn random<R: Random + ?Sized>(shape: MindShape, rng: &mut R) -> Self {
        let mut mind = Self::new(shape);
        mind.randomize(rng);
        mind
    }

    /// Shape this mind was built with.
    pub fn shape(&self) -> MindShape {
        self.shape
    }

    /// Block layout of the weight buffer.
    pub fn layout(&self) -> &MindLayout {
        &self.layout
    }

    /// The full parameter buffer.
    pub fn weights(&self) -> &[f32] {
        &self.weight
    }

    /// Mutable access to the full parameter buffer.
    pub fn weights_mut(&mut self) -> &mut [f32] {
        &mut self.weight
    }

    /// The parameters of one block.
    pub fn block(&self, block: Block) -> &[f32] {
        &self.weight[self.layout.range(block)]
    }

    /// Mutable access to the parameters of one block.
    pub fn block_mut(&mut self, block: Block) -> &mut [f32] {
        let range = self.layout.range(block);
        &mut self.weight[range]
    }

    /// Current hidden state.
    pub fn memory(&self) -> &Array1<f32> {
        &self.memory
    }

    /// Clears the hidden state.
    pub fn reset_memory(&mut self) {
        self.memory.fill(0.0);
    }

    /// Runs one recurrent step, consuming `input` and `memory` and producing `output`.
    ///
    /// The new hidden state is computed into its own buffer before it replaces
    /// `memory`, so every unit reads the previous activations.
    pub fn forward(&mut self) {
        let MindShape {
            inputs: ni,
            outputs: no,
            hidden: nh,
        } = self.shape;

        let w_ih = self.matrix(Block::InputHidden, (nh, ni));
        let w_hh = self.matrix(Block::HiddenHidden, (nh, nh));
        let b_h = self.vector(Block::HiddenBias);
        let w_ho = self.matrix(Block::HiddenOutput, (no, nh));
        let b_o = self.vector(Block::OutputBias);

        let mut hidden = w_ih.dot(&self.input);
        hidden += &w_hh.dot(&self.memory);
        hidden += &b_h;
        hidden.mapv_inplace(f32::tanh);

        let mut output = w_ho.dot(&hidden);
        output += &b_o;

        self.memory = hidden;
        self.output = output;
    }

    /// Overwrites every weight with a standard normal sample.
    pub fn randomize<R: Random + ?Sized>(&mut self, rng: &mut R) {
        self.randomize_with(|| rng.normal() as f32);
    }

    /// Overwrites every weight with values drawn from `sample`.
    pub fn randomize_with(&mut self, mut sample: impl FnMut() -> f32) {
        for w in &mut self.weight {
            *w = sample();
        }
    }

    /// Adds independent `sigma * N(0, 1)` noise to every weight.
    pub fn vary<R: Random + ?Sized>(&mut self, rng: &mut R, sigma: f64) {
        for w in &mut self.weight {
            *w += (sigma * rng.normal()) as f32;
        }
    }

    fn matrix(&self, block: Block, shape: (usize, usize)) -> ArrayView2<'_, f32> {
        ArrayView2::from_shape(shape, self.block(block))
            .expect("weight block does not match its declared shape")
    }

    fn vector(&self, block: Block) -> ArrayView1<'_, f32> {
        ArrayView1::from(self.block(block))
    }
}
