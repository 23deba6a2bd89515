// ============================================================
// Layer 5 - Weight Initialisation
// ============================================================
// Starting values for every layer, chosen by layer kind:
//
//   Conv   (Conv1d, ConvTranspose1d)
//          weight ~ Xavier normal, std = √(2 / (fan_in + fan_out))
//          bias   untouched (framework default)
//
//   Norm   (BatchNorm)
//          gamma  ~ Normal(1.0, 0.02)
//          beta   = 0
//
//   Linear weight ~ Xavier uniform, bound = √(6 / (fan_in + fan_out))
//          bias   = 0.01
//
//   Other  untouched
//
// The kind is a property of the layer's Rust type, fixed when
// the layer is built. Each model passes the layers it owns
// through `init_layer` right after construction.
//
// Fan computation for a conv weight of shape [a, b, k]:
//   fan_in  = b · k
//   fan_out = a · k
// Burn stores Conv1d as [out, in, k] and ConvTranspose1d as
// [in, out, k]; Xavier only uses the sum, so one rule fits both.
//
// Reference: Glorot & Bengio (2010)
//            Radford et al. (2016) DCGAN initialisation

use burn::{
    module::Param,
    nn::{
        conv::{Conv1d, ConvTranspose1d},
        BatchNorm, LayerNorm, Linear,
    },
    prelude::*,
    tensor::Distribution,
};

const NORM_SCALE_MEAN: f64 = 1.0;
const NORM_SCALE_STD:  f64 = 0.02;
const LINEAR_BIAS:     f64 = 0.01;

/// Structural category a layer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Conv,
    Norm,
    Linear,
    Other,
}

/// A layer that knows its kind and how to draw its starting weights.
///
/// The default `initialize` leaves the layer as constructed, which is
/// the policy for [`LayerKind::Other`].
pub trait Initialize: Sized {
    const KIND: LayerKind;

    fn initialize(self) -> Self {
        self
    }
}

/// Apply `layer`'s initialisation policy.
pub fn init_layer<L: Initialize>(layer: L) -> L {
    tracing::trace!(kind = ?L::KIND, "initialising layer");
    layer.initialize()
}

fn conv_fans(dims: [usize; 3]) -> (usize, usize) {
    let receptive = dims[2];
    (dims[1] * receptive, dims[0] * receptive)
}

fn xavier_normal<B: Backend, const D: usize>(
    like:    &Tensor<B, D>,
    fan_in:  usize,
    fan_out: usize,
) -> Tensor<B, D> {
    let std = (2.0 / (fan_in + fan_out) as f64).sqrt();
    Tensor::random(like.shape(), Distribution::Normal(0.0, std), &like.device())
}

fn xavier_uniform<B: Backend, const D: usize>(
    like:    &Tensor<B, D>,
    fan_in:  usize,
    fan_out: usize,
) -> Tensor<B, D> {
    let bound = (6.0 / (fan_in + fan_out) as f64).sqrt();
    Tensor::random(like.shape(), Distribution::Uniform(-bound, bound), &like.device())
}

impl<B: Backend> Initialize for Conv1d<B> {
    const KIND: LayerKind = LayerKind::Conv;

    fn initialize(mut self) -> Self {
        let weight = self.weight.val();
        let (fan_in, fan_out) = conv_fans(weight.dims());
        self.weight = Param::from_tensor(xavier_normal(&weight, fan_in, fan_out));
        self
    }
}

impl<B: Backend> Initialize for ConvTranspose1d<B> {
    const KIND: LayerKind = LayerKind::Conv;

    fn initialize(mut self) -> Self {
        let weight = self.weight.val();
        let (fan_in, fan_out) = conv_fans(weight.dims());
        self.weight = Param::from_tensor(xavier_normal(&weight, fan_in, fan_out));
        self
    }
}

impl<B: Backend, const D: usize> Initialize for BatchNorm<B, D> {
    const KIND: LayerKind = LayerKind::Norm;

    fn initialize(mut self) -> Self {
        let gamma = self.gamma.val();
        let scale = Tensor::random(
            gamma.shape(),
            Distribution::Normal(NORM_SCALE_MEAN, NORM_SCALE_STD),
            &gamma.device(),
        );
        self.gamma = Param::from_tensor(scale);
        self.beta  = Param::from_tensor(self.beta.val().zeros_like());
        self
    }
}

impl<B: Backend> Initialize for Linear<B> {
    const KIND: LayerKind = LayerKind::Linear;

    fn initialize(mut self) -> Self {
        // Burn stores linear weights as [d_input, d_output]
        let weight = self.weight.val();
        let [fan_in, fan_out] = weight.dims();
        self.weight = Param::from_tensor(xavier_uniform(&weight, fan_in, fan_out));
        self.bias = self
            .bias
            .map(|bias| Param::from_tensor(bias.val().full_like(LINEAR_BIAS)));
        self
    }
}

impl<B: Backend> Initialize for LayerNorm<B> {
    const KIND: LayerKind = LayerKind::Other;
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::nn::{
        conv::{Conv1dConfig, ConvTranspose1dConfig},
        BatchNormConfig, LayerNormConfig, LinearConfig,
    };

    type TestBackend = burn::backend::NdArray;

    fn values<const D: usize>(t: Tensor<TestBackend, D>) -> Vec<f32> {
        t.into_data().to_vec::<f32>().unwrap()
    }

    fn mean_and_std(v: &[f32]) -> (f64, f64) {
        let n    = v.len() as f64;
        let mean = v.iter().map(|&x| x as f64).sum::<f64>() / n;
        let var  = v.iter().map(|&x| (x as f64 - mean).powi(2)).sum::<f64>() / n;
        (mean, var.sqrt())
    }

    #[test]
    fn test_kinds() {
        assert_eq!(<Conv1d<TestBackend> as Initialize>::KIND, LayerKind::Conv);
        assert_eq!(<ConvTranspose1d<TestBackend> as Initialize>::KIND, LayerKind::Conv);
        assert_eq!(<BatchNorm<TestBackend, 1> as Initialize>::KIND, LayerKind::Norm);
        assert_eq!(<Linear<TestBackend> as Initialize>::KIND, LayerKind::Linear);
        assert_eq!(<LayerNorm<TestBackend> as Initialize>::KIND, LayerKind::Other);
    }

    #[test]
    fn test_init_layer_applies_kind_policy() {
        let device = Default::default();
        let norm: BatchNorm<TestBackend, 1> = BatchNormConfig::new(32).init(&device);
        let norm = init_layer(norm);
        assert!(values(norm.beta.val()).iter().all(|&v| v == 0.0));
        assert!(values(norm.gamma.val()).iter().any(|&v| v != 1.0));
    }

    #[test]
    fn test_conv_weights_change() {
        let device = Default::default();
        let conv: Conv1d<TestBackend> = Conv1dConfig::new(4, 8, 4).init(&device);
        let before = values(conv.weight.val());
        let conv   = conv.initialize();
        assert_ne!(before, values(conv.weight.val()));
    }

    #[test]
    fn test_conv_bias_left_at_default() {
        let device = Default::default();
        let conv: Conv1d<TestBackend> = Conv1dConfig::new(4, 8, 4).init(&device);
        let before = values(conv.bias.as_ref().unwrap().val());
        let conv   = conv.initialize();
        assert_eq!(before, values(conv.bias.as_ref().unwrap().val()));
    }

    #[test]
    fn test_conv_xavier_normal_spread() {
        // fan_in = fan_out = 64 * 4 → std = √(2 / 512) = 0.0625
        let device = Default::default();
        let conv: Conv1d<TestBackend> = Conv1dConfig::new(64, 64, 4).init(&device);
        let conv = conv.initialize();
        let (mean, std) = mean_and_std(&values(conv.weight.val()));
        assert!(mean.abs() < 0.01, "mean = {mean}");
        assert!((std - 0.0625).abs() < 0.0625 * 0.1, "std = {std}");
    }

    #[test]
    fn test_transposed_conv_keeps_shape() {
        let device = Default::default();
        let deconv: ConvTranspose1d<TestBackend> =
            ConvTranspose1dConfig::new([16, 8], 4).init(&device);
        let dims   = deconv.weight.dims();
        let before = values(deconv.weight.val());
        let deconv = deconv.initialize();
        assert_eq!(deconv.weight.dims(), dims);
        assert_ne!(before, values(deconv.weight.val()));
    }

    #[test]
    fn test_batch_norm_scale_and_shift() {
        let device = Default::default();
        let norm: BatchNorm<TestBackend, 1> = BatchNormConfig::new(512).init(&device);
        let norm = norm.initialize();

        let (mean, std) = mean_and_std(&values(norm.gamma.val()));
        assert!((mean - 1.0).abs() < 0.01, "mean = {mean}");
        assert!(std > 0.0 && std < 0.04, "std = {std}");
        assert!(values(norm.beta.val()).iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_linear_uniform_and_bias() {
        let device = Default::default();
        let linear: Linear<TestBackend> = LinearConfig::new(30, 20).init(&device);
        let linear = linear.initialize();

        let bound = (6.0f64 / 50.0).sqrt() as f32;
        assert!(values(linear.weight.val()).iter().all(|w| w.abs() <= bound));
        let bias = values(linear.bias.as_ref().unwrap().val());
        assert!(bias.iter().all(|&b| (b - 0.01).abs() < 1e-7));
    }

    #[test]
    fn test_other_kind_is_untouched() {
        let device = Default::default();
        let norm: LayerNorm<TestBackend> = LayerNormConfig::new(6).init(&device);
        let x = Tensor::<TestBackend, 2>::random([3, 6], Distribution::Normal(0.0, 1.0), &device);

        let before = values(norm.forward(x.clone()));
        let norm   = norm.initialize();
        assert_eq!(before, values(norm.forward(x)));
    }
}
