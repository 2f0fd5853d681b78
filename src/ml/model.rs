// ============================================================
// Layer 5 — Census Classifier Network
// ============================================================
// The learned half of the pipeline: a small feed-forward net
// over the encoded feature vector.
//
//   features [batch, input_dim]
//       │  Linear → ReLU
//       ▼
//   hidden   [batch, hidden_dim]
//       │  Linear
//       ▼
//   logits   [batch, num_classes]
//
// The predicted class is the argmax of the logits; its name
// comes from the pipeline's class list, not from the network.

use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::relu,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct CensusClassifierConfig {
    pub input_dim:  usize,
    pub hidden_dim: usize,
    #[config(default = 2)]
    pub num_classes: usize,
}

impl CensusClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> CensusClassifier<B> {
        CensusClassifier {
            hidden: LinearConfig::new(self.input_dim, self.hidden_dim).init(device),
            output: LinearConfig::new(self.hidden_dim, self.num_classes).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct CensusClassifier<B: Backend> {
    pub hidden: Linear<B>,
    pub output: Linear<B>,
}

impl<B: Backend> CensusClassifier<B> {
    /// features: [batch, input_dim] → logits: [batch, num_classes]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let hidden = relu(self.hidden.forward(features));
        self.output.forward(hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let model = CensusClassifierConfig::new(5, 4).init::<TestBackend>(&device);
        let features = Tensor::<TestBackend, 2>::zeros([3, 5], &device);
        assert_eq!(model.forward(features).dims(), [3, 2]);
    }

    #[test]
    fn test_num_classes_is_configurable() {
        let device = Default::default();
        let model = CensusClassifierConfig::new(5, 4)
            .with_num_classes(3)
            .init::<TestBackend>(&device);
        let features = Tensor::<TestBackend, 2>::ones([1, 5], &device);
        assert_eq!(model.forward(features).dims(), [1, 3]);
    }
}
