use rand::Rng;

/// Fully-connected feed-forward value estimator, ReLU on hidden layers
/// and a linear output layer. No biases.
///
/// Training is deliberately crude: instead of backpropagation, every
/// weight takes a small random step scaled by the output error. The
/// estimator only has to be good enough to drive visibly different
/// greedy play, not to converge.
#[derive(Debug, Clone)]
pub(crate) struct ValueNetwork {
    /// `weights[layer][input][output]`.
    weights: Vec<Vec<Vec<f32>>>,
}

/// Scale of the per-weight random step during [`ValueNetwork::nudge`].
const NUDGE_RATE: f32 = 0.01;

impl ValueNetwork {
    /// Random network with weights uniform in `[-1, 1)`.
    pub(crate) fn new<R>(inputs: usize, hidden: &[usize], outputs: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut sizes = Vec::with_capacity(hidden.len() + 2);
        sizes.push(inputs);
        sizes.extend_from_slice(hidden);
        sizes.push(outputs);

        let weights = sizes
            .windows(2)
            .map(|pair| {
                (0..pair[0])
                    .map(|_| {
                        (0..pair[1])
                            .map(|_| (rng.random::<f32>() - 0.5) * 2.0)
                            .collect()
                    })
                    .collect()
            })
            .collect();
        Self { weights }
    }

    /// Forward pass; the returned vector has one value per output.
    pub(crate) fn forward(&self, input: &[f32]) -> Vec<f32> {
        debug_assert_eq!(input.len(), self.weights[0].len());
        let last = self.weights.len() - 1;
        let mut activations = input.to_vec();
        for (i, layer) in self.weights.iter().enumerate() {
            let mut next = vec![0.0; layer[0].len()];
            for (input_value, outgoing) in activations.iter().zip(layer) {
                for (sum, weight) in next.iter_mut().zip(outgoing) {
                    *sum += input_value * weight;
                }
            }
            if i < last {
                for value in &mut next {
                    *value = value.max(0.0);
                }
            }
            activations = next;
        }
        activations
    }

    /// Random-step update pulling `action`'s estimate toward `target`.
    ///
    /// Every weight in the network moves by `error * NUDGE_RATE * u`
    /// with `u` uniform in `[-0.5, 0.5)`, so the expected step is zero
    /// and its spread grows with the error.
    pub(crate) fn nudge<R>(&mut self, input: &[f32], action: usize, target: f32, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let error = target - self.forward(input)[action];
        for layer in &mut self.weights {
            for outgoing in layer {
                for weight in outgoing.iter_mut() {
                    *weight += error * NUDGE_RATE * (rng.random::<f32>() - 0.5);
                }
            }
        }
    }

    /// Copies another network's weights into this one.
    pub(crate) fn copy_weights_from(&mut self, other: &ValueNetwork) {
        self.weights.clone_from(&other.weights);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn shapes_match_the_layer_sizes() {
        let mut rng = Pcg64Mcg::seed_from_u64(10);
        let net = ValueNetwork::new(6, &[32, 32], 5, &mut rng);
        assert_eq!(net.weights.len(), 3);
        assert_eq!(net.weights[0].len(), 6);
        assert_eq!(net.weights[0][0].len(), 32);
        assert_eq!(net.weights[2].len(), 32);
        assert_eq!(net.weights[2][0].len(), 5);
        assert_eq!(net.forward(&[0.0; 6]).len(), 5);
    }

    #[test]
    fn zero_input_yields_zero_output() {
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        let net = ValueNetwork::new(6, &[32, 32], 5, &mut rng);
        // No biases, so a zero vector stays zero through every layer.
        assert_eq!(net.forward(&[0.0; 6]), vec![0.0; 5]);
    }

    #[test]
    fn output_layer_is_linear() {
        let mut rng = Pcg64Mcg::seed_from_u64(12);
        let net = ValueNetwork::new(2, &[4], 3, &mut rng);
        // A linear output layer may go negative; ReLU there could not.
        let mut saw_negative = false;
        for step in 0..50_u8 {
            let x = f32::from(step) * 0.37 - 9.0;
            if net.forward(&[x, -x]).iter().any(|&v| v < 0.0) {
                saw_negative = true;
                break;
            }
        }
        assert!(saw_negative);
    }

    #[test]
    fn copied_weights_agree_on_every_input() {
        let mut rng = Pcg64Mcg::seed_from_u64(13);
        let source = ValueNetwork::new(3, &[8], 2, &mut rng);
        let mut sink = ValueNetwork::new(3, &[8], 2, &mut rng);
        sink.copy_weights_from(&source);
        let input = [1.5, -2.0, 0.25];
        assert_eq!(source.forward(&input), sink.forward(&input));
    }

    #[test]
    fn nudge_perturbs_weights() {
        let mut rng = Pcg64Mcg::seed_from_u64(14);
        let mut net = ValueNetwork::new(3, &[8], 2, &mut rng);
        let before = net.clone();
        net.nudge(&[1.0, 2.0, 3.0], 0, 100.0, &mut rng);
        assert_ne!(net.forward(&[1.0, 2.0, 3.0]), before.forward(&[1.0, 2.0, 3.0]));
    }
}
