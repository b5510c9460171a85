use glider_shared::{ControlInput, Observation};

pub trait Policy: Send {
    fn name(&self) -> &str;

    /// Pick this tick's control. `None` means the policy has nothing to offer
    /// and the runner substitutes neutral control.
    fn act(&mut self, obs: &Observation) -> Option<ControlInput>;
}

/// Never thrusts or steers - the baseline every other policy is measured against.
pub struct NeutralPolicy;

impl Policy for NeutralPolicy {
    fn name(&self) -> &str {
        "neutral"
    }

    fn act(&mut self, _obs: &Observation) -> Option<ControlInput> {
        Some(ControlInput::none())
    }
}

/// Adapts an external predict function (e.g. a trained model) into a policy.
pub struct PredictFn<F> {
    name: String,
    predict: F,
}

impl<F> PredictFn<F>
where
    F: FnMut(&Observation) -> Option<ControlInput> + Send,
{
    pub fn new(name: impl Into<String>, predict: F) -> Self {
        Self {
            name: name.into(),
            predict,
        }
    }
}

impl<F> Policy for PredictFn<F>
where
    F: FnMut(&Observation) -> Option<ControlInput> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn act(&mut self, obs: &Observation) -> Option<ControlInput> {
        (self.predict)(obs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glider_shared::{Action, GlideObservation};

    fn obs() -> Observation {
        Observation::Glide(GlideObservation {
            plane_x: 180.0,
            plane_y: 550.0,
            wind_x: 20.0,
            time_remaining: 15.0,
        })
    }

    #[test]
    fn test_neutral_never_thrusts() {
        let mut policy = NeutralPolicy;
        assert_eq!(policy.act(&obs()), Some(ControlInput::none()));
    }

    #[test]
    fn test_predict_fn_decodes_indices() {
        let mut policy = PredictFn::new("argmax", |o: &Observation| {
            let v = o.to_vec();
            let index = if v[0] > v[2] { 0 } else { 2 };
            Some(Action::from_index(index).into())
        });
        assert_eq!(policy.name(), "argmax");
        assert_eq!(policy.act(&obs()), Some(Action::Left.into()));
    }
}
