pub mod threat;
pub mod dodger;
pub mod leveler;

pub use dodger::DodgerPolicy;
pub use leveler::LevelerPolicy;

use glider_shared::{SimConfig, Variant};

use crate::error::SimError;
use crate::policy::{NeutralPolicy, Policy};

pub const POLICY_NAMES: [&str; 3] = ["neutral", "dodger", "leveler"];

/// Build the named policy for flights under `config`.
pub fn resolve_policy(name: &str, config: &SimConfig) -> Result<Box<dyn Policy>, SimError> {
    match name {
        "neutral" => Ok(Box::new(NeutralPolicy)),
        "dodger" => Ok(Box::new(DodgerPolicy::new(config))),
        "leveler" => Ok(Box::new(LevelerPolicy::new(config))),
        other => Err(SimError::UnknownPolicy(other.to_string())),
    }
}

/// The built-in autopilot suited to a variant.
pub fn default_policy_name(variant: Variant) -> &'static str {
    match variant {
        Variant::Glide | Variant::MomentumGlide => "dodger",
        Variant::Landing => "leveler",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_name_resolves() {
        for name in POLICY_NAMES {
            let policy = resolve_policy(name, &SimConfig::glide()).unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!(policy.name(), name);
        }
        assert!(matches!(resolve_policy("ace", &SimConfig::glide()), Err(SimError::UnknownPolicy(_))));
    }
}
