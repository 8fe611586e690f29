//! Engine construction options (§4.8 "Construction").

/// `{gemini_api_key?, roles?, robot_config?, wait_for_human_tasks?, verbose?}`
/// from §4.8 — `roles` and `robot_config` are carried by the workflow
/// definition and the actor dispatcher respectively, so the options an
/// engine itself needs are the credential, the two actor toggles, the
/// verbosity flag, and the run-to-completion step bound.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub gemini_api_key: Option<String>,
    pub robot_simulation: bool,
    pub wait_for_human_tasks: bool,
    pub verbose: bool,
    /// Bound on `run`'s `run_step` loop, to prevent runaway cycles (§4.8).
    pub max_steps: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            robot_simulation: false,
            wait_for_human_tasks: false,
            verbose: false,
            max_steps: 1000,
        }
    }
}

impl EngineOptions {
    #[must_use]
    pub fn from_env() -> Self {
        let actor_config = flowmind_actor::ActorConfig::from_env();
        Self {
            gemini_api_key: actor_config.gemini_api_key,
            robot_simulation: actor_config.robot_simulation,
            wait_for_human_tasks: actor_config.wait_for_human_tasks,
            ..Self::default()
        }
    }

    pub(crate) fn actor_config(&self) -> flowmind_actor::ActorConfig {
        flowmind_actor::ActorConfig {
            gemini_api_key: self.gemini_api_key.clone(),
            robot_simulation: self.robot_simulation,
            wait_for_human_tasks: self.wait_for_human_tasks,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_max_steps_is_one_thousand() {
        assert_eq!(EngineOptions::default().max_steps, 1000);
    }
}
