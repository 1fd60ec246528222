//! The compiled-in curriculum.
//!
//! Steps may be appended over time; persisted progress is index-aligned and
//! padded on load, so existing learners keep their state.

use crate::model::{LearningStep, StepStatus, StepVisual};

pub const STEP_COUNT: usize = 8;

static STEPS: [LearningStep; STEP_COUNT] = [
    LearningStep {
        title: "Counting at Scale",
        description: "Why exact distinct counts stop fitting in memory.",
        route: "/sketches/intro",
        default_status: StepStatus::Unlocked,
        visual: StepVisual {
            planet: "mercury",
            color: "#b1adad",
            orbit_radius: 4.0,
        },
    },
    LearningStep {
        title: "Hashing to the Unit Interval",
        description: "Turning items into uniformly spread numbers between 0 and 1.",
        route: "/sketches/hashing",
        default_status: StepStatus::Locked,
        visual: StepVisual {
            planet: "venus",
            color: "#e3bb76",
            orbit_radius: 6.0,
        },
    },
    LearningStep {
        title: "The Theta Threshold",
        description: "Keeping only hashes below theta and estimating from what survives.",
        route: "/sketches/theta",
        default_status: StepStatus::Locked,
        visual: StepVisual {
            planet: "earth",
            color: "#6b93d6",
            orbit_radius: 8.0,
        },
    },
    LearningStep {
        title: "Sketch Set Operations",
        description: "Union, intersection and difference without the raw data.",
        route: "/sketches/set-operations",
        default_status: StepStatus::Locked,
        visual: StepVisual {
            planet: "mars",
            color: "#c1440e",
            orbit_radius: 10.0,
        },
    },
    LearningStep {
        title: "The Perceptron",
        description: "A single artificial neuron and the decision it makes.",
        route: "/neural/perceptron",
        default_status: StepStatus::Locked,
        visual: StepVisual {
            planet: "jupiter",
            color: "#d8ca9d",
            orbit_radius: 13.0,
        },
    },
    LearningStep {
        title: "Weighted Sums",
        description: "Inputs times weights plus bias, computed step by step.",
        route: "/neural/weighted-sum",
        default_status: StepStatus::Locked,
        visual: StepVisual {
            planet: "saturn",
            color: "#ead6b8",
            orbit_radius: 16.0,
        },
    },
    LearningStep {
        title: "Activation Functions",
        description: "Step, sigmoid and ReLU, and why non-linearity matters.",
        route: "/neural/activation",
        default_status: StepStatus::Locked,
        visual: StepVisual {
            planet: "uranus",
            color: "#d1e7e7",
            orbit_radius: 19.0,
        },
    },
    LearningStep {
        title: "Learning From Mistakes",
        description: "Nudging weights toward the right answer, one example at a time.",
        route: "/neural/training",
        default_status: StepStatus::Locked,
        visual: StepVisual {
            planet: "neptune",
            color: "#5b5ddf",
            orbit_radius: 22.0,
        },
    },
];

/// All curriculum steps in learning order.
#[must_use]
pub fn steps() -> &'static [LearningStep] {
    &STEPS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn only_first_step_starts_unlocked() {
        assert_eq!(steps()[0].default_status, StepStatus::Unlocked);
        assert!(
            steps()[1..]
                .iter()
                .all(|step| step.default_status == StepStatus::Locked)
        );
    }

    #[test]
    fn routes_are_unique_and_absolute() {
        let routes: HashSet<_> = steps().iter().map(|step| step.route).collect();
        assert_eq!(routes.len(), STEP_COUNT);
        assert!(steps().iter().all(|step| step.route.starts_with('/')));
    }
}
