use serde::Serialize;

use crate::model::StepStatus;

/// Theme metadata handed to the rendering layer untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepVisual {
    pub planet: &'static str,
    pub color: &'static str,
    pub orbit_radius: f32,
}

/// One compiled-in unit of the curriculum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LearningStep {
    pub title: &'static str,
    pub description: &'static str,
    pub route: &'static str,
    pub default_status: StepStatus,
    pub visual: StepVisual,
}
