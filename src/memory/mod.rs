use crate::configuration::scenario::MemoryScenario;
use crate::error::{PlannerError, Result};
use crate::usage::{self, Pressure};

pub const DEFAULT_MEMORY_OPTIONS: [u32; 3] = [8, 16, 32];
pub const DEFAULT_MEMORY_GB: u32 = 16;

/// Unified memory size, one of the configured options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemorySize(u32);

impl MemorySize {
    pub fn new(size_in_gb: u32, options: &[u32]) -> Result<MemorySize> {
        if size_in_gb == 0 || !options.contains(&size_in_gb) {
            return Err(PlannerError::InvalidMemory(size_in_gb));
        }

        Ok(MemorySize(size_in_gb))
    }

    pub fn gb(&self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MemoryAssessment<'a> {
    pub scenario: &'a MemoryScenario,
    pub pressure: Pressure,
    pub needs_upgrade: bool,
}

impl MemoryScenario {
    pub fn assess(&self, memory: MemorySize) -> MemoryAssessment<'_> {
        MemoryAssessment {
            scenario: self,
            pressure: usage::classify_pressure(self.pressure as f64),
            needs_upgrade: memory.gb() < self.recommended_gb,
        }
    }
}

pub fn assess_all(scenarios: &[MemoryScenario], memory: MemorySize) -> Vec<MemoryAssessment<'_>> {
    scenarios.iter().map(|s| s.assess(memory)).collect()
}

fn scenario(
    id: &str,
    name: &str,
    pressure: u8,
    recommended_gb: u32,
    recommendation: &str,
    apps: &[&str],
) -> MemoryScenario {
    MemoryScenario {
        id: id.to_string(),
        name: name.to_string(),
        pressure,
        recommended_gb,
        recommendation: recommendation.to_string(),
        apps: apps.iter().map(|app| app.to_string()).collect(),
    }
}

/// Scenarios used when the planner data doesn't define any.
pub fn default_scenarios() -> Vec<MemoryScenario> {
    vec![
        scenario(
            "gaming",
            "Gaming",
            85,
            24,
            "Upgrade to 24GB for smoother gaming",
            &["Steam", "Discord", "Spotify"],
        ),
        scenario(
            "video",
            "Video Editing",
            60,
            16,
            "16GB sufficient for most 4K editing",
            &["Chrome (10)", "Photoshop", "Spotify"],
        ),
        scenario(
            "data",
            "Data Analysis",
            35,
            8,
            "8GB sufficient for simple analysis",
            &["Excel", "Python", "Chrome (5)"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_memory_sizes() {
        assert_eq!(MemorySize::new(16, &DEFAULT_MEMORY_OPTIONS).unwrap().gb(), 16);
        assert!(matches!(
            MemorySize::new(12, &DEFAULT_MEMORY_OPTIONS),
            Err(PlannerError::InvalidMemory(12))
        ));
        assert!(matches!(
            MemorySize::new(0, &[0, 8]),
            Err(PlannerError::InvalidMemory(0))
        ));
    }

    #[test]
    fn assesses_default_scenarios() {
        let scenarios = default_scenarios();
        let memory = MemorySize::new(16, &DEFAULT_MEMORY_OPTIONS).unwrap();
        let assessments = assess_all(&scenarios, memory);

        let summary: Vec<(&str, Pressure, bool)> = assessments
            .iter()
            .map(|a| (a.scenario.id.as_str(), a.pressure, a.needs_upgrade))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("gaming", Pressure::High, true),
                ("video", Pressure::Medium, false),
                ("data", Pressure::Low, false),
            ]
        );
    }

    #[test]
    fn small_memory_needs_upgrades() {
        let scenarios = default_scenarios();
        let memory = MemorySize::new(8, &DEFAULT_MEMORY_OPTIONS).unwrap();
        let upgrades: Vec<bool> = assess_all(&scenarios, memory)
            .iter()
            .map(|a| a.needs_upgrade)
            .collect();
        assert_eq!(upgrades, vec![true, true, false]);
    }
}
