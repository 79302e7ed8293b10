#[derive(Clone, Debug, PartialEq)]
pub struct MemoryScenario {
    pub id: String,
    pub name: String,
    /// Memory pressure in percent (0..=100).
    pub pressure: u8,
    pub recommended_gb: u32,
    pub recommendation: String,
    pub apps: Vec<String>,
}

impl MemoryScenario {
    pub fn new() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            pressure: 0,
            recommended_gb: 0,
            recommendation: String::new(),
            apps: Vec::new(),
        }
    }
}
