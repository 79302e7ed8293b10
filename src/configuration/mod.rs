use std::{
    fs::File,
    io::{BufReader, ErrorKind, Read},
    str::FromStr,
};

use chrono::{DateTime, Utc};
use log::{debug, info};
use xml::reader::{EventReader, XmlEvent as XmlReaderEvent};

pub mod catalog_item;
pub mod category;
pub mod preset;
pub mod scenario;
pub mod settings;
pub mod system_segment;

use catalog_item::CatalogItem;
use category::Category;
use preset::Preset;
use scenario::MemoryScenario;
use system_segment::SystemSegment;

use crate::catalog::Catalog;
use crate::error::{PlannerError, Result};
use crate::memory::{self, MemorySize};
use crate::planner::{self, StorageCapacity};
use crate::size::SizeValue;

/// The static planner data: catalog, presets, system segments and the
/// storage and memory options.
pub struct Configuration {
    pub catalog: Catalog,
    pub presets: Vec<Preset>,
    pub system: Vec<SystemSegment>,
    pub capacity_options: Vec<u32>,
    pub default_capacity: Option<u32>,
    pub memory_options: Vec<u32>,
    pub default_memory: Option<u32>,
    pub scenarios: Vec<MemoryScenario>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Replaces a leading `~` with the home directory of the current user.
pub fn expand_home(filename: &str) -> String {
    let rest = match filename.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return String::from(filename),
    };

    match dirs::home_dir() {
        Some(home_dir) => match home_dir.to_str() {
            Some(home) => format!("{}{}", home, rest),
            None => String::from(filename),
        },
        None => String::from(filename),
    }
}

fn parse_number<T: FromStr>(element: &str, attribute: &str, value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| {
        PlannerError::Configuration(format!(
            "invalid {} {} value '{}'.",
            element, attribute, value
        ))
    })
}

fn required(element: &str, attribute: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PlannerError::Configuration(format!(
            "{} is missing the '{}' attribute.",
            element, attribute
        ))),
    }
}

impl Configuration {
    pub fn new() -> Configuration {
        Configuration {
            catalog: Catalog::empty(),
            presets: Vec::new(),
            system: Vec::new(),
            capacity_options: Vec::new(),
            default_capacity: None,
            memory_options: Vec::new(),
            default_memory: None,
            scenarios: Vec::new(),
            last_modified: None,
        }
    }

    pub fn load(filename: &str) -> Result<Configuration> {
        let real_filename = expand_home(filename);

        let file = match File::open(&real_filename) {
            Ok(file) => file,
            Err(why) => match why.kind() {
                ErrorKind::NotFound => {
                    return Err(PlannerError::Configuration(format!(
                        "planner data file '{}' does not exist.",
                        filename
                    )));
                }
                _ => return Err(PlannerError::Io(why)),
            },
        };

        let last_modified = match file.metadata().and_then(|m| m.modified()) {
            Ok(modified) => Some(DateTime::<Utc>::from(modified)),
            Err(_) => None,
        };

        let mut configuration = Configuration::parse(file)?;
        configuration.last_modified = last_modified;
        info!(
            "loaded {} software item(s), {} preset(s) from {}",
            configuration.catalog.len(),
            configuration.presets.len(),
            real_filename
        );

        Ok(configuration)
    }

    pub fn parse<R: Read>(reader: R) -> Result<Configuration> {
        let mut configuration = Configuration::new();
        let mut categories: Vec<Category> = Vec::new();
        let mut items: Vec<CatalogItem> = Vec::new();
        let mut preset: Option<Preset> = None;
        let mut scenario: Option<MemoryScenario> = None;

        let mut depth = 0;
        let parser = EventReader::new(BufReader::new(reader));
        for e in parser {
            match e? {
                XmlReaderEvent::StartElement {
                    name, attributes, ..
                } => {
                    depth += 1;
                    match name.to_string().as_str() {
                        "segment" => {
                            let mut id = None;
                            let mut label = None;
                            let mut size = None;
                            for attr in attributes {
                                match attr.name.to_string().as_str() {
                                    "id" => id = Some(attr.value),
                                    "label" => label = Some(attr.value),
                                    "size" => size = Some(attr.value),
                                    _ => {}
                                }
                            }

                            let id = required("segment", "id", id)?;
                            let size = required("segment", "size", size)?.parse::<SizeValue>()?;
                            let label = label.unwrap_or_else(|| id.clone());
                            if configuration.system.iter().any(|s| s.id == id) {
                                return Err(PlannerError::DuplicateId { kind: "segment", id });
                            }
                            configuration.system.push(SystemSegment::new(id, label, size));
                        }
                        "category" => {
                            let mut category = Category::new();
                            for attr in attributes {
                                match attr.name.to_string().as_str() {
                                    "id" => category.id = attr.value,
                                    "order" => {
                                        category.order =
                                            parse_number("category", "order", &attr.value)?;
                                    }
                                    _ => {}
                                }
                            }

                            category.id = required("category", "id", Some(category.id))?;
                            categories.push(category);
                        }
                        "preset" => {
                            let mut new_preset = Preset::new();
                            for attr in attributes {
                                match attr.name.to_string().as_str() {
                                    "id" => new_preset.id = attr.value,
                                    "name" => new_preset.name = attr.value,
                                    _ => {}
                                }
                            }

                            new_preset.id = required("preset", "id", Some(new_preset.id))?;
                            if new_preset.name.is_empty() {
                                new_preset.name = new_preset.id.clone();
                            }
                            preset = Some(new_preset);
                        }
                        "item" => {
                            if depth == 4 {
                                if let Some(preset) = preset.as_mut() {
                                    for attr in attributes {
                                        if attr.name.to_string() == "ref" {
                                            preset.item_ids.push(attr.value);
                                        }
                                    }
                                }
                            } else if depth == 3 {
                                let mut id = None;
                                let mut name = None;
                                let mut size = None;
                                let mut item_category = None;
                                for attr in attributes {
                                    match attr.name.to_string().as_str() {
                                        "id" => id = Some(attr.value),
                                        "name" => name = Some(attr.value),
                                        "size" => size = Some(attr.value),
                                        "category" => item_category = Some(attr.value),
                                        _ => {}
                                    }
                                }

                                let id = required("item", "id", id)?;
                                let size = required("item", "size", size)?.parse::<SizeValue>()?;
                                let name = name.unwrap_or_else(|| id.clone());
                                let item_category =
                                    item_category.unwrap_or_else(|| category::OTHERS.to_string());
                                items.push(CatalogItem::new(id, name, size, item_category));
                            }
                        }
                        "capacities" => {
                            for attr in attributes {
                                if attr.name.to_string() == "default" {
                                    configuration.default_capacity =
                                        Some(parse_number("capacities", "default", &attr.value)?);
                                }
                            }
                        }
                        "capacity" => {
                            for attr in attributes {
                                if attr.name.to_string() == "value" {
                                    configuration
                                        .capacity_options
                                        .push(parse_number("capacity", "value", &attr.value)?);
                                }
                            }
                        }
                        "memory" => {
                            for attr in attributes {
                                if attr.name.to_string() == "default" {
                                    configuration.default_memory =
                                        Some(parse_number("memory", "default", &attr.value)?);
                                }
                            }
                        }
                        "option" => {
                            for attr in attributes {
                                if attr.name.to_string() == "value" {
                                    configuration
                                        .memory_options
                                        .push(parse_number("option", "value", &attr.value)?);
                                }
                            }
                        }
                        "scenario" => {
                            let mut new_scenario = MemoryScenario::new();
                            for attr in attributes {
                                match attr.name.to_string().as_str() {
                                    "id" => new_scenario.id = attr.value,
                                    "name" => new_scenario.name = attr.value,
                                    "pressure" => {
                                        new_scenario.pressure =
                                            parse_number("scenario", "pressure", &attr.value)?;
                                    }
                                    "recommended" => {
                                        new_scenario.recommended_gb =
                                            parse_number("scenario", "recommended", &attr.value)?;
                                    }
                                    "recommendation" => new_scenario.recommendation = attr.value,
                                    _ => {}
                                }
                            }

                            if new_scenario.pressure > 100 {
                                return Err(PlannerError::Configuration(format!(
                                    "scenario pressure must be between 0 and 100, got {}.",
                                    new_scenario.pressure
                                )));
                            }
                            new_scenario.id = required("scenario", "id", Some(new_scenario.id))?;
                            scenario = Some(new_scenario);
                        }
                        "app" => {
                            if let Some(scenario) = scenario.as_mut() {
                                for attr in attributes {
                                    if attr.name.to_string() == "name" {
                                        scenario.apps.push(attr.value);
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
                XmlReaderEvent::EndElement { name } => {
                    match name.to_string().as_str() {
                        "preset" => {
                            if let Some(preset) = preset.take() {
                                if configuration.presets.iter().any(|p| p.id == preset.id) {
                                    return Err(PlannerError::DuplicateId {
                                        kind: "preset",
                                        id: preset.id,
                                    });
                                }
                                configuration.presets.push(preset);
                            }
                        }
                        "scenario" => {
                            if let Some(scenario) = scenario.take() {
                                if configuration.scenarios.iter().any(|s| s.id == scenario.id) {
                                    return Err(PlannerError::DuplicateId {
                                        kind: "scenario",
                                        id: scenario.id,
                                    });
                                }
                                configuration.scenarios.push(scenario);
                            }
                        }
                        _ => {}
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }

        configuration.catalog = Catalog::new(categories, items)?;
        if configuration.capacity_options.is_empty() {
            configuration.capacity_options = planner::DEFAULT_CAPACITY_OPTIONS.to_vec();
        }
        if configuration.memory_options.is_empty() {
            configuration.memory_options = memory::DEFAULT_MEMORY_OPTIONS.to_vec();
        }
        if configuration.scenarios.is_empty() {
            debug!("no memory scenarios configured, using the built-in ones");
            configuration.scenarios = memory::default_scenarios();
        }

        Ok(configuration)
    }

    pub fn preset(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Gets the capacity to start with: the requested one, the configured
    /// default or 256 GB, whichever comes first.
    pub fn capacity(&self, requested: Option<u32>) -> Result<StorageCapacity> {
        let size_in_gb = requested
            .or(self.default_capacity)
            .unwrap_or(planner::DEFAULT_CAPACITY_GB);
        StorageCapacity::new(size_in_gb, &self.capacity_options)
    }

    pub fn memory(&self, requested: Option<u32>) -> Result<MemorySize> {
        let size_in_gb = requested
            .or(self.default_memory)
            .unwrap_or(memory::DEFAULT_MEMORY_GB);
        MemorySize::new(size_in_gb, &self.memory_options)
    }

    /// Whole UTC days between the last change of the data file and `now`.
    pub fn days_since_update(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_modified
            .map(|modified| (now.date_naive() - modified.date_naive()).num_days())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::TimeZone;

    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<planner-data>
  <system>
    <segment id="os" label="macOS" size="15 GB"/>
    <segment id="preinstalled" label="Pre-installed Apps" size="10 GB"/>
    <segment id="upgrade_space" label="Upgrade Space" size="35.5 GB"/>
  </system>
  <categories>
    <category id="productivity" order="2"/>
    <category id="development" order="1"/>
  </categories>
  <software>
    <item id="xcode" name="Xcode" size="35 GB" category="development"/>
    <item id="vscode" name="Visual Studio Code" size="350 MB" category="development"/>
    <item id="office" name="Microsoft Office" size="10 GB" category="productivity"/>
  </software>
  <presets>
    <preset id="developer" name="Developer">
      <item ref="xcode"/>
      <item ref="vscode"/>
      <item ref="retired-tool"/>
    </preset>
    <preset id="office" name="Office">
      <item ref="office"/>
    </preset>
  </presets>
  <capacities default="512">
    <capacity value="256"/>
    <capacity value="512"/>
  </capacities>
  <memory default="8">
    <option value="8"/>
    <option value="24"/>
    <scenario id="gaming" name="Gaming" pressure="85" recommended="24" recommendation="Upgrade to 24GB">
      <app name="Steam"/>
      <app name="Discord"/>
    </scenario>
  </memory>
</planner-data>
"#;

    fn parse(xml: &str) -> Result<Configuration> {
        Configuration::parse(xml.as_bytes())
    }

    #[test]
    fn parses_the_planner_data() {
        let configuration = parse(SAMPLE).unwrap();

        assert_eq!(configuration.system.len(), 3);
        assert_eq!(configuration.system[2].size.to_canonical(), 35.5);
        assert_eq!(configuration.catalog.len(), 3);
        assert_eq!(
            configuration.catalog.get("vscode").unwrap().size.to_string(),
            "350 MB"
        );

        let developer = configuration.preset("developer").unwrap();
        assert_eq!(developer.item_ids, ["xcode", "vscode", "retired-tool"]);
        assert_eq!(developer.summary(&configuration.catalog), "Xcode +2 more");

        assert_eq!(configuration.capacity(None).unwrap().gb(), 512);
        assert_eq!(configuration.capacity(Some(256)).unwrap().gb(), 256);
        assert!(configuration.capacity(Some(128)).is_err());

        assert_eq!(configuration.memory(None).unwrap().gb(), 8);
        assert_eq!(configuration.scenarios.len(), 1);
        assert_eq!(configuration.scenarios[0].apps, ["Steam", "Discord"]);
        assert_eq!(configuration.scenarios[0].recommended_gb, 24);
    }

    #[test]
    fn parses_the_shipped_planner_data() {
        let configuration = parse(include_str!("../../planner-data.xml")).unwrap();

        assert_eq!(crate::accounting::system_reserved_total(&configuration.system), 60.5);
        assert_eq!(configuration.capacity(None).unwrap().gb(), 256);
        assert_eq!(configuration.memory(None).unwrap().gb(), 16);
        for preset in &configuration.presets {
            crate::accounting::total_size_strict(&preset.item_ids, &configuration.catalog)
                .unwrap();
        }
    }

    #[test]
    fn falls_back_to_built_in_options() {
        let configuration = parse("<planner-data/>").unwrap();

        assert!(configuration.catalog.is_empty());
        assert_eq!(configuration.capacity(None).unwrap().gb(), 256);
        assert_eq!(configuration.capacity_options, [128, 256, 512, 1024, 2048]);
        assert_eq!(configuration.memory(None).unwrap().gb(), 16);
        assert_eq!(configuration.scenarios.len(), 3);
    }

    #[test]
    fn rejects_unsupported_units() {
        let xml = r#"<planner-data><software>
            <item id="huge" name="Huge" size="1 TB" category="others"/>
        </software></planner-data>"#;
        assert!(matches!(parse(xml), Err(PlannerError::UnsupportedUnit(_))));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let xml = r#"<planner-data><software>
            <item id="xcode" name="Xcode" size="35 GB"/>
            <item id="xcode" name="Xcode" size="35 GB"/>
        </software></planner-data>"#;
        assert!(matches!(
            parse(xml),
            Err(PlannerError::DuplicateId { kind: "software", .. })
        ));

        let xml = r#"<planner-data><presets>
            <preset id="a"/><preset id="a"/>
        </presets></planner-data>"#;
        assert!(matches!(
            parse(xml),
            Err(PlannerError::DuplicateId { kind: "preset", .. })
        ));
    }

    #[test]
    fn rejects_incomplete_elements() {
        let xml = r#"<planner-data><system><segment id="os"/></system></planner-data>"#;
        assert!(matches!(parse(xml), Err(PlannerError::Configuration(_))));

        let xml = r#"<planner-data><memory><scenario id="x" pressure="120"/></memory></planner-data>"#;
        assert!(matches!(parse(xml), Err(PlannerError::Configuration(_))));

        assert!(matches!(parse("<planner-data>"), Err(PlannerError::Xml(_))));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let configuration = Configuration::load(file.path().to_str().unwrap()).unwrap();
        assert!(configuration.last_modified.is_some());
        assert_eq!(configuration.presets.len(), 2);
    }

    #[test]
    fn missing_file_is_reported() {
        match Configuration::load("/nonexistent/planner-data.xml") {
            Err(PlannerError::Configuration(message)) => {
                assert!(message.contains("does not exist"))
            }
            other => panic!("expected a configuration error, got {:?}", other.err()),
        }
    }

    #[test]
    fn expands_only_a_leading_tilde() {
        assert_eq!(expand_home("/data/a~b.xml"), "/data/a~b.xml");
        assert_eq!(expand_home("~user/planner.xml"), "~user/planner.xml");
        assert_eq!(expand_home("planner.xml"), "planner.xml");

        if let Some(home) = dirs::home_dir() {
            let home = home.to_str().unwrap();
            assert_eq!(expand_home("~/planner.xml"), format!("{}/planner.xml", home));
            assert_eq!(expand_home("~/a~b.xml"), format!("{}/a~b.xml", home));
        }
    }

    #[test]
    fn counts_days_since_update() {
        let mut configuration = Configuration::new();
        assert_eq!(configuration.days_since_update(Utc::now()), None);

        configuration.last_modified = Some(Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 0).unwrap());
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 0, 1, 0).unwrap();
        assert_eq!(configuration.days_since_update(now), Some(3));
    }
}
