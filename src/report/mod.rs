use termion::color;

use crate::accounting::StorageSummary;
use crate::catalog::Catalog;
use crate::configuration::category;
use crate::configuration::preset::Preset;
use crate::configuration::system_segment::SystemSegment;
use crate::formatter::Formatter;
use crate::layout::{self, Corner, SegmentLayout, SegmentShape};
use crate::memory::{MemoryAssessment, MemorySize};
use crate::usage::{Pressure, Severity};

const SYSTEM_CELLS: [char; 3] = ['▓', '▒', '░'];
const USER_CELL: char = '█';
const FREE_CELL: char = '·';

/// Renders the planner results as plain text for the terminal, optionally
/// colored.
pub struct Report {
    color: bool,
    bar_width: usize,
}

impl Report {
    pub const DEFAULT_BAR_WIDTH: usize = 50;

    pub fn new(color: bool) -> Report {
        Report {
            color,
            bar_width: Report::DEFAULT_BAR_WIDTH,
        }
    }

    pub fn with_bar_width(mut self, bar_width: usize) -> Report {
        self.bar_width = bar_width.max(1);
        self
    }

    fn paint(&self, text: &str, severity: Severity) -> String {
        if !self.color {
            return String::from(text);
        }

        match severity {
            Severity::Normal => format!("{}{}{}", color::Fg(color::Blue), text, color::Fg(color::Reset)),
            Severity::Warning => format!("{}{}{}", color::Fg(color::Yellow), text, color::Fg(color::Reset)),
            Severity::Critical => format!("{}{}{}", color::Fg(color::Red), text, color::Fg(color::Reset)),
        }
    }

    fn paint_pressure(&self, text: &str, pressure: Pressure) -> String {
        if !self.color {
            return String::from(text);
        }

        match pressure {
            Pressure::Low => format!("{}{}{}", color::Fg(color::Green), text, color::Fg(color::Reset)),
            Pressure::Medium => format!("{}{}{}", color::Fg(color::Yellow), text, color::Fg(color::Reset)),
            Pressure::High => format!("{}{}{}", color::Fg(color::Red), text, color::Fg(color::Reset)),
        }
    }

    fn flush_user_cells(&self, cells: &mut String, user_cells: &mut String, severity: Severity) {
        if !user_cells.is_empty() {
            cells.push_str(&self.paint(user_cells, severity));
            user_cells.clear();
        }
    }

    /// Draws the segmented bar. The last segment is the user data and is
    /// drawn in the severity color, the ones before it are system segments.
    /// Rounded segment edges are drawn as `(` and `)` inside the track.
    pub fn bar(&self, layouts: &[SegmentLayout], shapes: &[SegmentShape], severity: Severity) -> String {
        let opening = layouts
            .iter()
            .zip(shapes)
            .find(|(_, shape)| shape.left == Corner::Rounded)
            .map(|(l, _)| l.offset_percent);
        let closing = layouts
            .iter()
            .zip(shapes)
            .find(|(_, shape)| shape.right == Corner::Rounded)
            .map(|(l, _)| l.offset_percent + l.width_percent);

        let mut cells = String::new();
        let mut user_cells = String::new();
        let mut opened = false;
        let mut closed = false;

        for cell in 0..self.bar_width {
            let percent = (cell as f64 + 0.5) / self.bar_width as f64 * 100.0;

            if let Some(start) = opening {
                if !opened && percent >= start {
                    cells.push('(');
                    opened = true;
                }
            }
            if let Some(end) = closing {
                if opened && !closed && percent >= end {
                    self.flush_user_cells(&mut cells, &mut user_cells, severity);
                    cells.push(')');
                    closed = true;
                }
            }

            let owner = layouts.iter().position(|l| {
                !l.is_empty()
                    && percent >= l.offset_percent
                    && percent < l.offset_percent + l.width_percent
            });

            match owner {
                Some(index) if index + 1 == layouts.len() => user_cells.push(USER_CELL),
                Some(index) => {
                    self.flush_user_cells(&mut cells, &mut user_cells, severity);
                    cells.push(SYSTEM_CELLS[index % SYSTEM_CELLS.len()]);
                }
                None => {
                    self.flush_user_cells(&mut cells, &mut user_cells, severity);
                    cells.push(FREE_CELL);
                }
            }
        }
        self.flush_user_cells(&mut cells, &mut user_cells, severity);
        if opened && !closed {
            cells.push(')');
        }

        format!("[{}]", cells)
    }

    pub fn storage(
        &self,
        summary: &StorageSummary,
        layouts: &[SegmentLayout],
        system: &[SystemSegment],
    ) -> String {
        let mut output = String::new();

        output.push_str(
            format!(
                "{} of {} used\n",
                Formatter::format_size(summary.used_gb),
                Formatter::format_capacity(summary.capacity_gb.round() as u32)
            )
            .as_str(),
        );
        output.push_str(
            format!(
                "{} available\n",
                Formatter::format_size(summary.available_gb)
            )
            .as_str(),
        );
        output.push_str(
            format!(
                "{} {:.1}% ({})\n",
                self.bar(layouts, &layout::corners(layouts), summary.severity),
                summary.usage_percent,
                self.paint(summary.severity.token(), summary.severity)
            )
            .as_str(),
        );

        for segment in system {
            output.push_str(format!("  {}: {}\n", segment.label, segment.size).as_str());
        }
        output.push_str(
            format!(
                "  User Software: {}\n",
                Formatter::format_size(summary.user_gb)
            )
            .as_str(),
        );
        output.push_str(
            format!("  Total Used: {}\n", Formatter::format_size(summary.used_gb)).as_str(),
        );

        if let Some(exceeded_by) = summary.exceeded_by_gb {
            output.push_str(
                self.paint(
                    format!(
                        "Storage limit exceeded by {}",
                        Formatter::format_size(exceeded_by)
                    )
                    .as_str(),
                    Severity::Critical,
                )
                .as_str(),
            );
            output.push('\n');
        }

        output
    }

    pub fn selection(&self, ids: &[String], catalog: &Catalog) -> String {
        let mut output = format!("Selected ({} items)\n", ids.len());
        if ids.is_empty() {
            output.push_str("  nothing selected\n");
        }
        for id in ids {
            match catalog.get(id) {
                Some(item) => output.push_str(format!("  {} ({})\n", item.name, item.size).as_str()),
                None => output.push_str(format!("  {} (unknown)\n", id).as_str()),
            }
        }

        output
    }

    pub fn presets(&self, presets: &[Preset], catalog: &Catalog, selected: Option<&str>) -> String {
        let mut output = String::from("Recommended presets\n");

        for preset in presets {
            let marker = if selected == Some(preset.id.as_str()) {
                '*'
            } else {
                ' '
            };
            output.push_str(
                format!(
                    "{} {} [{}] {}\n    {}\n",
                    marker,
                    preset.name,
                    preset.id,
                    Formatter::format_size(preset.size_gb(catalog)),
                    preset.summary(catalog)
                )
                .as_str(),
            );
        }

        output
    }

    pub fn catalog(
        &self,
        catalog: &Catalog,
        selection: &[String],
        query: &str,
        category_filter: Option<&str>,
    ) -> String {
        let available = catalog.available(selection, query, category_filter);
        let mut output = format!("Available software ({} items)\n", available.len());

        let mut groups: Vec<String> = catalog
            .categories()
            .into_iter()
            .map(|c| c.id)
            .filter(|id| id != category::ALL)
            .collect();
        for item in &available {
            if !groups.contains(&item.category) {
                groups.push(item.category.clone());
            }
        }

        for group in groups {
            let items: Vec<_> = available
                .iter()
                .filter(|item| item.category == group)
                .collect();
            if items.is_empty() {
                continue;
            }

            output.push_str(format!("{}\n", group).as_str());
            for item in items {
                output.push_str(format!("  {} [{}] {}\n", item.name, item.id, item.size).as_str());
            }
        }

        output
    }

    pub fn memory(&self, memory: MemorySize, assessments: &[MemoryAssessment]) -> String {
        let mut output = format!("Memory Performance Overview ({}GB Total)\n", memory.gb());

        for assessment in assessments {
            let scenario = assessment.scenario;
            output.push_str(
                format!(
                    "{}: pressure {}% ({})\n",
                    scenario.name,
                    scenario.pressure,
                    self.paint_pressure(assessment.pressure.token(), assessment.pressure)
                )
                .as_str(),
            );
            if !scenario.apps.is_empty() {
                output.push_str(
                    format!("  Simultaneous apps: {}\n", scenario.apps.join(", ")).as_str(),
                );
            }
            output.push_str(
                format!(
                    "  Recommendation: {}{}\n",
                    scenario.recommendation,
                    if assessment.needs_upgrade {
                        " [upgrade recommended]"
                    } else {
                        ""
                    }
                )
                .as_str(),
            );
        }

        output
    }

    pub fn freshness(days_since_update: i64) -> String {
        match days_since_update {
            i64::MIN..=0 => String::from("Data updated today"),
            1 => String::from("Data updated 1 day ago"),
            days => format!("Data updated {} days ago", days),
        }
    }
}
