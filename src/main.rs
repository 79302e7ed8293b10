#[macro_use]
extern crate clap;

use std::fs;
use std::io::Write;
use std::process;
use std::thread;
use std::time::{Duration, SystemTime};

use chrono::Utc;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{debug, error, info, LevelFilter};
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Config, Root},
    filter::threshold::ThresholdFilter,
};

use choose_your_mac::accounting;
use choose_your_mac::configuration::{self, settings::Settings, Configuration};
use choose_your_mac::error::{PlannerError, Result};
use choose_your_mac::layout;
use choose_your_mac::memory;
use choose_your_mac::planner::{self, PlannerState, SearchOutcome};
use choose_your_mac::report::Report;

struct Arguments {
    data_file: String,
    mode: String,
    capacity: Option<u32>,
    memory: Option<u32>,
    preset: Option<String>,
    items: Vec<String>,
    custom_items: Vec<String>,
    query: String,
    category: Option<String>,
    strict: bool,
    color: bool,
    watch_interval: Option<Duration>,
}

fn render(arguments: &Arguments) -> Result<String> {
    let configuration = Configuration::load(&arguments.data_file)?;
    let mut catalog = configuration.catalog.clone();
    let mut state = PlannerState::new(configuration.capacity(arguments.capacity)?);

    if let Some(preset_id) = &arguments.preset {
        match configuration.preset(preset_id) {
            Some(preset) => state.apply_preset(preset),
            None => {
                return Err(PlannerError::Configuration(format!(
                    "preset '{}' not found.",
                    preset_id
                )));
            }
        }
    }
    for id in &arguments.items {
        if !state.add(id.as_str()) {
            debug!("'{}' is already selected", id);
        }
    }
    for custom_item in &arguments.custom_items {
        let (name, size) = planner::parse_custom_item(custom_item)?;
        state.add_custom(&mut catalog, &name, size)?;
    }

    let report = Report::new(arguments.color);
    let mut output = String::new();

    match arguments.mode.as_str() {
        "storage" => {
            match state.submit_search(&arguments.query, &catalog) {
                SearchOutcome::Added(id) => info!("selected '{}'", id),
                SearchOutcome::AddItemOpened(name) => {
                    info!("no software matches '{}', add it with --add \"{}=SIZE\"", name, name)
                }
                SearchOutcome::Ambiguous(count) => {
                    info!("{} software items match '{}'", count, arguments.query)
                }
                SearchOutcome::AwaitingSize | SearchOutcome::Ignored => {}
            }

            if arguments.strict {
                accounting::total_size_strict(state.selection.ids(), &catalog)?;
            }
            let summary = state.summary(&catalog, &configuration.system)?;
            let layouts = state.bar(&catalog, &configuration.system)?;
            for (segment, shape) in layouts.iter().zip(layout::corners(&layouts)) {
                debug!(
                    "segment '{}': offset {:.4}%, width {:.4}%, corners {:?}/{:?}",
                    segment.label, segment.offset_percent, segment.width_percent, shape.left, shape.right
                );
            }

            output.push_str(&report.selection(state.selection.ids(), &catalog));
            output.push_str(&report.storage(&summary, &layouts, &configuration.system));
        }
        "presets" => {
            output.push_str(&report.presets(
                &configuration.presets,
                &catalog,
                state.preset_id.as_deref(),
            ));
        }
        "catalog" => {
            output.push_str(&report.catalog(
                &catalog,
                state.selection.ids(),
                &arguments.query,
                arguments.category.as_deref(),
            ));
        }
        "memory" => {
            let memory = configuration.memory(arguments.memory)?;
            let assessments = memory::assess_all(&configuration.scenarios, memory);
            output.push_str(&report.memory(memory, &assessments));
        }
        mode => {
            return Err(PlannerError::Configuration(format!("invalid mode: {}", mode)));
        }
    }

    if let Some(days) = configuration.days_since_update(Utc::now()) {
        output.push_str(&Report::freshness(days));
        output.push('\n');
    }

    Ok(output)
}

fn data_file_modified(data_file: &str) -> Option<SystemTime> {
    fs::metadata(configuration::expand_home(data_file))
        .and_then(|metadata| metadata.modified())
        .ok()
}

fn watch(arguments: &Arguments, interval: Duration) -> Result<()> {
    info!(
        "watching {} every {:?}",
        arguments.data_file, interval
    );
    let mut last_modified = None;
    let mut first = true;

    loop {
        let modified = data_file_modified(&arguments.data_file);
        if first || modified != last_modified {
            first = false;
            last_modified = modified;
            match render(arguments) {
                Ok(output) => {
                    print!(
                        "{}{}{}",
                        termion::clear::All,
                        termion::cursor::Goto(1, 1),
                        output
                    );
                    if let Err(why) = std::io::stdout().flush() {
                        error!("{}", why);
                    }
                }
                Err(why) => error!("{}", why),
            }
        }

        thread::sleep(interval);
    }
}

fn start_main(arguments: &Arguments) -> Result<()> {
    match arguments.watch_interval {
        Some(interval) => watch(arguments, interval),
        None => {
            print!("{}", render(arguments)?);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("stderr", Box::new(stderr)),
        )
        .build(Root::builder().appender("stderr").build(level));
    match config {
        Ok(config) => {
            if let Err(why) = log4rs::init_config(config) {
                eprintln!("unable to initialize logging: {}", why);
            }
        }
        Err(why) => eprintln!("invalid logging configuration: {}", why),
    }
}

fn main() {
    let matches = build_command().get_matches();
    init_logging(matches.get_flag("verbose"));

    let result = get_arguments(&matches).and_then(|arguments| start_main(&arguments));
    if let Err(why) = result {
        error!("{}", why);
        process::exit(1);
    }
}

fn build_command() -> Command {
    Command::new("choose-your-mac")
        .version(crate_version!())
        .author(crate_authors!())
        .about("Estimates the storage and memory a new Mac needs for the software you use.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Specify a config file from where to read settings"),
        )
        .arg(
            Arg::new("data-file")
                .short('d')
                .long("data-file")
                .value_name("FILE")
                .help("The planner data file (default: planner-data.xml)"),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("storage (default), presets, catalog or memory"),
        )
        .arg(
            Arg::new("capacity")
                .short('C')
                .long("capacity")
                .value_name("GB")
                .value_parser(value_parser!(u32))
                .help("Storage capacity in GB, e.g. 256 or 1024"),
        )
        .arg(
            Arg::new("memory")
                .short('M')
                .long("memory")
                .value_name("GB")
                .value_parser(value_parser!(u32))
                .help("Unified memory in GB, e.g. 16"),
        )
        .arg(
            Arg::new("preset")
                .short('p')
                .long("preset")
                .value_name("PRESET")
                .help("Start from the software of a preset"),
        )
        .arg(
            Arg::new("item")
                .short('i')
                .long("item")
                .value_name("ID")
                .action(ArgAction::Append)
                .help("Select software by id, may be repeated"),
        )
        .arg(
            Arg::new("add")
                .short('a')
                .long("add")
                .value_name("NAME=SIZE")
                .action(ArgAction::Append)
                .help("Add custom software, e.g. \"Final Cut Pro=4.5 GB\""),
        )
        .arg(
            Arg::new("search")
                .short('q')
                .long("search")
                .value_name("QUERY")
                .help("Search the catalog; a single match gets selected"),
        )
        .arg(
            Arg::new("category")
                .short('t')
                .long("category")
                .value_name("CATEGORY")
                .help("Only list software of this category"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .help("Fail on selected software that is not in the catalog"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Don't color the output"),
        )
        .arg(
            Arg::new("watch")
                .short('w')
                .long("watch")
                .value_name("DURATION")
                .help("Re-render whenever the data file changes, checking every DURATION (e.g. 2s)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log debug output"),
        )
}

fn get_arguments(matches: &ArgMatches) -> Result<Arguments> {
    let config_file_name =
        Settings::find(matches.get_one::<String>("config").map(|file| file.as_str()))?;
    let settings = match config_file_name {
        Some(file_name) => Settings::load(&file_name)?,
        None => Settings::new(),
    };

    let watch_interval = match matches.get_one::<String>("watch") {
        Some(value) => Some(Settings::parse_interval(value)?),
        None => settings.watch_interval,
    };

    let strings = |id: &str| -> Vec<String> {
        matches
            .get_many::<String>(id)
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    };

    Ok(Arguments {
        data_file: matches
            .get_one::<String>("data-file")
            .cloned()
            .or(settings.data_file)
            .unwrap_or_else(|| String::from("planner-data.xml")),
        mode: matches
            .get_one::<String>("mode")
            .cloned()
            .or(settings.mode)
            .unwrap_or_else(|| String::from("storage")),
        capacity: matches.get_one::<u32>("capacity").copied().or(settings.capacity),
        memory: matches.get_one::<u32>("memory").copied().or(settings.memory),
        preset: matches.get_one::<String>("preset").cloned(),
        items: strings("item"),
        custom_items: strings("add"),
        query: matches
            .get_one::<String>("search")
            .cloned()
            .unwrap_or_default(),
        category: matches.get_one::<String>("category").cloned(),
        strict: matches.get_flag("strict"),
        color: !matches.get_flag("no-color") && termion::is_tty(&std::io::stdout()),
        watch_interval,
    })
}
