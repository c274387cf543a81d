use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::Parser;
use colored::Colorize;
use log::LevelFilter;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use skyslot::aircraft::Registration;
use skyslot::flight::{CancelReason, Flight, FlightCategory, FlightId};
use skyslot::instructor::InstructorId;
use skyslot::schedule::booking::parse_date;
use skyslot::schedule::slots::{end_time_options, generate_slots, is_slot_in_past};
use skyslot::time::MINUTES_PER_DAY;
use skyslot::{BookingError, BookingRequest, BookingState, Command, FlightEdit, Resource, Schedule, Time};
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;

mod report;

#[derive(Parser)]
struct Args {
    /// Path to the JSON scenario file
    #[arg(short, long, value_name = "FILE", default_value = "data/default.json")]
    scenario: PathBuf,

    /// First bookable time of day, overrides the scenario (HH:MM)
    #[arg(long, value_name = "HH:MM")]
    day_start: Option<Time>,

    /// End of the bookable day, overrides the scenario (HH:MM)
    #[arg(long, value_name = "HH:MM")]
    day_end: Option<Time>,

    /// Slot granularity in minutes
    #[arg(long, value_name = "MINUTES")]
    slot: Option<u32>,

    /// Default booking length in minutes
    #[arg(long, value_name = "MINUTES")]
    duration: Option<u32>,

    /// Also write log records to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect();
        Ok((0, candidates))
    }
}

fn paginate(content: String) {
    let spawned = std::process::Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        .or_else(|_| std::process::Command::new("more").stdin(Stdio::piped()).spawn());

    let mut pager = match spawned {
        Ok(pager) => pager,
        Err(e) => {
            log::debug!("No pager available: {}", e);
            println!("{}", content);
            return;
        }
    };

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe when the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("Error writing to pager: {}", e);
            }
        }
    }

    let _ = pager.wait();
}

fn show(content: String, rows: usize) {
    if rows > 20 {
        paginate(content);
    } else {
        println!("{}", content);
    }
}

fn usage(text: &str) -> BookingError {
    BookingError::InvalidInput {
        field: "usage",
        reason: text.to_string(),
    }
}

fn arg<'a>(parts: &[&'a str], index: usize, text: &str) -> Result<&'a str, BookingError> {
    parts.get(index).copied().ok_or_else(|| usage(text))
}

fn parse_time(text: &str) -> Result<Time, BookingError> {
    Ok(text.parse::<Time>()?)
}

fn parse_resource(text: &str) -> Result<Resource, BookingError> {
    text.parse::<Resource>().map_err(|e| BookingError::InvalidInput {
        field: "resource",
        reason: e.to_string(),
    })
}

fn parse_flight(text: &str) -> Result<FlightId, BookingError> {
    text.parse::<FlightId>().map_err(|e| BookingError::InvalidInput {
        field: "flight",
        reason: format!("'{}': {}", text, e),
    })
}

/// Splits a command line on whitespace, keeping double-quoted runs together.
fn split_args(line: &str) -> Result<Vec<String>, BookingError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;
    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if quoted {
        return Err(usage("unterminated quote"));
    }
    if pending {
        args.push(current);
    }
    Ok(args)
}

fn parse_resources(parts: &[&str]) -> Result<Vec<Resource>, BookingError> {
    parts.iter().map(|p| parse_resource(p)).collect()
}

fn list(schedule: &Schedule, filter: &str, today: NaiveDate) -> Result<(), BookingError> {
    let store = schedule.store();
    let flights: Vec<&Flight> = match filter {
        "u" | "upcoming" => store.upcoming(today),
        "h" | "history" => store.history(today),
        "a" | "all" => store.iter().collect(),
        other => match parse_date(other) {
            Ok(date) => store.on(date).collect(),
            Err(_) => {
                return Err(usage(&format!(
                    "unknown filter '{}', use u, h, a or a date",
                    other
                )));
            }
        },
    };
    if flights.is_empty() {
        println!("No matching flights found.");
    } else {
        show(report::flights(&flights, schedule.directory()), flights.len());
    }
    Ok(())
}

fn slots(schedule: &Schedule, parts: &[&str], now: NaiveDateTime) -> Result<(), BookingError> {
    let day = schedule.day();
    match parts.get(1) {
        Some(start) => {
            let start = parse_time(start)?;
            let options = end_time_options(start, day)
                .iter()
                .map(|t| format!("{} ({}m)", t.to_12h(), *t - start))
                .collect::<Vec<_>>();
            println!("Ends after {}: {}", start.to_12h(), options.join(", "));
        }
        None => {
            let today = now.date();
            let labels = generate_slots(day.start, day.end, day.granularity)
                .into_iter()
                .map(|slot| {
                    if is_slot_in_past(today, slot, now) {
                        slot.to_string().dimmed().to_string()
                    } else {
                        slot.to_string()
                    }
                })
                .collect::<Vec<_>>();
            println!("{}", labels.join(" "));
        }
    }
    Ok(())
}

fn avail(schedule: &Schedule, parts: &[&str]) -> Result<(), BookingError> {
    const USAGE: &str = "avail <date> <start> <end> <resource>...";
    let date = parse_date(arg(parts, 1, USAGE)?)?;
    let start = parse_time(arg(parts, 2, USAGE)?)?;
    let end = parse_time(arg(parts, 3, USAGE)?)?;
    let resources = parse_resources(parts.get(4..).unwrap_or_default())?;
    if resources.is_empty() {
        return Err(usage(USAGE));
    }
    for resource in &resources {
        let label = if schedule.is_available_for_range(resource, start, end, date) {
            "free".green()
        } else {
            "busy".red()
        };
        println!("  {:<28} {}", schedule.directory().display_name(resource), label);
    }
    if schedule.all_available(&resources, start, end, date) {
        println!("All free {}-{} on {}", start, end, date);
    } else {
        println!("Not all free {}-{} on {}", start, end, date);
    }
    Ok(())
}

fn open(schedule: &Schedule, parts: &[&str]) -> Result<(), BookingError> {
    const USAGE: &str = "open <date> [minutes] <resource>...";
    let date = parse_date(arg(parts, 1, USAGE)?)?;
    let (duration, rest) = match parts.get(2).and_then(|p| p.parse::<u32>().ok()) {
        Some(minutes) if minutes == 0 || minutes > MINUTES_PER_DAY => {
            return Err(BookingError::InvalidInput {
                field: "minutes",
                reason: format!("{} is not between 1 and {}", minutes, MINUTES_PER_DAY),
            });
        }
        Some(minutes) => (Some(minutes), parts.get(3..)),
        None => (None, parts.get(2..)),
    };
    let resources = parse_resources(rest.unwrap_or_default())?;
    let windows = schedule.find_open_windows(&resources, date, duration);
    if windows.is_empty() {
        println!("No open windows on {}", date);
    } else {
        let labels = windows.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        println!("{}", labels.join("  "));
    }
    Ok(())
}

fn who(schedule: &Schedule, parts: &[&str]) -> Result<(), BookingError> {
    const USAGE: &str = "who <date> <start> <end> <resource>";
    let date = parse_date(arg(parts, 1, USAGE)?)?;
    let start = parse_time(arg(parts, 2, USAGE)?)?;
    let end = parse_time(arg(parts, 3, USAGE)?)?;
    let pivot = parse_resource(arg(parts, 4, USAGE)?)?;
    if !schedule.directory().contains(&pivot) {
        return Err(BookingError::UnknownResource(pivot));
    }
    let free = schedule.available_counterparts(&pivot, start, end, date);
    if free.is_empty() {
        println!("Nothing free to pair with {} {}-{}", pivot, start, end);
    }
    for resource in free {
        println!("  {}", schedule.directory().display_name(&resource));
    }
    Ok(())
}

fn filter(schedule: &Schedule, parts: &[&str]) -> Result<(), BookingError> {
    const USAGE: &str = "filter <resource>...";
    let resources = parse_resources(parts.get(1..).unwrap_or_default())?;
    if resources.is_empty() {
        return Err(usage(USAGE));
    }
    let directory = schedule.directory();
    let (aircraft, instructors): (Vec<Resource>, Vec<Resource>) = resources
        .into_iter()
        .partition(|r| matches!(r, Resource::Aircraft(_)));

    if !aircraft.is_empty() {
        let registrations: Vec<Registration> = aircraft.iter().map(|r| r.key().into()).collect();
        println!("Instructors for {}:", registrations.join(", "));
        for instructor in directory.instructors_for_any(&registrations) {
            println!("  {} ({})", instructor.name, instructor.id);
        }
    }
    if !instructors.is_empty() {
        let ids: Vec<InstructorId> = instructors.iter().map(|r| r.key().into()).collect();
        let names = instructors
            .iter()
            .map(|r| directory.display_name(r))
            .collect::<Vec<_>>();
        println!("Aircraft for {}:", names.join(", "));
        for aircraft in directory.aircraft_for_any(&ids) {
            println!("  {} ({})", aircraft.registration, aircraft.kind);
        }
    }
    Ok(())
}

fn book(schedule: &mut Schedule, parts: &[&str], now: NaiveDateTime) -> Result<(), BookingError> {
    const USAGE: &str = "book <date> <start> <end> <aircraft> <instructor> [category]";
    let date = parse_date(arg(parts, 1, USAGE)?)?;
    let start = parse_time(arg(parts, 2, USAGE)?)?;
    let end = parse_time(arg(parts, 3, USAGE)?)?;
    let aircraft = arg(parts, 4, USAGE)?;
    let instructor = arg(parts, 5, USAGE)?;
    let mut request = BookingRequest::new(date, start, end, aircraft, instructor);
    if let Some(category) = parts.get(6) {
        let category = category
            .parse::<FlightCategory>()
            .map_err(|reason| BookingError::InvalidInput {
                field: "category",
                reason,
            })?;
        request = request.with_category(category);
    }

    let state = BookingState::default()
        .choose(request)
        .validate(schedule, now)
        .commit(schedule, now);
    match state {
        BookingState::Committed(id) => {
            println!("{} Booked flight {}", "✓".green(), id);
            Ok(())
        }
        BookingState::Rejected(err) => Err(err),
        other => Err(usage(&format!("booking stopped early: {:?}", other))),
    }
}

fn cancel(schedule: &mut Schedule, parts: &[&str], now: NaiveDateTime) -> Result<(), BookingError> {
    const USAGE: &str = "cancel <id> <reason> [comments]";
    let flight = parse_flight(arg(parts, 1, USAGE)?)?;
    let reason = arg(parts, 2, USAGE)?
        .parse::<CancelReason>()
        .map_err(|reason| BookingError::InvalidInput {
            field: "reason",
            reason,
        })?;
    let comments = parts.get(3..).map(|words| words.join(" "));
    let id = schedule.apply(
        Command::Cancel {
            flight,
            reason,
            comments,
        },
        now,
    )?;
    println!("Cancelled flight {}", id);
    Ok(())
}

fn edit(schedule: &mut Schedule, parts: &[&str], now: NaiveDateTime) -> Result<(), BookingError> {
    const USAGE: &str = "edit <id> <start> <end>";
    let flight = parse_flight(arg(parts, 1, USAGE)?)?;
    let changes = FlightEdit {
        start: Some(parse_time(arg(parts, 2, USAGE)?)?),
        end: Some(parse_time(arg(parts, 3, USAGE)?)?),
        ..FlightEdit::default()
    };
    let id = schedule.apply(Command::Edit { flight, changes }, now)?;
    println!("Moved flight {}", id);
    Ok(())
}

fn complete(schedule: &mut Schedule, parts: &[&str], now: NaiveDateTime) -> Result<(), BookingError> {
    const USAGE: &str = "complete <id> <hobbs>";
    let flight = parse_flight(arg(parts, 1, USAGE)?)?;
    let text = arg(parts, 2, USAGE)?;
    let hobbs = text.parse::<f64>().map_err(|e| BookingError::InvalidInput {
        field: "hobbs",
        reason: format!("'{}': {}", text, e),
    })?;
    let id = schedule.apply(Command::Complete { flight, hobbs }, now)?;
    println!("Logged {:.1} hours on flight {}", hobbs, id);
    Ok(())
}

fn hours(schedule: &Schedule, parts: &[&str]) -> Result<(), BookingError> {
    let prior = match parts.get(1) {
        Some(text) => text.parse::<f64>().map_err(|e| BookingError::InvalidInput {
            field: "hours",
            reason: format!("'{}': {}", text, e),
        })?,
        None => 0.0,
    };
    println!("{:.1} hours logged", schedule.store().logged_hours(prior));
    Ok(())
}

fn print_help() {
    println!("\nAvailable Commands:");
    println!("  ls [u|h|a|date]                         - List upcoming, past, all or one day's flights");
    println!("  fleet / staff                           - List aircraft or instructors");
    println!("  slots [start]                           - Show the day's start slots, or end options after <start>");
    println!("  avail <date> <start> <end> <res>...     - Check whether resources are free in a window");
    println!("  open <date> [minutes] <res>...          - Find windows where every resource is free");
    println!("  who <date> <start> <end> <res>          - List free partners for an aircraft or instructor");
    println!("  filter <res>...                         - Instructors for aircraft, aircraft for instructors");
    println!("  grid <date>                             - Draw the day's occupancy");
    println!("  book <date> <start> <end> <ac> <in> [c] - Book a flight (instructor by id or name)");
    println!("  cancel <id> <reason> [comments]         - Cancel a scheduled flight");
    println!("  edit <id> <start> <end>                 - Move a scheduled flight");
    println!("  complete <id> <hobbs>                   - Record flight time");
    println!("  hours [prior]                           - Total logged hours");
    println!("  help / ?                                - Show this help menu");
    println!("  exit / quit                             - Exit\n");
    println!("  Resources are written ac:<registration> or in:<instructor id>.");
    println!("  Quote arguments that contain spaces: \"ac:Conf Rm 2\", \"Dana Reyes\".");
    println!(
        "  Cancel reasons: {}\n",
        CancelReason::ALL
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
}

fn execute(schedule: &mut Schedule, parts: &[&str]) -> Result<(), BookingError> {
    let now = Local::now().naive_local();
    match parts[0] {
        "ls" => list(schedule, parts.get(1).copied().unwrap_or("u"), now.date()),
        "fleet" => {
            println!("{}", report::fleet(schedule.directory()));
            Ok(())
        }
        "staff" => {
            println!("{}", report::staff(schedule.directory().instructors()));
            Ok(())
        }
        "slots" => slots(schedule, parts, now),
        "avail" => avail(schedule, parts),
        "open" => open(schedule, parts),
        "who" => who(schedule, parts),
        "filter" => filter(schedule, parts),
        "grid" => {
            let date = match parts.get(1) {
                Some(text) => parse_date(text)?,
                None => now.date(),
            };
            print!("{}", report::grid(schedule, date));
            Ok(())
        }
        "book" => book(schedule, parts, now),
        "cancel" => cancel(schedule, parts, now),
        "edit" => edit(schedule, parts, now),
        "complete" => complete(schedule, parts, now),
        "hours" => hours(schedule, parts),
        "help" | "?" => {
            print_help();
            Ok(())
        }
        other => Err(usage(&format!("unknown command '{}', try help", other))),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    skyslot::logger::init(LevelFilter::Info, args.log_file.as_deref());

    let mut schedule = Schedule::load_from_file(&args.scenario)?;
    let mut day = *schedule.day();
    day.start = args.day_start.unwrap_or(day.start);
    day.end = args.day_end.unwrap_or(day.end);
    day.granularity = args.slot.unwrap_or(day.granularity);
    day.default_duration = args.duration.unwrap_or(day.default_duration);
    schedule.set_day(day)?;
    println!(
        "Schedule online. {} flights loaded from {}",
        schedule.store().len(),
        args.scenario.display()
    );

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: [
            "ls", "fleet", "staff", "slots", "avail", "open", "who", "filter", "grid", "book", "cancel",
            "edit", "complete", "hours", "help", "exit",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                let args = match split_args(trimmed) {
                    Ok(args) if !args.is_empty() => args,
                    Ok(_) => continue,
                    Err(err) => {
                        println!("{} {}", "✗".red(), err);
                        continue;
                    }
                };
                let parts: Vec<&str> = args.iter().map(String::as_str).collect();
                if matches!(parts[0], "exit" | "quit") {
                    break;
                }
                if let Err(err) = execute(&mut schedule, &parts) {
                    println!("{} {}", "✗".red(), err);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_args_keeps_quoted_runs() {
        let args = split_args(r#"book 2030-06-02 10:00 12:00 "Conf Rm 2"  "Dana Reyes" meeting"#).unwrap();
        assert_eq!(
            vec!["book", "2030-06-02", "10:00", "12:00", "Conf Rm 2", "Dana Reyes", "meeting"],
            args
        );
        assert_eq!(vec!["avail", "ac:Conf Rm 2"], split_args(r#"avail ac:"Conf Rm 2""#).unwrap());
        assert_eq!(vec!["cancel", "#3", ""], split_args(r#"cancel #3 """#).unwrap());
        assert!(split_args("   ").unwrap().is_empty());
    }

    #[test]
    fn test_split_args_rejects_unterminated_quote() {
        assert!(matches!(
            split_args(r#"book "Dana Reyes"#),
            Err(BookingError::InvalidInput { field: "usage", .. })
        ));
    }

    #[test]
    fn test_quoted_names_resolve_in_bundled_scenario() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/default.json");
        let schedule = Schedule::load_from_file(&path).unwrap();
        let args = split_args(r#"who "ac:Conf Rm 2" "Dana Reyes""#).unwrap();

        let resource = parse_resource(&args[1]).unwrap();
        assert!(schedule.directory().contains(&resource));
        assert!(schedule.directory().resolve_instructor(&args[2]).is_some());
    }

    #[test]
    fn test_open_rejects_durations_longer_than_a_day() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/default.json");
        let schedule = Schedule::load_from_file(&path).unwrap();

        let result = open(&schedule, &["open", "2030-06-02", "4294967295", "ac:N51204"]);

        assert!(matches!(result, Err(BookingError::InvalidInput { field: "minutes", .. })));
    }
}
