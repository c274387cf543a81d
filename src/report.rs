use colored::Colorize;
use skyslot::directory::{Directory, Resource};
use skyslot::flight::{Flight, FlightStatus};
use skyslot::instructor::Instructor;
use skyslot::schedule::Schedule;
use skyslot::schedule::slots::{generate_slots, occupancy};
use chrono::NaiveDate;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct FlightRow {
    id: String,
    date: String,
    time: String,
    aircraft: String,
    instructor: String,
    student: String,
    category: String,
    status: String,
}

#[derive(Tabled)]
struct InstructorRow {
    id: String,
    name: String,
    certifications: String,
    aircraft: usize,
}

fn status_label(status: &FlightStatus) -> String {
    match status {
        FlightStatus::Scheduled => status.to_string().green().to_string(),
        FlightStatus::Completed { .. } => status.to_string().blue().to_string(),
        FlightStatus::Cancelled { .. } => status.to_string().red().to_string(),
    }
}

fn styled(mut table: Table) -> String {
    table.with(Style::rounded());
    table.with(Alignment::left());
    table.to_string()
}

pub fn flights(flights: &[&Flight], directory: &Directory) -> String {
    let rows = flights
        .iter()
        .map(|f| FlightRow {
            id: f.id.to_string(),
            date: f.date.format("%a %b %-d %Y").to_string(),
            time: format!("{} - {} ({}m)", f.start.to_12h(), f.end.to_12h(), f.duration()),
            aircraft: f.aircraft.to_string(),
            instructor: directory.display_name(&Resource::Instructor(f.instructor.clone())),
            student: f.student.clone(),
            category: f.category.to_string(),
            status: status_label(&f.status),
        })
        .collect::<Vec<_>>();
    styled(Table::new(rows))
}

pub fn fleet(directory: &Directory) -> String {
    styled(Table::new(directory.aircraft()))
}

pub fn staff(instructors: &[Instructor]) -> String {
    let rows = instructors.iter().map(|i| InstructorRow {
        id: i.id.to_string(),
        name: i.name.clone(),
        certifications: i.certifications.join(", "),
        aircraft: i.authorized_aircraft.len(),
    });
    styled(Table::new(rows))
}

/// One line per resource, one cell per slot: `.` free, `#` held.
pub fn grid(schedule: &Schedule, date: NaiveDate) -> String {
    let directory = schedule.directory();
    let resources = directory
        .aircraft()
        .iter()
        .map(|a| Resource::Aircraft(a.registration.clone()))
        .chain(
            directory
                .instructors()
                .iter()
                .map(|i| Resource::Instructor(i.id.clone())),
        )
        .collect::<Vec<_>>();

    let labels = resources
        .iter()
        .map(|r| directory.display_name(r))
        .collect::<Vec<_>>();
    let width = labels.iter().map(|l| l.len()).max().unwrap_or(0);

    let day = schedule.day();
    let mut out = String::new();
    let header = generate_slots(day.start, day.end, day.granularity)
        .into_iter()
        .map(|slot| match slot.minutes() % 60 {
            0 => char::from_digit(slot.hours() % 10, 10).unwrap_or(' '),
            _ => ' ',
        })
        .collect::<String>();
    out.push_str(&format!("{:width$} {}\n", "", header, width = width));

    for (resource, label) in resources.iter().zip(labels) {
        let cells = occupancy(resource, date, day, schedule.store())
            .into_iter()
            .map(|(_, held)| match held {
                Some(_) => "#".red().to_string(),
                None => ".".green().to_string(),
            })
            .collect::<String>();
        out.push_str(&format!("{:width$} {}\n", label, cells, width = width));
    }
    out
}
