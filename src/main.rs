use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use timegrid::domain::normalize_target;
use timegrid::store::catalog::serialize_course;
use timegrid::store::timetable::serialize_row;
use timegrid::{
    config, Course, Day, Period, PreferenceSet, RowKey, Scheduler, Slot, Stores, TimetableRow,
    ABSENT_LABEL,
};

#[derive(Parser, Debug)]
#[command(name = "timegrid", version, about = "Weekly institutional timetable engine")]
struct Cli {
    /// Directory holding data.txt, timetable_output.txt and timetable_history.txt
    #[arg(long, default_value = ".", global = true)]
    data_dir: PathBuf,

    /// Campus configuration file (TOML); omitted means the built-in campus
    #[arg(long, global = true)]
    campus: Option<PathBuf>,

    /// Acting administrator, recorded in logs and generation history
    #[arg(long, default_value = "admin", global = true)]
    actor: String,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Regenerate the whole timetable from the course catalog
    Generate {
        /// Semester tag for the history record; inferred from today's date
        /// when omitted
        #[arg(long)]
        semester: Option<String>,
    },

    /// Delete the first timetable entry matching a key
    Delete {
        day: Day,
        period: Period,
        subject: String,
        room: String,
        teacher: String,
        #[arg(default_value = "ALL")]
        target: String,
    },

    /// Edit the first timetable entry matching a key
    Edit {
        day: Day,
        period: Period,
        subject: String,
        room: String,
        teacher: String,
        #[arg(default_value = "ALL")]
        target: String,

        #[arg(long)]
        to_day: Option<Day>,
        #[arg(long)]
        to_period: Option<Period>,
        #[arg(long)]
        to_subject: Option<String>,
        #[arg(long)]
        to_room: Option<String>,
        #[arg(long)]
        to_teacher: Option<String>,
        #[arg(long)]
        to_target: Option<String>,
        /// Label for the edited row; empty clears any existing label
        #[arg(long, default_value = "")]
        label: String,
    },

    /// Set or clear the absence label on a single timetable entry
    Label {
        day: Day,
        period: Period,
        subject: String,
        room: String,
        teacher: String,
        #[arg(default_value = "ALL")]
        target: String,
        #[arg(long)]
        clear: bool,
    },

    /// Set or clear the absence label on every entry of one teacher
    Absent {
        teacher: String,
        #[arg(long)]
        clear: bool,
    },

    /// Create or replace a catalog entry
    AddCourse {
        subject: String,
        teacher: String,
        students: u32,
        #[arg(long, default_value = "ALL")]
        target: String,
        /// Preferred slot, up to three times
        #[arg(long = "pref", value_name = "DAY:PERIOD")]
        prefs: Vec<Slot>,
    },

    /// Print a store
    Show {
        #[command(subcommand)]
        target: ShowTarget,
    },
}

#[derive(Subcommand, Debug)]
enum ShowTarget {
    Timetable,
    Catalog,
    History,
}

fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("timegrid=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("timegrid=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let campus = config::load_campus(cli.campus.as_deref())?;
    let stores = Stores::in_dir(&cli.data_dir);
    let scheduler = Scheduler::new(campus, stores);
    let actor = cli.actor.as_str();

    match cli.command {
        Command::Generate { semester } => {
            let report = scheduler.generate(actor, semester)?;
            println!("{}", report.message);
            println!(
                "{}: {} rows, {} subjects",
                report.semester,
                report.total_rows,
                report.subjects.len()
            );
            for row in scheduler.stores().timetable.load()? {
                println!("  {} -> {} {} in {}", row.subject, row.slot.day, row.slot.period, row.room);
            }
            if report.violations.is_empty() {
                println!("All preferences satisfied.");
            } else {
                println!("WARNING: preference violations found");
                for v in &report.violations {
                    let assigned: Vec<String> = v.assigned.iter().map(ToString::to_string).collect();
                    let preferred: Vec<String> =
                        v.preferred.iter().map(ToString::to_string).collect();
                    println!(
                        "  {} ({}): assigned {} outside preferred {}",
                        v.subject,
                        v.teacher,
                        assigned.join(", "),
                        preferred.join(", ")
                    );
                }
            }
        }

        Command::Delete {
            day,
            period,
            subject,
            room,
            teacher,
            target,
        } => {
            let key = row_key(day, period, subject, room, teacher, target);
            scheduler.synchronizer().delete_entry(&key, actor)?;
            println!("Entry deleted.");
        }

        Command::Edit {
            day,
            period,
            subject,
            room,
            teacher,
            target,
            to_day,
            to_period,
            to_subject,
            to_room,
            to_teacher,
            to_target,
            label,
        } => {
            let key = row_key(day, period, subject, room, teacher, target);
            let new_row = TimetableRow {
                slot: Slot::new(to_day.unwrap_or(day), to_period.unwrap_or(period)),
                subject: to_subject.unwrap_or_else(|| key.subject.clone()),
                room: to_room.unwrap_or_else(|| key.room.clone()),
                teacher: to_teacher.unwrap_or_else(|| key.teacher.clone()),
                target: normalize_target(&to_target.unwrap_or_else(|| key.target.clone())),
                label,
            };
            scheduler.synchronizer().update_entry(&key, new_row, actor)?;
            println!("Entry updated.");
        }

        Command::Label {
            day,
            period,
            subject,
            room,
            teacher,
            target,
            clear,
        } => {
            let key = row_key(day, period, subject, room, teacher, target);
            let label = if clear { "" } else { ABSENT_LABEL };
            scheduler.synchronizer().set_entry_label(&key, label, actor)?;
            println!("{}", if clear { "Label cleared." } else { "Absent label added." });
        }

        Command::Absent { teacher, clear } => {
            let updated = scheduler
                .synchronizer()
                .set_teacher_absence(&teacher, !clear, actor)?;
            println!(
                "{} entries {}.",
                updated,
                if clear { "cleared" } else { "marked absent" }
            );
        }

        Command::AddCourse {
            subject,
            teacher,
            students,
            target,
            prefs,
        } => {
            if prefs.len() > 3 {
                anyhow::bail!("at most 3 preferences are allowed");
            }
            let course = Course {
                subject,
                teacher,
                students,
                target: normalize_target(&target),
                prefs: PreferenceSet::normalize(prefs.into_iter().map(Some)),
            };
            scheduler.upsert_course(course)?;
            println!("Catalog updated.");
        }

        Command::Show { target } => match target {
            ShowTarget::Timetable => {
                for row in scheduler.stores().timetable.load()? {
                    println!("{}", serialize_row(&row));
                }
            }
            ShowTarget::Catalog => {
                for course in scheduler.stores().catalog.load_or_default()? {
                    println!("{}", serialize_course(&course));
                }
            }
            ShowTarget::History => {
                for group in scheduler.stores().history.grouped_by_semester()? {
                    let latest = group.latest();
                    println!(
                        "{}: {} runs, latest {} by {} ({} rows)",
                        group.semester,
                        group.total_runs(),
                        latest.generated_at.format("%Y-%m-%d %H:%M:%S"),
                        latest.generated_by,
                        latest.total_rows
                    );
                }
            }
        },
    }

    Ok(())
}

fn row_key(
    day: Day,
    period: Period,
    subject: String,
    room: String,
    teacher: String,
    target: String,
) -> RowKey {
    RowKey {
        slot: Slot::new(day, period),
        subject,
        room,
        teacher,
        target: normalize_target(&target),
    }
}
