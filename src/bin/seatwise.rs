//! Seatwise Admin CLI
//!
//! Manages a Seatwise data directory from the command line.

use std::process::ExitCode;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use seatwise::codec::parse_timestamp;
use seatwise::{
    Config, Customer, Engine, ReservationRequest, ReservationUpdate, Restaurant, Result, Section,
    SyncMode, Table,
};

/// Seatwise CLI
#[derive(Parser, Debug)]
#[command(name = "seatwise")]
#[command(about = "Restaurant seating and reservations")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./seatwise_data")]
    data_dir: String,

    /// Default reservation length in minutes
    #[arg(long, default_value = "120")]
    duration: u32,

    /// Skip fsync on store rewrites
    #[arg(long)]
    no_sync: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a restaurant
    AddRestaurant {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },

    /// Add a section to a restaurant
    AddSection {
        #[arg(long)]
        restaurant: u64,
        #[arg(long)]
        name: String,
        /// Declared number of tables
        #[arg(long)]
        tables: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Add a table to a section
    AddTable {
        #[arg(long)]
        section: u64,
        #[arg(long)]
        number: u32,
        #[arg(long)]
        capacity: u32,
        /// Create the table as inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Activate or deactivate a table
    SetTableActive {
        #[arg(long)]
        id: u64,
        /// true or false
        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
    },

    /// Add a customer
    AddCustomer {
        #[arg(long)]
        restaurant: u64,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        allergies: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Book a table (best fit when --table is omitted)
    Book(BookArgs),

    /// Change a confirmed reservation
    Update {
        #[arg(long)]
        id: u64,
        #[arg(long)]
        table: Option<u64>,
        #[arg(long)]
        party: Option<u32>,
        #[arg(long, value_parser = parse_at)]
        at: Option<NaiveDateTime>,
        #[arg(long)]
        duration: Option<u32>,
    },

    /// Cancel a reservation
    Cancel { id: u64 },

    /// Mark a reservation completed
    Complete { id: u64 },

    /// Mark a reservation as a no-show
    NoShow { id: u64 },

    /// List tables free for a party at a time
    Available {
        #[arg(long)]
        restaurant: u64,
        #[arg(long, value_parser = parse_at)]
        at: NaiveDateTime,
        #[arg(long)]
        party: u32,
    },

    /// Show a restaurant's reservations for a day
    Day {
        #[arg(long)]
        restaurant: u64,
        #[arg(long)]
        date: NaiveDate,
    },
}

#[derive(ClapArgs, Debug)]
struct BookArgs {
    #[arg(long)]
    customer: u64,
    #[arg(long)]
    restaurant: u64,
    #[arg(long)]
    party: u32,
    #[arg(long, value_parser = parse_at)]
    at: NaiveDateTime,
    #[arg(long)]
    table: Option<u64>,
    #[arg(long)]
    duration: Option<u32>,
    #[arg(long)]
    requests: Option<String>,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,seatwise=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("Seatwise v{}", seatwise::VERSION);
    tracing::debug!("Data directory: {}", args.data_dir);

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .default_duration_minutes(args.duration)
        .sync_mode(if args.no_sync {
            SyncMode::Never
        } else {
            SyncMode::Always
        })
        .build();

    let engine = match Engine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open data directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&engine, args.command, args.json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(engine: &Engine, command: Commands, json: bool) -> Result<()> {
    let service = engine.reservations();

    match command {
        Commands::AddRestaurant {
            name,
            address,
            phone,
            email,
        } => {
            let mut restaurant = Restaurant::new(name);
            restaurant.address = address;
            restaurant.phone = phone;
            restaurant.email = email;
            let saved = engine.restaurants().save(restaurant)?;
            emit(json, &saved, || format!("restaurant {}", saved.id.unwrap_or_default()));
        }

        Commands::AddSection {
            restaurant,
            name,
            tables,
            notes,
        } => {
            let mut section = Section::new(restaurant, name);
            section.num_tables = tables;
            section.notes = notes;
            let saved = engine.sections().save(section)?;
            emit(json, &saved, || format!("section {}", saved.id.unwrap_or_default()));
        }

        Commands::AddTable {
            section,
            number,
            capacity,
            inactive,
        } => {
            let mut table = Table::new(section, number, capacity);
            table.is_active = !inactive;
            let saved = engine.tables().save(table)?;
            emit(json, &saved, || describe_table(&saved));
        }

        Commands::SetTableActive { id, active } => {
            let saved = engine.tables().set_active(id, active)?;
            emit(json, &saved, || describe_table(&saved));
        }

        Commands::AddCustomer {
            restaurant,
            first_name,
            last_name,
            email,
            phone,
            allergies,
            notes,
        } => {
            let mut customer = Customer::new(restaurant, first_name, last_name, email, phone);
            customer.allergies = allergies;
            customer.notes = notes;
            let saved = engine.customers().save(customer)?;
            emit(json, &saved, || format!("customer {}", saved.id.unwrap_or_default()));
        }

        Commands::Book(book) => {
            let mut request =
                ReservationRequest::new(book.customer, book.restaurant, book.party, book.at);
            request.duration_minutes = book.duration;
            request.special_requests = book.requests;

            let booked = match book.table {
                Some(table_id) => {
                    let request = request.at_table(table_id);
                    match service.create(request.clone()) {
                        Ok(booked) => booked,
                        Err(e) if e.is_conflict() || e.is_capacity() => {
                            for table in service.alternatives_for(&request)? {
                                eprintln!("  alternative: {}", describe_table(&table));
                            }
                            return Err(e);
                        }
                        Err(e) => return Err(e),
                    }
                }
                None => service.create_with_auto_assignment(request)?,
            };

            emit(json, &booked, || {
                format!(
                    "reservation {} on table {} ({} - {})",
                    booked.id().unwrap_or_default(),
                    booked.table_number.unwrap_or_default(),
                    booked.reservation.reservation_datetime,
                    booked.ends_at
                )
            });
        }

        Commands::Update {
            id,
            table,
            party,
            at,
            duration,
        } => {
            let changes = ReservationUpdate {
                table_id: table,
                party_size: party,
                starts_at: at,
                duration_minutes: duration,
                special_requests: None,
            };
            let updated = service.update(id, changes)?;
            emit(json, &updated, || format!("reservation {} updated", id));
        }

        Commands::Cancel { id } => {
            let r = service.cancel(id)?;
            emit(json, &r, || format!("reservation {} {}", id, r.status));
        }

        Commands::Complete { id } => {
            let r = service.complete(id)?;
            emit(json, &r, || format!("reservation {} {}", id, r.status));
        }

        Commands::NoShow { id } => {
            let r = service.mark_no_show(id)?;
            emit(json, &r, || format!("reservation {} {}", id, r.status));
        }

        Commands::Available {
            restaurant,
            at,
            party,
        } => {
            let tables = engine.availability().list_available(restaurant, at, party);
            emit(json, &tables, || {
                tables
                    .iter()
                    .map(describe_table)
                    .collect::<Vec<_>>()
                    .join("\n")
            });
        }

        Commands::Day { restaurant, date } => {
            let day: Vec<_> = service
                .by_restaurant_on(restaurant, date)
                .into_iter()
                .map(|r| service.enrich(r))
                .collect();
            let summary = service.daily_summary(restaurant, date);
            emit(json, &(&day, &summary), || {
                let mut lines: Vec<String> = day
                    .iter()
                    .map(|d| {
                        format!(
                            "{} {} table {} party {} {}",
                            d.reservation.reservation_datetime.format("%H:%M"),
                            d.customer_name.as_deref().unwrap_or("?"),
                            d.table_number.unwrap_or_default(),
                            d.reservation.party_size,
                            d.reservation.status
                        )
                    })
                    .collect();
                lines.push(format!(
                    "{} reservations, {} covers",
                    summary.total(),
                    summary.covers
                ));
                lines.join("\n")
            });
        }
    }

    Ok(())
}

/// Print JSON or the human-readable line(s)
fn emit<T: Serialize>(json: bool, value: &T, human: impl FnOnce() -> String) {
    if json {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{}", text),
            Err(e) => tracing::error!("Failed to encode output: {}", e),
        }
    } else {
        println!("{}", human());
    }
}

fn describe_table(table: &Table) -> String {
    format!(
        "table {} (#{} in section {}, seats {}{})",
        table.id.unwrap_or_default(),
        table.table_number,
        table.section_id,
        table.capacity,
        if table.is_active { "" } else { ", inactive" }
    )
}

fn parse_at(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    parse_timestamp("at", raw).map_err(|e| e.to_string())
}
