//! Signs in with the probe credentials from `settings.yaml` and prints what
//! the booking API reports for one sport, court and day.
//!
//! `cargo run -- [sport] [court number] [YYYY-MM-DD]`

use std::env;

use chrono::{Local, NaiveDate};
use league_booking::data::api::HttpBookingApi;
use league_booking::data::auth::{sign_in, SignInForm};
use league_booking::data::catalog::{Court, Sport, TimeSlot};
use league_booking::data::fetch::run_fetch;
use league_booking::data::session::SessionStore;
use league_booking::data::wizard::{Fetch, FetchOutcome};
use league_booking::settings::Settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::from_path("../../.env").ok();
    let settings = Settings::load_or_default("../../settings.yaml")?;

    let mut args = env::args().skip(1);
    let sport: Sport = args.next().as_deref().unwrap_or("badminton").parse()?;
    let court = match args.next() {
        Some(n) => format!("court_{}", n).parse::<Court>()?,
        None => Court::Court1,
    };
    let date = match args.next() {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")?,
        None => Local::now().date_naive(),
    };

    let api = HttpBookingApi::new(&settings.api_base_url)?;
    println!("INFO: probing {}", api.base_url());
    let session = SessionStore::in_memory();
    let form = SignInForm {
        email: settings.probe_email.clone(),
        password: settings.probe_password.clone(),
        remember_me: false,
        agree_terms: true,
    };
    let auth = sign_in(&api, &session, &form).await?;
    println!("INFO: signed in as {}", auth.user.display_name());

    let day = run_fetch(&api, &session, Fetch::DayAvailability { generation: 0, sport, date }).await;
    if let FetchOutcome::DayAvailability { result, .. } = day {
        match result {
            Ok(map) => println!("INFO: {} of {} slots open on {}", map.open_count(), TimeSlot::ALL.len(), date),
            Err(e) => eprintln!("WARN: day availability failed: {}", e),
        }
    }

    let sweep = run_fetch(&api, &session, Fetch::CourtSlots { generation: 0, sport, date, court }).await;
    if let FetchOutcome::CourtSlots { result, .. } = sweep {
        let map = result?;
        for slot in TimeSlot::ALL {
            let state = match map.get(&slot.value()) {
                Some(true) => "free",
                Some(false) => "booked",
                None => "unknown",
            };
            println!("{:>8}  {} {}", slot.label(), court, state);
        }
    }

    Ok(())
}
