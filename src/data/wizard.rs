//! Booking wizard state machine.
//!
//! [`WizardState`] performs no I/O. Transitions that depend on server data
//! hand back a [`Fetch`] for the caller to run (see [`super::fetch`]); the
//! result comes back through [`WizardState::apply`]. Availability fetches are
//! stamped with a generation so that a slow answer for an old selection can
//! never overwrite the map for the current one.

use std::time::Duration;

use chrono::{Days, NaiveDate};

use super::api::{rejection_message, ApiError};
use super::booking::{AvailabilityMap, BookingDraft, BookingRecord, NewBooking};
use super::catalog::{Court, Sport, TimeSlot};

pub const SESSION_EXPIRED: &str = "Session expired. Please sign in again.";
pub const BOOKING_CONFIRMED: &str = "Booking confirmed successfully!";
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(3);

const BOOKING_ERROR_FIELDS: [(&str, &str); 4] = [
    ("sport", "Sport"),
    ("court", "Court"),
    ("time_slot", "Time slot"),
    ("booking_date", "Booking date"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Sport,
    Date,
    Court,
    Time,
    Confirmation,
}

impl Step {
    pub fn title(self) -> &'static str {
        match self {
            Step::Sport => "Choose Your Sport",
            Step::Date => "Select Date",
            Step::Court => "Choose a Court",
            Step::Time => "Available Time Slots",
            Step::Confirmation => "Booking Confirmed!",
        }
    }
}

/// Which dates the date step accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    TodayOrTomorrow,
    FromToday,
}

impl DateWindow {
    pub fn allows(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            DateWindow::TodayOrTomorrow => date == today || Some(date) == today.checked_add_days(Days::new(1)),
            DateWindow::FromToday => date >= today,
        }
    }

    /// Fixed choices to offer as buttons, or `None` for a free date input.
    pub fn choices(self, today: NaiveDate) -> Option<Vec<NaiveDate>> {
        match self {
            DateWindow::TodayOrTomorrow => Some(
                std::iter::once(today)
                    .chain(today.checked_add_days(Days::new(1)))
                    .collect(),
            ),
            DateWindow::FromToday => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    /// Insert the court step between date and time.
    pub court_step: bool,
    pub date_window: DateWindow,
    /// How long the confirmation stays up before the wizard resets.
    pub reset_delay: Duration,
}

impl WizardConfig {
    pub fn with_courts() -> Self {
        Self {
            court_step: true,
            date_window: DateWindow::TodayOrTomorrow,
            reset_delay: DEFAULT_RESET_DELAY,
        }
    }

    pub fn without_courts() -> Self {
        Self {
            court_step: false,
            date_window: DateWindow::FromToday,
            reset_delay: DEFAULT_RESET_DELAY,
        }
    }

    pub fn steps(&self) -> Vec<Step> {
        let mut steps = vec![Step::Sport, Step::Date];
        if self.court_step {
            steps.push(Step::Court);
        }
        steps.extend([Step::Time, Step::Confirmation]);
        steps
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self::with_courts()
    }
}

/// Network work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    MyBookings,
    /// `available_timeslots` for the chosen sport and date.
    DayAvailability {
        generation: u64,
        sport: Sport,
        date: NaiveDate,
    },
    /// One `available_courts` call per slot, narrowed to `court`.
    CourtSlots {
        generation: u64,
        sport: Sport,
        date: NaiveDate,
        court: Court,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    MyBookings(Result<Vec<BookingRecord>, ApiError>),
    DayAvailability {
        generation: u64,
        result: Result<AvailabilityMap, ApiError>,
    },
    CourtSlots {
        generation: u64,
        result: Result<AvailabilityMap, ApiError>,
    },
}

/// Handed out on a successful submission; only the matching confirmation
/// is reset when the delay runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    config: WizardConfig,
    steps: Vec<Step>,
    current_step: usize,
    draft: BookingDraft,
    pub loading: bool,
    pub submitting: bool,
    pub error: Option<String>,
    pub success: Option<String>,
    /// Per-day answer of `available_timeslots`. Gates the slots directly
    /// when there is no court step, otherwise only informs the date step.
    day_availability: AvailabilityMap,
    /// The map consulted when a time slot is clicked.
    slot_availability: AvailabilityMap,
    bookings: Vec<BookingRecord>,
    generation: u64,
    confirmations: u64,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new(WizardConfig::default())
    }
}

impl WizardState {
    pub fn new(config: WizardConfig) -> Self {
        let steps = config.steps();
        Self {
            config,
            steps,
            current_step: 1,
            draft: BookingDraft::default(),
            loading: false,
            submitting: false,
            error: None,
            success: None,
            day_availability: AvailabilityMap::new(),
            slot_availability: AvailabilityMap::new(),
            bookings: Vec::new(),
            generation: 0,
            confirmations: 0,
        }
    }

    /// Work to do when the page mounts.
    pub fn mount(&self) -> Vec<Fetch> {
        vec![Fetch::MyBookings]
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// 1-based.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn current(&self) -> Step {
        self.step_at(self.current_step).unwrap_or(Step::Sport)
    }

    pub fn step_at(&self, number: usize) -> Option<Step> {
        number.checked_sub(1).and_then(|i| self.steps.get(i)).copied()
    }

    pub fn number_of(&self, step: Step) -> Option<usize> {
        self.steps.iter().position(|s| *s == step).map(|i| i + 1)
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn day_availability(&self) -> &AvailabilityMap {
        &self.day_availability
    }

    pub fn slot_availability(&self) -> &AvailabilityMap {
        &self.slot_availability
    }

    pub fn bookings(&self) -> &[BookingRecord] {
        &self.bookings
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_slot_available(&self, slot: TimeSlot) -> bool {
        self.slot_availability.is_available(&slot.value())
    }

    /// Whether the draft field owned by `step` is filled in.
    pub fn is_filled(&self, step: Step) -> bool {
        match step {
            Step::Sport => self.draft.sport.is_some(),
            Step::Date => self.draft.date.is_some(),
            Step::Court => self.draft.court.is_some(),
            Step::Time => self.draft.time_slot.is_some(),
            Step::Confirmation => false,
        }
    }

    /// Can the step indicator take the user to step `k`?
    pub fn is_step_accessible(&self, k: usize) -> bool {
        if k == 0 || k > self.step_count() {
            return false;
        }
        k <= self.current_step || (k == self.current_step + 1 && self.is_filled(self.current()))
    }

    pub fn can_advance(&self) -> bool {
        matches!(self.step_at(self.current_step + 1), Some(next) if next != Step::Confirmation)
            && self.is_filled(self.current())
    }

    pub fn can_submit(&self) -> bool {
        self.current() == Step::Time && self.is_filled(Step::Time) && !self.submitting
    }

    pub fn next(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.current_step += 1;
        true
    }

    pub fn back(&mut self) -> bool {
        match self.current_step.checked_sub(1) {
            Some(k) if k >= 1 => self.go_to(k),
            _ => false,
        }
    }

    /// Jump via the step indicator. Returns whether a transition happened;
    /// inaccessible targets are ignored.
    pub fn go_to(&mut self, k: usize) -> bool {
        if !self.is_step_accessible(k) {
            return false;
        }
        if k <= self.current_step {
            self.clear_after(k);
            if self.current() == Step::Confirmation {
                self.success = None;
            }
            self.current_step = k;
            return true;
        }
        self.next()
    }

    /// Cascading invalidation: empty every field after step `k` and drop the
    /// availability data that depended on them.
    fn clear_after(&mut self, k: usize) {
        let cleared: Vec<Step> = self.steps.iter().skip(k).copied().collect();
        let mut invalidate = false;
        for step in cleared {
            match step {
                Step::Sport => self.draft.sport = None,
                Step::Date => {
                    invalidate |= self.draft.date.take().is_some();
                    self.day_availability = AvailabilityMap::new();
                }
                Step::Court => invalidate |= self.draft.court.take().is_some(),
                Step::Time => self.draft.time_slot = None,
                Step::Confirmation => {}
            }
        }
        if invalidate {
            self.invalidate_slots();
        }
    }

    fn invalidate_slots(&mut self) {
        self.slot_availability = AvailabilityMap::new();
        self.generation += 1;
        self.loading = false;
    }

    fn at_step(&self, step: Step) -> bool {
        self.current() == step
    }

    pub fn select_sport(&mut self, sport: Sport) -> bool {
        if !self.at_step(Step::Sport) {
            return false;
        }
        self.draft.sport = Some(sport);
        self.clear_after(self.current_step);
        true
    }

    /// Pick the booking date. Out-of-window dates are reported inline and
    /// leave the draft alone.
    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> Option<Fetch> {
        if !self.at_step(Step::Date) {
            return None;
        }
        let sport = self.draft.sport?;
        if !self.config.date_window.allows(date, today) {
            self.error = Some("Please choose a valid booking date".to_string());
            return None;
        }
        self.draft.date = Some(date);
        self.clear_after(self.current_step);
        self.invalidate_slots();
        self.day_availability = AvailabilityMap::new();
        self.loading = true;
        self.error = None;
        Some(Fetch::DayAvailability {
            generation: self.generation,
            sport,
            date,
        })
    }

    pub fn select_court(&mut self, court: Court) -> Option<Fetch> {
        if !self.at_step(Step::Court) {
            return None;
        }
        let (sport, date) = (self.draft.sport?, self.draft.date?);
        self.draft.court = Some(court);
        self.clear_after(self.current_step);
        self.invalidate_slots();
        self.loading = true;
        self.error = None;
        Some(Fetch::CourtSlots {
            generation: self.generation,
            sport,
            date,
            court,
        })
    }

    /// Unavailable slots are ignored.
    pub fn select_time_slot(&mut self, slot: TimeSlot) -> bool {
        if !self.at_step(Step::Time) || !self.is_slot_available(slot) {
            return false;
        }
        self.draft.time_slot = Some(slot);
        true
    }

    /// Fold a finished fetch into the state. Stale availability is dropped.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::MyBookings(Ok(bookings)) => self.bookings = bookings,
            // not signed in: nothing to show, not an error
            FetchOutcome::MyBookings(Err(ApiError::MissingToken)) => {}
            FetchOutcome::MyBookings(Err(err)) => {
                log::warn!("could not load bookings: {}", err);
                if err == ApiError::Unauthorized {
                    self.error = Some(SESSION_EXPIRED.to_string());
                }
            }
            FetchOutcome::DayAvailability { generation, result } => {
                if generation != self.generation {
                    log::debug!("dropping stale day availability (generation {})", generation);
                    return;
                }
                self.loading = false;
                match result {
                    Ok(map) if self.config.court_step => self.day_availability = map,
                    Ok(map) => self.slot_availability = map,
                    Err(err) => self.error = Some(availability_error(&err)),
                }
            }
            FetchOutcome::CourtSlots { generation, result } => {
                if generation != self.generation {
                    log::debug!("dropping stale slot availability (generation {})", generation);
                    return;
                }
                self.loading = false;
                match result {
                    Ok(map) => self.slot_availability = map,
                    Err(err) => self.error = Some(availability_error(&err)),
                }
            }
        }
    }

    /// Start a submission. On failure the returned message is also stored
    /// in `error`.
    pub fn begin_submit(&mut self) -> Result<NewBooking, String> {
        if self.submitting {
            return Err("A booking is already being submitted".to_string());
        }
        let request = self.pending_booking().ok_or_else(|| {
            let message = "Please complete every step before confirming".to_string();
            self.error = Some(message.clone());
            message
        })?;
        self.submitting = true;
        self.error = None;
        Ok(request)
    }

    fn pending_booking(&self) -> Option<NewBooking> {
        if self.current() != Step::Time {
            return None;
        }
        let court = if self.config.court_step {
            Some(self.draft.court?)
        } else {
            None
        };
        Some(NewBooking {
            sport: self.draft.sport?,
            court,
            time_slot: self.draft.time_slot?,
            booking_date: self.draft.date?,
        })
    }

    /// Record the server's answer. Success moves to the confirmation and
    /// asks for a bookings refresh plus a delayed reset.
    pub fn finish_submit(
        &mut self,
        result: Result<BookingRecord, ApiError>,
    ) -> Option<(ResetTicket, Fetch)> {
        self.submitting = false;
        match result {
            Ok(record) => {
                log::info!("booking {} created", record.id);
                self.success = Some(BOOKING_CONFIRMED.to_string());
                self.error = None;
                if let Some(n) = self.number_of(Step::Confirmation) {
                    self.current_step = n;
                }
                self.confirmations += 1;
                Some((ResetTicket(self.confirmations), Fetch::MyBookings))
            }
            Err(err) => {
                log::warn!("booking failed: {}", err);
                self.error = Some(booking_error(&err));
                None
            }
        }
    }

    /// The confirmation delay ran out. Ignored if the user already moved on.
    pub fn expire_confirmation(&mut self, ticket: ResetTicket) -> bool {
        if ticket.0 != self.confirmations || self.current() != Step::Confirmation {
            return false;
        }
        self.reset();
        true
    }

    /// Back to step 1 with an empty draft. Loaded bookings are kept.
    pub fn reset(&mut self) {
        let bookings = std::mem::take(&mut self.bookings);
        let generation = self.generation + 1;
        let confirmations = self.confirmations;
        *self = Self::new(self.config.clone());
        self.bookings = bookings;
        self.generation = generation;
        self.confirmations = confirmations;
    }

    pub fn book_another(&mut self) {
        self.reset();
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn dismiss_success(&mut self) {
        self.success = None;
    }
}

pub fn availability_error(err: &ApiError) -> String {
    match err {
        ApiError::MissingToken => "Please sign in to view available time slots".to_string(),
        ApiError::Unauthorized => SESSION_EXPIRED.to_string(),
        ApiError::Rejected { body, .. } => {
            rejection_message(body, &[], "Failed to fetch available slots")
        }
        ApiError::Network(_) => "Network error while fetching slots".to_string(),
        ApiError::Decode(_) => "Failed to fetch available slots".to_string(),
    }
}

pub fn booking_error(err: &ApiError) -> String {
    match err {
        ApiError::MissingToken => "Please sign in to make a booking".to_string(),
        ApiError::Unauthorized => SESSION_EXPIRED.to_string(),
        ApiError::Rejected { body, .. } => {
            rejection_message(body, &BOOKING_ERROR_FIELDS, "Booking failed. Please try again.")
        }
        ApiError::Network(_) => "Network error. Please check your connection.".to_string(),
        ApiError::Decode(_) => "Booking failed. Please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn slot(hour: u8) -> TimeSlot {
        TimeSlot::from_hour(hour).unwrap()
    }

    fn all_open() -> AvailabilityMap {
        TimeSlot::ALL.iter().map(|s| (s.value(), true)).collect()
    }

    /// Walk a court-variant wizard up to the time step with every slot open.
    fn at_time_step() -> WizardState {
        let mut wizard = WizardState::new(WizardConfig::with_courts());
        wizard.select_sport(Sport::Badminton);
        wizard.next();
        let fetch = wizard.select_date(day(1), day(1)).unwrap();
        let Fetch::DayAvailability { generation, .. } = fetch else {
            panic!("expected day availability");
        };
        wizard.apply(FetchOutcome::DayAvailability {
            generation,
            result: Ok(all_open()),
        });
        wizard.next();
        let Some(Fetch::CourtSlots { generation, .. }) = wizard.select_court(Court::Court1) else {
            panic!("expected court slots");
        };
        wizard.apply(FetchOutcome::CourtSlots {
            generation,
            result: Ok(all_open()),
        });
        wizard.next();
        wizard
    }

    fn filled(wizard: &WizardState) -> Vec<bool> {
        let d = wizard.draft();
        vec![
            d.sport.is_some(),
            d.date.is_some(),
            d.court.is_some(),
            d.time_slot.is_some(),
        ]
    }

    #[test]
    fn steps_depend_on_court_flag() {
        assert_eq!(
            WizardConfig::with_courts().steps(),
            vec![Step::Sport, Step::Date, Step::Court, Step::Time, Step::Confirmation]
        );
        assert_eq!(
            WizardConfig::without_courts().steps(),
            vec![Step::Sport, Step::Date, Step::Time, Step::Confirmation]
        );
    }

    #[test]
    fn starts_empty_at_step_one() {
        let wizard = WizardState::default();
        assert_eq!(wizard.current_step(), 1);
        assert!(wizard.draft().is_empty());
        assert_eq!(wizard.mount(), vec![Fetch::MyBookings]);
    }

    #[test]
    fn next_requires_current_field() {
        let mut wizard = WizardState::default();
        assert!(!wizard.next());
        assert!(wizard.select_sport(Sport::Squash));
        assert!(wizard.next());
        assert_eq!(wizard.current(), Step::Date);
        assert!(!wizard.next());
    }

    #[test]
    fn accessibility_tracks_current_field() {
        let mut wizard = at_time_step();
        for k in 1..=4 {
            assert!(wizard.is_step_accessible(k));
        }
        assert!(!wizard.is_step_accessible(5));
        wizard.select_time_slot(slot(10));
        assert!(wizard.is_step_accessible(5));
        assert!(!wizard.is_step_accessible(6));
        assert!(!wizard.is_step_accessible(0));

        let mut fresh = WizardState::default();
        assert!(fresh.is_step_accessible(1));
        assert!(!fresh.is_step_accessible(2));
        fresh.select_sport(Sport::Cricket);
        assert!(fresh.is_step_accessible(2));
        assert!(!fresh.is_step_accessible(3));
    }

    #[test]
    fn backward_navigation_clears_downstream_fields() {
        for n in 2..=4 {
            for k in 1..n {
                let mut wizard = at_time_step();
                wizard.select_time_slot(slot(11));
                while wizard.current_step() > n {
                    wizard.back();
                }
                assert_eq!(wizard.current_step(), n);
                assert!(wizard.go_to(k), "go_to({}) from {}", k, n);
                assert_eq!(wizard.current_step(), k);

                let expected: Vec<bool> = (1..=4).map(|step| step <= k).collect();
                assert_eq!(filled(&wizard), expected, "k={} n={}", k, n);
            }
        }
    }

    #[test]
    fn going_back_past_court_drops_slot_availability() {
        let mut wizard = at_time_step();
        let generation = wizard.generation();
        assert!(wizard.go_to(2));
        assert!(wizard.slot_availability().is_empty());
        assert!(wizard.generation() > generation);
    }

    #[test]
    fn jumps_beyond_next_step_are_ignored() {
        let mut wizard = WizardState::default();
        wizard.select_sport(Sport::Football);
        assert!(!wizard.go_to(3));
        assert_eq!(wizard.current_step(), 1);
        assert!(wizard.go_to(2));
        assert_eq!(wizard.current_step(), 2);
        assert!(wizard.error.is_none());
    }

    #[test]
    fn confirmation_only_via_submission() {
        let mut wizard = at_time_step();
        wizard.select_time_slot(slot(12));
        assert!(!wizard.next());
        assert!(!wizard.go_to(5));
        assert_eq!(wizard.current(), Step::Time);
    }

    #[test]
    fn unavailable_slot_is_a_no_op() {
        let mut wizard = at_time_step();
        let mut map = all_open();
        map.insert("9:00", false);
        wizard.slot_availability = map;

        assert!(!wizard.select_time_slot(slot(9)));
        assert_eq!(wizard.draft().time_slot, None);
        assert!(wizard.select_time_slot(slot(10)));
        assert!(!wizard.select_time_slot(slot(9)));
        assert_eq!(wizard.draft().time_slot, Some(slot(10)));
        assert!(wizard.error.is_none());
    }

    #[test]
    fn date_window_is_enforced() {
        let mut wizard = WizardState::default();
        wizard.select_sport(Sport::Badminton);
        wizard.next();
        assert_eq!(wizard.select_date(day(3), day(1)), None);
        assert_eq!(wizard.draft().date, None);
        assert!(wizard.error.is_some());
        assert!(wizard.select_date(day(2), day(1)).is_some());
        assert!(wizard.error.is_none());

        let mut open = WizardState::new(WizardConfig::without_courts());
        open.select_sport(Sport::Badminton);
        open.next();
        assert!(open.select_date(day(20), day(1)).is_some());
        let mut past = WizardState::new(WizardConfig::without_courts());
        past.select_sport(Sport::Badminton);
        past.next();
        assert!(past.select_date(day(1), day(2)).is_none());
    }

    #[test]
    fn date_choices_for_court_variant() {
        assert_eq!(
            DateWindow::TodayOrTomorrow.choices(day(31)),
            Some(vec![day(31), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()])
        );
        assert_eq!(DateWindow::FromToday.choices(day(1)), None);
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut wizard = WizardState::default();
        wizard.select_sport(Sport::Badminton);
        wizard.next();
        let Some(Fetch::DayAvailability { generation: day_gen, .. }) = wizard.select_date(day(1), day(1)) else {
            panic!("expected day availability");
        };
        wizard.apply(FetchOutcome::DayAvailability {
            generation: day_gen,
            result: Ok(all_open()),
        });
        wizard.next();
        let Some(Fetch::CourtSlots { generation: old, .. }) = wizard.select_court(Court::Court1) else {
            panic!("expected court slots");
        };
        let Some(Fetch::CourtSlots { generation: new, .. }) = wizard.select_court(Court::Court2) else {
            panic!("expected court slots");
        };
        assert_ne!(old, new);
        assert_eq!(wizard.day_availability(), &all_open());

        let mut newer = AvailabilityMap::new();
        newer.insert("9:00", true);
        wizard.apply(FetchOutcome::CourtSlots {
            generation: new,
            result: Ok(newer.clone()),
        });
        wizard.apply(FetchOutcome::CourtSlots {
            generation: old,
            result: Ok(all_open()),
        });
        assert_eq!(wizard.slot_availability(), &newer);
        assert!(!wizard.loading);
    }

    #[test]
    fn simple_variant_gates_slots_with_day_map() {
        let mut wizard = WizardState::new(WizardConfig::without_courts());
        wizard.select_sport(Sport::Squash);
        wizard.next();
        let Some(Fetch::DayAvailability { generation, .. }) = wizard.select_date(day(5), day(1)) else {
            panic!("expected day availability");
        };
        let mut map = AvailabilityMap::new();
        map.insert("14:00", true);
        wizard.apply(FetchOutcome::DayAvailability {
            generation,
            result: Ok(map),
        });
        assert!(wizard.next());
        assert_eq!(wizard.current(), Step::Time);
        assert!(!wizard.select_time_slot(slot(9)));
        assert!(wizard.select_time_slot(slot(14)));
        let request = wizard.begin_submit().unwrap();
        assert_eq!(request.court, None);
    }

    #[test]
    fn successful_submission_confirms_then_resets() {
        let mut wizard = at_time_step();
        wizard.select_time_slot(slot(10));
        let request = wizard.begin_submit().unwrap();
        assert_eq!(request.court, Some(Court::Court1));
        assert!(wizard.submitting);

        let record: BookingRecord = serde_json::from_value(json!({
            "id": 1, "sport": "badminton", "booking_date": "2024-01-01",
            "time_slot": "10:00", "status": "pending"
        }))
        .unwrap();
        let (ticket, refresh) = wizard.finish_submit(Ok(record)).unwrap();
        assert_eq!(refresh, Fetch::MyBookings);
        assert_eq!(wizard.current(), Step::Confirmation);
        assert_eq!(wizard.success.as_deref(), Some(BOOKING_CONFIRMED));

        assert!(wizard.expire_confirmation(ticket));
        assert_eq!(wizard.current_step(), 1);
        assert!(wizard.draft().is_empty());
        assert!(wizard.success.is_none());
    }

    #[test]
    fn late_reset_does_not_wipe_a_new_draft() {
        let mut wizard = at_time_step();
        wizard.select_time_slot(slot(10));
        wizard.begin_submit().unwrap();
        let record: BookingRecord = serde_json::from_value(json!({
            "id": 2, "sport": "badminton", "booking_date": "2024-01-01", "time_slot": "10:00"
        }))
        .unwrap();
        let (ticket, _) = wizard.finish_submit(Ok(record)).unwrap();

        wizard.book_another();
        wizard.select_sport(Sport::Cricket);
        assert!(!wizard.expire_confirmation(ticket));
        assert_eq!(wizard.draft().sport, Some(Sport::Cricket));
    }

    #[test]
    fn leaving_confirmation_clears_downstream_fields_and_success() {
        for k in 1..=4 {
            let mut wizard = at_time_step();
            wizard.select_time_slot(slot(14));
            wizard.begin_submit().unwrap();
            let record: BookingRecord = serde_json::from_value(json!({
                "id": 3, "sport": "badminton", "booking_date": "2024-01-01", "time_slot": "14:00"
            }))
            .unwrap();
            wizard.finish_submit(Ok(record)).unwrap();
            assert_eq!(wizard.current_step(), 5);

            assert!(wizard.go_to(k), "go_to({}) from confirmation", k);
            assert_eq!(wizard.current_step(), k);
            assert!(wizard.success.is_none(), "success kept after go_to({})", k);

            let expected: Vec<bool> = (1..=4).map(|step| step <= k).collect();
            assert_eq!(filled(&wizard), expected, "k={}", k);
        }
    }

    #[test]
    fn failed_submission_keeps_step_and_draft() {
        let mut wizard = at_time_step();
        wizard.select_time_slot(slot(13));
        let draft = wizard.draft().clone();
        wizard.begin_submit().unwrap();

        let outcome = wizard.finish_submit(Err(ApiError::Rejected {
            status: 400,
            body: json!({"non_field_errors": ["This slot is already booked."]}),
        }));
        assert!(outcome.is_none());
        assert_eq!(wizard.current(), Step::Time);
        assert_eq!(wizard.draft(), &draft);
        assert_eq!(wizard.error.as_deref(), Some("This slot is already booked."));
        assert!(!wizard.submitting);
    }

    #[test]
    fn incomplete_draft_cannot_be_submitted() {
        let mut wizard = at_time_step();
        assert!(wizard.begin_submit().is_err());
        assert!(wizard.error.is_some());
        assert!(!wizard.submitting);
    }

    #[test]
    fn unauthorized_availability_reports_expiry() {
        let mut wizard = WizardState::default();
        wizard.select_sport(Sport::Badminton);
        wizard.next();
        let Some(Fetch::DayAvailability { generation, .. }) = wizard.select_date(day(1), day(1)) else {
            panic!("expected day availability");
        };
        wizard.apply(FetchOutcome::DayAvailability {
            generation,
            result: Err(ApiError::Unauthorized),
        });
        assert_eq!(wizard.error.as_deref(), Some(SESSION_EXPIRED));
        assert_eq!(wizard.current(), Step::Date);
        assert!(!wizard.loading);
    }

    #[test]
    fn missing_token_on_mount_is_silent() {
        let mut wizard = WizardState::default();
        wizard.apply(FetchOutcome::MyBookings(Err(ApiError::MissingToken)));
        assert!(wizard.error.is_none());
    }

    #[test]
    fn booking_errors_by_kind() {
        assert_eq!(booking_error(&ApiError::MissingToken), "Please sign in to make a booking");
        assert_eq!(
            booking_error(&ApiError::Rejected { status: 400, body: json!({"booking_date": ["Date is in the past."]}) }),
            "Booking date: Date is in the past."
        );
        assert_eq!(
            booking_error(&ApiError::Rejected { status: 500, body: json!(null) }),
            "Booking failed. Please try again."
        );
        assert_eq!(
            availability_error(&ApiError::Rejected { status: 400, body: json!({"detail": "Invalid sport"}) }),
            "Invalid sport"
        );
        assert_eq!(
            availability_error(&ApiError::Network("offline".into())),
            "Network error while fetching slots"
        );
    }
}
