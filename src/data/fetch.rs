use chrono::NaiveDate;

use super::api::{ApiError, ApiResult, BookingApi};
use super::booking::{AvailabilityMap, BookingRecord, NewBooking};
use super::catalog::{Court, Sport, TimeSlot};
use super::session::{SessionEvent, SessionStore};
use super::wizard::{Fetch, FetchOutcome};

/// Run a [`Fetch`] issued by the wizard.
///
/// The stored access token is attached to every call; a 401 wipes the
/// session before the outcome is returned.
pub async fn run_fetch<A: BookingApi>(api: &A, session: &SessionStore, fetch: Fetch) -> FetchOutcome {
    match fetch {
        Fetch::MyBookings => {
            let result = authorized(session, |token| async move { api.my_bookings(&token).await }).await;
            FetchOutcome::MyBookings(result)
        }
        Fetch::DayAvailability {
            generation,
            sport,
            date,
        } => {
            let result = authorized(session, |token| async move {
                api.available_timeslots(&token, sport, date).await
            })
            .await;
            FetchOutcome::DayAvailability { generation, result }
        }
        Fetch::CourtSlots {
            generation,
            sport,
            date,
            court,
        } => {
            let result = authorized(session, |token| async move {
                court_slot_availability(api, &token, sport, date, court).await
            })
            .await;
            FetchOutcome::CourtSlots { generation, result }
        }
    }
}

/// Submit a booking with the stored token.
pub async fn submit_booking<A: BookingApi>(
    api: &A,
    session: &SessionStore,
    booking: NewBooking,
) -> ApiResult<BookingRecord> {
    let booking = &booking;
    authorized(session, |token| async move { api.create_booking(&token, booking).await }).await
}

async fn authorized<T, F, Fut>(session: &SessionStore, call: F) -> ApiResult<T>
where
    F: FnOnce(String) -> Fut,
    Fut: std::future::Future<Output = ApiResult<T>>,
{
    let token = session.access_token().ok_or(ApiError::MissingToken)?;
    let result = call(token).await;
    if let Err(ApiError::Unauthorized) = result {
        log::warn!("access token rejected, clearing session");
        session.clear(SessionEvent::Expired);
    }
    result
}

/// Which of the day's slots have `court` free.
///
/// One `available_courts` request per slot, strictly one after another. A
/// slot whose request fails is logged and left out of the map; a 401 stops
/// the sweep since every following request would be rejected too.
pub async fn court_slot_availability<A: BookingApi>(
    api: &A,
    token: &str,
    sport: Sport,
    date: NaiveDate,
    court: Court,
) -> ApiResult<AvailabilityMap> {
    let mut availability = AvailabilityMap::new();
    for slot in TimeSlot::ALL {
        match api.available_courts(token, sport, date, slot).await {
            Ok(free) => {
                availability.insert(slot.value(), free.available_courts.contains_key(court.id()));
            }
            Err(ApiError::Unauthorized) => return Err(ApiError::Unauthorized),
            Err(err) => {
                log::warn!(
                    "availability check failed for {} {} {} at {}: {}",
                    sport, date, court, slot, err
                );
            }
        }
    }
    Ok(availability)
}
