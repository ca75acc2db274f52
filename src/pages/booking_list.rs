use leptos::prelude::*;

use crate::data::booking::BookingRecord;
use crate::utils::date::format_short_date;

const SHOWN: usize = 5;

#[component]
pub fn MyBookings(#[prop(into)] bookings: Signal<Vec<BookingRecord>>) -> impl IntoView {
    view! {
        <div class="rounded-xl bg-white p-6 shadow-xl h-fit">
            <h4 class="text-xl font-bold text-gray-800 mb-4">"My Bookings"</h4>
            {move || {
                let bookings = bookings.get();
                if bookings.is_empty() {
                    return view! {
                        <p class="text-gray-500 text-sm">"No bookings yet."</p>
                    }
                    .into_any();
                }
                let hidden = bookings.len().saturating_sub(SHOWN);
                view! {
                    <div class="space-y-3">
                        {bookings.into_iter().take(SHOWN).map(|booking| view! { <BookingRow booking/> }).collect::<Vec<_>>()}
                        {(hidden > 0).then(|| view! {
                            <p class="text-center text-sm text-gray-500">{format!("... and {} more", hidden)}</p>
                        })}
                    </div>
                }
                .into_any()
            }}
        </div>
    }
}

#[component]
fn BookingRow(booking: BookingRecord) -> impl IntoView {
    let badge = format!("text-xs px-2 py-1 rounded-full {}", booking.status.badge_class());

    view! {
        <div class="border border-gray-200 rounded-lg p-3">
            <div class="flex items-center justify-between mb-1">
                <span class="font-semibold text-gray-800">{booking.sport_label().to_string()}</span>
                <span class=badge>{booking.status_label().to_string()}</span>
            </div>
            <p class="text-sm text-gray-600">
                {format_short_date(booking.booking_date)}
                " · "
                {booking.time_label().to_string()}
            </p>
            {booking.court_display.clone().or(booking.court.clone()).map(|court| view! {
                <p class="text-xs text-gray-500">{court}</p>
            })}
        </div>
    }
}
