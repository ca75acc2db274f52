use chrono::{Local, NaiveDate};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::data::booking::BookingDraft;
use crate::data::catalog::{Court, Period, Sport, TimeSlot};
use crate::data::fetch::{run_fetch, submit_booking};
use crate::data::session::SessionEvent;
use crate::data::wizard::{Fetch, Step, WizardState};
use crate::pages::booking_list::MyBookings;
use crate::pages::{api_client, use_session, use_settings, Alert};
use crate::utils::date::{format_long_date, format_short_date, parse_input_date, relative_day_label};

const PRIMARY_BUTTON: &str = "bg-[#EF495D] hover:bg-[#e63946] text-white rounded-lg px-8 py-3 font-semibold disabled:opacity-50";

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[component]
pub fn BookingPage() -> impl IntoView {
    let session = use_session();
    let settings = use_settings();
    let wizard = RwSignal::new(WizardState::new(settings.wizard_config()));
    let (signed_in, set_signed_in) = signal(false);

    let dispatch = {
        let session = session.clone();
        let settings = settings.clone();
        Callback::new(move |fetch: Fetch| {
            let Some(api) = api_client(&settings) else {
                return;
            };
            let session = session.clone();
            spawn_local(async move {
                let outcome = run_fetch(&api, &session, fetch).await;
                wizard.update(|w| w.apply(outcome));
            });
        })
    };

    {
        let session = session.clone();
        Effect::new(move |_| {
            set_signed_in.set(session.is_authenticated());
            for fetch in wizard.with_untracked(|w| w.mount()) {
                dispatch.run(fetch);
            }
        });
    }

    let subscription = session.subscribe(move |event| {
        set_signed_in.set(event == SessionEvent::SignedIn);
    });
    {
        let session = session.clone();
        on_cleanup(move || session.unsubscribe(subscription));
    }

    let submit = {
        let session = session.clone();
        let settings = settings.clone();
        Callback::new(move |_: ()| {
            let Some(Ok(request)) = wizard.try_update(|w| w.begin_submit()) else {
                return;
            };
            let Some(api) = api_client(&settings) else {
                wizard.update(|w| w.submitting = false);
                return;
            };
            let session = session.clone();
            let delay = settings.wizard_config().reset_delay;
            spawn_local(async move {
                let result = submit_booking(&api, &session, request).await;
                if let Some(Some((ticket, refresh))) = wizard.try_update(|w| w.finish_submit(result)) {
                    dispatch.run(refresh);
                    set_timeout(
                        move || {
                            wizard.update(|w| {
                                w.expire_confirmation(ticket);
                            })
                        },
                        delay,
                    );
                }
            });
        })
    };

    let current = Memo::new(move |_| wizard.with(|w| w.current()));
    let error = Signal::derive(move || wizard.with(|w| w.error.clone()));
    let success = Signal::derive(move || wizard.with(|w| w.success.clone()));

    view! {
        <div class="min-h-screen bg-gradient-to-br from-gray-50 to-blue-50 pt-36 pb-8 px-4">
            <div class="max-w-6xl mx-auto">
                <div class="text-center mb-8">
                    <h2 class="text-3xl font-bold text-gray-800 mb-2">"Book Your Sports Session"</h2>
                    <p class="text-gray-600">"Reserve your preferred court and time slot for your favorite sport"</p>
                </div>

                <Show when=move || !signed_in.get()>
                    <div class="mb-6 flex items-center justify-between rounded-lg bg-amber-100 px-4 py-3 text-amber-900">
                        <span>"Please sign in to make bookings and view available time slots."</span>
                        <a href="/sign-in" class="underline font-semibold">"Sign In"</a>
                    </div>
                </Show>

                <StepIndicator wizard=wizard/>

                <Alert
                    message=error
                    tone="bg-red-100 text-red-800"
                    on_close=Callback::new(move |_| wizard.update(|w| w.dismiss_error()))
                />
                <Alert
                    message=success
                    tone="bg-green-100 text-green-800"
                    on_close=Callback::new(move |_| wizard.update(|w| w.dismiss_success()))
                />

                <div class="grid grid-cols-1 lg:grid-cols-3 gap-8">
                    <div class="lg:col-span-2 rounded-xl bg-white p-8 shadow-xl">
                        {move || match current.get() {
                            Step::Sport => view! { <SportStep wizard=wizard/> }.into_any(),
                            Step::Date => view! { <DateStep wizard=wizard dispatch=dispatch/> }.into_any(),
                            Step::Court => view! { <CourtStep wizard=wizard dispatch=dispatch/> }.into_any(),
                            Step::Time => view! { <TimeStep wizard=wizard submit=submit/> }.into_any(),
                            Step::Confirmation => view! { <ConfirmationStep wizard=wizard/> }.into_any(),
                        }}
                    </div>
                    <MyBookings bookings=Signal::derive(move || wizard.with(|w| w.bookings().to_vec()))/>
                </div>
            </div>
        </div>
    }
}

#[component]
fn StepIndicator(wizard: RwSignal<WizardState>) -> impl IntoView {
    view! {
        <div class="flex justify-center mb-8">
            <div class="flex items-center space-x-4">
                {move || wizard.with(|w| {
                    let total = w.step_count();
                    w.steps().iter().enumerate().map(|(i, step)| {
                        let n = i + 1;
                        let reached = w.current_step() >= n;
                        let enabled = w.is_step_accessible(n) && *step != Step::Confirmation;
                        let circle = if reached {
                            "w-10 h-10 rounded-full flex items-center justify-center font-bold bg-[#EF495D] text-white"
                        } else {
                            "w-10 h-10 rounded-full flex items-center justify-center font-bold bg-gray-200 text-gray-500"
                        };
                        let arrow = if w.current_step() > n { "mx-2 text-[#EF495D]" } else { "mx-2 text-gray-300" };
                        view! {
                            <div class="flex items-center">
                                <button
                                    class=circle
                                    title=step.title()
                                    disabled=!enabled
                                    on:click=move |_| {
                                        wizard.update(|w| {
                                            w.go_to(n);
                                        })
                                    }
                                >
                                    {n}
                                </button>
                                {(n < total).then(|| view! { <span class=arrow>"→"</span> })}
                            </div>
                        }
                    }).collect::<Vec<_>>()
                })}
            </div>
        </div>
    }
}

#[component]
fn StepHeader(wizard: RwSignal<WizardState>, step: Step) -> impl IntoView {
    view! {
        <div class="flex items-center justify-between mb-6">
            <h4 class="text-2xl font-bold text-gray-800">{step.title()}</h4>
            <button
                class="text-gray-600 hover:text-gray-900"
                on:click=move |_| {
                    wizard.update(|w| {
                        w.back();
                    })
                }
            >
                "← Back"
            </button>
        </div>
    }
}

#[component]
fn SelectionSummary(draft: BookingDraft) -> impl IntoView {
    let sport = draft.sport;
    view! {
        <div class="flex items-center mb-6 p-4 bg-gray-50 rounded-lg">
            <span class="text-2xl mr-3">{sport.map(Sport::icon)}</span>
            <div>
                <p class="font-semibold text-gray-700">{sport.map(Sport::label)}</p>
                <p class="text-sm text-gray-500">
                    {draft.date.map(format_long_date)}
                    {draft.court.map(|c| format!(" · {}", c.label()))}
                </p>
            </div>
        </div>
    }
}

#[component]
fn NextButton(wizard: RwSignal<WizardState>, label: &'static str) -> impl IntoView {
    view! {
        <Show when=move || wizard.with(|w| w.can_advance())>
            <div class="mt-8 text-center">
                <button
                    class=PRIMARY_BUTTON
                    on:click=move |_| {
                        wizard.update(|w| {
                            w.next();
                        })
                    }
                >
                    {label}
                </button>
            </div>
        </Show>
    }
}

#[component]
fn SportStep(wizard: RwSignal<WizardState>) -> impl IntoView {
    view! {
        <div>
            <h4 class="mb-6 text-2xl font-bold text-gray-800">{Step::Sport.title()}</h4>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                {Sport::ALL.into_iter().map(|sport| {
                    let card = move || {
                        let selected = wizard.with(|w| w.draft().sport == Some(sport));
                        if selected {
                            "p-6 rounded-xl border-2 cursor-pointer transition-all duration-300 border-[#EF495D] bg-red-50 shadow-lg scale-105".to_string()
                        } else {
                            format!("p-6 rounded-xl border-2 cursor-pointer transition-all duration-300 {}", sport.card_class())
                        }
                    };
                    view! {
                        <div
                            class=card
                            on:click=move |_| {
                                wizard.update(|w| {
                                    w.select_sport(sport);
                                })
                            }
                        >
                            <div class="text-center">
                                <div class="text-4xl mb-3">{sport.icon()}</div>
                                <h6 class=format!("font-semibold {}", sport.accent_class())>{sport.label()}</h6>
                            </div>
                        </div>
                    }
                }).collect::<Vec<_>>()}
            </div>
            <NextButton wizard=wizard label="Continue to Date Selection"/>
        </div>
    }
}

#[component]
fn DateStep(wizard: RwSignal<WizardState>, dispatch: Callback<Fetch>) -> impl IntoView {
    let pick = move |date: NaiveDate| {
        if let Some(Some(fetch)) = wizard.try_update(|w| w.select_date(date, today())) {
            dispatch.run(fetch);
        }
    };
    let window = wizard.with_untracked(|w| w.config().date_window);
    let court_step = wizard.with_untracked(|w| w.config().court_step);
    let next_label = if court_step { "Choose a Court" } else { "Choose Time Slot" };

    let picker = match window.choices(today()) {
        Some(days) => view! {
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4 max-w-md mx-auto">
                {days.into_iter().map(|date| {
                    let class = move || {
                        if wizard.with(|w| w.draft().date == Some(date)) {
                            "p-4 rounded-lg border-2 border-[#EF495D] bg-red-50 font-semibold"
                        } else {
                            "p-4 rounded-lg border-2 border-gray-200 hover:border-gray-300"
                        }
                    };
                    view! {
                        <button class=class on:click=move |_| pick(date)>
                            <div>{relative_day_label(date, today())}</div>
                            <div class="text-xs text-gray-500">{format_long_date(date)}</div>
                        </button>
                    }
                }).collect::<Vec<_>>()}
            </div>
        }
        .into_any(),
        None => view! {
            <div class="max-w-md mx-auto">
                <label class="text-sm font-medium text-gray-700 mb-1 block">"Booking Date"</label>
                <input
                    type="date"
                    class="w-full px-3 py-2 border border-gray-300 rounded-md"
                    min=today().format("%Y-%m-%d").to_string()
                    prop:value=move || {
                        wizard.with(|w| w.draft().date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default())
                    }
                    on:change=move |ev| {
                        if let Some(date) = parse_input_date(&event_target_value(&ev)) {
                            pick(date);
                        }
                    }
                />
            </div>
        }
        .into_any(),
    };

    view! {
        <div>
            <StepHeader wizard=wizard step=Step::Date/>
            {move || view! { <SelectionSummary draft=wizard.with(|w| w.draft().clone())/> }}
            {picker}
            {move || wizard.with(|w| {
                (w.config().court_step && w.draft().date.is_some() && !w.loading).then(|| {
                    let open = w.day_availability().open_count();
                    view! {
                        <p class="mt-4 text-center text-sm text-gray-500">
                            {format!("{} of {} time slots have at least one free court", open, TimeSlot::ALL.len())}
                        </p>
                    }
                })
            })}
            <NextButton wizard=wizard label=next_label/>
        </div>
    }
}

#[component]
fn CourtStep(wizard: RwSignal<WizardState>, dispatch: Callback<Fetch>) -> impl IntoView {
    let pick = move |court: Court| {
        if let Some(Some(fetch)) = wizard.try_update(|w| w.select_court(court)) {
            dispatch.run(fetch);
        }
    };

    view! {
        <div>
            <StepHeader wizard=wizard step=Step::Court/>
            {move || view! { <SelectionSummary draft=wizard.with(|w| w.draft().clone())/> }}
            <div class="grid grid-cols-2 md:grid-cols-4 gap-3">
                {Court::ALL.into_iter().map(|court| {
                    let class = move || {
                        if wizard.with(|w| w.draft().court == Some(court)) {
                            "p-4 rounded-lg border-2 font-medium border-[#EF495D] bg-[#EF495D] text-white shadow-lg"
                        } else {
                            "p-4 rounded-lg border-2 font-medium border-gray-200 bg-white hover:border-gray-300"
                        }
                    };
                    view! {
                        <button class=class on:click=move |_| pick(court)>{court.label()}</button>
                    }
                }).collect::<Vec<_>>()}
            </div>
            <Show when=move || wizard.with(|w| w.loading)>
                <p class="mt-6 text-center text-gray-600">"Checking time slots for this court..."</p>
            </Show>
            <NextButton wizard=wizard label="Choose Time Slot"/>
        </div>
    }
}

#[component]
fn TimeStep(wizard: RwSignal<WizardState>, submit: Callback<()>) -> impl IntoView {
    let slot_button = move |slot: TimeSlot| {
        let class = move || {
            wizard.with(|w| {
                if w.draft().time_slot == Some(slot) {
                    "p-4 rounded-lg border-2 transition-all duration-300 font-medium border-[#EF495D] bg-[#EF495D] text-white shadow-lg scale-105"
                } else if w.is_slot_available(slot) {
                    "p-4 rounded-lg border-2 transition-all duration-300 font-medium border-green-200 bg-green-50 text-green-700 hover:border-green-300 hover:shadow-md"
                } else {
                    "p-4 rounded-lg border-2 transition-all duration-300 font-medium border-red-200 bg-red-50 text-red-400 cursor-not-allowed opacity-60"
                }
            })
        };
        let available = move || wizard.with(|w| w.is_slot_available(slot));
        view! {
            <button
                class=class
                disabled=move || !available()
                on:click=move |_| {
                    wizard.update(|w| {
                        w.select_time_slot(slot);
                    })
                }
            >
                <div class="text-sm">{slot.label()}</div>
                <div class="text-xs mt-1">{move || if available() { "✓ Available" } else { "✗ Booked" }}</div>
            </button>
        }
    };

    view! {
        <div>
            <StepHeader wizard=wizard step=Step::Time/>
            {move || view! { <SelectionSummary draft=wizard.with(|w| w.draft().clone())/> }}
            <Show
                when=move || !wizard.with(|w| w.loading)
                fallback=|| view! { <p class="text-center py-8 text-gray-600">"Loading available slots..."</p> }
            >
                {Period::ALL.into_iter().map(|period| view! {
                    <div class="mb-8">
                        <h6 class="mb-4 text-gray-700 font-semibold">{period.heading()}</h6>
                        <div class="grid grid-cols-2 md:grid-cols-4 gap-3">
                            {TimeSlot::in_period(period).map(slot_button).collect::<Vec<_>>()}
                        </div>
                    </div>
                }).collect::<Vec<_>>()}
                <Show when=move || wizard.with(|w| w.draft().time_slot.is_some())>
                    <div class="text-center">
                        <button
                            class=PRIMARY_BUTTON
                            disabled=move || !wizard.with(|w| w.can_submit())
                            on:click=move |_| submit.run(())
                        >
                            {move || if wizard.with(|w| w.submitting) { "Confirming..." } else { "Confirm Booking" }}
                        </button>
                    </div>
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn ConfirmationStep(wizard: RwSignal<WizardState>) -> impl IntoView {
    let draft = wizard.with_untracked(|w| w.draft().clone());
    let row = |label: &'static str, value: Option<String>| {
        value.map(|value| view! {
            <div class="flex justify-between">
                <span class="font-medium">{label}</span>
                <span>{value}</span>
            </div>
        })
    };

    view! {
        <div class="text-center py-8">
            <div class="text-6xl text-green-500 mb-4">"✓"</div>
            <h4 class="text-2xl font-bold text-gray-800 mb-2">{Step::Confirmation.title()}</h4>
            <p class="text-gray-600 mb-6">"Your sports session has been successfully booked."</p>
            <div class="bg-gray-50 rounded-lg p-6 mb-6 max-w-md mx-auto space-y-2">
                {row("Sport:", draft.sport.map(|s| s.label().to_string()))}
                {row("Date:", draft.date.map(format_short_date))}
                {row("Court:", draft.court.map(Court::label))}
                {row("Time:", draft.time_slot.map(TimeSlot::label))}
            </div>
            <button
                class=PRIMARY_BUTTON
                on:click=move |_| wizard.update(|w| w.book_another())
            >
                "Book Another Session"
            </button>
        </div>
    }
}
